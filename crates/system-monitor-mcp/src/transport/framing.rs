//! Message framing for newline-delimited JSON.

use serde_json::Value;

use crate::types::{JsonRpcRequest, JsonRpcResponse, McpError, McpResult, RequestId};

/// A line that could not be read as a request.
#[derive(Debug)]
pub struct ParseFailure {
    /// The `id` recovered from the raw line, if it had a usable one.
    pub id: Option<RequestId>,
    pub error: McpError,
}

/// Parse one raw line as a JSON-RPC request.
///
/// The line is first read as a generic JSON value so that a request with a
/// malformed envelope still yields its `id` for the error reply. Bytes that
/// are not UTF-8 fail like any other unparsable line.
pub fn parse_line(line: impl AsRef<[u8]>) -> Result<JsonRpcRequest, ParseFailure> {
    let raw: Value = serde_json::from_slice(trim(line.as_ref())).map_err(|e| ParseFailure {
        id: None,
        error: McpError::ParseError(e.to_string()),
    })?;

    let id = raw.get("id").and_then(RequestId::from_value);
    serde_json::from_value(raw).map_err(|e| ParseFailure {
        id,
        error: McpError::ParseError(e.to_string()),
    })
}

/// Strip leading and trailing ASCII whitespace, including the line terminator.
pub fn trim(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

/// Serialize a response to a JSON line, with trailing newline.
pub fn frame_response(response: &JsonRpcResponse) -> McpResult<String> {
    let mut json = serde_json::to_string(response).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_request() {
        let req = parse_line(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(req.id, Some(RequestId::from(7)));
        assert_eq!(req.method, "tools/list");
    }

    #[test]
    fn test_not_json_has_no_id() {
        let failure = parse_line("not valid json").unwrap_err();
        assert!(failure.id.is_none());
        assert_eq!(failure.error.code(), -32700);
    }

    #[test]
    fn test_bad_envelope_recovers_id() {
        let failure = parse_line(r#"{"id":"abc","method":42}"#).unwrap_err();
        assert_eq!(failure.id, Some(RequestId::from("abc")));

        let failure = parse_line(r#"{"id":3}"#).unwrap_err();
        assert_eq!(failure.id, Some(RequestId::from(3)));
    }

    #[test]
    fn test_unusable_ids_are_not_recovered() {
        for line in [
            r#"{"id":null,"method":1}"#,
            r#"{"id":[1],"method":"x"}"#,
            r#"[1,2,3]"#,
        ] {
            assert!(parse_line(line).unwrap_err().id.is_none(), "{line}");
        }
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_failure() {
        let failure = parse_line(b"\xff\xfe garbage\n").unwrap_err();
        assert!(failure.id.is_none());
        assert_eq!(failure.error.code(), -32700);

        let failure = parse_line(b"{\"id\":5,\"method\":\"\xff\"}").unwrap_err();
        assert!(failure.id.is_none(), "line never became a JSON value");
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b"  {}\r\n"), b"{}");
        assert_eq!(trim(b" \t\r\n"), b"");
        assert_eq!(trim(b""), b"");
    }

    #[test]
    fn test_frame_is_one_line() {
        let resp = JsonRpcResponse::success(
            Some(RequestId::from(1)),
            json!({ "text": "multi\nline" }),
        );
        let framed = frame_response(&resp).unwrap();
        assert!(framed.ends_with('\n'));
        assert_eq!(framed.matches('\n').count(), 1);
    }
}
