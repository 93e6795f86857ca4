//! Network interface counters and socket summaries.
//!
//! Interface counters come from `sysinfo`. Socket tables are read from
//! `/proc/net/{tcp,tcp6,udp,udp6}` on Linux; other platforms report no
//! connections.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::Utc;
use sysinfo::Networks;

use crate::types::{ConnectionDetail, MonitorResult, NetworkConnections, NetworkInfo, NetworkInterface};

/// Cap on per-connection rows kept in a summary.
pub const MAX_CONNECTION_DETAILS: usize = 20;

const LOOPBACK_INTERFACES: &[&str] = &["lo", "lo0"];

/// Collect interface counters, optionally restricted to one interface name.
pub fn collect_network(show_connections: bool, interface_filter: &str) -> MonitorResult<NetworkInfo> {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<NetworkInterface> = networks
        .list()
        .iter()
        .filter(|(name, _)| !LOOPBACK_INTERFACES.contains(&name.as_str()))
        .filter(|(name, _)| interface_filter.is_empty() || name.as_str() == interface_filter)
        .map(|(name, data)| NetworkInterface {
            name: name.clone(),
            bytes_sent: data.total_transmitted(),
            bytes_recv: data.total_received(),
            packets_sent: data.total_packets_transmitted(),
            packets_recv: data.total_packets_received(),
            errors_in: data.total_errors_on_received(),
            errors_out: data.total_errors_on_transmitted(),
        })
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));

    let connections = if show_connections {
        collect_connections()
    } else {
        NetworkConnections::default()
    };

    Ok(NetworkInfo {
        interfaces,
        connections,
        last_updated: Utc::now(),
    })
}

#[cfg(target_os = "linux")]
pub fn collect_connections() -> NetworkConnections {
    let mut all = Vec::new();
    for protocol in ["tcp", "tcp6", "udp", "udp6"] {
        let path = format!("/proc/net/{protocol}");
        match std::fs::read_to_string(&path) {
            Ok(contents) => all.extend(parse_proc_net(protocol, &contents)),
            Err(e) => tracing::debug!("Skipping {path}: {e}"),
        }
    }
    summarize_connections(all)
}

#[cfg(not(target_os = "linux"))]
pub fn collect_connections() -> NetworkConnections {
    NetworkConnections::default()
}

/// Parse one `/proc/net/<protocol>` table. Malformed rows are skipped.
pub fn parse_proc_net(protocol: &str, contents: &str) -> Vec<ConnectionDetail> {
    let is_udp = protocol.starts_with("udp");

    contents
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _slot = fields.next()?;
            let (local_ip, local_port) = parse_socket_addr(fields.next()?)?;
            let (remote_ip, remote_port) = parse_socket_addr(fields.next()?)?;
            let status = socket_state(fields.next()?, is_udp);

            Some(ConnectionDetail {
                protocol: protocol.to_string(),
                local_ip: local_ip.to_string(),
                local_port,
                remote_ip: remote_ip.to_string(),
                remote_port,
                status: status.to_string(),
            })
        })
        .collect()
}

/// Count connections by status and protocol, keeping the first few as details.
pub fn summarize_connections(connections: Vec<ConnectionDetail>) -> NetworkConnections {
    let mut summary = NetworkConnections {
        total: connections.len(),
        ..Default::default()
    };

    for conn in connections {
        *summary.by_status.entry(conn.status.clone()).or_default() += 1;
        *summary.by_protocol.entry(conn.protocol.clone()).or_default() += 1;
        if summary.details.len() < MAX_CONNECTION_DETAILS {
            summary.details.push(conn);
        }
    }

    summary
}

// Addresses are printed as host-order 32-bit words, ports in network order.
fn parse_socket_addr(field: &str) -> Option<(IpAddr, u16)> {
    let (addr_hex, port_hex) = field.split_once(':')?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;

    let ip = match addr_hex.len() {
        8 => {
            let word = u32::from_str_radix(addr_hex, 16).ok()?;
            IpAddr::V4(Ipv4Addr::from(word.to_ne_bytes()))
        }
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_mut(4).enumerate() {
                let word = u32::from_str_radix(addr_hex.get(i * 8..i * 8 + 8)?, 16).ok()?;
                chunk.copy_from_slice(&word.to_ne_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        _ => return None,
    };

    Some((ip, port))
}

fn socket_state(code: &str, is_udp: bool) -> &'static str {
    match code {
        "01" => "ESTABLISHED",
        "07" if is_udp => "NONE",
        "02" => "SYN_SENT",
        "03" => "SYN_RECV",
        "04" => "FIN_WAIT1",
        "05" => "FIN_WAIT2",
        "06" => "TIME_WAIT",
        "07" => "CLOSE",
        "08" => "CLOSE_WAIT",
        "09" => "LAST_ACK",
        "0A" => "LISTEN",
        "0B" => "CLOSING",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCP: &str = "\
  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 3500007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000   101        0 20297 1 0000000000000000 100 0 0 10 5
   1: 0100007F:1F90 0100007F:C350 01 00000000:00000000 00:00000000 00000000  1000        0 31337 1 0000000000000000 20 4 30 10 -1
   2: garbage
";

    const UDP6: &str = "\
  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode ref pointer drops
  10: 00000000000000000000000001000000:0222 00000000000000000000000000000000:0000 07 00000000:00000000 00:00000000 00000000     0        0 1234 2 0000000000000000 0
";

    #[cfg(target_endian = "little")]
    #[test]
    fn test_parse_ipv4_table() {
        let conns = parse_proc_net("tcp", TCP);
        assert_eq!(conns.len(), 2, "malformed row is skipped");

        assert_eq!(conns[0].local_ip, "127.0.0.53");
        assert_eq!(conns[0].local_port, 53);
        assert_eq!(conns[0].status, "LISTEN");

        assert_eq!(conns[1].local_port, 8080);
        assert_eq!(conns[1].remote_ip, "127.0.0.1");
        assert_eq!(conns[1].remote_port, 50000);
        assert_eq!(conns[1].status, "ESTABLISHED");
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_parse_ipv6_udp_table() {
        let conns = parse_proc_net("udp6", UDP6);
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].local_ip, "::1");
        assert_eq!(conns[0].local_port, 546);
        assert_eq!(conns[0].status, "NONE");
        assert_eq!(conns[0].protocol, "udp6");
    }

    #[test]
    fn test_summary_caps_details() {
        let conns: Vec<ConnectionDetail> = (0..30)
            .map(|i| ConnectionDetail {
                protocol: if i % 2 == 0 { "tcp" } else { "udp" }.to_string(),
                local_ip: "0.0.0.0".to_string(),
                local_port: i,
                remote_ip: "0.0.0.0".to_string(),
                remote_port: 0,
                status: "LISTEN".to_string(),
            })
            .collect();

        let summary = summarize_connections(conns);
        assert_eq!(summary.total, 30);
        assert_eq!(summary.details.len(), MAX_CONNECTION_DETAILS);
        assert_eq!(summary.by_status["LISTEN"], 30);
        assert_eq!(summary.by_protocol["tcp"], 15);
        assert_eq!(summary.by_protocol["udp"], 15);
    }
}
