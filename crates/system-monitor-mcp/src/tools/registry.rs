//! Tool registration and lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::ToolDefinition;

use super::{
    CpuInfoTool, DiskInfoTool, MemoryInfoTool, MetricCache, NetworkStatsTool, SystemOverviewTool,
    Tool, TopProcessesTool,
};

/// Name → tool map. Filled once at startup and read-only afterwards.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in metric tool sharing `cache`.
    pub fn with_default_tools(cache: Option<MetricCache>) -> Self {
        Self::new()
            .with_tool(CpuInfoTool::new(cache.clone()))
            .with_tool(MemoryInfoTool::new(cache.clone()))
            .with_tool(TopProcessesTool::new(cache.clone()))
            .with_tool(NetworkStatsTool::new(cache.clone()))
            .with_tool(DiskInfoTool::new(cache.clone()))
            .with_tool(SystemOverviewTool::new(cache))
    }

    /// Insert `tool`, replacing any tool already registered under its name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            tracing::debug!("Tool {name} re-registered, replacing previous definition");
        }
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Descriptors of every registered tool. Order is unspecified.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolError;
    use crate::types::{Arguments, InputSchema};

    struct Named(&'static str, &'static str);

    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn input_schema(&self) -> InputSchema {
            InputSchema::new()
        }

        fn execute(&self, _args: &Arguments) -> Result<String, ToolError> {
            Ok(self.1.to_string())
        }
    }

    #[test]
    fn test_default_tools() {
        let registry = ToolRegistry::with_default_tools(None);
        assert_eq!(
            registry.names(),
            vec![
                "cpu_info",
                "disk_info",
                "memory_info",
                "network_stats",
                "system_overview",
                "top_processes"
            ]
        );
        assert_eq!(registry.list().len(), 6);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ToolRegistry::new()
            .with_tool(Named("echo", "first"))
            .with_tool(Named("echo", "second"));

        assert_eq!(registry.len(), 1);
        let defs = registry.list();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].description, "second");
    }

    #[test]
    fn test_lookup() {
        let registry = ToolRegistry::new().with_tool(Named("echo", "hi"));
        let tool = registry.lookup("echo").unwrap();
        assert_eq!(tool.execute(&Arguments::new()).unwrap(), "hi");
        assert!(registry.lookup("missing").is_none());
        assert!(!registry.is_empty());
    }
}
