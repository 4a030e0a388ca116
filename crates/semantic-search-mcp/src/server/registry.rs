//! Name-keyed collections of tools, resources and prompts.

use crate::prompts::{self, McpPrompt};
use crate::resources::{self, McpResource};
use crate::tools::{self, McpTool};

/// Everything the server exposes, in registration order.
#[derive(Default)]
pub struct Registry {
    tools: Vec<Box<dyn McpTool>>,
    resources: Vec<Box<dyn McpResource>>,
    prompts: Vec<Box<dyn McpPrompt>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The 8 tools, 3 resources and 3 prompts this server ships with.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for tool in tools::register_all_tools() {
            registry.register_tool(tool);
        }
        for resource in resources::register_all_resources() {
            registry.register_resource(resource);
        }
        for prompt in prompts::register_all_prompts() {
            registry.register_prompt(prompt);
        }
        registry
    }

    /// Add a tool. A later registration with the same name replaces the earlier one.
    pub fn register_tool(&mut self, tool: Box<dyn McpTool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Add a resource, replacing any with the same URI.
    pub fn register_resource(&mut self, resource: Box<dyn McpResource>) {
        self.resources.retain(|r| r.uri() != resource.uri());
        self.resources.push(resource);
    }

    /// Add a prompt, replacing any with the same name.
    pub fn register_prompt(&mut self, prompt: Box<dyn McpPrompt>) {
        self.prompts.retain(|p| p.name() != prompt.name());
        self.prompts.push(prompt);
    }

    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    #[must_use]
    pub fn resource(&self, uri: &str) -> Option<&dyn McpResource> {
        self.resources.iter().find(|r| r.uri() == uri).map(|r| r.as_ref())
    }

    #[must_use]
    pub fn prompt(&self, name: &str) -> Option<&dyn McpPrompt> {
        self.prompts.iter().find(|p| p.name() == name).map(|p| p.as_ref())
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn McpTool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn resources(&self) -> impl Iterator<Item = &dyn McpResource> {
        self.resources.iter().map(|r| r.as_ref())
    }

    pub fn prompts(&self) -> impl Iterator<Item = &dyn McpPrompt> {
        self.prompts.iter().map(|p| p.as_ref())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tools", &self.tools.len())
            .field("resources", &self.resources.len())
            .field("prompts", &self.prompts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.tools().count(), 8);
        assert_eq!(registry.resources().count(), 3);
        assert_eq!(registry.prompts().count(), 3);

        assert!(registry.tool("search_papers").is_some());
        assert!(registry.resource("semantic-scholar://available-fields").is_some());
        assert!(registry.prompt("paper_analysis_prompt").is_some());
        assert!(registry.tool("recommendations").is_none());
    }

    #[test]
    fn test_duplicate_registration_replaces() {
        let mut registry = Registry::with_defaults();
        registry.register_tool(Box::new(crate::tools::SearchPapersTool));
        assert_eq!(registry.tools().count(), 8);
    }
}
