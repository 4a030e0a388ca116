//! MCP prompts: argument-filled message templates for common research tasks.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::ValidationError;

/// Speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub text: String,
}

impl PromptMessage {
    fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }

    /// MCP wire form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "role": self.role,
            "content": {"type": "text", "text": self.text}
        })
    }
}

/// Declared prompt argument.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Trait for MCP prompts.
pub trait McpPrompt: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn arguments(&self) -> Vec<PromptArgument>;

    /// Fill the template. Missing required arguments are a validation error.
    fn render(&self, args: &Map<String, Value>) -> Result<Vec<PromptMessage>, ValidationError>;

    /// Listing entry for `prompts/list`.
    fn definition(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "arguments": self.arguments(),
        })
    }
}

/// Register all prompts.
#[must_use]
pub fn register_all_prompts() -> Vec<Box<dyn McpPrompt>> {
    vec![Box::new(PaperSearchPrompt), Box::new(PaperAnalysisPrompt), Box::new(AuthorResearchPrompt)]
}

fn required<'a>(args: &'a Map<String, Value>, name: &'static str) -> Result<&'a str, ValidationError> {
    let raw = args.get(name).and_then(Value::as_str);
    raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| ValidationError::Empty {
        parameter: name,
        value: raw.unwrap_or_default().to_string(),
    })
}

fn optional<'a>(args: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    args.get(name).and_then(Value::as_str).unwrap_or(default)
}

/// Plans a paper search on a topic.
pub struct PaperSearchPrompt;

impl McpPrompt for PaperSearchPrompt {
    fn name(&self) -> &'static str {
        "paper_search_prompt"
    }

    fn description(&self) -> &'static str {
        "Plan and run a literature search on a topic"
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument { name: "topic", description: "Research topic", required: true },
            PromptArgument {
                name: "requirements",
                description: "Extra constraints such as years, venues or citation thresholds",
                required: false,
            },
        ]
    }

    fn render(&self, args: &Map<String, Value>) -> Result<Vec<PromptMessage>, ValidationError> {
        let topic = required(args, "topic")?;
        let requirements = optional(args, "requirements", "none");

        Ok(vec![PromptMessage::user(format!(
            "I want to find academic papers about: {topic}\n\n\
             Please:\n\
             1. Pick search terms and keywords for this topic\n\
             2. Choose useful filters (publication year range, minimum citation count, publication types)\n\
             3. Decide which fields to request\n\
             4. Lay out the search strategy before running it\n\n\
             Additional requirements: {requirements}\n\n\
             Run the search with the search_papers tool, then summarize what the results show \
             and recommend the most relevant papers."
        ))])
    }
}

/// Multi-turn analysis of a single paper.
pub struct PaperAnalysisPrompt;

impl McpPrompt for PaperAnalysisPrompt {
    fn name(&self) -> &'static str {
        "paper_analysis_prompt"
    }

    fn description(&self) -> &'static str {
        "Analyze one paper in depth"
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument { name: "paper_id", description: "Paper to analyze", required: true },
            PromptArgument {
                name: "analysis_type",
                description: "Kind of analysis, e.g. summary, methodology, impact (default: summary)",
                required: false,
            },
        ]
    }

    fn render(&self, args: &Map<String, Value>) -> Result<Vec<PromptMessage>, ValidationError> {
        let paper_id = required(args, "paper_id")?;
        let analysis_type = optional(args, "analysis_type", "summary");

        Ok(vec![
            PromptMessage::user(format!("Please analyze the paper with ID {paper_id}.")),
            PromptMessage::user(format!("Type of analysis: {analysis_type}")),
            PromptMessage::assistant(
                "I'll start by retrieving the paper's details and then work through the analysis.",
            ),
            PromptMessage::user(
                "Fetch the paper with the get_paper_details tool and base the analysis on what it returns.",
            ),
        ])
    }
}

/// Profiles an author and their work.
pub struct AuthorResearchPrompt;

impl McpPrompt for AuthorResearchPrompt {
    fn name(&self) -> &'static str {
        "author_research_prompt"
    }

    fn description(&self) -> &'static str {
        "Research an author and their publications"
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument { name: "author_name", description: "Author to research", required: true },
            PromptArgument {
                name: "research_focus",
                description: "Aspect of their work to concentrate on",
                required: false,
            },
        ]
    }

    fn render(&self, args: &Map<String, Value>) -> Result<Vec<PromptMessage>, ValidationError> {
        let author_name = required(args, "author_name")?;
        let research_focus = optional(args, "research_focus", "general overview");

        Ok(vec![PromptMessage::user(format!(
            "I want to learn about the researcher: {author_name}\n\n\
             Focus: {research_focus}\n\n\
             Please:\n\
             1. Locate the author with search_authors\n\
             2. Retrieve their profile with get_author_details\n\
             3. List their publications with get_author_papers and identify the most cited ones\n\
             4. Describe their main research areas and contributions\n\n\
             Finish with an overview of their academic profile."
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_paper_search_includes_topic() {
        let messages = PaperSearchPrompt.render(&args(json!({"topic": "graph neural networks"}))).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].text.contains("graph neural networks"));
        assert!(messages[0].text.contains("search_papers"));
    }

    #[test]
    fn test_paper_analysis_is_multi_turn() {
        let messages = PaperAnalysisPrompt.render(&args(json!({"paper_id": "abc123"}))).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::Assistant);
        assert!(messages[1].text.contains("summary"));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = AuthorResearchPrompt.render(&Map::new()).unwrap_err();
        assert_eq!(err.parameter(), "author_name");
    }

    #[test]
    fn test_message_wire_form() {
        let message = PromptMessage::assistant("hi").to_json();
        assert_eq!(message, json!({"role": "assistant", "content": {"type": "text", "text": "hi"}}));
    }

    #[test]
    fn test_definition_lists_arguments() {
        let definition = PaperAnalysisPrompt.definition();
        assert_eq!(definition["arguments"][0]["name"], "paper_id");
        assert_eq!(definition["arguments"][0]["required"], true);
        assert_eq!(definition["arguments"][1]["required"], false);
    }
}
