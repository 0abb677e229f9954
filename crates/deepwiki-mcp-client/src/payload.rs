//! Request payload for Deepwiki tool calls

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Remote tools the Deepwiki service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// List the documentation topics of a repository
    #[value(name = "read_wiki_structure")]
    ReadWikiStructure,
    /// Fetch the documentation of a repository
    #[value(name = "read_wiki_contents")]
    ReadWikiContents,
    /// Ask a free-form question about a repository
    #[value(name = "ask_question")]
    AskQuestion,
}

impl ToolName {
    /// All supported tools, in wire order
    pub const ALL: [ToolName; 3] = [
        ToolName::ReadWikiStructure,
        ToolName::ReadWikiContents,
        ToolName::AskQuestion,
    ];

    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ReadWikiStructure => "read_wiki_structure",
            ToolName::ReadWikiContents => "read_wiki_contents",
            ToolName::AskQuestion => "ask_question",
        }
    }

    /// Whether the tool takes a `question` argument
    pub fn takes_question(&self) -> bool {
        matches!(self, ToolName::AskQuestion)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTool(s.to_string()))
    }
}

/// JSON body of a tool call
///
/// Fields serialize in declaration order: `tool`, `repoName`, `question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    tool: ToolName,
    repo_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<String>,
}

impl RequestPayload {
    /// Build a payload, enforcing the question rule.
    ///
    /// `ask_question` requires a non-empty question; the other tools drop
    /// any question they are given.
    pub fn new(
        tool: ToolName,
        repo_name: impl Into<String>,
        question: Option<String>,
    ) -> Result<Self, ValidationError> {
        let question = if tool.takes_question() {
            match question {
                Some(q) if !q.is_empty() => Some(q),
                _ => return Err(ValidationError::MissingQuestion),
            }
        } else {
            None
        };

        Ok(Self {
            tool,
            repo_name: repo_name.into(),
            question,
        })
    }

    /// Build a payload from an unparsed tool name
    pub fn parse(
        tool: &str,
        repo_name: impl Into<String>,
        question: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(tool.parse()?, repo_name, question)
    }

    pub fn tool(&self) -> ToolName {
        self.tool
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }
}
