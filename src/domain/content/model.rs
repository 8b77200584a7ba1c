//! Question content as delivered by the remote content service.
//!
//! The flow never interprets this content; it only needs to know whether
//! it has arrived. Fields are kept to what renderers commonly read.

use serde::{Deserialize, Serialize};

use super::ResourceKind;
use crate::domain::foundation::{Checkpoint, ChoiceId, QuestionId};

/// The main question a session is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainQuestion {
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub label: String,
}

/// The choices offered at one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    pub checkpoint: Checkpoint,
    pub choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Returns true if the set offers the given choice.
    pub fn contains(&self, id: &ChoiceId) -> bool {
        self.choices.iter().any(|c| &c.id == id)
    }
}

/// Prompt and presentation hints for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    pub checkpoint: Checkpoint,
    pub prompt: String,
    #[serde(default)]
    pub allows_multiple: bool,
}

/// One recognised answer pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub choice_ids: Vec<ChoiceId>,
}

/// Pattern-recognition dataset used by the summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternData {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

/// Any payload the content service can return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentPayload {
    MainQuestion(MainQuestion),
    Choices(ChoiceSet),
    Metadata(QuestionMetadata),
    Patterns(PatternData),
}

impl ContentPayload {
    /// The resource this payload answers.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ContentPayload::MainQuestion(_) => ResourceKind::MainQuestion,
            ContentPayload::Choices(set) => ResourceKind::Choices(set.checkpoint),
            ContentPayload::Metadata(meta) => ResourceKind::Metadata(meta.checkpoint),
            ContentPayload::Patterns(_) => ResourceKind::PatternData,
        }
    }

    /// Returns true if this payload is the right shape for `kind`.
    ///
    /// Checkpoint-scoped payloads must also carry the requested checkpoint.
    pub fn matches(&self, kind: ResourceKind) -> bool {
        match (self, kind) {
            (ContentPayload::MainQuestion(_), ResourceKind::MainQuestion) => true,
            (ContentPayload::Choices(set), ResourceKind::Choices(cp)) => set.checkpoint == cp,
            (ContentPayload::Metadata(meta), ResourceKind::Metadata(cp)) => meta.checkpoint == cp,
            (ContentPayload::Patterns(_), ResourceKind::PatternData) => true,
            _ => false,
        }
    }
}
