//! Typed admin commands.
//!
//! Each variant carries exactly the fields its backend call needs, addressed
//! by catalog names. [`Command::validate`] runs before anything is resolved or
//! sent; resolution against the catalog happens in the session.

use crate::catalog::{QuestionDraft, QuestionKey};
use crate::gateway::{GatewayError, GatewayResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    CreateTopic {
        name: String,
        icon: String,
    },
    CreateSubtopic {
        topic: String,
        name: String,
    },
    CreateQuestion {
        topic: String,
        subtopic: String,
        draft: QuestionDraft,
    },
    UpdateQuestion {
        target: QuestionTarget,
        draft: QuestionDraft,
    },
    DeleteQuestion {
        target: QuestionTarget,
    },
}

/// A question addressed inside one subtopic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionTarget {
    pub topic: String,
    pub subtopic: String,
    pub selector: QuestionSelector,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionSelector {
    Key(QuestionKey),
    /// Exact question text. When several questions share the text, the first
    /// one in stored order is chosen.
    Text(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTopic { .. } => "create-topic",
            Command::CreateSubtopic { .. } => "create-subtopic",
            Command::CreateQuestion { .. } => "create-question",
            Command::UpdateQuestion { .. } => "update-question",
            Command::DeleteQuestion { .. } => "delete-question",
        }
    }

    /// Reject blank fields before the command reaches the gateway.
    pub fn validate(&self) -> GatewayResult<()> {
        match self {
            Command::CreateTopic { name, icon } => {
                require("topic name", name)?;
                require("topic icon", icon)
            }
            Command::CreateSubtopic { topic, name } => {
                require("topic", topic)?;
                require("subtopic name", name)
            }
            Command::CreateQuestion {
                topic,
                subtopic,
                draft,
            } => {
                require("topic", topic)?;
                require("subtopic", subtopic)?;
                validate_draft(draft)
            }
            Command::UpdateQuestion { target, draft } => {
                target.validate()?;
                validate_draft(draft)
            }
            Command::DeleteQuestion { target } => target.validate(),
        }
    }
}

impl QuestionTarget {
    pub fn by_text(topic: &str, subtopic: &str, text: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            selector: QuestionSelector::Text(text.to_string()),
        }
    }

    pub fn by_key(topic: &str, subtopic: &str, key: QuestionKey) -> Self {
        Self {
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
            selector: QuestionSelector::Key(key),
        }
    }

    fn validate(&self) -> GatewayResult<()> {
        require("topic", &self.topic)?;
        require("subtopic", &self.subtopic)?;
        match &self.selector {
            QuestionSelector::Text(text) => require("question text", text),
            QuestionSelector::Key(_) => Ok(()),
        }
    }
}

fn validate_draft(draft: &QuestionDraft) -> GatewayResult<()> {
    require("question", &draft.question)?;
    require("quick answer", &draft.quick_answer)?;
    require("detailed answer", &draft.detailed_answer)?;
    require("code example", &draft.code_example)
}

fn require(field: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::ValidationFailed(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
