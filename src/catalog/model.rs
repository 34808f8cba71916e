//! In-memory shape of the interview catalog.
//!
//! The catalog is keyed by topic name and preserves the order the backend (or
//! the fallback dataset) supplied. It is built once through
//! [`CatalogBuilder`] and then only read; a reload replaces it wholesale.

use crate::catalog::identity::{LocalKeys, QuestionKey};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
/// Topic name → topic entry, in backend order.
#[serde(transparent)]
pub struct Catalog {
    topics: IndexMap<String, TopicEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicEntry {
    pub id: i64,
    pub icon: String,
    pub subtopics: IndexMap<String, Subtopic>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Questions of one subtopic plus the server id used when creating new ones.
pub struct Subtopic {
    pub id: Option<i64>,
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub key: QuestionKey,
    pub question: String,
    pub quick_answer: String,
    pub detailed_answer: String,
    pub code_example: String,
}

/// Question fields as authored, before a key is assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub question: String,
    pub quick_answer: String,
    pub detailed_answer: String,
    pub code_example: String,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn topic(&self, name: &str) -> Option<&TopicEntry> {
        self.topics.get(name)
    }

    /// Iterates topics in catalog order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, &TopicEntry)> {
        self.topics.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn subtopic(&self, topic: &str, subtopic: &str) -> Option<&Subtopic> {
        self.topic(topic)?.subtopics.get(subtopic)
    }

    /// First question in `topic/subtopic` whose text equals `text` exactly.
    ///
    /// Duplicate texts inside one subtopic are not disambiguated: the earliest
    /// stored question wins.
    pub fn question_by_text(&self, topic: &str, subtopic: &str, text: &str) -> Option<&Question> {
        self.subtopic(topic, subtopic)?
            .questions
            .iter()
            .find(|q| q.question == text)
    }

    pub fn question_by_key(
        &self,
        topic: &str,
        subtopic: &str,
        key: QuestionKey,
    ) -> Option<&Question> {
        self.subtopic(topic, subtopic)?
            .questions
            .iter()
            .find(|q| q.key == key)
    }

    /// Total number of questions across all topics.
    pub fn question_count(&self) -> usize {
        self.topics
            .values()
            .flat_map(|topic| topic.subtopics.values())
            .map(|sub| sub.questions.len())
            .sum()
    }
}

impl QuestionDraft {
    pub fn new(
        question: impl Into<String>,
        quick_answer: impl Into<String>,
        detailed_answer: impl Into<String>,
        code_example: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            quick_answer: quick_answer.into(),
            detailed_answer: detailed_answer.into(),
            code_example: code_example.into(),
        }
    }
}

/// Incremental constructor used by the gateway normalizer and the fallback.
///
/// Topics and subtopics are appended in call order. Re-adding an existing name
/// replaces the entry in place, matching how the backend list is folded into a
/// keyed map.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
    keys: LocalKeys,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&mut self, name: &str, id: i64, icon: &str) -> &mut Self {
        let entry = TopicEntry {
            id,
            icon: icon.to_string(),
            subtopics: IndexMap::new(),
        };
        if self.catalog.topics.insert(name.to_string(), entry).is_some() {
            warn!(topic = name, "duplicate topic name; keeping the later entry");
        }
        self
    }

    /// Append a subtopic to an already added topic.
    ///
    /// Subtopics for unknown topics are dropped with a warning.
    pub fn subtopic(&mut self, topic: &str, name: &str, id: Option<i64>) -> &mut Self {
        let Some(entry) = self.catalog.topics.get_mut(topic) else {
            warn!(topic, subtopic = name, "subtopic for unknown topic dropped");
            return self;
        };
        let sub = Subtopic {
            id,
            questions: Vec::new(),
        };
        if entry.subtopics.insert(name.to_string(), sub).is_some() {
            warn!(
                topic,
                subtopic = name,
                "duplicate subtopic name; keeping the later entry"
            );
        }
        self
    }

    /// Append a question to `topic/subtopic`, minting a local key when `id`
    /// is absent.
    pub fn question(
        &mut self,
        topic: &str,
        subtopic: &str,
        id: Option<i64>,
        draft: QuestionDraft,
    ) -> &mut Self {
        let Some(sub) = self
            .catalog
            .topics
            .get_mut(topic)
            .and_then(|entry| entry.subtopics.get_mut(subtopic))
        else {
            warn!(topic, subtopic, "question for unknown subtopic dropped");
            return self;
        };
        sub.questions.push(Question {
            id,
            key: self.keys.key_for(id),
            question: draft.question,
            quick_answer: draft.quick_answer,
            detailed_answer: draft.detailed_answer,
            code_example: draft.code_example,
        });
        self
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}
