//! Filtered views and the cross-entity search over a [`Catalog`].
//!
//! Every function here is pure: the output depends only on the catalog and the
//! query strings, so callers can recompute views on each keystroke. Matching
//! is a case-insensitive substring test; a query that is empty or only
//! whitespace means "no filter" for the list views and "no results" for
//! [`search`].

use crate::catalog::model::{Catalog, Question};
use serde::Serialize;

/// Upper bound on the combined search result list.
pub const MAX_SEARCH_RESULTS: usize = 10;
/// Question hits kept per (topic, subtopic) pair.
pub const MAX_QUESTIONS_PER_SUBTOPIC: usize = 3;
/// Characters of question text shown in a search label.
pub const QUESTION_LABEL_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Topic,
    Subtopic,
    Question,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One hit of the global search, carrying enough context to drill in.
pub struct SearchResult {
    pub kind: SearchKind,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub label: String,
}

/// Case-insensitive needle prepared once per query.
struct Needle(Option<String>);

impl Needle {
    fn new(query: &str) -> Self {
        if query.trim().is_empty() {
            Needle(None)
        } else {
            Needle(Some(query.to_lowercase()))
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    fn matches(&self, haystack: &str) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Topic names matching `query`, in catalog order.
pub fn filter_topics<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a str> {
    let needle = Needle::new(query);
    catalog
        .topics()
        .map(|(name, _)| name)
        .filter(|name| needle.matches(name))
        .collect()
}

/// Subtopic names of `topic` matching `query`; empty when the topic is unset
/// or unknown.
pub fn filter_subtopics<'a>(
    catalog: &'a Catalog,
    topic: Option<&str>,
    query: &str,
) -> Vec<&'a str> {
    let Some(entry) = topic.and_then(|name| catalog.topic(name)) else {
        return Vec::new();
    };
    let needle = Needle::new(query);
    entry
        .subtopics
        .keys()
        .map(String::as_str)
        .filter(|name| needle.matches(name))
        .collect()
}

/// Questions of `topic/subtopic` whose text matches `query`.
///
/// Answers and code are not searched.
pub fn filter_questions<'a>(
    catalog: &'a Catalog,
    topic: Option<&str>,
    subtopic: Option<&str>,
    query: &str,
) -> Vec<&'a Question> {
    let (Some(topic), Some(subtopic)) = (topic, subtopic) else {
        return Vec::new();
    };
    let Some(sub) = catalog.subtopic(topic, subtopic) else {
        return Vec::new();
    };
    let needle = Needle::new(query);
    sub.questions
        .iter()
        .filter(|q| needle.matches(&q.question))
        .collect()
}

/// Ranked search across topics, subtopics and questions.
///
/// Topic hits come first, then subtopic hits, then question hits (at most
/// [`MAX_QUESTIONS_PER_SUBTOPIC`] per subtopic); each group keeps catalog
/// order and the combined list is cut at [`MAX_SEARCH_RESULTS`].
pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchResult> {
    let needle = Needle::new(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut topics = Vec::new();
    let mut subtopics = Vec::new();
    let mut questions = Vec::new();

    for (topic, entry) in catalog.topics() {
        if needle.matches(topic) {
            topics.push(SearchResult {
                kind: SearchKind::Topic,
                topic: topic.to_string(),
                subtopic: None,
                question: None,
                label: format!("{} {}", entry.icon, topic),
            });
        }

        for (subtopic, sub) in &entry.subtopics {
            if needle.matches(subtopic) {
                subtopics.push(SearchResult {
                    kind: SearchKind::Subtopic,
                    topic: topic.to_string(),
                    subtopic: Some(subtopic.clone()),
                    question: None,
                    label: format!("→ {subtopic} in {topic}"),
                });
            }

            let hits = sub
                .questions
                .iter()
                .filter(|q| needle.matches(&q.question))
                .take(MAX_QUESTIONS_PER_SUBTOPIC);
            for q in hits {
                questions.push(SearchResult {
                    kind: SearchKind::Question,
                    topic: topic.to_string(),
                    subtopic: Some(subtopic.clone()),
                    question: Some(q.question.clone()),
                    label: question_label(&q.question),
                });
            }
        }
    }

    topics
        .into_iter()
        .chain(subtopics)
        .chain(questions)
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

fn question_label(text: &str) -> String {
    let shortened: String = text.chars().take(QUESTION_LABEL_CHARS).collect();
    format!("❓ {shortened}...")
}
