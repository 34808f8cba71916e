//! UI query state: selections, the three free-text queries, and which
//! question panels are expanded.
//!
//! The view never owns catalog data. Every `visible_*` method recomputes its
//! list from the catalog passed in, so a reload cannot leave stale entries
//! behind; only selections and expansion keys survive it.

use crate::catalog::{
    Catalog, Question, QuestionKey, SearchKind, SearchResult, filter_questions, filter_subtopics,
    filter_topics, search,
};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Query for the cross-entity search and the topic list.
    pub global_query: String,
    /// Filters subtopic names inside the selected topic.
    pub subtopic_query: String,
    /// Filters question text inside the selected subtopic.
    pub question_query: String,
    selected_topic: Option<String>,
    selected_subtopic: Option<String>,
    expanded_questions: BTreeSet<QuestionKey>,
    expanded_details: BTreeSet<QuestionKey>,
    expanded_code: BTreeSet<QuestionKey>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_topic(&self) -> Option<&str> {
        self.selected_topic.as_deref()
    }

    pub fn selected_subtopic(&self) -> Option<&str> {
        self.selected_subtopic.as_deref()
    }

    /// Select a topic; the subtopic and both scoped queries are cleared.
    pub fn select_topic(&mut self, topic: &str) {
        self.selected_topic = Some(topic.to_string());
        self.selected_subtopic = None;
        self.subtopic_query.clear();
        self.question_query.clear();
    }

    /// Select a subtopic of the current topic; the question query is cleared.
    pub fn select_subtopic(&mut self, subtopic: &str) {
        self.selected_subtopic = Some(subtopic.to_string());
        self.question_query.clear();
    }

    /// Drill into a search hit.
    ///
    /// A question hit keeps its exact text as the question query so the list
    /// opens narrowed to that question. The global query is always cleared.
    pub fn select_search_result(&mut self, result: &SearchResult) {
        debug!(kind = ?result.kind, topic = %result.topic, "drilling into search result");
        match result.kind {
            SearchKind::Topic => self.select_topic(&result.topic),
            SearchKind::Subtopic => {
                self.select_topic(&result.topic);
                if let Some(subtopic) = &result.subtopic {
                    self.select_subtopic(subtopic);
                }
            }
            SearchKind::Question => {
                self.select_topic(&result.topic);
                if let Some(subtopic) = &result.subtopic {
                    self.select_subtopic(subtopic);
                }
                if let Some(text) = &result.question {
                    self.question_query = text.clone();
                }
            }
        }
        self.global_query.clear();
    }

    pub fn toggle_question(&mut self, key: QuestionKey) {
        toggle(&mut self.expanded_questions, key);
    }

    pub fn toggle_detail(&mut self, key: QuestionKey) {
        toggle(&mut self.expanded_details, key);
    }

    pub fn toggle_code(&mut self, key: QuestionKey) {
        toggle(&mut self.expanded_code, key);
    }

    pub fn is_question_expanded(&self, key: QuestionKey) -> bool {
        self.expanded_questions.contains(&key)
    }

    pub fn is_detail_expanded(&self, key: QuestionKey) -> bool {
        self.expanded_details.contains(&key)
    }

    pub fn is_code_expanded(&self, key: QuestionKey) -> bool {
        self.expanded_code.contains(&key)
    }

    pub fn visible_topics<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        filter_topics(catalog, &self.global_query)
    }

    pub fn visible_subtopics<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        filter_subtopics(catalog, self.selected_topic(), &self.subtopic_query)
    }

    pub fn visible_questions<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Question> {
        filter_questions(
            catalog,
            self.selected_topic(),
            self.selected_subtopic(),
            &self.question_query,
        )
    }

    pub fn search_results(&self, catalog: &Catalog) -> Vec<SearchResult> {
        search(catalog, &self.global_query)
    }

    /// Back to the initial state: nothing selected, no queries, all collapsed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn toggle(set: &mut BTreeSet<QuestionKey>, key: QuestionKey) {
    if !set.remove(&key) {
        set.insert(key);
    }
}
