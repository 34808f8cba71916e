//! Interview catalog: data model, fallback dataset, and projections.
//!
//! The gateway builds a [`Catalog`] from backend records (or the session
//! installs [`fallback_catalog`]); everything else reads it through the pure
//! functions in [`projection`].

pub mod fallback;
pub mod identity;
pub mod model;
pub mod projection;

pub use fallback::{FALLBACK_SUBTOPIC, FALLBACK_TOPIC, fallback_catalog};
pub use identity::QuestionKey;
pub use model::{Catalog, CatalogBuilder, Question, QuestionDraft, Subtopic, TopicEntry};
pub use projection::{
    SearchKind, SearchResult, filter_questions, filter_subtopics, filter_topics, search,
};
