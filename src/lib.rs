//! Shared library for the interview-prep catalog client.
//!
//! The crate holds the catalog model and its pure projections (topic,
//! subtopic and question filters plus the ranked cross-entity search), the
//! gateway to the REST backend with its static fallback dataset, and the
//! session and view state that the `prep` binary drives. The binary is a thin
//! shell over these modules.

pub mod catalog;
pub mod command;
pub mod config;
pub mod gateway;
pub mod render;
mod schema_loader;
pub mod session;
pub mod view;

pub use catalog::{
    Catalog, CatalogBuilder, Question, QuestionDraft, QuestionKey, SearchKind, SearchResult,
    Subtopic, TopicEntry, fallback_catalog, filter_questions, filter_subtopics, filter_topics,
    search,
};
pub use command::{Command, QuestionSelector, QuestionTarget};
pub use config::Config;
pub use gateway::{
    AuthSession, Gateway, GatewayError, GatewayResult, HttpTransport, TokenStore, Transport, User,
};
pub use session::Session;
pub use view::ViewState;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` controls verbosity and defaults to `warn`, so fallback notices
/// still reach the terminal while rendered output on stdout stays clean.
/// Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
