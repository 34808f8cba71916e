//! Session controller: the one owner of the catalog.
//!
//! A [`Session`] wires the gateway, the current catalog, the signed-in user
//! and the view state together. Admin edits go through [`Session::dispatch`],
//! which always ends with a full catalog reload; nothing patches the catalog
//! in place.

use crate::catalog::{Catalog, Question, fallback_catalog};
use crate::command::{Command, QuestionSelector, QuestionTarget};
use crate::gateway::{
    Gateway, GatewayError, GatewayResult, QuestionRequest, RegistrationRequest, Transport, User,
};
use crate::view::ViewState;
use tracing::{info, warn};

pub struct Session<T: Transport> {
    gateway: Gateway<T>,
    catalog: Catalog,
    user: Option<User>,
    view: ViewState,
}

impl<T: Transport> Session<T> {
    /// Start a session with a fresh catalog fetch (or the fallback).
    pub fn open(gateway: Gateway<T>) -> Self {
        let mut session = Self {
            gateway,
            catalog: Catalog::default(),
            user: None,
            view: ViewState::new(),
        };
        session.reload();
        session
    }

    /// Replace the catalog from the backend, falling back to the static
    /// dataset when the fetch fails. Returns whether remote data was loaded.
    pub fn reload(&mut self) -> bool {
        match self.gateway.fetch_catalog() {
            Ok(catalog) => {
                self.catalog = catalog;
                true
            }
            Err(err) => {
                warn!(%err, "backend unavailable; using the built-in catalog");
                self.catalog = fallback_catalog();
                false
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        !self.gateway.is_available()
    }

    /// Whether admin editing is unlocked for the signed-in user.
    pub fn admin_enabled(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn login(&mut self, username: &str, password: &str) -> GatewayResult<&User> {
        let auth = self.gateway.authenticate(username, password)?;
        Ok(&*self.user.insert(auth.user))
    }

    pub fn register(&mut self, form: &RegistrationRequest) -> GatewayResult<User> {
        self.gateway.register(form)
    }

    /// Sign out; the user, token and view state are all cleared.
    pub fn logout(&mut self) {
        self.gateway.logout();
        self.user = None;
        self.view.reset();
        info!("signed out");
    }

    /// Recover the identity behind a persisted token.
    ///
    /// Returns `Ok(None)` when there is no token or the backend is offline. A
    /// token the backend rejects is discarded.
    pub fn restore_user(&mut self) -> GatewayResult<Option<&User>> {
        if self.gateway.token().is_none() || !self.gateway.is_available() {
            return Ok(None);
        }
        match self.gateway.current_user() {
            Ok(user) => Ok(Some(&*self.user.insert(user))),
            Err(GatewayError::InvalidCredentials(message)) => {
                warn!(%message, "stored token rejected; discarding it");
                self.gateway.discard_token();
                self.user = None;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Validate, resolve and send one admin command, then reload.
    ///
    /// In fallback mode this fails before any request is built.
    pub fn dispatch(&mut self, command: Command) -> GatewayResult<()> {
        if !self.gateway.is_available() {
            return Err(GatewayError::offline());
        }
        command.validate()?;

        match &command {
            Command::CreateTopic { name, icon } => {
                self.gateway.create_topic(name.trim(), icon.trim())?;
            }
            Command::CreateSubtopic { topic, name } => {
                let topic_id = self
                    .catalog
                    .topic(topic)
                    .map(|entry| entry.id)
                    .ok_or_else(|| not_found(format!("topic {topic:?}")))?;
                self.gateway.create_subtopic(name.trim(), topic_id)?;
            }
            Command::CreateQuestion {
                topic,
                subtopic,
                draft,
            } => {
                let subtopic_id = self.subtopic_id(topic, subtopic)?;
                self.gateway
                    .create_question(&QuestionRequest::from_draft(draft, subtopic_id))?;
            }
            Command::UpdateQuestion { target, draft } => {
                let subtopic_id = self.subtopic_id(&target.topic, &target.subtopic)?;
                let id = self.question_id(target)?;
                self.gateway
                    .update_question(id, &QuestionRequest::from_draft(draft, subtopic_id))?;
            }
            Command::DeleteQuestion { target } => {
                let id = self.question_id(target)?;
                self.gateway.delete_question(id)?;
            }
        }

        info!(command = command.name(), "command applied; reloading catalog");
        self.reload();
        Ok(())
    }

    fn subtopic_id(&self, topic: &str, subtopic: &str) -> GatewayResult<i64> {
        let sub = self
            .catalog
            .subtopic(topic, subtopic)
            .ok_or_else(|| not_found(format!("subtopic {subtopic:?} in {topic:?}")))?;
        sub.id
            .ok_or_else(|| not_found(format!("subtopic {subtopic:?} has no server id")))
    }

    fn question_id(&self, target: &QuestionTarget) -> GatewayResult<i64> {
        let question = self.resolve(target)?;
        question.id.ok_or_else(|| {
            not_found(format!(
                "question {:?} is built-in and cannot be edited",
                question.question
            ))
        })
    }

    /// Look up the targeted question; text selects the first exact match.
    pub fn resolve(&self, target: &QuestionTarget) -> GatewayResult<&Question> {
        let QuestionTarget {
            topic, subtopic, ..
        } = target;
        let found = match &target.selector {
            QuestionSelector::Key(key) => self.catalog.question_by_key(topic, subtopic, *key),
            QuestionSelector::Text(text) => self.catalog.question_by_text(topic, subtopic, text),
        };
        found.ok_or_else(|| not_found(format!("question in {topic:?} / {subtopic:?}")))
    }
}

fn not_found(what: String) -> GatewayError {
    GatewayError::NotFound(what)
}
