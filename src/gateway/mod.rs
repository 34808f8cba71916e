//! Remote data gateway for the interview backend.
//!
//! The gateway turns typed calls into [`ApiRequest`]s, attaches the bearer
//! token, and interprets responses:
//!
//! - transport failures and malformed bodies become `NetworkUnavailable`;
//! - a non-2xx status with a JSON envelope reporting `success: false` becomes
//!   `ValidationFailed` (or `InvalidCredentials` for login), any other non-2xx
//!   is `NetworkUnavailable`;
//! - a 2xx envelope with `success: false` becomes `ValidationFailed`.
//!
//! [`Gateway::fetch_catalog`] is stricter: every failure is
//! `NetworkUnavailable`, and it flips the gateway into fallback mode, after
//! which every mutating call fails without touching the transport.

pub mod error;
pub mod token;
pub mod transport;
pub mod wire;

pub use error::{GatewayError, GatewayResult};
pub use token::{TOKEN_FILE, TokenStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use wire::{
    ADMIN_AUTHORITY, Envelope, QuestionDto, QuestionRequest, RegistrationRequest, SubtopicDto,
    TopicDto, User, normalize_topics,
};

use crate::catalog::Catalog;
use crate::schema_loader::PayloadSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use wire::{LoginData, LoginRequest};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const LOGOUT_PATH: &str = "/api/auth/logout";
const ME_PATH: &str = "/api/auth/me";
const TOPICS_PATH: &str = "/api/questions/topics";
const SUBTOPICS_PATH: &str = "/api/questions/subtopics";
const QUESTIONS_PATH: &str = "/api/questions";
const SEARCH_PATH: &str = "/api/questions/search";

// Requests to these endpoints never carry the bearer token.
const PUBLIC_ENDPOINTS: &[&str] = &[LOGIN_PATH, REGISTER_PATH];

/// Token and identity returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

pub struct Gateway<T: Transport> {
    transport: T,
    tokens: TokenStore,
    available: bool,
}

impl<T: Transport> Gateway<T> {
    /// New gateway; it is considered available until a catalog fetch fails.
    pub fn new(transport: T, tokens: TokenStore) -> Self {
        Self {
            transport,
            tokens,
            available: true,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn token(&self) -> Option<&str> {
        self.tokens.token()
    }

    /// Load every topic with nested subtopics and questions.
    ///
    /// Success marks the gateway available; any failure marks it unavailable
    /// and leaves fallback substitution to the caller.
    pub fn fetch_catalog(&mut self) -> GatewayResult<Catalog> {
        match self.load_topics() {
            Ok(topics) => {
                self.available = true;
                let catalog = normalize_topics(&topics);
                info!(
                    topics = catalog.len(),
                    questions = catalog.question_count(),
                    "catalog loaded"
                );
                Ok(catalog)
            }
            Err(detail) => {
                self.available = false;
                warn!(%detail, "catalog fetch failed");
                Err(GatewayError::NetworkUnavailable(detail))
            }
        }
    }

    fn load_topics(&self) -> Result<Vec<TopicDto>, String> {
        let response = self
            .send(ApiRequest::new(Method::Get, TOPICS_PATH))
            .map_err(|err| err.to_string())?;
        if !response.is_success() {
            return Err(format!("GET {TOPICS_PATH} returned HTTP {}", response.status));
        }
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|err| format!("malformed topics body: {err}"))?;
        let schema = PayloadSchema::topics_response().map_err(|err| format!("{err:#}"))?;
        schema.validate(&value).map_err(|err| format!("{err:#}"))?;
        let envelope: Envelope<Vec<TopicDto>> = serde_json::from_value(value)
            .map_err(|err| format!("malformed topics body: {err}"))?;
        if !envelope.success {
            return Err(envelope
                .message
                .unwrap_or_else(|| "backend reported failure".to_string()));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    /// Sign in and keep the returned token for later requests.
    pub fn authenticate(&mut self, username: &str, password: &str) -> GatewayResult<AuthSession> {
        self.ensure_available()?;
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|err| malformed(&err.to_string()))?;
        let data: LoginData = self
            .call(ApiRequest::new(Method::Post, LOGIN_PATH).json_body(body))
            .map_err(|err| match err {
                GatewayError::ValidationFailed(message) => {
                    GatewayError::InvalidCredentials(message)
                }
                other => other,
            })?
            .ok_or_else(|| malformed("login response without data"))?;

        let token = data
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("login response without token"))?;
        let user = data.user.unwrap_or_else(|| User {
            id: None,
            username: username.to_string(),
            email: None,
            role: None,
            authorities: data.authorities,
        });

        if let Err(err) = self.tokens.set(&token) {
            warn!(error = %format!("{err:#}"), "token kept in memory only");
        }
        info!(user = %user.username, admin = user.is_admin(), "signed in");
        Ok(AuthSession { token, user })
    }

    /// Create an account. Password confirmation is left to the backend.
    pub fn register(&self, form: &RegistrationRequest) -> GatewayResult<User> {
        self.ensure_available()?;
        let body = serde_json::to_value(form).map_err(|err| malformed(&err.to_string()))?;
        let user = self
            .call::<User>(ApiRequest::new(Method::Post, REGISTER_PATH).json_body(body))?
            .ok_or_else(|| malformed("registration response without data"))?;
        info!(user = %user.username, "registered");
        Ok(user)
    }

    /// Best-effort remote logout; the local token is always cleared.
    pub fn logout(&mut self) {
        if self.available && self.tokens.token().is_some() {
            if let Err(err) = self.call::<Value>(ApiRequest::new(Method::Post, LOGOUT_PATH)) {
                warn!(%err, "remote logout failed");
            }
        }
        self.discard_token();
    }

    /// Drop the token locally without telling the backend.
    pub fn discard_token(&mut self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %format!("{err:#}"), "failed to remove stored token");
        }
    }

    /// Identity behind the current token.
    pub fn current_user(&self) -> GatewayResult<User> {
        self.ensure_available()?;
        if self.tokens.token().is_none() {
            return Err(GatewayError::InvalidCredentials("not signed in".to_string()));
        }
        self.call::<User>(ApiRequest::new(Method::Get, ME_PATH))
            .map_err(|err| match err {
                GatewayError::ValidationFailed(message) => {
                    GatewayError::InvalidCredentials(message)
                }
                other => other,
            })?
            .ok_or_else(|| malformed("profile response without data"))
    }

    pub fn create_topic(&self, name: &str, icon: &str) -> GatewayResult<Option<TopicDto>> {
        self.ensure_available()?;
        self.call(
            ApiRequest::new(Method::Post, TOPICS_PATH)
                .query_param("name", name)
                .query_param("icon", icon),
        )
    }

    pub fn create_subtopic(&self, name: &str, topic_id: i64) -> GatewayResult<Option<SubtopicDto>> {
        self.ensure_available()?;
        self.call(
            ApiRequest::new(Method::Post, SUBTOPICS_PATH)
                .query_param("name", name)
                .query_param("topicId", topic_id.to_string()),
        )
    }

    pub fn create_question(&self, request: &QuestionRequest) -> GatewayResult<Option<QuestionDto>> {
        self.ensure_available()?;
        let body = serde_json::to_value(request).map_err(|err| malformed(&err.to_string()))?;
        self.call(ApiRequest::new(Method::Post, QUESTIONS_PATH).json_body(body))
    }

    pub fn update_question(
        &self,
        id: i64,
        request: &QuestionRequest,
    ) -> GatewayResult<Option<QuestionDto>> {
        self.ensure_available()?;
        let body = serde_json::to_value(request).map_err(|err| malformed(&err.to_string()))?;
        self.call(ApiRequest::new(Method::Put, format!("{QUESTIONS_PATH}/{id}")).json_body(body))
    }

    pub fn delete_question(&self, id: i64) -> GatewayResult<()> {
        self.ensure_available()?;
        self.call::<Value>(ApiRequest::new(Method::Delete, format!("{QUESTIONS_PATH}/{id}")))?;
        Ok(())
    }

    /// Server-side search; unlike the local engine it also matches answer text.
    pub fn search_questions(&self, query: &str) -> GatewayResult<Vec<QuestionDto>> {
        self.ensure_available()?;
        let hits: Vec<QuestionDto> = self
            .call(ApiRequest::new(Method::Get, SEARCH_PATH).query_param("q", query))?
            .unwrap_or_default();
        info!(query, hits = hits.len(), "remote search finished");
        Ok(hits)
    }

    fn ensure_available(&self) -> GatewayResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(GatewayError::offline())
        }
    }

    /// Attach auth and hand the request to the transport.
    fn send(&self, mut request: ApiRequest) -> GatewayResult<ApiResponse> {
        let public = PUBLIC_ENDPOINTS
            .iter()
            .any(|endpoint| request.path.starts_with(endpoint));
        if !public {
            if let Some(token) = self.tokens.token() {
                request.authorization = Some(format!("Bearer {token}"));
            }
        }

        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.send(&request).map_err(|err| {
            GatewayError::NetworkUnavailable(format!(
                "{} {}: {err:#}",
                request.method, request.path
            ))
        })?;
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "response received"
        );
        Ok(response)
    }

    /// Send and unwrap the `{ success, message, data }` envelope.
    fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> GatewayResult<Option<R>> {
        let label = format!("{} {}", request.method, request.path);
        let response = self.send(request)?;

        if !response.is_success() {
            if let Some(message) = rejected_envelope(&response) {
                return Err(GatewayError::ValidationFailed(message));
            }
            return Err(GatewayError::NetworkUnavailable(format!(
                "{label} returned HTTP {}",
                response.status
            )));
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let envelope: Envelope<R> = serde_json::from_slice(&response.body)
            .map_err(|err| malformed(&format!("{label}: {err}")))?;
        if !envelope.success {
            return Err(GatewayError::ValidationFailed(
                envelope
                    .message
                    .unwrap_or_else(|| "request rejected by the backend".to_string()),
            ));
        }
        Ok(envelope.data)
    }
}

/// Message of a JSON error envelope carried by a non-2xx response.
fn rejected_envelope(response: &ApiResponse) -> Option<String> {
    if !response.is_json() {
        return None;
    }
    let envelope: Envelope<Value> = serde_json::from_slice(&response.body).ok()?;
    if envelope.success {
        return None;
    }
    Some(
        envelope
            .message
            .unwrap_or_else(|| format!("request rejected with HTTP {}", response.status)),
    )
}

fn malformed(detail: &str) -> GatewayError {
    GatewayError::NetworkUnavailable(format!("malformed response: {detail}"))
}
