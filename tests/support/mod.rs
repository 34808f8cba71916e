#![allow(dead_code)]

use anyhow::{Result, bail};
use interview_catalog::gateway::{
    ApiRequest, ApiResponse, Method, QuestionDto, SubtopicDto, TopicDto,
};
use interview_catalog::{Gateway, Session, TokenStore};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";
pub const ARRAYLIST_QUESTION: &str = "Что такое ArrayList и как он работает?";

/// In-memory stand-in for the REST backend.
///
/// It keeps topics in the same nested shape the real server returns, assigns
/// ids from a counter, checks bearer tokens on admin endpoints, and records
/// every request it receives.
pub struct FakeBackend {
    topics: RefCell<Vec<TopicDto>>,
    next_id: Cell<i64>,
    requests: RefCell<Vec<ApiRequest>>,
    reachable: Cell<bool>,
    logout_fails: Cell<bool>,
}

impl FakeBackend {
    pub fn new(topics: Vec<TopicDto>) -> Self {
        Self {
            topics: RefCell::new(topics),
            next_id: Cell::new(100),
            requests: RefCell::new(Vec::new()),
            reachable: Cell::new(true),
            logout_fails: Cell::new(false),
        }
    }

    /// Java Core (Collections, Concurrency) and Spring (Core Container).
    pub fn seeded() -> Self {
        Self::new(vec![
            topic(
                1,
                "Java Core",
                "☕",
                vec![
                    subtopic(
                        1,
                        "Collections",
                        vec![
                            question(1, ARRAYLIST_QUESTION),
                            question(2, "How does HashMap handle collisions?"),
                        ],
                    ),
                    subtopic(2, "Concurrency", vec![question(3, "What does volatile guarantee?")]),
                ],
            ),
            topic(
                2,
                "Spring",
                "🌱",
                vec![subtopic(3, "Core Container", vec![question(4, "What is a bean?")])],
            ),
        ])
    }

    pub fn unreachable() -> Self {
        let backend = Self::new(Vec::new());
        backend.set_reachable(false);
        backend
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.set(reachable);
    }

    pub fn fail_logout(&self) {
        self.logout_fails.set(true);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }

    /// Requests other than catalog fetches.
    pub fn non_fetch_requests(&self) -> Vec<ApiRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| !(r.method == Method::Get && r.path == "/api/questions/topics"))
            .cloned()
            .collect()
    }

    pub fn topics(&self) -> Vec<TopicDto> {
        self.topics.borrow().clone()
    }

    fn mint_id(&self) -> i64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let admin_auth = format!("Bearer {ADMIN_TOKEN}");
        let admin = request.authorization.as_deref() == Some(admin_auth.as_str());
        match (request.method, request.path.as_str()) {
            (Method::Get, "/api/questions/topics") => ok(json!(self.topics())),
            (Method::Get, "/api/questions/search") => self.search_questions(request),
            (Method::Post, "/api/auth/login") => login(request.body.as_ref()),
            (Method::Post, "/api/auth/register") => register(request.body.as_ref()),
            (Method::Post, "/api/auth/logout") => {
                if self.logout_fails.get() {
                    plain(500, "logout exploded")
                } else {
                    ok(Value::Null)
                }
            }
            (Method::Get, "/api/auth/me") => match request.authorization.as_deref() {
                Some(auth) if auth == format!("Bearer {ADMIN_TOKEN}") => ok(admin_user()),
                Some(auth) if auth == format!("Bearer {USER_TOKEN}") => ok(plain_user()),
                _ => fail(401, "Token is invalid or expired"),
            },
            _ if !admin => fail(403, "Access denied"),
            (Method::Post, "/api/questions/topics") => self.create_topic(request),
            (Method::Post, "/api/questions/subtopics") => self.create_subtopic(request),
            (Method::Post, "/api/questions") => self.create_question(request),
            (Method::Put, path) => match question_id(path) {
                Some(id) => self.update_question(id, request),
                None => plain(404, "no route"),
            },
            (Method::Delete, path) => match question_id(path) {
                Some(id) => self.delete_question(id),
                None => plain(404, "no route"),
            },
            _ => plain(404, "no route"),
        }
    }

    /// Case-insensitive match on question, quick answer and detailed answer.
    fn search_questions(&self, request: &ApiRequest) -> ApiResponse {
        let Some(needle) = request.query_value("q").map(str::to_lowercase) else {
            return fail(400, "q is required");
        };
        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        };
        let mut hits = Vec::new();
        for topic in self.topics.borrow().iter() {
            for sub in &topic.subtopics {
                for q in &sub.questions {
                    let found = q.question.to_lowercase().contains(&needle)
                        || matches(&q.quick_answer)
                        || matches(&q.detailed_answer);
                    if found {
                        let mut hit = q.clone();
                        hit.topic_name = Some(topic.name.clone());
                        hit.subtopic_name = Some(sub.name.clone());
                        hits.push(hit);
                    }
                }
            }
        }
        ok(json!(hits))
    }

    fn create_topic(&self, request: &ApiRequest) -> ApiResponse {
        let (Some(name), Some(icon)) = (request.query_value("name"), request.query_value("icon"))
        else {
            return fail(400, "name and icon are required");
        };
        let mut topics = self.topics.borrow_mut();
        if topics.iter().any(|t| t.name == name) {
            return fail(409, "Topic already exists");
        }
        let created = topic(self.mint_id(), name, icon, Vec::new());
        topics.push(created.clone());
        ok(json!(created))
    }

    fn create_subtopic(&self, request: &ApiRequest) -> ApiResponse {
        let name = request.query_value("name").unwrap_or_default().to_string();
        let topic_id: Option<i64> = request.query_value("topicId").and_then(|v| v.parse().ok());
        let mut topics = self.topics.borrow_mut();
        let Some(parent) = topics.iter_mut().find(|t| Some(t.id) == topic_id) else {
            return fail(404, "Topic not found");
        };
        let created = subtopic(self.mint_id(), &name, Vec::new());
        parent.subtopics.push(created.clone());
        ok(json!(created))
    }

    fn create_question(&self, request: &ApiRequest) -> ApiResponse {
        let Some(body) = request.body.as_ref() else {
            return fail(400, "missing body");
        };
        let subtopic_id = body.get("subtopicId").and_then(Value::as_i64);
        let mut topics = self.topics.borrow_mut();
        let Some(sub) = topics
            .iter_mut()
            .flat_map(|t| t.subtopics.iter_mut())
            .find(|s| Some(s.id) == subtopic_id)
        else {
            return fail(404, "Subtopic not found");
        };
        let mut created = question(self.mint_id(), text_field(body, "question"));
        fill_answers(&mut created, body);
        sub.questions.push(created.clone());
        ok(json!(created))
    }

    fn update_question(&self, id: i64, request: &ApiRequest) -> ApiResponse {
        let Some(body) = request.body.as_ref() else {
            return fail(400, "missing body");
        };
        let mut topics = self.topics.borrow_mut();
        let Some(found) = topics
            .iter_mut()
            .flat_map(|t| t.subtopics.iter_mut())
            .flat_map(|s| s.questions.iter_mut())
            .find(|q| q.id == id)
        else {
            return fail(404, "Question not found");
        };
        found.question = text_field(body, "question").to_string();
        fill_answers(found, body);
        ok(json!(found.clone()))
    }

    fn delete_question(&self, id: i64) -> ApiResponse {
        let mut topics = self.topics.borrow_mut();
        for sub in topics.iter_mut().flat_map(|t| t.subtopics.iter_mut()) {
            if let Some(pos) = sub.questions.iter().position(|q| q.id == id) {
                sub.questions.remove(pos);
                return ok(Value::Null);
            }
        }
        fail(404, "Question not found")
    }
}

impl interview_catalog::Transport for FakeBackend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());
        if !self.reachable.get() {
            bail!("connection refused");
        }
        Ok(self.route(request))
    }
}

pub fn topic(id: i64, name: &str, icon: &str, subtopics: Vec<SubtopicDto>) -> TopicDto {
    TopicDto {
        id,
        name: name.to_string(),
        icon: Some(icon.to_string()),
        subtopics,
    }
}

pub fn subtopic(id: i64, name: &str, questions: Vec<QuestionDto>) -> SubtopicDto {
    SubtopicDto {
        id,
        name: name.to_string(),
        questions,
    }
}

pub fn question(id: i64, text: &str) -> QuestionDto {
    QuestionDto {
        id,
        question: text.to_string(),
        quick_answer: Some(format!("quick answer {id}")),
        detailed_answer: Some(format!("detailed answer {id}")),
        code_example: Some(format!("// example {id}")),
        topic_name: None,
        subtopic_name: None,
        created_by: None,
    }
}

/// Session over a borrowed backend so tests can inspect it afterwards.
pub fn open_session(backend: &FakeBackend) -> Session<&FakeBackend> {
    Session::open(Gateway::new(backend, TokenStore::in_memory()))
}

/// Session already signed in as the seeded admin account.
pub fn admin_session(backend: &FakeBackend) -> Session<&FakeBackend> {
    let mut session = open_session(backend);
    session
        .login("admin", "admin")
        .expect("seeded admin login succeeds");
    session
}

pub fn authorization_of(request: &ApiRequest) -> Option<&str> {
    request.authorization.as_deref()
}

fn ok(data: Value) -> ApiResponse {
    ApiResponse::json(200, &json!({"success": true, "message": null, "data": data}))
}

fn fail(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(status, &json!({"success": false, "message": message, "data": null}))
}

fn plain(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        content_type: Some("text/plain".to_string()),
        body: body.as_bytes().to_vec(),
    }
}

fn admin_user() -> Value {
    json!({
        "id": 1,
        "username": "admin",
        "email": "admin@example.com",
        "role": "ADMIN",
        "authorities": ["ADMIN", "USER"]
    })
}

fn plain_user() -> Value {
    json!({
        "id": 2,
        "username": "user",
        "email": "user@example.com",
        "role": "USER",
        "authorities": ["USER"]
    })
}

fn login(body: Option<&Value>) -> ApiResponse {
    let field = |name: &str| body.and_then(|b| b.get(name)).and_then(Value::as_str);
    match (field("username"), field("password")) {
        (Some("admin"), Some("admin")) => ok(json!({"token": ADMIN_TOKEN, "user": admin_user()})),
        (Some("user"), Some("user")) => ok(json!({"token": USER_TOKEN, "user": plain_user()})),
        _ => fail(401, "Invalid username or password"),
    }
}

fn register(body: Option<&Value>) -> ApiResponse {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default()
    };
    if field("username") == "admin" {
        return fail(400, "Username is already taken");
    }
    if field("password") != field("confirmPassword") {
        return fail(400, "Passwords do not match");
    }
    ok(json!({
        "id": 3,
        "username": field("username"),
        "email": field("email"),
        "role": "USER",
        "authorities": ["USER"]
    }))
}

fn question_id(path: &str) -> Option<i64> {
    path.strip_prefix("/api/questions/")?.parse().ok()
}

fn text_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn fill_answers(target: &mut QuestionDto, body: &Value) {
    target.quick_answer = Some(text_field(body, "quickAnswer").to_string());
    target.detailed_answer = Some(text_field(body, "detailedAnswer").to_string());
    target.code_example = Some(text_field(body, "codeExample").to_string());
}
