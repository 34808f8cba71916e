//! JSON shapes exchanged with the REST backend.
//!
//! Every response is wrapped in an [`Envelope`]. Topic payloads nest
//! subtopics and questions; [`normalize_topics`] folds them into the
//! name-keyed [`Catalog`].

use crate::catalog::{Catalog, CatalogBuilder, QuestionDraft};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
/// `{ success, message, data }` wrapper used by every endpoint.
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TopicDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub subtopics: Vec<SubtopicDto>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SubtopicDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub quick_answer: Option<String>,
    #[serde(default)]
    pub detailed_answer: Option<String>,
    #[serde(default)]
    pub code_example: Option<String>,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub subtopic_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/questions` and `PUT /api/questions/{id}`.
pub struct QuestionRequest {
    pub question: String,
    pub quick_answer: String,
    pub detailed_answer: String,
    pub code_example: String,
    pub subtopic_id: i64,
}

impl QuestionRequest {
    pub fn from_draft(draft: &QuestionDraft, subtopic_id: i64) -> Self {
        Self {
            question: draft.question.clone(),
            quick_answer: draft.quick_answer.clone(),
            detailed_answer: draft.detailed_answer.clone(),
            code_example: draft.code_example.clone(),
            subtopic_id,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Registration form. Password confirmation is checked by the backend only.
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
/// Signed-in identity as reported by the backend.
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// Authority string that unlocks the admin CRUD surface.
pub const ADMIN_AUTHORITY: &str = "ADMIN";

impl User {
    pub fn is_admin(&self) -> bool {
        self.authorities.iter().any(|a| a == ADMIN_AUTHORITY)
    }
}

#[derive(Debug, Deserialize)]
/// `data` of a successful login. Older backends put the authorities next to
/// the token instead of inside `user`.
pub(crate) struct LoginData {
    pub token: Option<String>,
    pub user: Option<User>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// Fold backend topics into a catalog, keeping backend order.
pub fn normalize_topics(topics: &[TopicDto]) -> Catalog {
    let mut builder = CatalogBuilder::new();
    for topic in topics {
        builder.topic(&topic.name, topic.id, topic.icon.as_deref().unwrap_or_default());
        for sub in &topic.subtopics {
            builder.subtopic(&topic.name, &sub.name, Some(sub.id));
            for q in &sub.questions {
                builder.question(&topic.name, &sub.name, Some(q.id), q.draft());
            }
        }
    }
    builder.build()
}

impl QuestionDto {
    fn draft(&self) -> QuestionDraft {
        QuestionDraft::new(
            self.question.clone(),
            self.quick_answer.clone().unwrap_or_default(),
            self.detailed_answer.clone().unwrap_or_default(),
            self.code_example.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionKey;
    use serde_json::json;

    #[test]
    fn topics_envelope_normalizes_in_order() {
        let raw = json!({
            "success": true,
            "message": "ok",
            "data": [
                {"id": 2, "name": "Spring", "icon": "🌱", "subtopics": []},
                {"id": 1, "name": "Java Core", "icon": "☕", "subtopics": [
                    {"id": 7, "name": "Collections", "questions": [
                        {"id": 70, "question": "Что такое ArrayList?", "quickAnswer": "q",
                         "detailedAnswer": "d", "codeExample": null,
                         "topicName": "Java Core", "subtopicName": "Collections",
                         "createdBy": "admin"}
                    ]}
                ]}
            ]
        });
        let envelope: Envelope<Vec<TopicDto>> = serde_json::from_value(raw).unwrap();
        assert!(envelope.success);
        let catalog = normalize_topics(&envelope.data.unwrap());

        let names: Vec<&str> = catalog.topics().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Spring", "Java Core"]);
        let sub = catalog.subtopic("Java Core", "Collections").unwrap();
        assert_eq!(sub.id, Some(7));
        assert_eq!(sub.questions[0].key, QuestionKey::Remote(70));
        assert_eq!(sub.questions[0].code_example, "");
    }

    #[test]
    fn question_request_uses_camel_case() {
        let draft = QuestionDraft::new("q", "quick", "detail", "code");
        let body = serde_json::to_value(QuestionRequest::from_draft(&draft, 3)).unwrap();
        assert_eq!(
            body,
            json!({
                "question": "q",
                "quickAnswer": "quick",
                "detailedAnswer": "detail",
                "codeExample": "code",
                "subtopicId": 3
            })
        );
    }

    #[test]
    fn registration_keeps_mismatched_confirmation() {
        let form = RegistrationRequest {
            username: "u".into(),
            email: "u@example.com".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["confirmPassword"], "two");
    }

    #[test]
    fn admin_authority_is_exact() {
        let mut user: User =
            serde_json::from_value(json!({"username": "a", "authorities": ["ADMIN"]})).unwrap();
        assert!(user.is_admin());
        user.authorities = vec!["admin".into(), "ROLE_ADMIN".into()];
        assert!(!user.is_admin());
    }
}
