// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Which page context a conversation belongs to. The backend scopes
/// sessions by this tag; it goes on the wire as `"home"` / `"chat"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Chat,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Chat => "chat",
        }
    }
}

/// Message author. Wire names are `"user"` and `"bot"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

fn new_message_id() -> Uuid {
    Uuid::new_v4()
}

/// One transcript entry. `id` is client-local and never serialized; the
/// wire shape is exactly `{from, text}`. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(skip, default = "new_message_id")]
    pub id: Uuid,
    pub from: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            id: new_message_id(),
            from: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        ChatMessage {
            id: new_message_id(),
            from: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Backend-assigned session identifier. The backend serializes these as
/// JSON numbers while older clients treated them as strings; this newtype
/// accepts either and serializes back in the numeric form whenever the
/// value is numeric, so the backend sees what it handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        SessionId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(n) => SessionId(n.to_string()),
            Raw::Text(s) => SessionId(s),
        })
    }
}

impl Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

/// A stored conversation as returned by `GET /api/chat/history`. The
/// transcript inside comes from the backend, not from the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Response of `POST /api/chat/save`. Carries the session id the message
/// landed in; on the first save of a conversation this is how the client
/// learns its session id.
#[derive(Debug, Deserialize)]
pub struct SaveMessageResponse {
    pub session_id: Option<SessionId>,
}

/// Response of both chat-turn endpoints.
#[derive(Debug, Deserialize)]
pub struct ChatTurnResponse {
    pub reply: String,
}

/// Uploaded-file metadata as the backend reports it. `status` is a string
/// rather than an enum because the backend's value set has drifted
/// (`uploaded`/`indexed`/`failed` observed, `processing` documented).
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct FileUploadResponse {
    pub file: FileRecord,
}

#[derive(Debug, Deserialize)]
pub struct FilesListResponse {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// One page of extracted document text.
#[derive(Debug, Clone, Deserialize)]
pub struct FilePage {
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FileTextResponse {
    #[serde(default)]
    pub pages: Vec<FilePage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Ongoing,
    Recommended,
    Library,
}

/// Catalog entry from `GET /api/courses`. Only the fields the client
/// renders are modeled; the backend sends more.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub category: String,
    pub level: CourseLevel,
    #[serde(default)]
    pub duration: Option<String>,
    pub status: CourseStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "jobRoles", default)]
    pub job_roles: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub progress: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Logs details of each API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_id_accepts_numbers_and_strings() {
        let from_num: SessionId = serde_json::from_value(json!(42)).unwrap();
        let from_str: SessionId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.as_str(), "42");
    }

    #[test]
    fn session_id_round_trips_numeric_form() {
        let id: SessionId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(7));

        let id: SessionId = serde_json::from_value(json!("abc-123")).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("abc-123"));
    }

    #[test]
    fn chat_message_wire_shape_has_no_id() {
        let msg = ChatMessage::user("hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"from": "user", "text": "hello"}));
    }

    #[test]
    fn chat_session_parses_backend_shape() {
        let session: ChatSession = serde_json::from_value(json!({
            "id": 3,
            "title": "hello there",
            "messages": [
                {"from": "user", "text": "hello there"},
                {"from": "bot", "text": "hi!"}
            ]
        }))
        .unwrap();

        assert_eq!(session.id.as_str(), "3");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].from, Sender::Bot);
    }

    #[test]
    fn course_parses_with_optional_fields_missing() {
        let course: Course = serde_json::from_value(json!({
            "id": "ds-python-101",
            "title": "Python for Data Science",
            "category": "Data Science",
            "level": "Beginner",
            "status": "ongoing"
        }))
        .unwrap();

        assert_eq!(course.level, CourseLevel::Beginner);
        assert!(course.skills.is_empty());
        assert!(course.duration.is_none());
    }
}
