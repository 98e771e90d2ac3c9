use crate::{
    config::get_config,
    errors::{NoesisError, NoesisResult},
    logging::log_api_call,
    models::{
        ApiCallLog, ChatMessage, ChatSession, ChatTurnResponse, Course, CoursesResponse,
        FilePage, FileRecord, FileTextResponse, FileUploadResponse, FilesListResponse, Page,
        SaveMessageResponse, SessionId,
    },
};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;
use std::time::Instant;

/// Typed client for the learning-platform backend. One instance is shared
/// by every screen; all paths are joined onto the configured base URL.
///
/// The cookie store stays enabled: the backend scopes sessions and files by
/// its own auth cookie, which is not this client's concern beyond carrying
/// it on every call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client against the configured base URL.
    pub fn new() -> NoesisResult<Self> {
        Self::with_base_url(get_config().api_base_url)
    }

    /// Builds a client against an explicit base URL (tests point this at a
    /// mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> NoesisResult<Self> {
        let http = Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(ApiClient { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request, logs the call, and turns any non-2xx status into
    /// an `Api` error carrying status and body text. No timeout beyond
    /// reqwest defaults.
    async fn execute(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> NoesisResult<reqwest::Response> {
        let started = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|e| NoesisError::api_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: path.to_string(),
            request_summary: format!("{} {}", method, path),
            response_status: status.as_u16(),
            response_time_ms: started.elapsed().as_millis(),
        });

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NoesisError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    /// One chat turn. The Home page sends only the message; the Chat page
    /// adds `mode` and `file_id` when set. Unset fields are absent keys,
    /// not nulls.
    pub async fn chat_turn(
        &self,
        page: Page,
        message: &str,
        mode: Option<&str>,
        file_id: Option<&str>,
    ) -> NoesisResult<ChatTurnResponse> {
        let (path, payload) = match page {
            Page::Home => ("/api/home/chat", json!({ "message": message })),
            Page::Chat => {
                let mut payload = json!({ "message": message });
                if let Some(mode) = mode {
                    payload["mode"] = json!(mode);
                }
                if let Some(file_id) = file_id {
                    payload["file_id"] = json!(file_id);
                }
                ("/api/chatpage/chat", payload)
            }
        };

        let response = self
            .execute("POST", path, self.http.post(self.url(path)).json(&payload))
            .await?;

        response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))
    }

    /// Mirrors one message to the remote history store. `session_id` is
    /// `None` (sent as JSON null) until the backend assigns one.
    pub async fn save_message(
        &self,
        page: Page,
        session_id: Option<&SessionId>,
        message: &ChatMessage,
    ) -> NoesisResult<SaveMessageResponse> {
        let path = "/api/chat/save";
        let payload = json!({
            "page": page,
            "session_id": session_id,
            "message": message,
        });

        let response = self
            .execute("POST", path, self.http.post(self.url(path)).json(&payload))
            .await?;

        response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))
    }

    /// Lists stored sessions for one page context, newest first (backend
    /// ordering).
    pub async fn chat_history(&self, page: Page) -> NoesisResult<Vec<ChatSession>> {
        let path = "/api/chat/history";
        let request = self
            .http
            .get(self.url(path))
            .query(&[("page", page.as_str())]);

        let response = self.execute("GET", path, request).await?;

        response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))
    }

    /// Deletes every stored session for one page context.
    pub async fn clear_history(&self, page: Page) -> NoesisResult<()> {
        let path = "/api/chat/history";
        let request = self
            .http
            .delete(self.url(path))
            .query(&[("page", page.as_str())]);

        self.execute("DELETE", path, request).await?;
        Ok(())
    }

    /// Uploads a document as multipart form-data. The backend generates the
    /// file id; the returned record carries it.
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> NoesisResult<FileRecord> {
        let path = "/api/files/upload";
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .execute("POST", path, self.http.post(self.url(path)).multipart(form))
            .await?;

        let parsed: FileUploadResponse = response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))?;

        Ok(parsed.file)
    }

    pub async fn list_files(&self) -> NoesisResult<Vec<FileRecord>> {
        let path = "/api/files";
        let response = self
            .execute("GET", path, self.http.get(self.url(path)))
            .await?;

        let parsed: FilesListResponse = response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))?;

        Ok(parsed.files)
    }

    pub async fn delete_file(&self, file_id: &str) -> NoesisResult<()> {
        let path = format!("/api/files/{}", file_id);
        let request = self.http.delete(self.url(&path));

        self.execute("DELETE", &path, request).await?;
        Ok(())
    }

    /// Full extracted text of a document, page-wise.
    pub async fn file_text(&self, file_id: &str) -> NoesisResult<Vec<FilePage>> {
        let path = format!("/api/files/{}/text", file_id);
        let response = self
            .execute("GET", &path, self.http.get(self.url(&path)))
            .await?;

        let parsed: FileTextResponse = response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))?;

        Ok(parsed.pages)
    }

    pub async fn courses(&self) -> NoesisResult<Vec<Course>> {
        let path = "/api/courses";
        let response = self
            .execute("GET", path, self.http.get(self.url(path)))
            .await?;

        let parsed: CoursesResponse = response
            .json()
            .await
            .map_err(|e| NoesisError::api_error(format!("Failed to parse API response: {}", e)))?;

        Ok(parsed.courses)
    }
}
