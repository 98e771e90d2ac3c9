use crate::api::ApiClient;
use crate::models::{ChatMessage, ChatSession, Page, SessionId};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Canned reply shown when the chat request itself fails. The two screens
/// kept different wording; both are load-bearing strings.
pub fn server_error_text(page: Page) -> &'static str {
    match page {
        Page::Home => "Server error. Please try again.",
        Page::Chat => "Server error.",
    }
}

const UPLOAD_FAILURE_TEXT: &str = "Failed to upload document. Please try again.";

fn upload_success_text(name: &str) -> String {
    format!(
        "Document \"{}\" uploaded successfully. You can now ask questions about it.",
        name
    )
}

/// A document uploaded earlier in the conversation; its id rides along on
/// every chat request until another upload replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub id: String,
    pub name: String,
}

/// Conversational state for one screen: the transcript, the stored-session
/// list, the active session id, and the in-flight flags. All transitions
/// are synchronous; the async side (`send_message` and friends) locks this
/// through an `Arc<Mutex<_>>` between awaits.
#[derive(Debug)]
pub struct SessionController {
    pub page: Page,
    pub messages: Vec<ChatMessage>,
    pub sessions: Vec<ChatSession>,
    pub active_session: Option<SessionId>,
    pub loading: bool,
    pub uploading: bool,
    pub history_loaded: bool,
    pub attached_file: Option<AttachedFile>,
    pub scroll: u16,
}

impl SessionController {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            messages: Vec::new(),
            sessions: Vec::new(),
            active_session: None,
            loading: false,
            uploading: false,
            history_loaded: false,
            attached_file: None,
            scroll: 0,
        }
    }

    /// Start of the send sequence: reject empty input and overlapping
    /// sends, otherwise append the user bubble optimistically and return
    /// the trimmed text that goes on the wire.
    pub fn begin_send(&mut self, raw: &str) -> Option<String> {
        if self.loading {
            return None;
        }
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.loading = true;
        self.scroll_to_bottom();
        Some(text.to_string())
    }

    pub fn complete_send(&mut self, reply: &str) {
        self.messages.push(ChatMessage::bot(reply));
        self.loading = false;
        self.scroll_to_bottom();
    }

    /// Failure path of the send sequence: exactly one canned bubble, and
    /// the composer unlocks again.
    pub fn fail_send(&mut self) {
        self.messages
            .push(ChatMessage::bot(server_error_text(self.page)));
        self.loading = false;
        self.scroll_to_bottom();
    }

    /// Adopts a backend-assigned session id, but only while none is
    /// active. Returns whether adoption happened (the caller refreshes the
    /// drawer when it did).
    pub fn adopt_session(&mut self, id: SessionId) -> bool {
        if self.active_session.is_some() {
            return false;
        }
        self.active_session = Some(id);
        true
    }

    /// Opens a stored session: its messages replace the transcript
    /// wholesale, no merging.
    pub fn select_session(&mut self, session: &ChatSession) {
        self.messages = session.messages.clone();
        self.active_session = Some(session.id.clone());
        self.scroll_to_bottom();
    }

    pub fn start_new(&mut self) {
        self.messages.clear();
        self.active_session = None;
        self.scroll = 0;
    }

    pub fn clear_all_local(&mut self) {
        self.sessions.clear();
        self.messages.clear();
        self.active_session = None;
        self.scroll = 0;
    }

    /// Replaces the session list, de-duplicated by id with the first
    /// occurrence winning, preserving backend order otherwise.
    pub fn absorb_history(&mut self, incoming: Vec<ChatSession>) {
        let mut seen = HashSet::new();
        self.sessions = incoming
            .into_iter()
            .filter(|s| seen.insert(s.id.as_str().to_string()))
            .collect();
    }

    /// Local-only bot bubble (upload confirmations); never persisted.
    pub fn append_notice(&mut self, text: &str) {
        self.messages.push(ChatMessage::bot(text));
        self.scroll_to_bottom();
    }

    pub fn attach_upload(&mut self, id: String, name: String) {
        self.attached_file = Some(AttachedFile { id, name });
    }

    pub fn attached_file_id(&self) -> Option<&str> {
        self.attached_file.as_ref().map(|f| f.id.as_str())
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// The draw pass clamps this to the real bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = u16::MAX;
    }
}

/// Runs the send sequence for text already admitted by `begin_send`:
/// save the user message (adopting a fresh session id), fire the chat
/// request, append and save the reply. Save failures are logged and
/// swallowed; a chat failure becomes the canned error bubble. No retries.
pub async fn send_message(
    api: ApiClient,
    controller: Arc<Mutex<SessionController>>,
    text: String,
    mode: Option<String>,
) {
    let (page, session_id, file_id) = {
        let guard = controller.lock().await;
        (
            guard.page,
            guard.active_session.clone(),
            guard.attached_file_id().map(str::to_string),
        )
    };

    let user_message = ChatMessage::user(&text);
    match api.save_message(page, session_id.as_ref(), &user_message).await {
        Ok(saved) => adopt_and_refresh(&api, &controller, saved.session_id).await,
        Err(e) => log::warn!("failed to save user message: {}", e),
    }

    match api
        .chat_turn(page, &text, mode.as_deref(), file_id.as_deref())
        .await
    {
        Ok(turn) => {
            let bot_message = ChatMessage::bot(&turn.reply);
            let session_id = {
                let mut guard = controller.lock().await;
                guard.complete_send(&turn.reply);
                guard.active_session.clone()
            };
            match api.save_message(page, session_id.as_ref(), &bot_message).await {
                Ok(saved) => adopt_and_refresh(&api, &controller, saved.session_id).await,
                Err(e) => log::warn!("failed to save bot message: {}", e),
            }
        }
        Err(e) => {
            log::error!("chat request failed: {}", e);
            let mut guard = controller.lock().await;
            guard.fail_send();
        }
    }
}

async fn adopt_and_refresh(
    api: &ApiClient,
    controller: &Arc<Mutex<SessionController>>,
    session_id: Option<SessionId>,
) {
    let Some(id) = session_id else {
        return;
    };
    let adopted = {
        let mut guard = controller.lock().await;
        guard.adopt_session(id)
    };
    if adopted {
        refresh_history(api, controller).await;
    }
}

async fn refresh_history(api: &ApiClient, controller: &Arc<Mutex<SessionController>>) {
    let page = controller.lock().await.page;
    match api.chat_history(page).await {
        Ok(sessions) => controller.lock().await.absorb_history(sessions),
        Err(e) => log::warn!("history refresh failed: {}", e),
    }
}

/// One-shot drawer fill on first entry to a screen. A failed fetch leaves
/// the list empty; there is no retry.
pub async fn load_history(api: ApiClient, controller: Arc<Mutex<SessionController>>) {
    let page = {
        let mut guard = controller.lock().await;
        guard.history_loaded = true;
        guard.page
    };
    match api.chat_history(page).await {
        Ok(sessions) => controller.lock().await.absorb_history(sessions),
        Err(e) => log::warn!("history load failed: {}", e),
    }
}

/// Clear All: delete the page's stored sessions remotely, then wipe the
/// local list, transcript, and active id. The local wipe happens even if
/// the delete failed, matching the visible action.
pub async fn clear_history(api: ApiClient, controller: Arc<Mutex<SessionController>>) {
    let page = controller.lock().await.page;
    if let Err(e) = api.clear_history(page).await {
        log::warn!("history clear failed: {}", e);
    }
    controller.lock().await.clear_all_local();
}

/// Reads the file at `path` and uploads it; the returned id is attached to
/// subsequent chat requests until another upload replaces it. Outcome is
/// reported as a local bot bubble either way.
pub async fn upload_document(
    api: ApiClient,
    controller: Arc<Mutex<SessionController>>,
    path: String,
) {
    {
        let mut guard = controller.lock().await;
        if guard.uploading {
            return;
        }
        guard.uploading = true;
    }

    let filename = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());

    let uploaded = match tokio::fs::read(&path).await {
        Ok(bytes) => api.upload_file(&filename, bytes).await,
        Err(e) => {
            log::warn!("could not read {}: {}", path, e);
            Err(crate::errors::NoesisError::api_error(format!(
                "could not read {}",
                path
            )))
        }
    };

    let mut guard = controller.lock().await;
    match uploaded {
        Ok(record) => {
            let notice = upload_success_text(&record.name);
            guard.attach_upload(record.id, record.name);
            guard.append_notice(&notice);
        }
        Err(e) => {
            log::error!("upload failed: {}", e);
            guard.append_notice(UPLOAD_FAILURE_TEXT);
        }
    }
    guard.uploading = false;
}
