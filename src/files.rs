use crate::api::ApiClient;
use crate::models::{FilePage, FileRecord};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Extracted-text viewer for one document, navigated page by page.
#[derive(Debug, Clone)]
pub struct TextViewer {
    pub file_id: String,
    pub file_name: String,
    pub pages: Vec<FilePage>,
    pub page_index: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl TextViewer {
    fn open(file_id: String, file_name: String) -> Self {
        Self {
            file_id,
            file_name,
            pages: Vec::new(),
            page_index: 0,
            loading: true,
            error: None,
        }
    }

    pub fn current_page(&self) -> Option<&FilePage> {
        self.pages.get(self.page_index)
    }

    pub fn next_page(&mut self) {
        if self.page_index + 1 < self.pages.len() {
            self.page_index += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page_index > 0 {
            self.page_index -= 1;
        }
    }
}

/// Document library screen: the uploaded-file list with search, delete and
/// upload, plus the extracted-text side panel. Fetch problems land in the
/// status line, never a hard error screen.
#[derive(Debug, Default)]
pub struct FilesScreen {
    pub files: Vec<FileRecord>,
    pub loading: bool,
    pub loaded: bool,
    pub search: String,
    pub cursor: usize,
    pub status: Option<String>,
    pub upload_prompt: Option<String>,
    pub viewer: Option<TextViewer>,
}

impl FilesScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filtered(&self) -> Vec<&FileRecord> {
        if self.search.trim().is_empty() {
            return self.files.iter().collect();
        }
        let needle = self.search.to_lowercase();
        self.files
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn search_push_char(&mut self, c: char) {
        self.search.push(c);
        self.cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.cursor = 0;
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.filtered().len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn selected(&self) -> Option<&FileRecord> {
        self.filtered().get(self.cursor).copied()
    }

    pub fn absorb(&mut self, files: Vec<FileRecord>) {
        self.files = files;
        self.loading = false;
        self.loaded = true;
        if self.cursor >= self.files.len() {
            self.cursor = 0;
        }
    }

    fn remove_by_id(&mut self, id: &str) {
        self.files.retain(|f| f.id != id);
        if self.cursor >= self.filtered().len() {
            self.cursor = self.cursor.saturating_sub(1);
        }
        if self
            .viewer
            .as_ref()
            .is_some_and(|v| v.file_id == id)
        {
            self.viewer = None;
        }
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    pub fn open_upload_prompt(&mut self) {
        self.upload_prompt = Some(String::new());
    }

    pub fn cancel_upload_prompt(&mut self) {
        self.upload_prompt = None;
    }

    pub fn upload_push_char(&mut self, c: char) {
        if let Some(path) = self.upload_prompt.as_mut() {
            path.push(c);
        }
    }

    pub fn upload_backspace(&mut self) {
        if let Some(path) = self.upload_prompt.as_mut() {
            path.pop();
        }
    }

    pub fn take_upload_path(&mut self) -> Option<String> {
        let path = self.upload_prompt.take()?;
        let trimmed = path.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// One-shot list fetch on first entry.
pub async fn load_files(api: ApiClient, screen: Arc<Mutex<FilesScreen>>) {
    {
        let mut guard = screen.lock().await;
        if guard.loaded || guard.loading {
            return;
        }
        guard.loading = true;
    }
    refresh_files(&api, &screen).await;
}

async fn refresh_files(api: &ApiClient, screen: &Arc<Mutex<FilesScreen>>) {
    match api.list_files().await {
        Ok(files) => screen.lock().await.absorb(files),
        Err(e) => {
            log::warn!("file list fetch failed: {}", e);
            let mut guard = screen.lock().await;
            guard.loading = false;
            guard.loaded = true;
            guard.status = Some("Failed to load files".to_string());
        }
    }
}

/// Deletes remotely first; the local row goes away only when the backend
/// confirmed. An open viewer on the same file closes with it.
pub async fn delete_file(api: ApiClient, screen: Arc<Mutex<FilesScreen>>, file_id: String) {
    match api.delete_file(&file_id).await {
        Ok(()) => {
            let mut guard = screen.lock().await;
            guard.remove_by_id(&file_id);
            guard.status = None;
        }
        Err(e) => {
            log::warn!("file delete failed: {}", e);
            screen.lock().await.status = Some("Failed to delete file".to_string());
        }
    }
}

/// Opens the extracted-text panel and fills it; a failed fetch shows up in
/// the panel, not as a popup.
pub async fn open_text_viewer(
    api: ApiClient,
    screen: Arc<Mutex<FilesScreen>>,
    file_id: String,
    file_name: String,
) {
    {
        let mut guard = screen.lock().await;
        guard.viewer = Some(TextViewer::open(file_id.clone(), file_name));
    }
    let result = api.file_text(&file_id).await;
    let mut guard = screen.lock().await;
    let Some(viewer) = guard.viewer.as_mut().filter(|v| v.file_id == file_id) else {
        return;
    };
    viewer.loading = false;
    match result {
        Ok(pages) => viewer.pages = pages,
        Err(e) => {
            log::warn!("extracted text fetch failed: {}", e);
            viewer.error = Some("Failed to load extracted text".to_string());
        }
    }
}

/// Uploads a local file into the library and reloads the list.
pub async fn upload_to_library(api: ApiClient, screen: Arc<Mutex<FilesScreen>>, path: String) {
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

    match uploaded {
        Ok(_) => refresh_files(&api, &screen).await,
        Err(e) => {
            log::warn!("library upload failed: {}", e);
            screen.lock().await.status = Some("Failed to upload document".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(id: &str, name: &str) -> FileRecord {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    async fn api(server: &MockServer) -> ApiClient {
        ApiClient::with_base_url(server.uri()).unwrap()
    }

    #[test]
    fn filter_is_case_insensitive_over_names() {
        let mut screen = FilesScreen::new();
        screen.absorb(vec![
            record("1", "Lecture Notes.pdf"),
            record("2", "syllabus.docx"),
            record("3", "more-notes.txt"),
        ]);
        for c in "NOTES".chars() {
            screen.search_push_char(c);
        }

        let filtered = screen.filtered();
        assert_eq!(filtered.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_locally_only_after_backend_confirms() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/files/f-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        screen
            .lock()
            .await
            .absorb(vec![record("f-1", "a.pdf"), record("f-2", "b.pdf")]);

        delete_file(api(&server).await, screen.clone(), "f-1".into()).await;

        let guard = screen.lock().await;
        assert_eq!(guard.files.len(), 1);
        assert_eq!(guard.files[0].id, "f-2");
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_row_and_sets_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/files/f-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("locked"))
            .mount(&server)
            .await;

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        screen.lock().await.absorb(vec![record("f-1", "a.pdf")]);

        delete_file(api(&server).await, screen.clone(), "f-1".into()).await;

        let guard = screen.lock().await;
        assert_eq!(guard.files.len(), 1);
        assert_eq!(guard.status.as_deref(), Some("Failed to delete file"));
    }

    #[tokio::test]
    async fn viewer_loads_pages_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/files/f-1/text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "file_id": "f-1",
                "page_count": 2,
                "pages": [
                    { "page": 1, "text": "first" },
                    { "page": 2, "text": "second" }
                ]
            })))
            .mount(&server)
            .await;

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        open_text_viewer(
            api(&server).await,
            screen.clone(),
            "f-1".into(),
            "a.pdf".into(),
        )
        .await;

        let mut guard = screen.lock().await;
        let viewer = guard.viewer.as_mut().unwrap();
        assert!(!viewer.loading);
        assert_eq!(viewer.current_page().unwrap().text, "first");

        viewer.next_page();
        assert_eq!(viewer.current_page().unwrap().text, "second");
        viewer.next_page();
        assert_eq!(viewer.page_index, 1);
        viewer.prev_page();
        assert_eq!(viewer.page_index, 0);
    }

    #[tokio::test]
    async fn viewer_shows_an_error_string_on_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/files/f-9/text"))
            .respond_with(ResponseTemplate::new(500).set_body_string("no ocr"))
            .mount(&server)
            .await;

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        open_text_viewer(
            api(&server).await,
            screen.clone(),
            "f-9".into(),
            "scan.pdf".into(),
        )
        .await;

        let guard = screen.lock().await;
        let viewer = guard.viewer.as_ref().unwrap();
        assert_eq!(
            viewer.error.as_deref(),
            Some("Failed to load extracted text")
        );
        assert!(viewer.pages.is_empty());
    }

    #[tokio::test]
    async fn upload_reloads_the_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "file": { "id": "f-3", "name": "new.pdf" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [
                    { "id": "f-1", "name": "a.pdf" },
                    { "id": "f-3", "name": "new.pdf" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut source = tempfile::NamedTempFile::new().unwrap();
        source.write_all(b"contents").unwrap();

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        upload_to_library(
            api(&server).await,
            screen.clone(),
            source.path().to_string_lossy().to_string(),
        )
        .await;

        let guard = screen.lock().await;
        assert_eq!(guard.files.len(), 2);
        assert!(guard.files.iter().any(|f| f.name == "new.pdf"));
    }

    #[tokio::test]
    async fn list_fetch_failure_lands_in_the_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/files"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let screen = Arc::new(Mutex::new(FilesScreen::new()));
        load_files(api(&server).await, screen.clone()).await;

        let guard = screen.lock().await;
        assert!(guard.loaded);
        assert!(guard.files.is_empty());
        assert_eq!(guard.status.as_deref(), Some("Failed to load files"));
    }
}
