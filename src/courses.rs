use crate::api::ApiClient;
use crate::models::{Course, CourseLevel, CourseStatus};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The fixed category set; exactly one is always selected.
pub const CATEGORIES: [&str; 6] = [
    "Data Science",
    "Artificial Intelligence",
    "Web Development",
    "Cloud Computing",
    "App Development",
    "Cyber Security",
];

/// Course catalog screen: the fetched (or fallback) catalog plus the three
/// client-side filters. Courses render grouped by status (ongoing,
/// recommended, library) with one cursor running across the groups.
#[derive(Debug)]
pub struct CoursesScreen {
    pub courses: Vec<Course>,
    pub loading: bool,
    pub loaded: bool,
    pub degraded: bool,
    pub category_index: usize,
    pub level_filter: Option<CourseLevel>,
    pub search: String,
    pub cursor: usize,
    pub detail_open: bool,
}

impl CoursesScreen {
    pub fn new() -> Self {
        Self {
            courses: Vec::new(),
            loading: false,
            loaded: false,
            degraded: false,
            category_index: 0,
            level_filter: None,
            search: String::new(),
            cursor: 0,
            detail_open: false,
        }
    }

    pub fn category(&self) -> &'static str {
        CATEGORIES[self.category_index]
    }

    pub fn cycle_category(&mut self) {
        self.category_index = (self.category_index + 1) % CATEGORIES.len();
        self.cursor = 0;
    }

    pub fn cycle_category_back(&mut self) {
        self.category_index = (self.category_index + CATEGORIES.len() - 1) % CATEGORIES.len();
        self.cursor = 0;
    }

    /// Steps the level filter through Beginner, Intermediate, Advanced and
    /// back to unfiltered.
    pub fn cycle_level(&mut self) {
        self.level_filter = match self.level_filter {
            None => Some(CourseLevel::Beginner),
            Some(CourseLevel::Beginner) => Some(CourseLevel::Intermediate),
            Some(CourseLevel::Intermediate) => Some(CourseLevel::Advanced),
            Some(CourseLevel::Advanced) => None,
        };
        self.cursor = 0;
    }

    pub fn search_push_char(&mut self, c: char) {
        self.search.push(c);
        self.cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.cursor = 0;
    }

    fn matches(&self, course: &Course) -> bool {
        if let Some(level) = self.level_filter {
            if course.level != level {
                return false;
            }
        }
        if course.category != self.category() {
            return false;
        }
        let query = self.search.trim().to_lowercase();
        if !query.is_empty() && !course.title.to_lowercase().contains(&query) {
            return false;
        }
        true
    }

    /// One status group, filtered.
    pub fn by_status(&self, status: CourseStatus) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.status == status && self.matches(c))
            .collect()
    }

    /// All visible courses in render order (ongoing, recommended, library);
    /// the cursor indexes into this.
    pub fn visible(&self) -> Vec<&Course> {
        let mut all = self.by_status(CourseStatus::Ongoing);
        all.extend(self.by_status(CourseStatus::Recommended));
        all.extend(self.by_status(CourseStatus::Library));
        all
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn selected(&self) -> Option<&Course> {
        self.visible().get(self.cursor).copied()
    }

    pub fn open_detail(&mut self) {
        if self.selected().is_some() {
            self.detail_open = true;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    pub fn absorb(&mut self, courses: Vec<Course>, degraded: bool) {
        self.courses = courses;
        self.degraded = degraded;
        self.loading = false;
        self.loaded = true;
        self.cursor = 0;
    }
}

impl Default for CoursesScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches the catalog once; a failed fetch swaps in the built-in demo
/// catalog and flags the screen as degraded instead of erroring out.
pub async fn load_courses(api: ApiClient, screen: Arc<Mutex<CoursesScreen>>) {
    {
        let mut guard = screen.lock().await;
        if guard.loaded || guard.loading {
            return;
        }
        guard.loading = true;
    }
    match api.courses().await {
        Ok(courses) => screen.lock().await.absorb(courses, false),
        Err(e) => {
            log::warn!("courses fetch failed, using built-in catalog: {}", e);
            screen.lock().await.absorb(fallback_catalog(), true);
        }
    }
}

fn demo(
    id: &str,
    title: &str,
    category: &str,
    level: CourseLevel,
    duration: &str,
    status: CourseStatus,
    skills: &[&str],
    rating: f32,
    progress: Option<u32>,
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        level,
        duration: Some(duration.to_string()),
        status,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        job_roles: Vec::new(),
        rating: Some(rating),
        progress,
    }
}

/// Condensed offline catalog used when the backend is unreachable.
pub fn fallback_catalog() -> Vec<Course> {
    use CourseLevel::*;
    use CourseStatus::*;

    vec![
        demo(
            "ds-python-101",
            "Python for Data Science",
            "Data Science",
            Beginner,
            "6 weeks",
            Ongoing,
            &["Python", "NumPy", "pandas"],
            4.6,
            Some(48),
        ),
        demo(
            "ds-eda-201",
            "Exploratory Data Analysis",
            "Data Science",
            Intermediate,
            "5 weeks",
            Recommended,
            &["EDA", "Visualization", "Statistics"],
            4.7,
            None,
        ),
        demo(
            "ai-ml-201",
            "Machine Learning Foundations",
            "Artificial Intelligence",
            Intermediate,
            "8 weeks",
            Recommended,
            &["Linear Regression", "Classification", "Scikit-learn"],
            4.8,
            None,
        ),
        demo(
            "ai-dl-301",
            "Deep Learning with PyTorch",
            "Artificial Intelligence",
            Advanced,
            "10 weeks",
            Library,
            &["PyTorch", "CNN", "RNN"],
            4.9,
            None,
        ),
        demo(
            "web-html-101",
            "HTML & CSS Fundamentals",
            "Web Development",
            Beginner,
            "3 weeks",
            Library,
            &["HTML", "CSS", "Responsive Design"],
            4.4,
            None,
        ),
        demo(
            "web-react-201",
            "React for Frontend Development",
            "Web Development",
            Intermediate,
            "6 weeks",
            Ongoing,
            &["React", "Hooks", "TypeScript"],
            4.7,
            Some(62),
        ),
        demo(
            "cloud-aws-101",
            "AWS Cloud Practitioner",
            "Cloud Computing",
            Beginner,
            "5 weeks",
            Recommended,
            &["AWS", "EC2", "S3"],
            4.6,
            None,
        ),
        demo(
            "cyber-sec-201",
            "Cyber Security Fundamentals",
            "Cyber Security",
            Intermediate,
            "6 weeks",
            Library,
            &["Networking", "Threat Analysis", "Firewalls"],
            4.5,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn screen_with_fallback() -> CoursesScreen {
        let mut screen = CoursesScreen::new();
        screen.absorb(fallback_catalog(), false);
        screen
    }

    #[test]
    fn level_filter_cycles_through_levels_and_off() {
        let mut screen = screen_with_fallback();

        screen.cycle_level();
        assert_eq!(screen.level_filter, Some(CourseLevel::Beginner));
        assert!(screen
            .visible()
            .iter()
            .all(|c| c.level == CourseLevel::Beginner));

        screen.cycle_level();
        assert_eq!(screen.level_filter, Some(CourseLevel::Intermediate));
        screen.cycle_level();
        assert_eq!(screen.level_filter, Some(CourseLevel::Advanced));
        screen.cycle_level();
        assert_eq!(screen.level_filter, None);
    }

    #[test]
    fn category_always_applies_and_cycles() {
        let mut screen = screen_with_fallback();

        assert_eq!(screen.category(), "Data Science");
        assert!(screen
            .visible()
            .iter()
            .all(|c| c.category == "Data Science"));

        for _ in 0..CATEGORIES.len() {
            screen.cycle_category();
        }
        assert_eq!(screen.category(), "Data Science");

        screen.cycle_category_back();
        assert_eq!(screen.category(), "Cyber Security");
        screen.cycle_category();
        assert_eq!(screen.category(), "Data Science");
    }

    #[test]
    fn search_filters_titles_case_insensitively() {
        let mut screen = screen_with_fallback();
        for c in "PYTHON".chars() {
            screen.search_push_char(c);
        }

        let visible = screen.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Python for Data Science");
    }

    #[test]
    fn groups_keep_status_order() {
        let mut screen = screen_with_fallback();
        screen.category_index = CATEGORIES
            .iter()
            .position(|c| *c == "Web Development")
            .unwrap();

        let visible = screen.visible();
        assert_eq!(visible[0].status, CourseStatus::Ongoing);
        assert_eq!(visible.last().unwrap().status, CourseStatus::Library);
        assert!(screen
            .by_status(CourseStatus::Recommended)
            .is_empty());
    }

    #[test]
    fn detail_opens_only_with_a_selection() {
        let mut screen = CoursesScreen::new();
        screen.open_detail();
        assert!(!screen.detail_open);

        screen.absorb(fallback_catalog(), false);
        screen.open_detail();
        assert!(screen.detail_open);
    }

    #[tokio::test]
    async fn load_courses_absorbs_the_backend_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "courses": [{
                    "id": "x-1",
                    "title": "Test Course",
                    "category": "Data Science",
                    "level": "Beginner",
                    "status": "ongoing"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::with_base_url(server.uri()).unwrap();
        let screen = Arc::new(Mutex::new(CoursesScreen::new()));
        load_courses(api, screen.clone()).await;

        let guard = screen.lock().await;
        assert!(guard.loaded);
        assert!(!guard.degraded);
        assert_eq!(guard.courses.len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_the_builtin_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let api = ApiClient::with_base_url(server.uri()).unwrap();
        let screen = Arc::new(Mutex::new(CoursesScreen::new()));
        load_courses(api, screen.clone()).await;

        let guard = screen.lock().await;
        assert!(guard.loaded);
        assert!(guard.degraded);
        assert!(!guard.courses.is_empty());
    }

    #[tokio::test]
    async fn catalog_is_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "courses": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::with_base_url(server.uri()).unwrap();
        let screen = Arc::new(Mutex::new(CoursesScreen::new()));
        load_courses(api.clone(), screen.clone()).await;
        load_courses(api, screen.clone()).await;

        assert!(screen.lock().await.loaded);
    }
}
