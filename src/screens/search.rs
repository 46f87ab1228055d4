use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::models::NewsListItem;
use crate::news::{FetchState, NewsRepository};

use super::feed::ArticleFeed;

const SKELETON_COUNT: usize = 5;
const DEBOUNCE: Duration = Duration::from_millis(500);

/// State holder for the search screen. Typed input is debounced: a query
/// only fires once the user has been quiet for the debounce window, and a
/// changed query resets the accumulated results and page tracking.
pub struct SearchScreen {
    pub feed: ArticleFeed,
    pub query: String,
    pub selected: usize,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
    current_page: u32,
    executed_query: String,
    pending_since: Option<Instant>,
    in_flight: bool,
    rx: Option<mpsc::Receiver<FetchState>>,
}

impl SearchScreen {
    pub fn new() -> Self {
        Self {
            feed: ArticleFeed::new(),
            query: String::new(),
            selected: 0,
            is_loading: false,
            is_loading_more: false,
            error: None,
            current_page: 1,
            executed_query: String::new(),
            pending_since: None,
            in_flight: false,
            rx: None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.pending_since = Some(Instant::now());
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.pending_since = Some(Instant::now());
    }

    /// Fire the pending query once the debounce window has elapsed.
    /// Called from the event loop on every tick.
    pub fn tick(&mut self, repository: &NewsRepository) {
        let Some(since) = self.pending_since else {
            return;
        };
        if since.elapsed() < DEBOUNCE {
            return;
        }
        self.submit(repository);
    }

    /// Fire the current query immediately, bypassing the debounce window.
    /// Used when the user submits the input with Enter.
    pub fn submit(&mut self, repository: &NewsRepository) {
        self.pending_since = None;
        if self.query.is_empty() {
            self.clear_results();
        } else if self.query != self.executed_query {
            self.start_search(repository, true);
        }
    }

    pub fn load_more(&mut self, repository: &NewsRepository) {
        if self.in_flight
            || self.feed.has_page(self.current_page + 1)
            || self.executed_query.is_empty()
        {
            return;
        }

        self.current_page += 1;
        self.start_search(repository, false);
    }

    fn start_search(&mut self, repository: &NewsRepository, is_new: bool) {
        if is_new {
            self.current_page = 1;
            self.executed_query = self.query.clone();
            self.feed.reset();
            self.selected = 0;
        }

        self.is_loading = is_new;
        self.is_loading_more = !is_new;
        self.error = None;
        self.in_flight = true;

        self.rx = Some(repository.search(&self.executed_query, self.current_page));
    }

    fn clear_results(&mut self) {
        self.current_page = 1;
        self.executed_query.clear();
        self.feed.reset();
        self.selected = 0;
        self.is_loading = false;
        self.is_loading_more = false;
        self.error = None;
        self.in_flight = false;
        self.rx = None;
    }

    pub fn poll(&mut self) {
        loop {
            let Some(rx) = self.rx.as_mut() else {
                break;
            };
            match rx.try_recv() {
                Ok(state) => self.apply(state),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.rx = None;
                    self.in_flight = false;
                    break;
                }
            }
        }
    }

    pub fn apply(&mut self, state: FetchState) {
        match state {
            FetchState::Loading => {}
            FetchState::Success(articles) => {
                self.feed.merge(self.current_page, articles);
                self.is_loading = false;
                self.is_loading_more = false;
                self.error = None;
                self.in_flight = false;
            }
            FetchState::Error(message) => {
                self.is_loading = false;
                self.is_loading_more = false;
                self.error = Some(message);
                self.in_flight = false;
            }
        }
        if self.selected >= self.feed.len() {
            self.selected = self.feed.len().saturating_sub(1);
        }
    }

    pub fn list_items(&self) -> Vec<NewsListItem> {
        self.feed.list_items(self.is_loading_more, SKELETON_COUNT)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) -> bool {
        if self.selected + 1 < self.feed.len() {
            self.selected += 1;
            false
        } else {
            !self.feed.is_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NewsApi;
    use crate::config::Config;
    use crate::db::Store;
    use crate::models::Article;

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{id}"),
            image_url: None,
            source: "Example".to_string(),
            author: None,
            published_at: "2024-01-01T00:00:00Z".to_string(),
            content: None,
            is_bookmarked: false,
        }
    }

    async fn dead_repo() -> (tempfile::TempDir, NewsRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = Store::open(path.to_str().unwrap()).await.unwrap();
        let config = Config {
            db_path: String::new(),
            api_key: Some("k".to_string()),
            base_url: "http://127.0.0.1:1/".to_string(),
            country: "us".to_string(),
            category: "technology".to_string(),
            page_size: 5,
        };
        (dir, NewsRepository::new(NewsApi::new(&config), store))
    }

    fn elapsed(screen: &mut SearchScreen) {
        screen.pending_since = Instant::now().checked_sub(DEBOUNCE + Duration::from_millis(100));
    }

    #[tokio::test]
    async fn tick_does_nothing_inside_the_debounce_window() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();

        screen.push_char('r');
        screen.tick(&repo);

        assert!(screen.rx.is_none());
        assert!(screen.pending_since.is_some());
    }

    #[tokio::test]
    async fn tick_fires_after_quiet_period() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();

        screen.push_char('r');
        elapsed(&mut screen);
        screen.tick(&repo);

        assert!(screen.rx.is_some());
        assert!(screen.is_loading);
        assert_eq!(screen.executed_query, "r");
        assert!(screen.pending_since.is_none());
    }

    #[tokio::test]
    async fn unchanged_query_does_not_refire() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();

        screen.push_char('r');
        elapsed(&mut screen);
        screen.tick(&repo);
        screen.rx = None;
        screen.in_flight = false;

        // Same text again after another pause: no new fetch.
        elapsed(&mut screen);
        screen.tick(&repo);
        assert!(screen.rx.is_none());
    }

    #[tokio::test]
    async fn new_query_resets_results_and_pages() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();
        screen.executed_query = "old".to_string();
        screen.query = "old".to_string();
        screen.apply(FetchState::Success(vec![article("a", "A")]));
        screen.current_page = 2;

        screen.query = "new".to_string();
        elapsed(&mut screen);
        screen.tick(&repo);

        assert!(screen.feed.is_empty());
        assert_eq!(screen.current_page, 1);
        assert_eq!(screen.executed_query, "new");
    }

    #[tokio::test]
    async fn emptied_query_clears_without_fetching() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();
        screen.executed_query = "old".to_string();
        screen.apply(FetchState::Success(vec![article("a", "A")]));

        screen.query.clear();
        elapsed(&mut screen);
        screen.tick(&repo);

        assert!(screen.feed.is_empty());
        assert!(screen.executed_query.is_empty());
        assert!(screen.rx.is_none());
    }

    #[tokio::test]
    async fn load_more_requires_an_executed_query() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();

        screen.load_more(&repo);
        assert_eq!(screen.current_page, 1);
        assert!(screen.rx.is_none());
    }

    #[tokio::test]
    async fn load_more_bumps_page_and_keeps_results() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = SearchScreen::new();
        screen.query = "rust".to_string();
        screen.executed_query = "rust".to_string();
        screen.apply(FetchState::Success(vec![article("a", "A")]));

        screen.load_more(&repo);

        assert_eq!(screen.current_page, 2);
        assert_eq!(screen.feed.len(), 1);
        assert!(screen.is_loading_more);
        // Five skeleton rows on the search screen.
        assert_eq!(screen.list_items().len(), 1 + 5);
    }
}
