use tokio::sync::mpsc;

use crate::models::NewsListItem;
use crate::news::{FetchState, NewsRepository};

use super::feed::ArticleFeed;

const SKELETON_COUNT: usize = 3;

/// State holder for the top-headlines screen: accumulated pages, the
/// advisory in-flight flag and the receiving end of the current fetch.
pub struct HomeScreen {
    pub feed: ArticleFeed,
    pub selected: usize,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
    current_page: u32,
    in_flight: bool,
    rx: Option<mpsc::Receiver<FetchState>>,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            feed: ArticleFeed::new(),
            selected: 0,
            is_loading: false,
            is_loading_more: false,
            is_refreshing: false,
            error: None,
            current_page: 1,
            in_flight: false,
            rx: None,
        }
    }

    /// Start a fetch of the current page. Suppressed while one is already
    /// in flight, unless this is an explicit refresh. A refresh restarts
    /// from page 1 with a forced remote fetch.
    pub fn load(&mut self, repository: &NewsRepository, refresh: bool) {
        if self.in_flight && !refresh {
            return;
        }

        if refresh {
            self.current_page = 1;
            self.feed.reset();
        }

        self.is_loading = !refresh && self.feed.is_empty();
        self.is_refreshing = refresh;
        self.error = None;
        self.in_flight = true;

        self.rx = Some(repository.top_headlines(self.current_page, refresh));
    }

    /// Fetch the next page. No-op while a load is in flight or when the
    /// next page was already loaded.
    pub fn load_more(&mut self, repository: &NewsRepository) {
        if self.in_flight || self.feed.has_page(self.current_page + 1) {
            return;
        }

        self.current_page += 1;
        self.is_loading_more = true;
        self.in_flight = true;
        self.rx = Some(repository.top_headlines(self.current_page, false));
    }

    /// Drain any result states the in-flight fetch has produced.
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
                self.is_refreshing = false;
                self.error = None;
                self.in_flight = false;
            }
            FetchState::Error(message) => {
                self.is_loading = false;
                self.is_loading_more = false;
                self.is_refreshing = false;
                self.error = Some(message);
                self.in_flight = false;
            }
        }
        self.clamp_selection();
    }

    pub fn list_items(&self) -> Vec<NewsListItem> {
        self.feed.list_items(self.is_loading_more, SKELETON_COUNT)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down; returns true when it was already at the
    /// bottom, which is the scroll-triggered load-more signal.
    pub fn select_down(&mut self) -> bool {
        if self.selected + 1 < self.feed.len() {
            self.selected += 1;
            false
        } else {
            !self.feed.is_empty()
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.feed.len() {
            self.selected = self.feed.len().saturating_sub(1);
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

    #[test]
    fn success_merges_and_clears_flags() {
        let mut screen = HomeScreen::new();
        screen.is_loading = true;
        screen.in_flight = true;

        screen.apply(FetchState::Success(vec![article("a", "A")]));

        assert_eq!(screen.feed.len(), 1);
        assert!(!screen.is_loading);
        assert!(screen.error.is_none());
    }

    #[test]
    fn error_keeps_accumulated_articles() {
        let mut screen = HomeScreen::new();
        screen.apply(FetchState::Success(vec![article("a", "A")]));

        screen.current_page = 2;
        screen.apply(FetchState::Error("boom".to_string()));

        assert_eq!(screen.feed.len(), 1);
        assert_eq!(screen.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn load_is_suppressed_while_in_flight() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = HomeScreen::new();

        screen.load(&repo, false);
        let first_rx_live = screen.rx.is_some();
        screen.rx = None;

        screen.load(&repo, false);

        assert!(first_rx_live);
        assert!(screen.rx.is_none());
    }

    #[tokio::test]
    async fn refresh_resets_pages_and_forces_through_in_flight_guard() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = HomeScreen::new();
        screen.apply(FetchState::Success(vec![article("a", "A")]));
        screen.current_page = 3;
        screen.in_flight = true;

        screen.load(&repo, true);

        assert_eq!(screen.current_page, 1);
        assert!(screen.feed.is_empty());
        assert!(screen.is_refreshing);
        assert!(screen.rx.is_some());
    }

    #[tokio::test]
    async fn load_more_is_suppressed_for_loaded_pages_and_in_flight() {
        let (_dir, repo) = dead_repo().await;
        let mut screen = HomeScreen::new();
        screen.apply(FetchState::Success(vec![article("a", "A")]));
        screen.feed.merge(2, vec![article("b", "B")]);

        // Next page already loaded.
        screen.load_more(&repo);
        assert_eq!(screen.current_page, 1);

        // In flight.
        screen.current_page = 2;
        screen.in_flight = true;
        screen.load_more(&repo);
        assert_eq!(screen.current_page, 2);
    }

    #[test]
    fn select_down_at_bottom_signals_load_more() {
        let mut screen = HomeScreen::new();
        screen.apply(FetchState::Success(vec![article("a", "A"), article("b", "B")]));

        assert!(!screen.select_down());
        assert_eq!(screen.selected, 1);
        assert!(screen.select_down());
    }

    #[test]
    fn skeletons_only_while_loading_more() {
        let mut screen = HomeScreen::new();
        screen.apply(FetchState::Success(vec![article("a", "A")]));

        assert_eq!(screen.list_items().len(), 1);
        screen.is_loading_more = true;
        assert_eq!(screen.list_items().len(), 1 + 3);
    }
}
