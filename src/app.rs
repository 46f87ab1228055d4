use crate::api::NewsApi;
use crate::config::Config;
use crate::db::Store;
use crate::error::Result;
use crate::models::Article;
use crate::news::NewsRepository;
use crate::screens::{BookmarksScreen, HomeScreen, SearchScreen};
use crate::tui::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Search,
    Bookmarks,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Headlines",
            Tab::Search => "Search",
            Tab::Bookmarks => "Bookmarks",
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Home => Tab::Search,
            Tab::Search => Tab::Bookmarks,
            Tab::Bookmarks => Tab::Home,
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            1 => Tab::Search,
            2 => Tab::Bookmarks,
            _ => Tab::Home,
        }
    }
}

pub struct App {
    // Screens
    pub home: HomeScreen,
    pub search: SearchScreen,
    pub bookmarks: BookmarksScreen,
    pub tab: Tab,

    // Overlays
    pub detail: Option<Article>,
    pub detail_scroll: u16,
    pub search_input_active: bool,
    pub show_help: bool,

    // Services
    repository: NewsRepository,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_path).await?;
        let repository = NewsRepository::new(NewsApi::new(config), store);

        let mut home = HomeScreen::new();
        // Initial load takes the non-forced path: cache paints first if warm.
        home.load(&repository, false);

        Ok(Self {
            home,
            search: SearchScreen::new(),
            bookmarks: BookmarksScreen::new(),
            tab: Tab::Home,
            detail: None,
            detail_scroll: 0,
            search_input_active: false,
            show_help: false,
            repository,
        })
    }

    /// Drain completed fetch results (non-blocking), called every frame.
    pub fn poll_results(&mut self) {
        self.home.poll();
        self.search.poll();
    }

    /// Advance the search debounce clock, called every frame.
    pub fn tick(&mut self) {
        self.search.tick(&self.repository);
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextTab => {
                self.switch_tab(self.tab.next()).await?;
            }

            AppAction::SwitchTab(index) => {
                self.switch_tab(Tab::from_index(index)).await?;
            }

            AppAction::MoveUp => {
                if self.detail.is_some() {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else {
                    match self.tab {
                        Tab::Home => self.home.select_up(),
                        Tab::Search => self.search.select_up(),
                        Tab::Bookmarks => self.bookmarks.select_up(),
                    }
                }
            }

            AppAction::MoveDown => {
                if self.detail.is_some() {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else {
                    match self.tab {
                        Tab::Home => {
                            if self.home.select_down() {
                                self.home.load_more(&self.repository);
                            }
                        }
                        Tab::Search => {
                            if self.search.select_down() {
                                self.search.load_more(&self.repository);
                            }
                        }
                        Tab::Bookmarks => self.bookmarks.select_down(),
                    }
                }
            }

            AppAction::OpenDetail => {
                if let Some(article) = self.selected_article() {
                    self.detail = Some(article.clone());
                    self.detail_scroll = 0;
                }
            }

            AppAction::CloseDetail => {
                self.detail = None;
                self.detail_scroll = 0;
            }

            AppAction::Refresh => match self.tab {
                Tab::Home => self.home.load(&self.repository, true),
                Tab::Search => {}
                Tab::Bookmarks => self.bookmarks.reload(&self.repository).await?,
            },

            AppAction::ToggleBookmark => {
                self.toggle_bookmark().await?;
            }

            AppAction::OpenInBrowser => {
                if let Some(article) = self.detail.as_ref().or_else(|| self.selected_article()) {
                    let _ = open::that(&article.url);
                }
            }

            AppAction::DismissError => {
                self.home.error = None;
                self.search.error = None;
            }

            AppAction::SearchInputStart => {
                self.tab = Tab::Search;
                self.search_input_active = true;
            }

            AppAction::SearchInputChar(c) => {
                self.search.push_char(c);
            }

            AppAction::SearchInputBackspace => {
                self.search.backspace();
            }

            AppAction::SearchInputSubmit => {
                self.search_input_active = false;
                self.search.submit(&self.repository);
            }

            AppAction::SearchInputCancel => {
                self.search_input_active = false;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    pub fn selected_article(&self) -> Option<&Article> {
        match self.tab {
            Tab::Home => self.home.feed.get(self.home.selected),
            Tab::Search => self.search.feed.get(self.search.selected),
            Tab::Bookmarks => self.bookmarks.selected_article(),
        }
    }

    async fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        self.tab = tab;
        self.detail = None;
        self.search_input_active = false;
        if tab == Tab::Bookmarks {
            self.bookmarks.reload(&self.repository).await?;
        }
        Ok(())
    }

    /// Toggle the bookmark for the article under the cursor (or the open
    /// detail overlay) and flip the flag in place everywhere it is shown.
    async fn toggle_bookmark(&mut self) -> Result<()> {
        let article = match self.detail.as_ref().or_else(|| self.selected_article()) {
            Some(article) => article.clone(),
            None => return Ok(()),
        };

        let bookmarked = self.repository.toggle_bookmark(&article).await?;
        tracing::debug!("Bookmark {} -> {bookmarked}", article.id);

        self.home.feed.set_bookmarked(&article.id, bookmarked);
        self.search.feed.set_bookmarked(&article.id, bookmarked);
        if let Some(detail) = self.detail.as_mut() {
            if detail.id == article.id {
                detail.is_bookmarked = bookmarked;
            }
        }
        self.bookmarks.reload(&self.repository).await?;

        Ok(())
    }
}
