use crate::error::Result;
use crate::models::Article;
use crate::news::NewsRepository;

/// State holder for the bookmarks screen. The list is re-read from the
/// store on tab entry and after every toggle, so it always reflects row
/// existence rather than any in-memory flag.
pub struct BookmarksScreen {
    pub articles: Vec<Article>,
    pub selected: usize,
}

impl BookmarksScreen {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            selected: 0,
        }
    }

    pub async fn reload(&mut self, repository: &NewsRepository) -> Result<()> {
        self.articles = repository.bookmarked_articles().await?;
        if self.selected >= self.articles.len() {
            self.selected = self.articles.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.articles.len() {
            self.selected += 1;
        }
    }
}
