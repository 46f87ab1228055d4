use std::collections::HashSet;

use crate::models::{Article, NewsListItem};

/// Accumulated articles across pages, shared by the headline and search
/// screens. Incoming pages are merged by article id: a known id replaces
/// the existing entry in place, a new id appends.
#[derive(Debug, Default)]
pub struct ArticleFeed {
    articles: Vec<Article>,
    loaded_pages: HashSet<u32>,
}

impl ArticleFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.articles.clear();
        self.loaded_pages.clear();
    }

    pub fn merge(&mut self, page: u32, incoming: Vec<Article>) {
        self.loaded_pages.insert(page);
        for article in incoming {
            match self.articles.iter_mut().find(|a| a.id == article.id) {
                Some(existing) => *existing = article,
                None => self.articles.push(article),
            }
        }
    }

    pub fn has_page(&self, page: u32) -> bool {
        self.loaded_pages.contains(&page)
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    /// Flip the bookmark flag in place, preserving list position.
    pub fn set_bookmarked(&mut self, id: &str, bookmarked: bool) {
        if let Some(article) = self.articles.iter_mut().find(|a| a.id == id) {
            article.is_bookmarked = bookmarked;
        }
    }

    /// Project the feed into list rows, with skeleton placeholders appended
    /// while the next page is in flight.
    pub fn list_items(&self, loading_more: bool, skeleton_count: usize) -> Vec<NewsListItem> {
        let mut items: Vec<NewsListItem> = self
            .articles
            .iter()
            .cloned()
            .map(NewsListItem::Article)
            .collect();
        if loading_more {
            items.extend(std::iter::repeat(NewsListItem::Skeleton).take(skeleton_count));
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn merge_appends_new_ids_in_order() {
        let mut feed = ArticleFeed::new();
        feed.merge(1, vec![article("a", "A"), article("b", "B")]);
        feed.merge(2, vec![article("c", "C")]);

        let ids: Vec<_> = feed.articles().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(feed.has_page(1));
        assert!(feed.has_page(2));
    }

    #[test]
    fn merge_replaces_known_ids_in_place() {
        let mut feed = ArticleFeed::new();
        feed.merge(1, vec![article("a", "A"), article("b", "B")]);
        feed.merge(2, vec![article("a", "A v2"), article("c", "C")]);

        // The second occurrence's data wins and its position is unchanged.
        assert_eq!(feed.articles()[0].title, "A v2");
        let ids: Vec<_> = feed.articles().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn reset_clears_articles_and_page_tracking() {
        let mut feed = ArticleFeed::new();
        feed.merge(1, vec![article("a", "A")]);
        feed.reset();

        assert!(feed.is_empty());
        assert!(!feed.has_page(1));
    }

    #[test]
    fn set_bookmarked_preserves_position() {
        let mut feed = ArticleFeed::new();
        feed.merge(1, vec![article("a", "A"), article("b", "B")]);
        feed.set_bookmarked("b", true);

        assert!(!feed.articles()[0].is_bookmarked);
        assert!(feed.articles()[1].is_bookmarked);
        assert_eq!(feed.articles()[1].id, "b");
    }

    #[test]
    fn list_items_append_skeletons_only_while_loading_more() {
        let mut feed = ArticleFeed::new();
        feed.merge(1, vec![article("a", "A")]);

        assert_eq!(feed.list_items(false, 3).len(), 1);

        let items = feed.list_items(true, 3);
        assert_eq!(items.len(), 4);
        assert!(matches!(items[0], NewsListItem::Article(_)));
        assert!(matches!(items[3], NewsListItem::Skeleton));
    }
}
