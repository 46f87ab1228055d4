use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A news article as the rest of the app sees it. `is_bookmarked` is a
/// read-time projection of the bookmark store, never persisted alongside
/// the article itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub author: Option<String>,
    /// Publication timestamp as the API sent it (RFC3339 in practice).
    pub published_at: String,
    pub content: Option<String>,
    pub is_bookmarked: bool,
}

/// Derive a stable article id from its canonical URL. The same URL always
/// hashes to the same id, so re-fetches, cache rows and bookmark rows all
/// agree on identity.
pub fn article_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

/// One row in a headline list: either an article or a loading placeholder
/// shown while the next page is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsListItem {
    Article(Article),
    Skeleton,
}
