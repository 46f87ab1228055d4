use tokio::sync::mpsc;

use crate::api::NewsApi;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Article;

pub const CONNECTIVITY_ERROR: &str = "Couldn't reach server. Check your internet connection.";

/// One step in a fetch's result sequence. A fetch emits `Loading` first and
/// then zero or more progressively better results: a cache hit may arrive
/// before the remote answer, so consumers must keep reading until the
/// channel closes instead of assuming exactly one terminal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Success(Vec<Article>),
    Error(String),
}

/// Orchestrates the remote API and the local store: write-through caching
/// on success, cache fallback on failure, bookmark status joined into every
/// article at read time.
#[derive(Clone)]
pub struct NewsRepository {
    api: NewsApi,
    store: Store,
}

impl NewsRepository {
    pub fn new(api: NewsApi, store: Store) -> Self {
        Self { api, store }
    }

    /// Fetch one page of top headlines. With `force_refresh` unset, a warm
    /// cache page is served immediately while the remote fetch proceeds
    /// (stale-while-revalidate); either way the remote result, or the cache
    /// again on remote failure, follows on the same channel.
    pub fn top_headlines(&self, page: u32, force_refresh: bool) -> mpsc::Receiver<FetchState> {
        let (tx, rx) = mpsc::channel(4);
        let repo = self.clone();
        tokio::spawn(async move {
            repo.headlines_into(page, force_refresh, tx).await;
        });
        rx
    }

    /// Search is remote-only: no cache write, no cache fallback.
    pub fn search(&self, query: &str, page: u32) -> mpsc::Receiver<FetchState> {
        let (tx, rx) = mpsc::channel(2);
        let repo = self.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            repo.search_into(&query, page, tx).await;
        });
        rx
    }

    async fn headlines_into(&self, page: u32, force_refresh: bool, tx: mpsc::Sender<FetchState>) {
        let _ = tx.send(FetchState::Loading).await;

        if !force_refresh {
            match self.store.cached_page(page).await {
                Ok(cached) if !cached.is_empty() => match self.with_bookmark_status(cached).await {
                    Ok(articles) => {
                        let _ = tx.send(FetchState::Success(articles)).await;
                    }
                    Err(e) => tracing::warn!("Bookmark join failed on cached page {page}: {e}"),
                },
                Ok(_) => {}
                Err(e) => tracing::warn!("Cache read failed for page {page}: {e}"),
            }
        }

        match self.api.top_headlines(page).await {
            Ok(articles) => match self.with_bookmark_status(articles).await {
                Ok(articles) => {
                    if let Err(e) = self.store.replace_page(page, &articles).await {
                        tracing::warn!("Failed to cache page {page}: {e}");
                    }
                    let _ = tx.send(FetchState::Success(articles)).await;
                }
                Err(e) => {
                    let _ = tx.send(FetchState::Error(e.to_string())).await;
                }
            },
            Err(e) => {
                tracing::debug!("Remote fetch failed for page {page}: {e}");
                let fallback = self.store.cached_page(page).await.unwrap_or_default();
                if fallback.is_empty() {
                    let _ = tx.send(FetchState::Error(display_message(&e))).await;
                } else {
                    let articles = self
                        .with_bookmark_status(fallback.clone())
                        .await
                        .unwrap_or(fallback);
                    let _ = tx.send(FetchState::Success(articles)).await;
                }
            }
        }
    }

    async fn search_into(&self, query: &str, page: u32, tx: mpsc::Sender<FetchState>) {
        let _ = tx.send(FetchState::Loading).await;

        match self.api.search(query, page).await {
            Ok(articles) => match self.with_bookmark_status(articles).await {
                Ok(articles) => {
                    let _ = tx.send(FetchState::Success(articles)).await;
                }
                Err(e) => {
                    let _ = tx.send(FetchState::Error(e.to_string())).await;
                }
            },
            Err(e) => {
                tracing::debug!("Search failed for '{query}': {e}");
                let _ = tx.send(FetchState::Error(display_message(&e))).await;
            }
        }
    }

    /// All cached headline pages, for offline browsing.
    #[allow(dead_code)]
    pub async fn cached_headlines(&self) -> Result<Vec<Article>> {
        let cached = self.store.all_cached().await?;
        self.with_bookmark_status(cached).await
    }

    pub async fn bookmarked_articles(&self) -> Result<Vec<Article>> {
        self.store.bookmarked_articles().await
    }

    /// Flip the bookmark row for this article's id. Returns the new state.
    pub async fn toggle_bookmark(&self, article: &Article) -> Result<bool> {
        if self.store.is_bookmarked(&article.id).await? {
            self.store.delete_bookmark(&article.id).await?;
            Ok(false)
        } else {
            self.store.insert_bookmark(article).await?;
            Ok(true)
        }
    }

    async fn with_bookmark_status(&self, articles: Vec<Article>) -> Result<Vec<Article>> {
        let mut enriched = Vec::with_capacity(articles.len());
        for mut article in articles {
            article.is_bookmarked = self.store.is_bookmarked(&article.id).await?;
            enriched.push(article);
        }
        Ok(enriched)
    }
}

/// What the user sees when a fetch fails with no cache to fall back on:
/// the API's own message for HTTP errors, a fixed line for transport errors.
fn display_message(error: &AppError) -> String {
    match error {
        AppError::Api { message, .. } => message.clone(),
        AppError::Config(message) => message.clone(),
        AppError::Http(_) => CONNECTIVITY_ERROR.to_string(),
        other => other.to_string(),
    }
}
