use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{article_id, Article};

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[allow(dead_code)]
    status: String,
    #[serde(rename = "totalResults")]
    total_results: u32,
    articles: Vec<ArticleDto>,
}

#[derive(Debug, Deserialize)]
struct ArticleDto {
    source: SourceDto,
    author: Option<String>,
    title: String,
    description: Option<String>,
    url: String,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourceDto {
    #[allow(dead_code)]
    id: Option<String>,
    name: String,
}

/// Structured error body the news API sends on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    status: String,
    #[allow(dead_code)]
    code: Option<String>,
    message: Option<String>,
}

impl ArticleDto {
    fn into_domain(self) -> Article {
        Article {
            id: article_id(&self.url),
            title: self.title,
            description: self.description,
            url: self.url,
            image_url: self.url_to_image,
            source: self.source.name,
            author: self.author,
            published_at: self.published_at,
            content: self.content,
            is_bookmarked: false,
        }
    }
}

#[derive(Clone)]
pub struct NewsApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
    category: String,
    page_size: u32,
}

impl NewsApi {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdeck/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            country: config.country.clone(),
            category: config.category.clone(),
            page_size: config.page_size,
        }
    }

    pub async fn top_headlines(&self, page: u32) -> Result<Vec<Article>> {
        let url = self.endpoint("top-headlines")?;
        let params = [
            ("country", self.country.clone()),
            ("category", self.category.clone()),
            ("page", page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("apiKey", self.api_key()?),
        ];

        self.fetch(url, &params).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Vec<Article>> {
        let url = self.endpoint("everything")?;
        let params = [
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("apiKey", self.api_key()?),
        ];

        self.fetch(url, &params).await
    }

    async fn fetch(&self, url: Url, params: &[(&str, String)]) -> Result<Vec<Article>> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let envelope: NewsResponse = response.json().await?;
        tracing::debug!(
            "Fetched {} of {} articles",
            envelope.articles.len(),
            envelope.total_results
        );

        Ok(envelope
            .articles
            .into_iter()
            .map(ArticleDto::into_domain)
            .collect())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("invalid base_url: {e}")))?;
        base.join(path)
            .map_err(|e| AppError::Config(format!("invalid base_url: {e}")))
    }

    fn api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or_else(|| {
            AppError::Config(format!(
                "API key not configured. Add api_key to {}",
                Config::config_path().display()
            ))
        })
    }
}

/// Best-effort extraction of the API's error message from a non-2xx body.
fn api_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {status}"));

    AppError::Api { status, message }
}
