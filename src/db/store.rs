use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::Article;

use super::schema::SCHEMA;

/// Async handle to the local SQLite store. Cloning shares the same
/// underlying connection.
#[derive(Clone)]
pub struct Store {
    conn: Connection,
}

impl Store {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Bookmark operations

    pub async fn insert_bookmark(&self, article: &Article) -> Result<()> {
        let article = article.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT OR REPLACE INTO bookmarks
                       (id, title, description, url, image_url, source, author, published_at, content)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    params![
                        article.id,
                        article.title,
                        article.description,
                        article.url,
                        article.image_url,
                        article.source,
                        article.author,
                        article.published_at,
                        article.content,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn delete_bookmark(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn is_bookmarked(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE id = ?1)",
                    params![id],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await?;
        Ok(exists)
    }

    pub async fn bookmarked_articles(&self) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, description, url, image_url, source, author, published_at, content
                       FROM bookmarks ORDER BY published_at DESC"#,
                )?;
                let articles = stmt
                    .query_map([], |row| Ok(article_from_row(row, true)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    // Cached headline operations

    /// Wholesale-replace the cache contents for one page: the page's old
    /// rows are deleted and the new ones inserted in a single transaction.
    pub async fn replace_page(&self, page: u32, articles: &[Article]) -> Result<()> {
        let articles = articles.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM cached_headlines WHERE page = ?1",
                    params![page],
                )?;
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT OR REPLACE INTO cached_headlines
                           (id, title, description, url, image_url, source, author, published_at, content, page)
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
                    )?;
                    for article in &articles {
                        stmt.execute(params![
                            article.id,
                            article.title,
                            article.description,
                            article.url,
                            article.image_url,
                            article.source,
                            article.author,
                            article.published_at,
                            article.content,
                            page,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn cached_page(&self, page: u32) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, description, url, image_url, source, author, published_at, content
                       FROM cached_headlines WHERE page = ?1 ORDER BY published_at DESC"#,
                )?;
                let articles = stmt
                    .query_map(params![page], |row| Ok(article_from_row(row, false)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    pub async fn all_cached(&self) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, description, url, image_url, source, author, published_at, content
                       FROM cached_headlines ORDER BY page ASC, published_at DESC"#,
                )?;
                let articles = stmt
                    .query_map([], |row| Ok(article_from_row(row, false)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    #[allow(dead_code)]
    pub async fn clear_cache(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM cached_headlines", [])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn cached_count(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM cached_headlines", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

fn article_from_row(row: &Row, is_bookmarked: bool) -> Article {
    Article {
        id: row.get(0).unwrap(),
        title: row.get(1).unwrap(),
        description: row.get(2).unwrap(),
        url: row.get(3).unwrap(),
        image_url: row.get(4).unwrap(),
        source: row.get(5).unwrap(),
        author: row.get(6).unwrap(),
        published_at: row.get(7).unwrap(),
        content: row.get(8).unwrap(),
        is_bookmarked,
    }
}
