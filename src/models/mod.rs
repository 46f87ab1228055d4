mod article;

pub use article::{article_id, Article, NewsListItem};
