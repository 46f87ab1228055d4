mod repository;

pub use repository::{FetchState, NewsRepository, CONNECTIVITY_ERROR};
