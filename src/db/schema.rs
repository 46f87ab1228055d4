pub const SCHEMA: &str = r#"
-- bookmarks table: row existence is the only bookmark signal
CREATE TABLE IF NOT EXISTS bookmarks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    image_url TEXT,
    source TEXT NOT NULL,
    author TEXT,
    published_at TEXT NOT NULL,
    content TEXT,
    bookmarked_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_bookmarks_published_at ON bookmarks(published_at DESC);

-- cached_headlines table: one denormalized row per headline, keyed by the
-- derived article id, tagged with the page it was fetched under
CREATE TABLE IF NOT EXISTS cached_headlines (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    image_url TEXT,
    source TEXT NOT NULL,
    author TEXT,
    published_at TEXT NOT NULL,
    content TEXT,
    page INTEGER NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_cached_headlines_page ON cached_headlines(page);
CREATE INDEX IF NOT EXISTS idx_cached_headlines_published_at ON cached_headlines(published_at DESC);
"#;
