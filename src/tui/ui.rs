use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Tab};
use crate::models::{Article, NewsListItem};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Article list
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tab_bar(frame, app, chunks[0]);

    match app.tab {
        Tab::Home => {
            render_news_list(frame, app.home.list_items(), app.home.selected, chunks[1]);
        }
        Tab::Search => render_search(frame, app, chunks[1]),
        Tab::Bookmarks => render_bookmarks(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    if let Some(article) = &app.detail {
        render_detail(frame, article, app.detail_scroll);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let titles = [Tab::Home, Tab::Search, Tab::Bookmarks]
        .iter()
        .map(|t| Line::from(format!(" {} ", t.label())))
        .collect::<Vec<_>>();

    let selected = match app.tab {
        Tab::Home => 0,
        Tab::Search => 1,
        Tab::Bookmarks => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(" newsdeck ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_news_list(frame: &mut Frame, items: Vec<NewsListItem>, selected: usize, area: Rect) {
    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| match item {
            NewsListItem::Article(article) => ListItem::new(article_line(article)),
            NewsListItem::Skeleton => ListItem::new(Line::from(Span::styled(
                "  ░░░░░░░░░░░░░░░░░░░░░░░░",
                Style::default().fg(Color::DarkGray),
            ))),
        })
        .collect();

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn article_line(article: &Article) -> Line<'_> {
    let marker = if article.is_bookmarked { "★ " } else { "  " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("[{}] ", article.source),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(&article.title, Style::default().fg(Color::White)),
        Span::styled(
            format!("  {}", format_published(&article.published_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = if app.search_input_active {
        format!("> {}_", app.search.query)
    } else if app.search.query.is_empty() {
        "Press / to search".to_string()
    } else {
        format!("> {}", app.search.query)
    };

    let border = if app.search_input_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input_box = Paragraph::new(input).block(
        Block::default()
            .title(" Query ")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(input_box, chunks[0]);

    render_news_list(frame, app.search.list_items(), app.search.selected, chunks[1]);
}

fn render_bookmarks(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<NewsListItem> = app
        .bookmarks
        .articles
        .iter()
        .cloned()
        .map(NewsListItem::Article)
        .collect();
    render_news_list(frame, items, app.bookmarks.selected, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = status_line(app);
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn status_line(app: &App) -> (String, Style) {
    let dim = Style::default().fg(Color::DarkGray);
    let red = Style::default().fg(Color::Red);

    match app.tab {
        Tab::Home => {
            if let Some(error) = &app.home.error {
                return (format!("⚠ {error}"), red);
            }
            if app.home.is_refreshing {
                return ("Refreshing headlines...".to_string(), dim);
            }
            if app.home.is_loading {
                return ("Loading headlines...".to_string(), dim);
            }
            if app.home.is_loading_more {
                return ("Loading more...".to_string(), dim);
            }
            (
                "j/k:nav  Enter:open  b:bookmark  r:refresh  /:search  ?:help  q:quit".to_string(),
                dim,
            )
        }
        Tab::Search => {
            if let Some(error) = &app.search.error {
                return (format!("⚠ {error}"), red);
            }
            if app.search.is_loading {
                return ("Searching...".to_string(), dim);
            }
            if app.search.is_loading_more {
                return ("Loading more results...".to_string(), dim);
            }
            (
                "type to search (half-second pause fires the query)  Enter:run now  Esc:done"
                    .to_string(),
                dim,
            )
        }
        Tab::Bookmarks => (
            format!(
                "{} bookmarked  j/k:nav  Enter:open  b:remove  q:quit",
                app.bookmarks.articles.len()
            ),
            dim,
        ),
    }
}

fn render_detail(frame: &mut Frame, article: &Article, scroll: u16) {
    let area = centered_rect(80, 80, frame.area());

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                article.source,
                article.author.as_deref().unwrap_or("unknown author"),
                format_published(&article.published_at)
            ),
            Style::default().fg(Color::Blue),
        )),
        Line::from(Span::styled(
            if article.is_bookmarked {
                "★ bookmarked"
            } else {
                "  b to bookmark"
            },
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    if let Some(description) = &article.description {
        for line in flatten_html(description).lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }

    if let Some(content) = &article.content {
        for line in flatten_html(content).lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        article.url.clone(),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Article ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Some sources ship HTML fragments in description/content; flatten them
/// to plain text for the terminal.
fn flatten_html(text: &str) -> String {
    html2text::from_read(text.as_bytes(), 78).unwrap_or_else(|_| text.to_string())
}

fn format_published(published_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(published_at)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / 1-3   Switch tab",
        "   j / ↓       Move down (bottom loads more)",
        "   k / ↑       Move up",
        "   Enter       Open article",
        "   Esc         Close article / dismiss error",
        "",
        " Actions:",
        "   r           Refresh headlines",
        "   b           Toggle bookmark",
        "   o           Open in browser",
        "   /           Search",
        "",
        " General:",
        "   ?           Toggle this help",
        "   q           Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
