use std::sync::Arc;

use news_time::api::{ApiService, Category, FetchError};
use news_time::config::AppConfig;
use news_time::internal::feed::FETCH_FAILED_MESSAGE;
use news_time::internal::models::Article;
use news_time::internal::preferences::MemoryPreferences;
use news_time::internal::ui::app::App;
use news_time::internal::ui::view::MASTHEAD_TITLE;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

fn test_app() -> App {
    let config = AppConfig::default();
    let api = Arc::new(ApiService::new(&config.feed).unwrap());
    App::with_services(config, api, Box::new(MemoryPreferences::new()))
}

fn sample_article() -> Article {
    Article {
        article_id: "a1".to_string(),
        title: Some("T1".to_string()),
        description: Some("D1".to_string()),
        source: Some("S1".to_string()),
        pub_date: Some("2024-01-01".to_string()),
    }
}

fn render(app: &mut App) -> String {
    let backend = TestBackend::new(80, 40);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| app.ui(f)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_render_loaded_card() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::World);
    assert!(app.feed.apply_result(ticket.generation, Ok(vec![sample_article()])));

    let screen = render(&mut app);
    assert!(screen.contains(MASTHEAD_TITLE));
    assert!(screen.contains("T1"));
    assert!(screen.contains("D1"));
    assert!(screen.contains("S1 · Jan 1, 2024"));
    assert!(screen.contains("Read More → a1"));
    assert!(screen.contains("1 article |"));
}

#[test]
fn test_render_masthead_tags_and_toggle() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::World);
    app.feed.apply_result(ticket.generation, Ok(Vec::new()));

    let screen = render(&mut app);
    for (i, category) in Category::ALL.iter().enumerate() {
        assert!(screen.contains(&format!("{} {}", i + 1, category)));
    }
    assert!(screen.contains("Dark Mode"));

    app.theme.toggle().unwrap();
    let screen = render(&mut app);
    assert!(screen.contains("Light Mode"));
}

#[test]
fn test_render_loading_state() {
    let mut app = test_app();
    app.feed.fetch_articles(Category::World);

    let screen = render(&mut app);
    assert!(screen.contains("Loading World news..."));
    assert!(!screen.contains("No articles found."));
}

#[test]
fn test_render_error_state() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::Sports);
    let status = reqwest::StatusCode::BAD_GATEWAY;
    app.feed
        .apply_result(ticket.generation, Err(FetchError::Status(status)));

    let screen = render(&mut app);
    assert!(screen.contains(FETCH_FAILED_MESSAGE));
}

#[test]
fn test_render_empty_state() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::World);
    app.feed.apply_result(ticket.generation, Ok(Vec::new()));

    let screen = render(&mut app);
    assert!(screen.contains("No articles found."));
    assert!(screen.contains("unfiltered feed"));
}

#[test]
fn test_render_untitled_fallbacks() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::World);
    app.feed
        .apply_result(ticket.generation, Ok(vec![Article::default()]));

    let screen = render(&mut app);
    assert!(screen.contains("Untitled Article"));
    assert!(screen.contains("Unknown"));
}

#[test]
fn test_render_notification_with_oversized_message() {
    let mut app = test_app();
    let ticket = app.feed.fetch_articles(Category::World);
    app.feed.apply_result(ticket.generation, Ok(vec![sample_article()]));

    let link = format!("https://example.com/{}", "a".repeat(70_000));
    app.notify_info(format!("Opened {}", link));

    let screen = render(&mut app);
    assert!(screen.contains("aaaaaaaaaa"));
}
