use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use super::app::App;
use crate::api::Category;
use crate::internal::models::Article;
use crate::internal::notification::NotificationType;
use crate::utils::datetime::{format_masthead_date, format_pub_date};
use crate::utils::theme_loader::TuiTheme;
use crate::utils::url::link_domain;

pub const MASTHEAD_TITLE: &str = "The News Time";
const MASTHEAD_HEIGHT: u16 = 6;
const PLACEHOLDER_WIDTH: u16 = 2;
const MAX_DESCRIPTION_LINES: usize = 4;

pub fn draw(app: &mut App, f: &mut Frame) {
    let palette = app.theme.palette().clone();

    // The palette is painted on the whole frame, not only on the feed.
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MASTHEAD_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_masthead(app, &palette, f, chunks[0]);

    if app.feed.is_loading() {
        render_loading(app, &palette, f, chunks[1]);
    } else if let Some(message) = app.feed.error().map(str::to_string) {
        render_error(&message, &palette, f, chunks[1]);
    } else {
        render_articles(app, &palette, f, chunks[1]);
    }

    render_status_bar(app, &palette, f, chunks[2]);

    if app.notification.is_some() {
        render_notification(app, &palette, f);
    }
}

fn render_masthead(app: &App, palette: &TuiTheme, f: &mut Frame, area: Rect) {
    let rule = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(palette.border),
    ));

    let mut tags: Vec<Span> = Vec::new();
    for (i, category) in Category::ALL.iter().enumerate() {
        if i > 0 {
            tags.push(Span::raw("  "));
        }
        let label = format!("{} {}", i + 1, category);
        let style = if *category == app.feed.active_tag() {
            Style::default()
                .bg(palette.accent)
                .fg(palette.accent_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.foreground)
        };
        tags.push(Span::styled(label, style));
    }

    let lines = vec![
        Line::from(Span::styled(
            format_masthead_date(&jiff::Zoned::now()),
            Style::default().fg(palette.muted),
        )),
        Line::from(Span::styled(
            MASTHEAD_TITLE,
            Style::default()
                .fg(palette.foreground)
                .add_modifier(Modifier::BOLD),
        )),
        rule.clone(),
        Line::from(tags),
        rule,
        Line::from(Span::styled(
            format!("[t] {}", app.theme.mode().toggle_label()),
            Style::default().fg(palette.muted),
        ))
        .alignment(Alignment::Right),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, area);
}

fn render_loading(app: &App, palette: &TuiTheme, f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let text = format!(
        "{} Loading {} news...",
        app.get_spinner_char(),
        app.feed.active_tag()
    );
    let p = Paragraph::new(text)
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    f.render_widget(p, rows[1]);
}

fn render_error(message: &str, palette: &TuiTheme, f: &mut Frame, area: Rect) {
    let width = text_width(message).saturating_add(6).min(area.width);
    let height = 3.min(area.height);
    let banner = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + 1.min(area.height.saturating_sub(height)),
        width,
        height,
    );

    let p = Paragraph::new(message)
        .style(Style::default().fg(palette.error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error)),
        );
    f.render_widget(p, banner);
}

fn render_articles(app: &mut App, palette: &TuiTheme, f: &mut Frame, area: Rect) {
    if app.feed.articles().is_empty() {
        let p = Paragraph::new("No articles found.")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::top(1)));
        f.render_widget(p, area);
        return;
    }

    let area = area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let heights: Vec<u16> = app
        .feed
        .articles()
        .iter()
        .map(|a| card_height(a, area.width))
        .collect();

    let offset = adjust_offset(&heights, area.height, app.feed.selected(), app.feed.offset());
    app.feed.set_offset(offset);

    let mut y = area.y;
    for (position, article) in app.feed.articles().iter().enumerate().skip(offset) {
        let remaining = area.bottom().saturating_sub(y);
        if remaining < 3 {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, heights[position].min(remaining));
        render_card(
            article,
            position,
            position == app.feed.selected(),
            palette,
            f,
            rect,
        );
        y += rect.height;
    }
}

fn render_card(
    article: &Article,
    position: usize,
    selected: bool,
    palette: &TuiTheme,
    f: &mut Frame,
    area: Rect,
) {
    let block = match selected {
        true => Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(palette.accent)),
        false => Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.border)),
    };
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(PLACEHOLDER_WIDTH),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Block::default().style(Style::default().bg(palette.placeholder(position))),
        cols[0],
    );

    let content = card_content(article, cols[2].width);
    let mut lines: Vec<Line> = Vec::new();
    for title_line in content.title {
        lines.push(Line::from(Span::styled(
            title_line,
            Style::default()
                .fg(palette.foreground)
                .add_modifier(Modifier::BOLD),
        )));
    }
    for desc_line in content.description {
        lines.push(Line::from(Span::styled(
            desc_line,
            Style::default().fg(palette.foreground),
        )));
    }
    lines.push(Line::from(Span::styled(
        content.meta,
        Style::default().fg(palette.muted),
    )));
    lines.push(Line::from(Span::styled(
        content.link,
        Style::default()
            .fg(palette.link)
            .add_modifier(Modifier::UNDERLINED),
    )));

    f.render_widget(Paragraph::new(lines), cols[2]);
}

/// Text of one card, already wrapped to the text column width.
#[derive(Debug, Clone, PartialEq)]
pub struct CardContent {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub meta: String,
    pub link: String,
}

pub fn card_content(article: &Article, text_width: u16) -> CardContent {
    let width = text_width.max(1) as usize;

    let title = wrap_lines(article.display_title(), width);

    let mut description = article
        .display_description()
        .map(|d| wrap_lines(d, width))
        .unwrap_or_default();
    if description.len() > MAX_DESCRIPTION_LINES {
        description.truncate(MAX_DESCRIPTION_LINES);
        if let Some(last) = description.last_mut() {
            last.push('…');
        }
    }

    let meta = match article.pub_date.as_deref().and_then(format_pub_date) {
        Some(date) => format!("{} · {}", article.display_source(), date),
        None => article.display_source().to_string(),
    };

    let link = match link_domain(&article.article_id) {
        Some(domain) => format!("Read More → {}", domain),
        None => "Read More →".to_string(),
    };

    CardContent {
        title,
        description,
        meta,
        link,
    }
}

fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width)
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

/// Width left for text inside a card of `card_width` columns.
pub fn card_text_width(card_width: u16) -> u16 {
    card_width.saturating_sub(2 + PLACEHOLDER_WIDTH + 1).max(1)
}

/// Rows a card occupies, borders included.
pub fn card_height(article: &Article, card_width: u16) -> u16 {
    let content = card_content(article, card_text_width(card_width));
    let rows = content.title.len() + content.description.len() + 2 + 2;
    rows.min(u16::MAX as usize) as u16
}

/// First card to draw so that `selected` is fully visible, moving the
/// previous offset as little as possible.
pub fn adjust_offset(heights: &[u16], available: u16, selected: usize, offset: usize) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut offset = offset.min(selected);

    loop {
        let used: u32 = heights[offset..=selected].iter().map(|h| *h as u32).sum();
        if used <= available as u32 || offset == selected {
            return offset;
        }
        offset += 1;
    }
}

fn render_status_bar(app: &App, palette: &TuiTheme, f: &mut Frame, area: Rect) {
    let mut parts: Vec<String> = Vec::new();
    if !app.feed.is_loading() && app.feed.error().is_none() {
        let count = app.feed.articles().len();
        parts.push(match count {
            1 => "1 article".to_string(),
            n => format!("{} articles", n),
        });
    }
    if !app.api_service.filters_by_category() {
        parts.push("unfiltered feed".to_string());
    }
    parts.push("j/k:Select Enter:Open 1-8:Tag r:Refresh t:Theme q:Quit".to_string());
    parts.push(format!("v{}", app.app_version));
    let status = parts.join(" | ");

    let p = Paragraph::new(status)
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(palette.accent)),
        )
        .style(Style::default().fg(palette.accent_fg));
    f.render_widget(p, area);
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn render_notification(app: &App, palette: &TuiTheme, f: &mut Frame) {
    if let Some(notification) = &app.notification {
        let area = f.area();

        let popup_width = text_width(&notification.message)
            .saturating_add(4)
            .min(area.width.saturating_sub(4));
        let popup_height = 3;
        let popup_x = (area.width.saturating_sub(popup_width)) / 2;
        let popup_y = (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height.min(area.height));

        let border_color = match notification.notification_type {
            NotificationType::Info => palette.link,
            NotificationType::Warning => palette.muted,
            NotificationType::Error => palette.error,
        };

        let popup = Paragraph::new(notification.message.as_str())
            .style(
                Style::default()
                    .bg(palette.background)
                    .fg(palette.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(notification.notification_type.title()),
            )
            .alignment(Alignment::Center);

        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }
}
