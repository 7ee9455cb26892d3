use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Frame;

use crate::api::{ApiService, Category, FetchError};
use crate::config::AppConfig;
use crate::internal::feed::{FeedView, FetchState, FetchTicket};
use crate::internal::models::Article;
use crate::internal::notification::Notification;
use crate::internal::preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
use crate::internal::theme_service::ThemeService;
use crate::internal::ui::keybindings::KeyBindingMap;
use crate::internal::ui::keybindings_default::create_default_keybindings;
use crate::utils::url::{is_openable, link_domain};

/// User-level commands. These are what key bindings map to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Quit,
    NavigateUp,
    NavigateDown,
    OpenArticle,
    SelectTag(Category),
    NextTag,
    PrevTag,
    Refresh,
    ToggleTheme,
}

/// Messages delivered to the UI loop through the event channel.
#[derive(Debug)]
pub enum AppEvent {
    ArticlesLoaded {
        generation: u64,
        result: Result<Vec<Article>, FetchError>,
    },
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub feed: FeedView,
    pub theme: ThemeService,
    pub api_service: Arc<ApiService>,
    pub config: AppConfig,
    pub keybindings: KeyBindingMap,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    pub last_spinner_update: Option<tokio::time::Instant>,
    pub event_tx: UnboundedSender<AppEvent>,
    pub event_rx: UnboundedReceiver<AppEvent>,
    in_flight: Option<CancellationToken>,
}

impl App {
    #[tracing::instrument(skip(config))]
    pub fn new(config: AppConfig) -> Result<Self> {
        let start = std::time::Instant::now();
        let api_service = Arc::new(ApiService::new(&config.feed)?);

        let prefs_path = config.preferences_path.as_ref().map(PathBuf::from);
        let mut warning = None;
        let store: Box<dyn PreferenceStore> = match FilePreferences::load_or_create(prefs_path) {
            Ok(p) => {
                if p.was_reset() {
                    warning = Some("Saved preferences were unreadable and have been reset");
                }
                Box::new(p)
            }
            Err(e) => {
                tracing::error!("Failed to load preferences: {:#}", e);
                warning = Some("Preferences unavailable; theme will not be saved");
                Box::new(MemoryPreferences::new())
            }
        };

        let mut app = Self::with_services(config, api_service, store);
        if let Some(message) = warning {
            app.notify_warning(message);
        }
        tracing::info!(elapsed = ?start.elapsed(), "App initialized");
        Ok(app)
    }

    /// Assemble an app from already-built services.
    pub fn with_services(
        config: AppConfig,
        api_service: Arc<ApiService>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tracing::info!(
            endpoint = %api_service.endpoint(),
            filtered = api_service.filters_by_category(),
            "Feed endpoint configured"
        );

        let theme = ThemeService::init(store, config.theme_file.as_ref().map(PathBuf::from));

        let mut keybindings = create_default_keybindings();
        if let Some(custom_bindings) = &config.keybindings {
            keybindings.merge_config(custom_bindings);
        }

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            feed: FeedView::new(),
            theme,
            api_service,
            config,
            keybindings,
            notification: None,
            spinner_state: 0,
            last_spinner_update: None,
            event_tx,
            event_rx,
            in_flight: None,
        }
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub fn notify_warning(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::warning(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    /// Issue the initial fetch for the default category.
    pub fn start(&mut self) {
        let ticket = self.feed.fetch_articles(self.feed.active_tag());
        self.spawn_fetch(ticket);
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        self.start();

        let mut event_interval = tokio::time::interval(Duration::from_millis(16));

        loop {
            // Update spinner animation every 100ms
            let now = tokio::time::Instant::now();
            match self.last_spinner_update {
                Some(last_update) if now.duration_since(last_update).as_millis() >= 100 => {
                    self.spinner_state = self.spinner_state.wrapping_add(1);
                    self.last_spinner_update = Some(now);
                }
                Some(_) => {}
                None => self.last_spinner_update = Some(now),
            }

            // Auto-dismiss expired notifications
            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.notification = None;
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_event(app_event);
                }
            }

            if !self.running {
                break;
            }
        }

        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = self.keybindings.get_action(&key) {
            self.handle_action(action);
        }
    }

    pub fn handle_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::ArticlesLoaded { generation, result } => {
                if self.feed.apply_result(generation, result) {
                    self.in_flight = None;
                }
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            // The cards are only on screen while idle.
            Action::NavigateUp | Action::NavigateDown | Action::OpenArticle
                if self.feed.fetch_state() != FetchState::Idle => {}
            Action::NavigateUp => self.feed.select_prev(),
            Action::NavigateDown => self.feed.select_next(),
            Action::OpenArticle => self.open_selected_article(),
            Action::SelectTag(tag) => self.select_tag(tag),
            Action::NextTag => self.select_tag(self.feed.active_tag().next()),
            Action::PrevTag => self.select_tag(self.feed.active_tag().prev()),
            Action::Refresh => {
                let ticket = self.feed.refresh();
                self.spawn_fetch(ticket);
            }
            Action::ToggleTheme => {
                if let Err(e) = self.theme.toggle() {
                    tracing::error!("{:#}", e);
                    self.notify_warning("Theme changed but could not be saved");
                }
            }
        }
    }

    fn select_tag(&mut self, tag: Category) {
        if let Some(ticket) = self.feed.handle_tag_click(tag) {
            self.spawn_fetch(ticket);
        }
    }

    /// Run the fetch for `ticket` on a background task.
    ///
    /// Any fetch still in flight is cancelled first. The request and the
    /// minimum spinner duration run concurrently, so the result arrives no
    /// sooner than the configured minimum.
    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let api = Arc::clone(&self.api_service);
        let tx = self.event_tx.clone();
        let min_spinner = self.config.min_spinner_duration();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(generation = ticket.generation, "fetch cancelled");
                }
                result = fetch_with_min_duration(&api, ticket.category, min_spinner) => {
                    let _ = tx.send(AppEvent::ArticlesLoaded {
                        generation: ticket.generation,
                        result,
                    });
                }
            }
        });
    }

    fn open_selected_article(&mut self) {
        let Some(link) = self
            .feed
            .selected_article()
            .map(|a| a.article_id.clone())
        else {
            return;
        };

        if !is_openable(&link) {
            tracing::warn!(link = %link, "Refusing to open non-web link");
            self.notify_error("This article has no web link");
            return;
        }

        match open::that_detached(&link) {
            Ok(()) => {
                let label = link_domain(&link).unwrap_or(link);
                self.notify_info(format!("Opened {}", label));
            }
            Err(e) => {
                tracing::error!(link = %link, error = %e, "Failed to open link");
                self.notify_error("Could not open the browser");
            }
        }
    }

    pub fn get_spinner_char(&self) -> &'static str {
        const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER_FRAMES[self.spinner_state % SPINNER_FRAMES.len()]
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }
}

async fn fetch_with_min_duration(
    api: &ApiService,
    category: Category,
    min: Duration,
) -> Result<Vec<Article>, FetchError> {
    let (result, ()) = tokio::join!(api.fetch_articles(category), tokio::time::sleep(min));
    result
}
