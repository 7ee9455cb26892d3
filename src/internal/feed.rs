//! View state of the article feed.
//!
//! `FeedView` owns the article list, the loading flag, the error message and
//! the active category. Every fetch is identified by a generation number and
//! only the result for the latest generation is applied, so a slow response to
//! an earlier request can never overwrite a newer one.

use crate::api::{Category, FetchError};
use crate::internal::models::Article;

/// The only message shown for a failed fetch.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load articles. Please try again later.";

/// A fetch that the caller must now perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Failed,
}

#[derive(Debug, Default)]
pub struct FeedView {
    articles: Vec<Article>,
    loading: bool,
    error: Option<String>,
    active_tag: Category,
    generation: u64,
    selected: usize,
    offset: usize,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_tag(&self) -> Category {
        self.active_tag
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetch_state(&self) -> FetchState {
        match (self.loading, &self.error) {
            (true, _) => FetchState::Loading,
            (false, Some(_)) => FetchState::Failed,
            (false, None) => FetchState::Idle,
        }
    }

    /// Start a fetch for `tag`: scroll back to the top, mark loading and hand
    /// out a ticket for the new generation.
    pub fn fetch_articles(&mut self, tag: Category) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.selected = 0;
        self.offset = 0;
        tracing::debug!(generation = self.generation, tag = %tag, "fetch started");

        FetchTicket {
            generation: self.generation,
            category: tag,
        }
    }

    /// Select a category. Re-selecting the active one is a no-op unless a
    /// fetch is still in flight.
    pub fn handle_tag_click(&mut self, tag: Category) -> Option<FetchTicket> {
        if tag == self.active_tag && !self.loading {
            return None;
        }
        self.active_tag = tag;
        Some(self.fetch_articles(tag))
    }

    /// Fetch the active category again regardless of state.
    pub fn refresh(&mut self) -> FetchTicket {
        self.fetch_articles(self.active_tag)
    }

    /// Apply the outcome of the fetch with the given generation.
    ///
    /// Returns `false` when the result belongs to a superseded request and was
    /// dropped.
    pub fn apply_result(
        &mut self,
        generation: u64,
        result: Result<Vec<Article>, FetchError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "dropping stale fetch result"
            );
            return false;
        }

        match result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), tag = %self.active_tag, "articles loaded");
                self.articles = articles;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, tag = %self.active_tag, "Error fetching articles");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.articles.is_empty() {
            self.selected = (self.selected + 1).min(self.articles.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Index of the first card drawn.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }
}
