//! Turning a list of fetched results into a paginated overview with a
//! drill-down menu.
//!
//! Each [`SelectionEntry`] becomes one overview page. A [`SelectionMenu`]
//! offers one option per entry; choosing an option asks a [`DetailSource`]
//! for the full detail of that entry, which is sent as an ephemeral follow-up
//! without touching the paginated session.

use crate::chat::{Component, SelectMenu, SelectOption, UserId};
use crate::error::{BotError, FetchError};
use crate::ui::paginator::{PaginationSession, Paginator};
use crate::ui::{DEFAULT_COLOR, DisplayUnit};
use async_trait::async_trait;
use std::sync::Arc;

/// Platform cap on options in a single select menu
pub const MAX_OPTIONS: usize = 25;

/// Platform cap on the length of an option value
pub const MAX_VALUE_LEN: usize = 100;

/// One fetched result plus the reference needed to fetch its detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub label: String,
    /// Short text shown under the label in the menu
    pub description: Option<String>,
    /// Body of the entry's overview page
    pub summary: String,
    /// Where the full detail lives, usually a URL
    pub reference: String,
    pub thumbnail: Option<String>,
}

impl SelectionEntry {
    pub fn new(label: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            summary: String::new(),
            reference: reference.into(),
            thumbnail: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    fn overview_page(&self, color: u32) -> DisplayUnit {
        let mut page = DisplayUnit::default()
            .titled(self.label.clone())
            .linked(self.reference.clone())
            .described(self.summary.clone())
            .with_color(color);
        if let Some(thumbnail) = &self.thumbnail {
            page = page.with_thumbnail(thumbnail.clone());
        }
        page
    }
}

/// Fetches the full detail behind a [`SelectionEntry`]
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, entry: &SelectionEntry) -> Result<DisplayUnit, FetchError>;
}

/// Select menu with one option per entry
#[derive(Debug, Clone)]
pub struct SelectionMenu {
    placeholder: String,
    entries: Vec<SelectionEntry>,
}

impl SelectionMenu {
    pub const ID: &'static str = "binder:select";

    pub fn new(placeholder: impl Into<String>, mut entries: Vec<SelectionEntry>) -> Self {
        if entries.len() > MAX_OPTIONS {
            ::log::debug!(
                "Select menu truncated from {} to {} options",
                entries.len(),
                MAX_OPTIONS
            );
            entries.truncate(MAX_OPTIONS);
        }
        Self {
            placeholder: placeholder.into(),
            entries,
        }
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&SelectionEntry> {
        self.entries.get(index)
    }

    /// Option value for the entry at `index`.
    ///
    /// The index leads the value so entries with identical labels or
    /// references never collide.
    fn value_for(index: usize, entry: &SelectionEntry) -> String {
        let value = format!("{}:{}", index, entry.reference);
        value.chars().take(MAX_VALUE_LEN).collect()
    }

    /// Option values in entry order
    pub fn component_values(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self::value_for(index, entry))
            .collect()
    }

    pub fn component(&self) -> Component {
        let options = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| SelectOption {
                value: Self::value_for(index, entry),
                label: entry.label.clone(),
                description: entry.description.clone(),
            })
            .collect();

        Component::Select(SelectMenu {
            id: Self::ID.to_string(),
            placeholder: self.placeholder.clone(),
            options,
            disabled: false,
        })
    }

    /// Maps a chosen option value back to its entry
    pub fn resolve(&self, value: &str) -> Result<(usize, &SelectionEntry), BotError> {
        let unknown = || BotError::UnknownSelection(value.to_string());
        let (index, _) = value.split_once(':').ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;
        let entry = self.entries.get(index).ok_or_else(unknown)?;
        Ok((index, entry))
    }
}

/// Result of binding a list of entries
pub enum Binding {
    /// Nothing was found; send this unit on its own
    NoResults(DisplayUnit),
    /// A paginator ready to be launched
    Paginated(Paginator),
}

/// Builds overview pages and a selection menu for a list of entries
#[derive(Debug, Clone)]
pub struct ResultBinder {
    owner: UserId,
    summary_title: Option<String>,
    group_size: usize,
    placeholder: String,
    no_results: String,
    color: u32,
}

impl ResultBinder {
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            summary_title: None,
            group_size: 0,
            placeholder: "Select an entry to view".to_string(),
            no_results: "No results were found".to_string(),
            color: DEFAULT_COLOR,
        }
    }

    /// Prepends summary pages listing `group_size` entries each
    pub fn with_summary(mut self, title: impl Into<String>, group_size: usize) -> Self {
        self.summary_title = Some(title.into());
        self.group_size = group_size;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_no_results(mut self, message: impl Into<String>) -> Self {
        self.no_results = message.into();
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Summary pages followed by one page per entry
    pub fn overview(&self, entries: &[SelectionEntry]) -> Vec<DisplayUnit> {
        let mut pages = Vec::new();

        if let Some(title) = self.summary_title.as_ref().filter(|_| self.group_size > 0) {
            for (chunk_index, chunk) in entries.chunks(self.group_size).enumerate() {
                let first = chunk_index * self.group_size + 1;
                let body = chunk
                    .iter()
                    .enumerate()
                    .map(|(offset, entry)| {
                        format!(
                            "**{}. [{}]({})**\n{}",
                            first + offset,
                            entry.label,
                            entry.reference,
                            entry.summary
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n");
                pages.push(
                    DisplayUnit::with_description(body)
                        .titled(title.clone())
                        .with_color(self.color),
                );
            }
        }

        pages.extend(entries.iter().map(|entry| entry.overview_page(self.color)));
        pages
    }

    pub fn bind(
        &self,
        entries: Vec<SelectionEntry>,
        source: Arc<dyn DetailSource>,
    ) -> Result<Binding, BotError> {
        if entries.is_empty() {
            return Ok(Binding::NoResults(
                DisplayUnit::with_description(self.no_results.clone()).with_color(self.color),
            ));
        }

        let session = PaginationSession::new(self.overview(&entries), self.owner)?;
        let menu = SelectionMenu::new(self.placeholder.clone(), entries);
        Ok(Binding::Paginated(
            Paginator::new(session).with_selection(menu, source),
        ))
    }
}
