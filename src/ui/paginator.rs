use crate::chat::{Button, ButtonStyle, Component, ControlSet, InteractionEvent, Outbound, UserId};
use crate::error::BotError;
use crate::ui::binder::{DetailSource, SelectionMenu};
use crate::ui::view::{InteractiveView, ViewUpdate};
use crate::ui::{DisplayUnit, InteractionGate};
use async_trait::async_trait;
use std::sync::Arc;

pub const FIRST_ID: &str = "pager:first";
pub const PREVIOUS_ID: &str = "pager:previous";
pub const PAGE_ID: &str = "pager:page";
pub const NEXT_ID: &str = "pager:next";
pub const LAST_ID: &str = "pager:last";
pub const STOP_ID: &str = "pager:stop";

/// Navigation actions a pagination session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    First,
    Previous,
    Next,
    Last,
    Stop,
    /// Choice of the selection entry at this index
    Select(usize),
}

impl Action {
    /// Maps a navigation button id to its action
    pub fn from_button(id: &str) -> Option<Self> {
        match id {
            FIRST_ID => Some(Action::First),
            PREVIOUS_ID => Some(Action::Previous),
            NEXT_ID => Some(Action::Next),
            LAST_ID => Some(Action::Last),
            STOP_ID => Some(Action::Stop),
            _ => None,
        }
    }
}

/// Outcome of applying an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current page must be rendered again
    Render,
    /// The action had no effect at the current boundary
    Noop,
    /// The session just stopped
    Stopped,
    /// A selection was made; pages and cursor are untouched
    Select(usize),
    /// The session is already stopped
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Stopped,
}

/// Bounded cursor over a fixed, non-empty sequence of pages
#[derive(Debug, Clone)]
pub struct PaginationSession {
    pages: Vec<DisplayUnit>,
    cursor: usize,
    gate: InteractionGate,
    state: SessionState,
    attachments: Vec<Component>,
}

impl PaginationSession {
    pub fn new(pages: Vec<DisplayUnit>, owner: UserId) -> Result<Self, BotError> {
        if pages.is_empty() {
            return Err(BotError::EmptySession);
        }
        Ok(Self {
            pages,
            cursor: 0,
            gate: InteractionGate::new(owner),
            state: SessionState::Active,
            attachments: Vec::new(),
        })
    }

    /// Adds a control rendered below the navigation buttons
    pub fn attach(&mut self, component: Component) {
        self.attachments.push(component);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == SessionState::Stopped
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn current(&self) -> &DisplayUnit {
        // cursor < len and pages is non-empty
        &self.pages[self.cursor]
    }

    /// Applies `action` without any ownership check
    pub fn apply(&mut self, action: Action) -> Transition {
        if self.is_stopped() {
            return Transition::Ignored;
        }

        let last = self.pages.len() - 1;
        match action {
            Action::First => {
                self.cursor = 0;
                Transition::Render
            }
            Action::Previous if self.cursor == 0 => Transition::Noop,
            Action::Previous => {
                self.cursor -= 1;
                Transition::Render
            }
            Action::Next if self.cursor >= last => Transition::Noop,
            Action::Next => {
                self.cursor += 1;
                Transition::Render
            }
            Action::Last => {
                self.cursor = last;
                Transition::Render
            }
            Action::Stop => {
                self.state = SessionState::Stopped;
                Transition::Stopped
            }
            Action::Select(index) => Transition::Select(index),
        }
    }

    /// Applies `action` on behalf of `actor`, rejecting anyone but the owner
    pub fn apply_as(&mut self, actor: UserId, action: Action) -> Result<Transition, BotError> {
        self.gate.check(actor)?;
        Ok(self.apply(action))
    }

    /// Stops the session as if `stop` was pressed
    pub fn stop(&mut self) {
        self.state = SessionState::Stopped;
    }

    /// Navigation buttons plus attached controls for the current state
    pub fn controls(&self) -> ControlSet {
        let page_label = format!("Page {}", self.cursor + 1);
        let navigation = vec![
            Component::Button(Button::new(FIRST_ID, "⏪", ButtonStyle::Gray)),
            Component::Button(Button::new(PREVIOUS_ID, "◀", ButtonStyle::Gray)),
            Component::Button(Button::new(PAGE_ID, page_label, ButtonStyle::Blurple).disabled(true)),
            Component::Button(Button::new(NEXT_ID, "▶", ButtonStyle::Gray)),
            Component::Button(Button::new(LAST_ID, "⏩", ButtonStyle::Gray)),
        ];
        let stop = vec![Component::Button(Button::new(STOP_ID, "▉ stop", ButtonStyle::Red))];

        let mut controls = ControlSet::new().with_row(navigation).with_row(stop);
        for attachment in &self.attachments {
            controls = controls.with_row(vec![attachment.clone()]);
        }

        if self.is_stopped() {
            controls.disable_all();
        }
        controls
    }

    /// Current page together with its controls
    pub fn render(&self) -> Outbound {
        Outbound::embed(self.current().clone()).with_controls(self.controls())
    }
}

struct Selection {
    menu: SelectionMenu,
    source: Arc<dyn DetailSource>,
}

/// Interactive view over a [`PaginationSession`], optionally with a drill-down menu
pub struct Paginator {
    session: PaginationSession,
    selection: Option<Selection>,
}

impl Paginator {
    pub fn new(session: PaginationSession) -> Self {
        Self {
            session,
            selection: None,
        }
    }

    /// Attaches a selection menu whose choices are resolved through `source`
    pub fn with_selection(mut self, menu: SelectionMenu, source: Arc<dyn DetailSource>) -> Self {
        self.session.attach(menu.component());
        self.selection = Some(Selection { menu, source });
        self
    }

    pub fn session(&self) -> &PaginationSession {
        &self.session
    }

    fn action_for(&self, event: &InteractionEvent) -> Result<Option<Action>, BotError> {
        if event.component_id == SelectionMenu::ID {
            let Some(selection) = &self.selection else {
                return Ok(None);
            };
            let value = event.values.first().map(String::as_str).unwrap_or_default();
            let (index, _) = selection.menu.resolve(value)?;
            return Ok(Some(Action::Select(index)));
        }
        Ok(Action::from_button(&event.component_id))
    }
}

#[async_trait]
impl InteractiveView for Paginator {
    fn gate(&self) -> &InteractionGate {
        self.session.gate()
    }

    fn render(&self) -> Outbound {
        self.session.render()
    }

    async fn handle(&mut self, event: &InteractionEvent) -> Result<ViewUpdate, BotError> {
        let Some(action) = self.action_for(event)? else {
            ::log::debug!("Ignoring unknown component {}", event.component_id);
            return Ok(ViewUpdate::Unchanged);
        };

        match self.session.apply_as(event.user, action)? {
            Transition::Render => Ok(ViewUpdate::Edit(self.session.render())),
            Transition::Noop | Transition::Ignored => Ok(ViewUpdate::Unchanged),
            Transition::Stopped => Ok(ViewUpdate::Finish(self.session.render())),
            Transition::Select(index) => {
                let Some(selection) = &self.selection else {
                    return Ok(ViewUpdate::Unchanged);
                };
                let Some(entry) = selection.menu.entry(index) else {
                    return Err(BotError::UnknownSelection(index.to_string()));
                };
                ::log::debug!("Fetching detail for {}", entry.reference);
                let source = Arc::clone(&selection.source);
                let entry = entry.clone();
                Ok(ViewUpdate::Followup(Box::pin(async move {
                    let detail = source.fetch_detail(&entry).await?;
                    Ok::<_, BotError>(Outbound::embed(detail))
                })))
            }
        }
    }

    fn expire(&mut self) -> Option<Outbound> {
        self.session.stop();
        Some(self.session.render())
    }
}
