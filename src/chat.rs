//! Chat platform primitives
//!
//! Everything the bot needs from a chat platform is expressed here: identities,
//! outbound message bodies with their interactive controls, incoming
//! interaction events and the [`ChatSurface`] trait that sends and edits
//! messages. A platform adapter implements [`ChatSurface`] and translates
//! its own events into [`InteractionEvent`]s.

use crate::error::ChatError;
use crate::ui::DisplayUnit;
use async_trait::async_trait;
use std::fmt;

/// Identity of a chat user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl UserId {
    /// Platform mention markup for this user
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Gray,
    Blurple,
    Red,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Identifier echoed back in [`InteractionEvent::component_id`]
    pub id: String,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl Button {
    pub fn new(id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value echoed back in [`InteractionEvent::values`]
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub id: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
    pub disabled: bool,
}

/// One interactive control attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Button(Button),
    Select(SelectMenu),
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::Button(button) => &button.id,
            Component::Select(menu) => &menu.id,
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            Component::Button(button) => button.disabled,
            Component::Select(menu) => menu.disabled,
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        match self {
            Component::Button(button) => button.disabled = disabled,
            Component::Select(menu) => menu.disabled = disabled,
        }
    }
}

/// Ordered rows of interactive controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSet {
    pub rows: Vec<Vec<Component>>,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row of controls
    pub fn with_row(mut self, row: Vec<Component>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, id: &str) -> Option<&Component> {
        self.components().find(|component| component.id() == id)
    }

    pub fn disable_all(&mut self) {
        for component in self.rows.iter_mut().flatten() {
            component.set_disabled(true);
        }
    }

    pub fn all_disabled(&self) -> bool {
        self.components().all(Component::is_disabled)
    }
}

/// Body of a message sent or edited through a [`ChatSurface`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbound {
    pub content: Option<String>,
    pub embed: Option<DisplayUnit>,
    /// `None` removes any controls from an edited message
    pub controls: Option<ControlSet>,
    pub reply_to: Option<MessageId>,
}

impl Outbound {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(unit: DisplayUnit) -> Self {
        Self {
            embed: Some(unit),
            ..Self::default()
        }
    }

    pub fn with_controls(mut self, controls: ControlSet) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn replying_to(mut self, message: MessageId) -> Self {
        self.reply_to = Some(message);
        self
    }
}

/// A button press or menu choice on a message the bot sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    pub channel: ChannelId,
    pub message: MessageId,
    pub user: UserId,
    pub component_id: String,
    /// Chosen values for select menus, empty for buttons
    pub values: Vec<String>,
}

/// Send and edit primitive of the hosting chat platform
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Send a new message to a channel
    async fn send(&self, channel: ChannelId, message: Outbound) -> Result<MessageId, ChatError>;

    /// Replace an existing message in place
    async fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: Outbound,
    ) -> Result<(), ChatError>;

    /// Send a message only `user` can see
    async fn send_ephemeral(
        &self,
        channel: ChannelId,
        user: UserId,
        message: Outbound,
    ) -> Result<(), ChatError>;
}
