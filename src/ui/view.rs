use crate::chat::{InteractionEvent, Outbound};
use crate::error::BotError;
use crate::ui::InteractionGate;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Follow-up work that resolves outside the session task
pub type PendingFollowup = Pin<Box<dyn Future<Output = Result<Outbound, BotError>> + Send>>;

/// What the session runtime should do after a view handled an event
pub enum ViewUpdate {
    /// Nothing visible changed
    Unchanged,
    /// Replace the view's message in place
    Edit(Outbound),
    /// Resolve in its own task, then send the result as an ephemeral
    /// follow-up to the acting user. An error is posted to the channel.
    Followup(PendingFollowup),
    /// Replace the message a last time and end the session
    Finish(Outbound),
}

impl fmt::Debug for ViewUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewUpdate::Unchanged => f.write_str("Unchanged"),
            ViewUpdate::Edit(update) => f.debug_tuple("Edit").field(update).finish(),
            ViewUpdate::Followup(_) => f.write_str("Followup(..)"),
            ViewUpdate::Finish(last) => f.debug_tuple("Finish").field(last).finish(),
        }
    }
}

/// An interactive message driven by component events.
///
/// The runtime checks [`InteractiveView::gate`] before calling
/// [`InteractiveView::handle`], so views only ever see events from their owner.
#[async_trait]
pub trait InteractiveView: Send + Sync {
    fn gate(&self) -> &InteractionGate;

    /// Body of the message that opens the view
    fn render(&self) -> Outbound;

    async fn handle(&mut self, event: &InteractionEvent) -> Result<ViewUpdate, BotError>;

    /// Called once when the idle timeout expires; returns the final render, if any
    fn expire(&mut self) -> Option<Outbound>;
}
