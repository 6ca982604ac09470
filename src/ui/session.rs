use crate::chat::{ChannelId, InteractionEvent, MessageId, Outbound};
use crate::context::AppContext;
use crate::error::{BotError, ChatError};
use crate::ui::view::{InteractiveView, ViewUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

const EVENT_BUFFER: usize = 16;

/// Routes interaction events to the task driving the view on that message
#[derive(Clone, Default)]
pub struct SessionRegistry {
    routes: Arc<Mutex<HashMap<MessageId, mpsc::Sender<InteractionEvent>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards `event` to its session; returns false when no session owns the message
    pub async fn route(&self, event: InteractionEvent) -> bool {
        let sender = {
            let routes = self.routes.lock().await;
            routes.get(&event.message).cloned()
        };

        match sender {
            Some(tx) => tx.send(event).await.is_ok(),
            None => {
                ::log::debug!("No live session for message {}", event.message);
                false
            }
        }
    }

    /// Number of live sessions
    pub async fn active(&self) -> usize {
        self.routes.lock().await.len()
    }

    async fn register(&self, message: MessageId, tx: mpsc::Sender<InteractionEvent>) {
        self.routes.lock().await.insert(message, tx);
    }

    async fn remove(&self, message: MessageId) {
        self.routes.lock().await.remove(&message);
    }
}

/// Sends the opening render of `view` and drives it in its own task.
///
/// The session ends when the view finishes, when its idle `timeout` expires,
/// or when its message disappears.
pub async fn launch<V>(
    app: &AppContext,
    channel: ChannelId,
    reply_to: Option<MessageId>,
    view: V,
    timeout: Option<Duration>,
) -> Result<MessageId, BotError>
where
    V: InteractiveView + 'static,
{
    let mut opening = view.render();
    opening.reply_to = reply_to;
    let message = app.send(channel, opening).await?;

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    app.sessions.register(message, tx).await;
    ::log::info!("Started interactive session on message {}", message);

    tokio::spawn(drive(Box::new(view), app.clone(), channel, message, rx, timeout));
    Ok(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Finished,
}

async fn drive(
    mut view: Box<dyn InteractiveView>,
    app: AppContext,
    channel: ChannelId,
    message: MessageId,
    mut rx: mpsc::Receiver<InteractionEvent>,
    timeout: Option<Duration>,
) {
    let mut deadline = timeout.map(|idle| Instant::now() + idle);
    loop {
        let next = match deadline {
            Some(at) => match tokio::time::timeout_at(at, rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    ::log::info!("Session on message {} timed out", message);
                    if let Some(last) = view.expire() {
                        edit(&app, channel, message, last).await;
                    }
                    break;
                }
            },
            None => rx.recv().await,
        };

        let Some(event) = next else {
            break;
        };

        // only the owner's events count as activity
        if !view.gate().admit(app.surface.as_ref(), &event).await {
            continue;
        }
        if let Some(idle) = timeout {
            deadline = Some(Instant::now() + idle);
        }

        if process(view.as_mut(), &app, channel, message, &event).await == Flow::Finished {
            break;
        }
    }

    app.sessions.remove(message).await;
    ::log::info!("Session on message {} ended", message);
}

async fn process(
    view: &mut dyn InteractiveView,
    app: &AppContext,
    channel: ChannelId,
    message: MessageId,
    event: &InteractionEvent,
) -> Flow {
    match view.handle(event).await {
        Ok(ViewUpdate::Unchanged) => Flow::Continue,
        Ok(ViewUpdate::Edit(update)) => edit(app, channel, message, update).await,
        Ok(ViewUpdate::Followup(pending)) => {
            let app = app.clone();
            let user = event.user;
            tokio::spawn(async move {
                match pending.await {
                    Ok(followup) => {
                        if let Err(e) = app.surface.send_ephemeral(channel, user, followup).await {
                            ::log::error!("Failed to send follow-up on message {}: {}", message, e);
                        }
                    }
                    Err(e) => report(&app, channel, message, e).await,
                }
            });
            Flow::Continue
        }
        Ok(ViewUpdate::Finish(last)) => {
            edit(app, channel, message, last).await;
            Flow::Finished
        }
        Err(e) => {
            report(app, channel, message, e).await;
            Flow::Continue
        }
    }
}

async fn report(app: &AppContext, channel: ChannelId, message: MessageId, error: BotError) {
    ::log::warn!("Interaction on message {} failed: {}", message, error);
    if let Err(e) = app.send(channel, Outbound::text(error.to_string())).await {
        ::log::error!("Failed to report interaction error: {}", e);
    }
}

async fn edit(app: &AppContext, channel: ChannelId, message: MessageId, update: Outbound) -> Flow {
    match app.surface.edit(channel, message, update).await {
        Ok(()) => Flow::Continue,
        Err(ChatError::UnknownMessage(_)) => {
            ::log::info!("Message {} is gone, ending its session", message);
            Flow::Finished
        }
        Err(e) => {
            ::log::error!("Failed to edit message {}: {}", message, e);
            Flow::Continue
        }
    }
}
