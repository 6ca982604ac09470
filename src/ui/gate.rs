use crate::chat::{ChatSurface, InteractionEvent, Outbound, UserId};
use crate::error::BotError;

/// Restricts an interactive message to the user who opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionGate {
    owner: UserId,
}

impl InteractionGate {
    pub fn new(owner: UserId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Checks that `actor` may drive the gated element
    pub fn check(&self, actor: UserId) -> Result<(), BotError> {
        if actor == self.owner {
            Ok(())
        } else {
            Err(BotError::PermissionDenied {
                owner: self.owner,
                actor,
            })
        }
    }

    /// Returns whether `event` should be forwarded to the element's handler.
    ///
    /// A rejected actor receives an ephemeral notice naming the owner. A failure
    /// to deliver that notice is logged and otherwise ignored.
    pub async fn admit(&self, surface: &dyn ChatSurface, event: &InteractionEvent) -> bool {
        let Err(denied) = self.check(event.user) else {
            return true;
        };

        ::log::debug!(
            "Rejected interaction {} on message {} from {} (owner {})",
            event.component_id,
            event.message,
            event.user,
            self.owner
        );

        let notice = Outbound::text(denied.to_string());
        if let Err(e) = surface
            .send_ephemeral(event.channel, event.user, notice)
            .await
        {
            ::log::warn!("Failed to deliver permission notice to {}: {}", event.user, e);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChannelId, MessageId};
    use crate::testing::{Recorded, RecordingSurface};

    fn press(user: u64) -> InteractionEvent {
        InteractionEvent {
            channel: ChannelId(7),
            message: MessageId(1),
            user: UserId(user),
            component_id: "pager:next".to_string(),
            values: Vec::new(),
        }
    }

    #[test]
    fn test_check_accepts_owner_only() {
        let gate = InteractionGate::new(UserId(10));
        assert!(gate.check(UserId(10)).is_ok());

        let err = gate.check(UserId(11)).unwrap_err();
        assert!(matches!(
            err,
            BotError::PermissionDenied {
                owner: UserId(10),
                actor: UserId(11)
            }
        ));
        assert_eq!(
            err.to_string(),
            "This interaction can only be used by <@10>"
        );
    }

    #[tokio::test]
    async fn test_admit_notifies_rejected_user() {
        let surface = RecordingSurface::new();
        let gate = InteractionGate::new(UserId(10));

        assert!(gate.admit(&surface, &press(10)).await);
        assert!(surface.records().is_empty());

        assert!(!gate.admit(&surface, &press(99)).await);
        let records = surface.records();
        assert_eq!(records.len(), 1);
        match &records[0] {
            Recorded::Ephemeral { user, message, .. } => {
                assert_eq!(*user, UserId(99));
                assert_eq!(
                    message.content.as_deref(),
                    Some("This interaction can only be used by <@10>")
                );
            }
            other => panic!("unexpected record {:?}", other),
        }
    }
}
