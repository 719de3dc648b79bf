use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The six event types a rule table can exist for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Follow,
    ChatCommand,
    ChannelPoints,
    Bits,
    Subscription,
    GiftSubscription,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Follow,
        EventKind::ChatCommand,
        EventKind::ChannelPoints,
        EventKind::Bits,
        EventKind::Subscription,
        EventKind::GiftSubscription,
    ];

    /// Kinds matched by numeric threshold rather than exact key.
    pub const fn is_threshold(self) -> bool {
        matches!(
            self,
            EventKind::Bits | EventKind::Subscription | EventKind::GiftSubscription
        )
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            EventKind::Follow => "Follow",
            EventKind::ChatCommand => "Chat Command",
            EventKind::ChannelPoints => "Channel Points",
            EventKind::Bits => "Bits",
            EventKind::Subscription => "Subscription",
            EventKind::GiftSubscription => "Gift Subscription",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One typed notification from the stream platform.
///
/// The user label is carried for logging only; resolution never looks at
/// it. `Chat` is the raw chat line, the router decides whether it is a
/// command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Follow { user: String },
    Chat { user: String, message: String },
    ChannelPoints { user: String, title: String },
    Bits { user: String, amount: u32 },
    Subscription { user: String, months: u32 },
    GiftSubscription { user: String, count: u32 },
}

impl StreamEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StreamEvent::Follow { .. } => EventKind::Follow,
            StreamEvent::Chat { .. } => EventKind::ChatCommand,
            StreamEvent::ChannelPoints { .. } => EventKind::ChannelPoints,
            StreamEvent::Bits { .. } => EventKind::Bits,
            StreamEvent::Subscription { .. } => EventKind::Subscription,
            StreamEvent::GiftSubscription { .. } => EventKind::GiftSubscription,
        }
    }

    pub fn user(&self) -> &str {
        match self {
            StreamEvent::Follow { user }
            | StreamEvent::Chat { user, .. }
            | StreamEvent::ChannelPoints { user, .. }
            | StreamEvent::Bits { user, .. }
            | StreamEvent::Subscription { user, .. }
            | StreamEvent::GiftSubscription { user, .. } => user,
        }
    }

    /// Build a test event from an operator-supplied value string, the way
    /// the manual injection path does. Value-bearing kinds reject
    /// non-numeric input; `Follow` ignores the value entirely.
    pub fn synthetic(kind: EventKind, user: &str, value: &str) -> Result<Self, EventParseError> {
        let user = user.to_string();
        let numeric = |value: &str| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| EventParseError::NotNumeric {
                    kind,
                    text: value.to_string(),
                })
        };
        Ok(match kind {
            EventKind::Follow => StreamEvent::Follow { user },
            EventKind::ChatCommand => StreamEvent::Chat {
                user,
                message: value.to_string(),
            },
            EventKind::ChannelPoints => StreamEvent::ChannelPoints {
                user,
                title: value.to_string(),
            },
            EventKind::Bits => StreamEvent::Bits {
                user,
                amount: numeric(value)?,
            },
            EventKind::Subscription => StreamEvent::Subscription {
                user,
                months: numeric(value)?,
            },
            EventKind::GiftSubscription => StreamEvent::GiftSubscription {
                user,
                count: numeric(value)?,
            },
        })
    }
}

/// A value-bearing event whose value did not parse. The event is dropped;
/// nothing fires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventParseError {
    #[error("{kind} events need a non-negative numeric value, got {text:?}")]
    NotNumeric { kind: EventKind, text: String },
}
