//! Thin glue between the event source, the rule tables, the resolver and
//! the scheduler. Events arrive over an explicit channel; there is no
//! process-wide registry.

use crate::events::{EventKind, StreamEvent};
use crate::resolver;
use crate::rules::{RuleDraft, RuleError, RuleId, RuleTable};
use crate::scheduler::{ActionScheduler, KeySink};
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// The six per-event-type rule tables.
#[derive(Debug)]
pub struct Tables {
    follow: RuleTable,
    chat_commands: RuleTable,
    channel_points: RuleTable,
    bits: RuleTable,
    subscriptions: RuleTable,
    gift_subscriptions: RuleTable,
}

impl Tables {
    pub fn new() -> Self {
        Self {
            follow: RuleTable::new(EventKind::Follow),
            chat_commands: RuleTable::new(EventKind::ChatCommand),
            channel_points: RuleTable::new(EventKind::ChannelPoints),
            bits: RuleTable::new(EventKind::Bits),
            subscriptions: RuleTable::new(EventKind::Subscription),
            gift_subscriptions: RuleTable::new(EventKind::GiftSubscription),
        }
    }

    pub fn table(&self, kind: EventKind) -> &RuleTable {
        match kind {
            EventKind::Follow => &self.follow,
            EventKind::ChatCommand => &self.chat_commands,
            EventKind::ChannelPoints => &self.channel_points,
            EventKind::Bits => &self.bits,
            EventKind::Subscription => &self.subscriptions,
            EventKind::GiftSubscription => &self.gift_subscriptions,
        }
    }

    pub fn table_mut(&mut self, kind: EventKind) -> &mut RuleTable {
        match kind {
            EventKind::Follow => &mut self.follow,
            EventKind::ChatCommand => &mut self.chat_commands,
            EventKind::ChannelPoints => &mut self.channel_points,
            EventKind::Bits => &mut self.bits,
            EventKind::Subscription => &mut self.subscriptions,
            EventKind::GiftSubscription => &mut self.gift_subscriptions,
        }
    }

    /// Route a candidate rule to the table its kind belongs to.
    pub fn add(&mut self, draft: RuleDraft) -> Result<RuleId, RuleError> {
        self.table_mut(draft.kind.event_kind()).add(draft)
    }

    pub fn remove(&mut self, kind: EventKind, id: RuleId) {
        self.table_mut(kind).remove(id);
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatches inbound typed events to the matching table, resolver and
/// scheduler.
pub struct EventRouter {
    tables: Arc<RwLock<Tables>>,
    scheduler: ActionScheduler,
}

impl EventRouter {
    pub fn new(tables: Arc<RwLock<Tables>>, sink: Arc<dyn KeySink>) -> Self {
        Self {
            tables,
            scheduler: ActionScheduler::new(sink),
        }
    }

    pub fn tables(&self) -> &Arc<RwLock<Tables>> {
        &self.tables
    }

    /// Resolve one inbound event and run the protocol of every rule in
    /// its firing set.
    pub fn dispatch(&self, event: &StreamEvent) {
        match event {
            StreamEvent::Follow { user } => {
                info!("Follow Event - User: {user}");
            }
            StreamEvent::Chat { user, message } => {
                if message.len() < 2 || !message.starts_with('!') {
                    // Ordinary chat line, not a command.
                    return;
                }
                info!("Chat Command Event - User: {user}, Command: {message}");
            }
            StreamEvent::ChannelPoints { user, title } => {
                info!("Channel Points Redemption Event - User: {user}, Title: {title}");
            }
            StreamEvent::Bits { user, amount } => {
                info!("Bits Event - User: {user}, Bits: {amount}");
            }
            StreamEvent::Subscription { user, months } => {
                info!("Subscription Event - User: {user}, Months: {months}");
            }
            StreamEvent::GiftSubscription { user, count } => {
                info!("Gift Subscription Event - User: {user}, Count: {count}");
            }
        }

        let tables = self.tables.read();
        let fired = resolver::resolve(tables.table(event.kind()), event);
        debug!(kind = %event.kind(), fired = fired.len(), "resolved firing set");
        for rule in fired {
            self.scheduler.fire(rule);
        }
    }

    /// Manual test-event injection: build an event from an operator
    /// value and dispatch it. A malformed value drops the event.
    pub fn dispatch_synthetic(&self, kind: EventKind, user: &str, value: &str) {
        match StreamEvent::synthetic(kind, user, value) {
            Ok(event) => self.dispatch(&event),
            Err(e) => info!("Dropping malformed test event: {e}"),
        }
    }

    /// Drain events until the source hangs up.
    pub fn run(&self, events: Receiver<StreamEvent>) {
        for event in events {
            self.dispatch(&event);
        }
        debug!("event channel disconnected, router stopping");
    }
}
