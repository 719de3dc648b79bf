//! Decides which rules fire for an inbound event.
//!
//! Exact-match tables (Follow, Chat Command, Channel Points) are a direct
//! key lookup. Threshold tables (Bits, Subscription, Gift Subscription)
//! use an ordered scan over the ascending-sorted table: always-fire rules
//! trigger at every threshold they clear, while at most one plain rule
//! fires per event, the highest tier the value reached.

use crate::events::StreamEvent;
use crate::rules::{Rule, RuleKind, RuleTable};

/// Compute the firing set for `event`, in table order. Pure: holds no
/// state between events, so identical inputs give identical outputs.
pub fn resolve<'a>(table: &'a RuleTable, event: &StreamEvent) -> Vec<&'a Rule> {
    if table.kind() != event.kind() {
        return Vec::new();
    }
    match event {
        StreamEvent::Follow { .. } => table.rules().iter().collect(),
        StreamEvent::Chat { message, .. } => table
            .rules()
            .iter()
            .filter(|r| matches!(&r.kind, RuleKind::ChatCommand { command } if command == message))
            .collect(),
        StreamEvent::ChannelPoints { title: event_title, .. } => table
            .rules()
            .iter()
            .filter(|r| matches!(&r.kind, RuleKind::ChannelPoints { title } if title == event_title))
            .collect(),
        StreamEvent::Bits { amount, .. } => resolve_threshold(table.rules(), *amount),
        StreamEvent::Subscription { months, .. } => resolve_threshold(table.rules(), *months),
        StreamEvent::GiftSubscription { count, .. } => resolve_threshold(table.rules(), *count),
    }
}

/// Ordered scan over an ascending-sorted threshold table.
fn resolve_threshold(rules: &[Rule], value: u32) -> Vec<&Rule> {
    let mut fired: Vec<&Rule> = Vec::new();
    let mut previous: Option<&Rule> = None;

    for rule in rules {
        if value < rule.kind.threshold().unwrap_or(0) {
            // Sorted ascending: nothing further can match.
            break;
        }
        if rule.kind.always_fire() {
            fired.push(rule);
        }
        previous = Some(rule);
    }

    // The boundary rule: highest threshold at or below the value. It must
    // not fire twice if it already fired above as an always-fire rule.
    if let Some(prev) = previous {
        if !fired.iter().any(|r| r.id == prev.id) {
            fired.push(prev);
        }
    }

    fired
}
