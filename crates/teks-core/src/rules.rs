use crate::events::EventKind;
use crate::types::Chord;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Process-unique rule identity. Removal and cooldown tracking key off
/// it; persisted snapshots carry no identity and get fresh ids on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(u64);

impl RuleId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Event-type-specific matching key of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleKind {
    Follow,
    ChatCommand {
        command: String,
    },
    ChannelPoints {
        title: String,
    },
    Bits {
        threshold: u32,
        always_fire: bool,
    },
    Subscription {
        threshold: u32,
        always_fire: bool,
    },
    GiftSubscription {
        threshold: u32,
        always_fire: bool,
    },
}

impl RuleKind {
    pub fn event_kind(&self) -> EventKind {
        match self {
            RuleKind::Follow => EventKind::Follow,
            RuleKind::ChatCommand { .. } => EventKind::ChatCommand,
            RuleKind::ChannelPoints { .. } => EventKind::ChannelPoints,
            RuleKind::Bits { .. } => EventKind::Bits,
            RuleKind::Subscription { .. } => EventKind::Subscription,
            RuleKind::GiftSubscription { .. } => EventKind::GiftSubscription,
        }
    }

    /// The numeric minimum for threshold kinds, `None` otherwise.
    pub fn threshold(&self) -> Option<u32> {
        match self {
            RuleKind::Bits { threshold, .. }
            | RuleKind::Subscription { threshold, .. }
            | RuleKind::GiftSubscription { threshold, .. } => Some(*threshold),
            _ => None,
        }
    }

    /// Whether the rule fires every time its threshold is met, not only
    /// as the highest tier reached.
    pub fn always_fire(&self) -> bool {
        match self {
            RuleKind::Bits { always_fire, .. }
            | RuleKind::Subscription { always_fire, .. }
            | RuleKind::GiftSubscription { always_fire, .. } => *always_fire,
            _ => false,
        }
    }

    /// Uniqueness key inside a table. `always_fire` is deliberately not
    /// part of it: two rules on the same threshold are still duplicates.
    fn same_discriminant(&self, other: &RuleKind) -> bool {
        match (self, other) {
            (RuleKind::Follow, RuleKind::Follow) => true,
            (RuleKind::ChatCommand { command: a }, RuleKind::ChatCommand { command: b }) => a == b,
            (RuleKind::ChannelPoints { title: a }, RuleKind::ChannelPoints { title: b }) => a == b,
            (RuleKind::Bits { threshold: a, .. }, RuleKind::Bits { threshold: b, .. })
            | (
                RuleKind::Subscription { threshold: a, .. },
                RuleKind::Subscription { threshold: b, .. },
            )
            | (
                RuleKind::GiftSubscription { threshold: a, .. },
                RuleKind::GiftSubscription { threshold: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// One configured mapping, immutable after creation. Edits are modeled
/// as remove-then-add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub kind: RuleKind,
    pub on_event: Chord,
    pub wait_ms: Option<u64>,
    pub after_wait: Chord,
    pub cooldown_ms: Option<u64>,
}

/// Candidate record as submitted by the configuration surface (and as
/// persisted to disk). Durations arrive signed so a negative value is
/// representable and rejected here, whatever the surface already checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub kind: RuleKind,
    pub on_event: Chord,
    #[serde(default)]
    pub wait_ms: Option<i64>,
    #[serde(default)]
    pub after_wait: Chord,
    #[serde(default)]
    pub cooldown_ms: Option<i64>,
}

impl RuleDraft {
    /// Draft with neither wait nor cooldown.
    pub fn simple(kind: RuleKind, on_event: Chord) -> Self {
        Self {
            kind,
            on_event,
            wait_ms: None,
            after_wait: Chord::empty(),
            cooldown_ms: None,
        }
    }
}

/// Why a candidate rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("shortcut is missing its terminal key")]
    IncompleteChord,
    #[error("wait time and cooldown must be non-negative")]
    NegativeDuration,
    #[error("invalid matching key: {0}")]
    InvalidDiscriminant(String),
    #[error("a rule with the same matching key already exists")]
    DuplicateDiscriminant,
    #[error("a {rule} rule does not belong in the {table} table")]
    KindMismatch { rule: EventKind, table: EventKind },
}

/// The ordered rule collection for one event type.
///
/// Threshold tables are kept sorted ascending by threshold at all times;
/// the resolver's scan depends on that order. Exact-match tables keep
/// insertion order, which is irrelevant to matching.
#[derive(Debug)]
pub struct RuleTable {
    kind: EventKind,
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            rules: Vec::new(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate and insert a candidate rule. On success the table is
    /// re-sorted if it is a threshold table; on rejection it is untouched.
    pub fn add(&mut self, draft: RuleDraft) -> Result<RuleId, RuleError> {
        let table_kind = self.kind;
        let rule_kind = draft.kind.event_kind();
        if rule_kind != table_kind {
            return Err(RuleError::KindMismatch {
                rule: rule_kind,
                table: table_kind,
            });
        }
        if !draft.on_event.is_complete() {
            return Err(RuleError::IncompleteChord);
        }
        if draft.wait_ms.is_some() && !draft.after_wait.is_complete() {
            return Err(RuleError::IncompleteChord);
        }
        if draft.wait_ms.is_some_and(|w| w < 0) || draft.cooldown_ms.is_some_and(|c| c < 0) {
            return Err(RuleError::NegativeDuration);
        }
        match &draft.kind {
            RuleKind::ChatCommand { command } => {
                if command.len() < 2 || !command.starts_with('!') {
                    return Err(RuleError::InvalidDiscriminant(format!(
                        "chat command {command:?} must be '!' followed by at least one character"
                    )));
                }
            }
            RuleKind::ChannelPoints { title } => {
                if title.is_empty() {
                    return Err(RuleError::InvalidDiscriminant(
                        "reward title is empty".to_string(),
                    ));
                }
            }
            _ => {}
        }
        if self
            .rules
            .iter()
            .any(|r| r.kind.same_discriminant(&draft.kind))
        {
            return Err(RuleError::DuplicateDiscriminant);
        }

        let rule = Rule {
            id: RuleId::fresh(),
            kind: draft.kind,
            on_event: draft.on_event,
            wait_ms: draft.wait_ms.map(|w| w as u64),
            after_wait: draft.after_wait,
            cooldown_ms: draft.cooldown_ms.map(|c| c as u64),
        };
        let id = rule.id;
        self.rules.push(rule);
        if self.kind.is_threshold() {
            // Stable sort; ties are impossible by the uniqueness check.
            self.rules
                .sort_by_key(|r| r.kind.threshold().unwrap_or(0));
        }
        Ok(id)
    }

    /// Remove by identity. A no-op if the id is not present.
    pub fn remove(&mut self, id: RuleId) {
        self.rules.retain(|r| r.id != id);
    }

    /// Snapshot of the table as draft records, for persistence.
    pub fn drafts(&self) -> Vec<RuleDraft> {
        self.rules
            .iter()
            .map(|r| RuleDraft {
                kind: r.kind.clone(),
                on_event: r.on_event,
                wait_ms: r.wait_ms.map(|w| w as i64),
                after_wait: r.after_wait,
                cooldown_ms: r.cooldown_ms.map(|c| c as i64),
            })
            .collect()
    }
}
