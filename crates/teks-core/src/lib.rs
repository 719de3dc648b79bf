pub mod capture;
pub mod events;
#[cfg(windows)]
pub mod injector;
pub mod resolver;
pub mod router;
pub mod rules;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod vk_map;

pub use events::{EventKind, EventParseError, StreamEvent};
pub use router::{EventRouter, Tables};
pub use rules::{Rule, RuleDraft, RuleError, RuleId, RuleKind, RuleTable};
pub use scheduler::{ActionScheduler, KeySink};
pub use types::{Chord, KeyCode, ModKey, Modifiers};
