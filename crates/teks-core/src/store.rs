//! Whole-table persistence. The configuration surface saves the complete
//! table set after every mutation and loads it once at startup; there is
//! no partial or incremental persistence.

use crate::events::EventKind;
use crate::router::Tables;
use crate::rules::RuleDraft;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// On-disk snapshot of every rule table.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TablesFile {
    follow: Vec<RuleDraft>,
    chat_commands: Vec<RuleDraft>,
    channel_points: Vec<RuleDraft>,
    bits: Vec<RuleDraft>,
    subscriptions: Vec<RuleDraft>,
    gift_subscriptions: Vec<RuleDraft>,
}

pub fn save<P: AsRef<Path>>(path: P, tables: &Tables) -> Result<()> {
    let path = path.as_ref();
    let file = TablesFile {
        follow: tables.table(EventKind::Follow).drafts(),
        chat_commands: tables.table(EventKind::ChatCommand).drafts(),
        channel_points: tables.table(EventKind::ChannelPoints).drafts(),
        bits: tables.table(EventKind::Bits).drafts(),
        subscriptions: tables.table(EventKind::Subscription).drafts(),
        gift_subscriptions: tables.table(EventKind::GiftSubscription).drafts(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Load a saved table set. A missing file yields empty tables. Every
/// record re-enters through `RuleTable::add`, so anything that no longer
/// validates is dropped rather than trusted.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Tables> {
    let path = path.as_ref();
    let mut tables = Tables::new();
    if !path.exists() {
        return Ok(tables);
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: TablesFile =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let groups = [
        file.follow,
        file.chat_commands,
        file.channel_points,
        file.bits,
        file.subscriptions,
        file.gift_subscriptions,
    ];
    for drafts in groups {
        for draft in drafts {
            if let Err(e) = tables.add(draft) {
                warn!("Dropping saved rule: {e}");
            }
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleKind;
    use crate::types::{Chord, KeyCode, Modifiers};

    fn chord(vk: u16) -> Chord {
        Chord::new(Modifiers::none(), KeyCode(vk))
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("teks_store_{name}")).join("tables.json")
    }

    #[test]
    fn missing_file_loads_as_empty_tables() {
        let tables = load(temp_path("missing")).unwrap();
        for kind in EventKind::ALL {
            assert!(tables.table(kind).is_empty());
        }
    }

    #[test]
    fn save_then_load_round_trips_all_tables() {
        let path = temp_path("roundtrip");

        let mut tables = Tables::new();
        tables
            .add(RuleDraft::simple(RuleKind::Follow, chord(0x46)))
            .unwrap();
        let mut bits = RuleDraft::simple(
            RuleKind::Bits {
                threshold: 500,
                always_fire: true,
            },
            chord(0x42),
        );
        bits.wait_ms = Some(250);
        bits.after_wait = chord(0x43);
        bits.cooldown_ms = Some(5000);
        tables.add(bits.clone()).unwrap();

        save(&path, &tables).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.table(EventKind::Follow).len(), 1);
        assert_eq!(loaded.table(EventKind::Bits).drafts(), vec![bits]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_saved_records_are_dropped_on_load() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        // A record with no terminal key fails boundary re-validation.
        std::fs::write(
            &path,
            r#"{
                "chat_commands": [
                    { "kind": { "type": "ChatCommand", "command": "!ok" },
                      "on_event": { "key": 72 } },
                    { "kind": { "type": "ChatCommand", "command": "!bad" },
                      "on_event": { "key": null } }
                ]
            }"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.table(EventKind::ChatCommand).len(), 1);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
