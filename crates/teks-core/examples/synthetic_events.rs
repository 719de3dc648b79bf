//! Feeds a scripted batch of synthetic events through the router with a
//! sink that logs instead of pressing. Run with
//! `cargo run --example synthetic_events`.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use teks_core::{
    Chord, EventKind, EventRouter, KeyCode, KeySink, Modifiers, RuleDraft, RuleKind, StreamEvent,
    Tables,
};

struct LoggingSink;

impl KeySink for LoggingSink {
    fn press(&self, chord: &Chord) -> anyhow::Result<()> {
        println!(">>> press {}", chord.display());
        Ok(())
    }
}

fn chord(vk: u16) -> Chord {
    Chord::new(Modifiers::none(), KeyCode(vk))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut tables = Tables::new();
    tables.add(RuleDraft::simple(RuleKind::Follow, chord(0x46)))?; // F

    tables.add(RuleDraft::simple(
        RuleKind::ChatCommand {
            command: "!hello".to_string(),
        },
        chord(0x48), // H
    ))?;

    for (threshold, always_fire, vk) in [(100, false, 0x41), (500, true, 0x42), (1000, false, 0x43)]
    {
        tables.add(RuleDraft::simple(
            RuleKind::Bits {
                threshold,
                always_fire,
            },
            chord(vk),
        ))?;
    }

    // A delayed second stage: start a replay, stop it half a second later.
    let mut replay = RuleDraft::simple(
        RuleKind::ChannelPoints {
            title: "Replay".to_string(),
        },
        chord(0x52), // R
    );
    replay.wait_ms = Some(500);
    replay.after_wait = chord(0x53); // S
    tables.add(replay)?;

    let router = EventRouter::new(Arc::new(RwLock::new(tables)), Arc::new(LoggingSink));

    let (tx, rx) = crossbeam_channel::unbounded::<StreamEvent>();
    let producer = std::thread::spawn(move || {
        let send = |event| tx.send(event).expect("router stopped early");
        send(StreamEvent::Follow {
            user: "viewer_1".to_string(),
        });
        send(StreamEvent::Chat {
            user: "viewer_2".to_string(),
            message: "!hello".to_string(),
        });
        send(StreamEvent::Chat {
            user: "viewer_2".to_string(),
            message: "just chatting".to_string(),
        });
        send(StreamEvent::Bits {
            user: "viewer_3".to_string(),
            amount: 750,
        });
        send(StreamEvent::Bits {
            user: "viewer_3".to_string(),
            amount: 1200,
        });
        send(StreamEvent::ChannelPoints {
            user: "viewer_4".to_string(),
            title: "Replay".to_string(),
        });
    });

    router.run(rx);
    producer.join().expect("producer panicked");

    // Manual injection path, including a malformed value that is dropped.
    router.dispatch_synthetic(EventKind::GiftSubscription, "TEST", "5");
    router.dispatch_synthetic(EventKind::Bits, "TEST", "lots");

    // Let the deferred replay-stop press land before exiting.
    std::thread::sleep(Duration::from_millis(700));
    Ok(())
}
