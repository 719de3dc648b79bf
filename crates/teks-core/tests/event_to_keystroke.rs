//! End-to-end checks: typed events in, chord presses out, with real
//! deferred-press timing through the scheduler worker.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use teks_core::{
    Chord, EventKind, EventRouter, KeyCode, KeySink, Modifiers, RuleDraft, RuleKind, StreamEvent,
    Tables,
};

/// Records every press with the moment it happened.
#[derive(Default)]
struct TimedSink {
    presses: Mutex<Vec<(Chord, Instant)>>,
}

impl TimedSink {
    fn presses(&self) -> Vec<(Chord, Instant)> {
        self.presses.lock().clone()
    }

    fn chords(&self) -> Vec<Chord> {
        self.presses().into_iter().map(|(c, _)| c).collect()
    }
}

impl KeySink for TimedSink {
    fn press(&self, chord: &Chord) -> anyhow::Result<()> {
        self.presses.lock().push((*chord, Instant::now()));
        Ok(())
    }
}

fn chord(vk: u16) -> Chord {
    Chord::new(Modifiers::none(), KeyCode(vk))
}

fn bits(amount: u32) -> StreamEvent {
    StreamEvent::Bits {
        user: "TEST".to_string(),
        amount,
    }
}

fn router(tables: Tables) -> (EventRouter, Arc<TimedSink>) {
    let sink = Arc::new(TimedSink::default());
    let router = EventRouter::new(Arc::new(RwLock::new(tables)), sink.clone());
    (router, sink)
}

#[test]
fn bits_tiers_fire_always_fire_and_boundary_rules() {
    // 100 plain -> A, 500 always-fire -> B, 1000 plain -> C.
    let mut tables = Tables::new();
    for (threshold, always_fire, vk) in [(100, false, 0x41), (500, true, 0x42), (1000, false, 0x43)]
    {
        tables
            .add(RuleDraft::simple(
                RuleKind::Bits {
                    threshold,
                    always_fire,
                },
                chord(vk),
            ))
            .unwrap();
    }
    let (router, sink) = router(tables);

    router.dispatch(&bits(50));
    assert!(sink.chords().is_empty());

    router.dispatch(&bits(750));
    assert_eq!(sink.chords(), vec![chord(0x42)]);

    router.dispatch(&bits(1200));
    assert_eq!(
        sink.chords(),
        vec![chord(0x42), chord(0x42), chord(0x43)]
    );
}

#[test]
fn deferred_press_comes_second_and_no_earlier_than_the_wait() {
    let mut tables = Tables::new();
    let mut draft = RuleDraft::simple(RuleKind::Follow, chord(0x41));
    draft.wait_ms = Some(40);
    draft.after_wait = chord(0x42);
    tables.add(draft).unwrap();
    let (router, sink) = router(tables);

    router.dispatch(&StreamEvent::Follow {
        user: "TEST".to_string(),
    });
    std::thread::sleep(Duration::from_millis(200));

    let presses = sink.presses();
    assert_eq!(presses.len(), 2);
    let (first, t_first) = presses[0];
    let (second, t_second) = presses[1];
    assert_eq!(first, chord(0x41));
    assert_eq!(second, chord(0x42));
    assert!(t_second.duration_since(t_first) >= Duration::from_millis(40));
}

#[test]
fn one_rules_wait_does_not_block_another() {
    // The slow rule is scheduled first; the fast one must still land first.
    let mut tables = Tables::new();
    let mut slow = RuleDraft::simple(
        RuleKind::Bits {
            threshold: 0,
            always_fire: true,
        },
        chord(0x41),
    );
    slow.wait_ms = Some(250);
    slow.after_wait = chord(0x4A);
    tables.add(slow).unwrap();

    let mut fast = RuleDraft::simple(
        RuleKind::Bits {
            threshold: 1,
            always_fire: true,
        },
        chord(0x42),
    );
    fast.wait_ms = Some(40);
    fast.after_wait = chord(0x4B);
    tables.add(fast).unwrap();

    let (router, sink) = router(tables);
    router.dispatch(&bits(10));

    std::thread::sleep(Duration::from_millis(140));
    let mid = sink.chords();
    assert!(mid.contains(&chord(0x4B)), "fast deferred press missing");
    assert!(!mid.contains(&chord(0x4A)), "slow deferred press fired early");

    std::thread::sleep(Duration::from_millis(200));
    assert!(sink.chords().contains(&chord(0x4A)));
}

#[test]
fn cooldown_swallows_a_repeat_event() {
    let mut tables = Tables::new();
    let mut draft = RuleDraft::simple(
        RuleKind::ChannelPoints {
            title: "Hydrate".to_string(),
        },
        chord(0x48),
    );
    draft.cooldown_ms = Some(10_000);
    tables.add(draft).unwrap();
    let (router, sink) = router(tables);

    let event = StreamEvent::ChannelPoints {
        user: "TEST".to_string(),
        title: "Hydrate".to_string(),
    };
    router.dispatch(&event);
    router.dispatch(&event);
    assert_eq!(sink.chords(), vec![chord(0x48)]);
}

#[test]
fn synthetic_injection_covers_every_kind() {
    let mut tables = Tables::new();
    tables
        .add(RuleDraft::simple(RuleKind::Follow, chord(0x41)))
        .unwrap();
    tables
        .add(RuleDraft::simple(
            RuleKind::ChatCommand {
                command: "!so".to_string(),
            },
            chord(0x42),
        ))
        .unwrap();
    tables
        .add(RuleDraft::simple(
            RuleKind::Subscription {
                threshold: 2,
                always_fire: false,
            },
            chord(0x43),
        ))
        .unwrap();
    let (router, sink) = router(tables);

    router.dispatch_synthetic(EventKind::Follow, "TEST", "");
    router.dispatch_synthetic(EventKind::ChatCommand, "TEST", "!so");
    router.dispatch_synthetic(EventKind::Subscription, "TEST", "12");
    router.dispatch_synthetic(EventKind::Subscription, "TEST", "soon"); // dropped

    assert_eq!(sink.chords(), vec![chord(0x41), chord(0x42), chord(0x43)]);
}
