use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teks_core::{resolver, Chord, EventKind, KeyCode, Modifiers, RuleDraft, RuleKind, RuleTable, StreamEvent};

fn chord(vk: u16) -> Chord {
    Chord::new(Modifiers::none(), KeyCode(vk))
}

fn make_bits_table(tiers: u32) -> RuleTable {
    let mut table = RuleTable::new(EventKind::Bits);
    for i in 0..tiers {
        table
            .add(RuleDraft::simple(
                RuleKind::Bits {
                    threshold: (i + 1) * 100,
                    always_fire: i % 3 == 0,
                },
                chord(0x41),
            ))
            .expect("bench table rule");
    }
    table
}

fn bits(amount: u32) -> StreamEvent {
    StreamEvent::Bits {
        user: "BENCH".to_string(),
        amount,
    }
}

fn bench_threshold_mid_table(c: &mut Criterion) {
    let table = make_bits_table(32);
    let event = bits(1650);
    c.bench_function("resolver/threshold_mid_table", |b| {
        b.iter(|| black_box(resolver::resolve(&table, &event)));
    });
}

fn bench_threshold_full_scan(c: &mut Criterion) {
    let table = make_bits_table(32);
    let event = bits(1_000_000);
    c.bench_function("resolver/threshold_full_scan", |b| {
        b.iter(|| black_box(resolver::resolve(&table, &event)));
    });
}

fn bench_threshold_below_all(c: &mut Criterion) {
    let table = make_bits_table(32);
    let event = bits(1);
    c.bench_function("resolver/threshold_below_all", |b| {
        b.iter(|| black_box(resolver::resolve(&table, &event)));
    });
}

fn bench_chat_exact_match(c: &mut Criterion) {
    let mut table = RuleTable::new(EventKind::ChatCommand);
    for i in 0..64 {
        table
            .add(RuleDraft::simple(
                RuleKind::ChatCommand {
                    command: format!("!cmd{i}"),
                },
                chord(0x41),
            ))
            .expect("bench table rule");
    }
    let event = StreamEvent::Chat {
        user: "BENCH".to_string(),
        message: "!cmd63".to_string(),
    };
    c.bench_function("resolver/chat_exact_match", |b| {
        b.iter(|| black_box(resolver::resolve(&table, &event)));
    });
}

criterion_group!(
    benches,
    bench_threshold_mid_table,
    bench_threshold_full_scan,
    bench_threshold_below_all,
    bench_chat_exact_match
);
criterion_main!(benches);
