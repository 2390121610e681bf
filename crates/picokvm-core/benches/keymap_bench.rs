//! Criterion benchmarks for the per-keystroke hot path.
//!
//! Every key event seen by the low-level hook runs through shadow-state
//! update, policy decision and (when intercepted) codec translation before
//! the hook returns, so all three must stay in table-lookup territory.
//!
//! Run with:
//! ```bash
//! cargo bench --package picokvm-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use picokvm_core::{
    InterceptionPolicy, KeyAction, KeyEventCodec, ModifierSet, ModifierShadowState, PhysicalKey,
};

/// A slice of Windows VK codes that cover the most common keys.
const BENCH_VK_CODES: &[u8] = &[
    0x41, // 'A'
    0x5A, // 'Z'
    0x0D, // VK_RETURN
    0x1B, // VK_ESCAPE
    0x09, // VK_TAB
    0x20, // VK_SPACE
    0x70, // VK_F1
    0x7B, // VK_F12
    0xA0, // VK_LSHIFT
    0xA4, // VK_LMENU
    0x5B, // VK_LWIN
    0x25, // VK_LEFT
    0x31, // '1'
    0xBA, // VK_OEM_1
    0x60, // VK_NUMPAD0 (unmapped)
];

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_translate");
    for &vk in BENCH_VK_CODES {
        group.bench_with_input(BenchmarkId::from_parameter(format!("0x{vk:02X}")), &vk, |b, &vk| {
            b.iter(|| KeyEventCodec::translate(black_box(PhysicalKey::new(vk))))
        });
    }
    group.finish();
}

fn bench_translate_all(c: &mut Criterion) {
    c.bench_function("codec_translate_all_256", |b| {
        b.iter(|| {
            for vk in 0..=u8::MAX {
                black_box(KeyEventCodec::translate(PhysicalKey::new(vk)));
            }
        })
    });
}

fn bench_decide(c: &mut Criterion) {
    let policy = InterceptionPolicy::default();
    let meta_down = ModifierSet { meta: true, ..ModifierSet::default() };
    c.bench_function("policy_decide_meta_chord", |b| {
        b.iter(|| {
            policy.decide(
                black_box(PhysicalKey::new(0x45)),
                KeyAction::Pressed,
                black_box(meta_down),
            )
        })
    });
}

fn bench_full_hot_path(c: &mut Criterion) {
    let policy = InterceptionPolicy::default();
    c.bench_function("observe_decide_translate_sequence", |b| {
        b.iter(|| {
            let mut shadow = ModifierShadowState::new();
            for &vk in BENCH_VK_CODES {
                let key = PhysicalKey::new(vk);
                shadow.observe(key, KeyAction::Pressed);
                black_box(policy.decide(key, KeyAction::Pressed, shadow.current()));
                black_box(KeyEventCodec::translate(key));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_translate,
    bench_translate_all,
    bench_decide,
    bench_full_hot_path
);
criterion_main!(benches);
