use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use salt_core::scheme::SchemeRegistry;
use salt_core::translit::Transliterator;

static INPUTS: &[(&str, &str)] = &[
    ("short", "rāma"),
    ("medium", "dharmakṣetre kurukṣetre samavetā yuyutsavaḥ"),
    (
        "long",
        "māmakāḥ pāṇḍavāś caiva kim akurvata sañjaya dṛṣṭvā tu pāṇḍavānīkaṃ vyūḍhaṃ duryodhanas tadā",
    ),
];

fn bench_roman_to_brahmic(c: &mut Criterion) {
    let registry = SchemeRegistry::builtin();
    let translit = Transliterator::new(&registry);
    let mut group = c.benchmark_group("translit/iast-deva");
    for &(label, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| translit.transliterate(text, "iast", "deva"));
        });
    }
    group.finish();
}

fn bench_brahmic_to_roman(c: &mut Criterion) {
    let registry = SchemeRegistry::builtin();
    let translit = Transliterator::new(&registry);
    let mut group = c.benchmark_group("translit/deva-slp1");
    for &(label, text) in INPUTS {
        let Ok(deva) = translit.transliterate(text, "iast", "deva") else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new(label, deva.len()), &deva, |b, deva| {
            b.iter(|| translit.transliterate(deva, "deva", "slp1"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_roman_to_brahmic, bench_brahmic_to_roman);
criterion_main!(benches);
