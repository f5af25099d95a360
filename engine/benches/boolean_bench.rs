use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::boolean::evaluate;
use engine::{DocId, InvertedIndex, LemmaTable};
use std::collections::BTreeMap;

fn synthetic_index(num_docs: DocId, vocab: usize, tokens_per_doc: usize) -> InvertedIndex {
    let docs: BTreeMap<DocId, Vec<String>> = (0..num_docs)
        .map(|id| {
            let tokens = (0..tokens_per_doc)
                .map(|k| format!("term{}", (id as usize * 31 + k * 7) % vocab))
                .collect();
            (id, tokens)
        })
        .collect();
    InvertedIndex::from_token_lists(&docs)
}

fn bench_boolean(c: &mut Criterion) {
    let index = synthetic_index(2_000, 500, 60);
    let lemmas = LemmaTable::new();

    c.bench_function("boolean/single_term", |b| {
        b.iter(|| evaluate(black_box("term42"), &index, &lemmas).unwrap())
    });
    c.bench_function("boolean/and_or_not", |b| {
        b.iter(|| {
            evaluate(
                black_box("(term1 AND term2) OR NOT term3"),
                &index,
                &lemmas,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_boolean);
criterion_main!(benches);
