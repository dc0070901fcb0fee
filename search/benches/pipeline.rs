use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use paillier::KeyGenerator;
use rand::Rng;
use sampling::source::Source;
use search::{
    BinaryVector, Corpus, EncryptedQuery, FeatureEncoder, KmerBloomEncoder, PipelineConfig, Querier,
    ScoringPipeline, Scorer,
};

struct Params {
    bits: u32,
    entries: usize,
}

fn random_sequence(len: usize, source: &mut Source) -> String {
    (0..len).map(|_| b"ACGT"[source.random_range(0..4)] as char).collect()
}

fn random_corpus(encoder: &KmerBloomEncoder, entries: usize, source: &mut Source) -> Corpus<usize> {
    let sequences: Vec<String> = (0..entries).map(|_| random_sequence(120, source)).collect();
    Corpus::encode(
        encoder,
        sequences.iter().enumerate().map(|(i, s)| (i as u64, s.as_str(), i)),
    )
    .unwrap()
}

fn bench_scatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_scoring");

    fn runner(p: &Params) -> impl FnMut() + use<> {
        let mut source: Source = Source::new([0u8; 32]);
        let encoder: KmerBloomEncoder = KmerBloomEncoder::default();
        let corpus: Corpus<usize> = random_corpus(&encoder, p.entries, &mut source);
        let mut querier: Querier = Querier::generate(&KeyGenerator::new(p.bits), source.branch()).unwrap();
        let query: BinaryVector = encoder.encode(&random_sequence(120, &mut source));
        let encrypted: EncryptedQuery = querier.encrypt_query(&query).unwrap();
        move || {
            let scorer: Scorer<usize> = Scorer::new(&corpus);
            black_box(scorer.score(black_box(&encrypted), &mut source).unwrap());
        }
    }

    let params_set: Vec<Params> = vec![
        Params { bits: 1024, entries: 64 },
        Params { bits: 2048, entries: 64 },
    ];

    for params in params_set {
        let id = BenchmarkId::new("SCORE", format!("{}x{}", params.bits, params.entries));
        let mut runner = runner(&params);
        group.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    fn runner(p: &Params, response_packing: bool) -> impl FnMut() + use<> {
        let mut source: Source = Source::new([0u8; 32]);
        let encoder: KmerBloomEncoder = KmerBloomEncoder::default();
        let corpus: &'static Corpus<usize> = Box::leak(Box::new(random_corpus(&encoder, p.entries, &mut source)));
        let querier: Querier = Querier::generate(&KeyGenerator::new(p.bits), source.branch()).unwrap();
        let config: PipelineConfig = PipelineConfig {
            response_packing,
            ..Default::default()
        };
        let mut pipeline = ScoringPipeline::new(config, corpus, encoder, querier, source.branch()).unwrap();
        let query: String = random_sequence(120, &mut source);
        move || {
            black_box(pipeline.search(black_box(&query)).unwrap());
        }
    }

    let params_set: Vec<Params> = vec![Params { bits: 1024, entries: 64 }];

    for params in params_set {
        for response_packing in [false, true] {
            let id = BenchmarkId::new(
                if response_packing { "SEARCH_PACKED" } else { "SEARCH" },
                format!("{}x{}", params.bits, params.entries),
            );
            let mut runner = runner(&params, response_packing);
            group.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
        }
    }

    group.finish();
}

criterion_group!(benches, bench_scatter, bench_search);
criterion_main!(benches);
