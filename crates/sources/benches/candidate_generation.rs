//! Benchmarks for candidate generation
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic, sparse ratings set (~2% density) so the bench does not
//! need a database.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Rating, RatingSet};
use sources::UnratedPairSource;
use std::sync::Arc;

fn synthetic_ratings(users: i64, songs: i64) -> Arc<RatingSet> {
    let ratings = (0..users).flat_map(|user_id| {
        (0..songs)
            .filter(move |song_id| (user_id * 31 + song_id * 17) % 50 == 0)
            .map(move |song_id| Rating {
                user_id,
                song_id,
                rating: ((user_id + song_id) % 7 + 1) as f64,
            })
    });
    Arc::new(RatingSet::from_ratings(ratings))
}

fn bench_candidates_for_chunk(c: &mut Criterion) {
    let source = UnratedPairSource::new(synthetic_ratings(2_000, 2_000));
    let chunk = source.user_chunks(1_000).remove(0);

    c.bench_function("candidates_for_users_1000", |b| {
        b.iter(|| {
            let candidates = source.candidates_for_users(black_box(&chunk));
            black_box(candidates)
        })
    });
}

fn bench_candidates_for_user(c: &mut Criterion) {
    let source = UnratedPairSource::new(synthetic_ratings(2_000, 2_000));

    c.bench_function("candidates_for_user", |b| {
        b.iter(|| {
            let candidates = source.candidates_for_user(black_box(1));
            black_box(candidates)
        })
    });
}

fn bench_build_rating_set(c: &mut Criterion) {
    c.bench_function("build_rating_set", |b| {
        b.iter(|| {
            let set = synthetic_ratings(black_box(1_000), black_box(1_000));
            black_box(set)
        })
    });
}

criterion_group!(
    benches,
    bench_candidates_for_chunk,
    bench_candidates_for_user,
    bench_build_rating_set
);
criterion_main!(benches);
