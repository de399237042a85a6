//! Contract Test: Registry Concurrency
//!
//! Constraints verified:
//! - concurrent first lookups of the same type all receive one table
//! - transcoding from many threads over one registry is consistent
//! - the shared registry is a single instance

mod common;

use common::*;
use scalebridge_core::{BindingRegistry, TranscodeConfig, Transcoder};
use std::sync::{Arc, Barrier};

const THREADS: usize = 8;

#[test]
fn concurrent_population_yields_one_table() {
    let registry = Arc::new(BindingRegistry::new());
    let barrier = Barrier::new(THREADS);

    let tables: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry.domain::<Bucket>().expect("bucket bindings are valid")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread does not panic"))
            .collect()
    });

    let first = &tables[0];
    assert!(tables.iter().all(|table| Arc::ptr_eq(table, first)));
    assert!(Arc::ptr_eq(first, &registry.domain::<Bucket>().unwrap()));
}

#[test]
fn concurrent_model_population_yields_one_table() {
    let registry = Arc::new(BindingRegistry::new());
    let barrier = Barrier::new(THREADS);

    let tables: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry.model::<BucketModel>().expect("model bindings are valid")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread does not panic"))
            .collect()
    });

    assert!(tables.iter().all(|table| Arc::ptr_eq(table, &tables[0])));
    assert_eq!(registry.cached_tables().1, 3);
}

#[test]
fn concurrent_transcoding_is_consistent() {
    let transcoder =
        Transcoder::new(Arc::new(BindingRegistry::new()), TranscodeConfig::default()).unwrap();
    let bucket = sample_bucket();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..50 {
                    let model: BucketModel = transcoder.encode(&bucket).unwrap();
                    let back: Bucket = transcoder.decode(&model).unwrap();
                    assert_eq!(back, bucket);
                }
            });
        }
    });
}

#[test]
fn shared_registry_is_a_single_instance() {
    let a = BindingRegistry::shared();
    let b = BindingRegistry::shared();
    assert!(Arc::ptr_eq(&a, &b));
}
