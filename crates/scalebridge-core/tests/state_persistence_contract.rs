//! Contract Test: State Persistence
//!
//! Constraints verified:
//! - a model captured into a store restores to an equal model
//! - the file store survives a reopen
//! - records holding Unknown values are rejected
//! - records holding NaN or infinite floats are rejected and leave the
//!   stored document intact
//! - the configured store type is honored

mod common;

use common::*;
use scalebridge_core::{Attributes, StateRecord, StateStore, StateStoreConfig, Tri, Value};
use tempfile::tempdir;

#[tokio::test]
async fn captured_model_survives_file_store_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let config = StateStoreConfig::File {
        path: path.to_string_lossy().into_owned(),
    };

    let transcoder = transcoder();
    let model: BucketModel = transcoder.encode(&sample_bucket()).unwrap();
    let record = StateRecord::capture(&model, transcoder.registry()).unwrap();

    {
        let store = config.open().await.unwrap();
        store.put("bucket.logs", &record).await.unwrap();
        store.flush().await.unwrap();
    }

    let store = config.open().await.unwrap();
    let loaded = store.get("bucket.logs").await.unwrap().expect("record exists");
    let restored: BucketModel = loaded.restore(transcoder.registry()).unwrap();
    assert_eq!(restored, model);

    let bucket: Bucket = transcoder.decode(&restored).unwrap();
    assert_eq!(bucket, sample_bucket());
}

#[tokio::test]
async fn unknown_values_are_not_persisted() {
    let store = StateStoreConfig::Memory.open().await.unwrap();
    let transcoder = transcoder();

    let mut model: BucketModel = transcoder.encode(&sample_bucket()).unwrap();
    model.size_bytes = Tri::Unknown;
    let record = StateRecord::capture(&model, transcoder.registry()).unwrap();

    assert!(store.put("bucket.logs", &record).await.is_err());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_path_is_rejected() {
    let config = StateStoreConfig::File {
        path: String::new(),
    };
    assert!(config.open().await.is_err());
}

fn float_record(value: f64) -> StateRecord {
    let mut attributes = Attributes::new();
    attributes.insert("limit_gb".to_string(), Value::Float(value));
    StateRecord::new("QuotaModel", attributes)
}

#[tokio::test]
async fn non_finite_floats_are_not_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let config = StateStoreConfig::File {
        path: path.to_string_lossy().into_owned(),
    };

    {
        let store = config.open().await.unwrap();
        store.put("quota.keep", &float_record(1.5)).await.unwrap();

        assert!(store.put("quota.nan", &float_record(f64::NAN)).await.is_err());
        assert!(store.put("quota.inf", &float_record(f64::INFINITY)).await.is_err());
        assert_eq!(store.list().await.unwrap(), vec!["quota.keep"]);
        store.flush().await.unwrap();
    }

    let reopened = config.open().await.unwrap();
    assert_eq!(reopened.list().await.unwrap(), vec!["quota.keep"]);
    let kept = reopened.get("quota.keep").await.unwrap().expect("record exists");
    assert_eq!(kept.attribute("limit_gb"), Some(&Value::Float(1.5)));
}

#[tokio::test]
async fn first_write_of_non_finite_float_leaves_no_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let config = StateStoreConfig::File {
        path: path.to_string_lossy().into_owned(),
    };

    let store = config.open().await.unwrap();
    assert!(store.put("quota.inf", &float_record(f64::NEG_INFINITY)).await.is_err());
    assert!(!path.exists());
}
