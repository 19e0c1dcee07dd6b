mod common;
use crate::common::{init_tracing, ConfigFileBuilder, FakeBackend};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use webapp_rebuild::detect::snapshot::decode_snapshot;
use webapp_rebuild::engine::{Detector, RunOptions, RunOutcome};
use webapp_rebuild::errors::RebuildError;
use webapp_rebuild::fs::mock::MockFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

fn detector(fs: &MockFileSystem) -> Detector {
    let cfg = ConfigFileBuilder::new()
        .with_root("webapp/src")
        .with_root("webapp/public")
        .with_file("webapp/yarn.lock")
        .with_state_path("webapp_dist/.hashes")
        .build();
    Detector::from_config(Arc::new(fs.clone()), &cfg, Path::new("."), RunOptions::default())
        .expect("build detector")
}

#[tokio::test]
async fn full_flow_against_in_memory_tree() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("./webapp/src/main.ts", "createApp()");
    fs.add_file("./webapp/public/favicon.ico", vec![0u8, 1, 2]);
    fs.add_file("./webapp/yarn.lock", "# lock");
    let detector = detector(&fs);
    let mut backend = FakeBackend::new();

    assert!(detector.run_once(&mut backend).await?.built());
    let stored = fs
        .contents("./webapp_dist/.hashes")
        .expect("snapshot written");
    let snapshot = decode_snapshot(&stored)?;
    assert_eq!(
        snapshot.paths().collect::<Vec<_>>(),
        vec![
            "webapp/public/favicon.ico",
            "webapp/src/main.ts",
            "webapp/yarn.lock",
        ]
    );

    assert_eq!(detector.run_once(&mut backend).await?, RunOutcome::UpToDate);

    fs.add_file("./webapp/yarn.lock", "# lock v2");
    assert!(detector.run_once(&mut backend).await?.built());

    Ok(())
}

#[tokio::test]
async fn unreadable_source_aborts_without_building() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("./webapp/src/main.ts", "createApp()");
    fs.add_unreadable_file("./webapp/src/secret.ts");
    fs.add_file("./webapp/yarn.lock", "# lock");
    let detector = detector(&fs);
    let mut backend = FakeBackend::new();

    assert!(matches!(
        detector.run_once(&mut backend).await,
        Err(RebuildError::FileAccess { .. })
    ));
    assert!(backend.executed().is_empty());
    assert!(fs.contents("./webapp_dist/.hashes").is_none());

    Ok(())
}

#[tokio::test]
async fn empty_watched_set_builds_once_without_snapshot() -> TestResult {
    init_tracing();

    // Roots are configured but none exist yet: nothing to hash.
    let fs = MockFileSystem::new();
    let cfg = ConfigFileBuilder::new()
        .with_root("webapp/src")
        .with_state_path("webapp_dist/.hashes")
        .build();
    let detector =
        Detector::from_config(Arc::new(fs.clone()), &cfg, Path::new("."), RunOptions::default())?;
    let mut backend = FakeBackend::new();

    assert!(detector.current_digests()?.is_empty());
    assert!(detector.previous_digests().is_none());

    assert!(detector.run_once(&mut backend).await?.built());
    assert_eq!(backend.executed().len(), 2);
    let stored = fs
        .contents("./webapp_dist/.hashes")
        .expect("snapshot written");
    assert!(decode_snapshot(&stored)?.is_empty());

    backend.clear();
    assert_eq!(detector.run_once(&mut backend).await?, RunOutcome::UpToDate);
    assert!(backend.executed().is_empty());

    Ok(())
}
