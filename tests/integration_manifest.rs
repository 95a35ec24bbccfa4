//! Integration tests for the manifest and reverse-shortcut layouts.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::Value;
use takeout_consolidator::core::{AlbumBehavior, MediaIngestor, MediaMover, MovingContext};

fn build_takeout(root: &TempDir) {
    root.child("takeout/Photos from 2023/vacation.jpg")
        .write_binary(b"vacation-bytes")
        .unwrap();
    root.child("takeout/Albums/Vacation/vacation.jpg")
        .write_binary(b"vacation-bytes")
        .unwrap();
    root.child("takeout/Albums/Family/vacation.jpg")
        .write_binary(b"vacation-bytes")
        .unwrap();
    root.child("takeout/Photos from 2023/loose.jpg")
        .write_binary(b"loose-bytes")
        .unwrap();
}

fn run(root: &TempDir, behavior: AlbumBehavior) {
    let report = MediaIngestor::default()
        .ingest(root.child("takeout").path())
        .unwrap();
    let mut collection = report.entities;
    collection.find_albums();
    collection.remove_duplicates();

    let mover = MediaMover::new(
        MovingContext::new(root.child("out").path()).album_behavior(behavior),
    );
    let report = mover.run(&mut collection).unwrap();
    assert_eq!(report.summary.failed_operations, 0);
}

#[test]
fn json_strategy_writes_a_manifest_and_no_album_folders() {
    let root = TempDir::new().unwrap();
    build_takeout(&root);

    run(&root, AlbumBehavior::Json);

    let out = root.child("out");
    out.child("albums-info.json").assert(predicate::path::exists());
    out.child("Vacation").assert(predicate::path::missing());
    out.child("Family").assert(predicate::path::missing());

    let manifest: Value = serde_json::from_slice(
        &std::fs::read(out.child("albums-info.json").path()).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["metadata"]["total_albums"], 2);
    assert_eq!(
        manifest["albums"]["Vacation"][0],
        "ALL_PHOTOS/date-unknown/vacation.jpg"
    );
    assert_eq!(manifest["albums"]["Vacation"], manifest["albums"]["Family"]);
}

#[cfg(unix)]
#[test]
fn reverse_shortcut_puts_the_real_file_in_the_album() {
    let root = TempDir::new().unwrap();
    build_takeout(&root);

    run(&root, AlbumBehavior::ReverseShortcut);

    let out = root.child("out");
    // "Family" sorts before "Vacation" and owns the physical file
    let anchor = out.child("Family/vacation.jpg");
    anchor.assert(predicate::path::is_file());
    assert!(!std::fs::symlink_metadata(anchor.path())
        .unwrap()
        .is_symlink());

    // ALL_PHOTOS carries the link back
    let link = out.child("ALL_PHOTOS/date-unknown/vacation.jpg");
    assert!(std::fs::symlink_metadata(link.path()).unwrap().is_symlink());
    assert_eq!(
        std::fs::read_link(link.path()).unwrap(),
        anchor.path().to_path_buf()
    );

    // The entity without albums still lands normally
    out.child("ALL_PHOTOS/date-unknown/loose.jpg")
        .assert(predicate::path::is_file());
}
