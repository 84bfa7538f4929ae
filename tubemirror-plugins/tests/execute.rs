//! Plugin runs against real feeds and a shell script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use tubemirror_core::{PlaylistItem, Record, Status};
use tubemirror_plugins::{PluginConfig, PluginError, PluginRunner, PluginSpec};
use tubemirror_sync::FeedStore;

fn record(video_id: &str, title: &str, timestamp: i64) -> Record {
    Record::new(
        PlaylistItem {
            video_id: video_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            published: String::new(),
        },
        timestamp,
        0,
    )
}

fn config(command: &str) -> PluginConfig {
    PluginConfig {
        plugins: vec![PluginSpec {
            script: "*".to_string(),
            condition: "executable".to_string(),
            save_as: "${safename}".to_string(),
            defaults: true,
            command: command.to_string(),
        }],
    }
}

/// A plugin that logs each url it sees, fails for ids containing `fail`,
/// leaves nothing for ids containing `none` and writes `video.mp4` otherwise.
fn install_script(plugins: &Path, log: &Path) {
    fs::create_dir_all(plugins).unwrap();
    let script = plugins.join("fetch.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$1\" >> '{}'\ncase \"$1\" in\n  *fail*) exit 3 ;;\n  *none*) exit 0 ;;\nesac\necho data > video.mp4\n",
            log.display()
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
}

fn runner(temp: &TempDir) -> PluginRunner {
    let plugins = temp.path().join("plugins");
    install_script(&plugins, &temp.path().join("calls.log"));
    PluginRunner::new(config("${script} '${url}'"), &plugins).unwrap()
}

fn calls(temp: &TempDir) -> Vec<String> {
    fs::read_to_string(temp.path().join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn statuses_follow_script_outcome() {
    let temp = TempDir::new().unwrap();
    let store = FeedStore::new(temp.path().join("out"));
    store
        .persist(
            "music",
            &[
                record("vok", "Good One", 3),
                record("vfail", "Bad One", 2),
                record("vnone", "Empty One", 1),
            ],
        )
        .unwrap();

    let summary = runner(&temp).execute(&store).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.errors.is_empty());

    let feed = store.load("music").unwrap();
    assert_eq!(feed[0].status(), Some(Status::Success));
    assert_eq!(feed[1].status(), Some(Status::Failed));
    assert_eq!(feed[2].status(), None);

    temp.child("out/files/good-one-vok.mp4")
        .assert(predicate::path::is_file())
        .assert("data\n");
    temp.child("out/files/bad-one-vfail.mp4")
        .assert(predicate::path::missing());
    temp.child("out/data/music/feed.json")
        .assert(predicate::str::contains(r#""status": "success""#))
        .assert(predicate::str::contains(r#""status": "failed""#));
}

#[test]
fn records_with_status_are_not_rerun() {
    let temp = TempDir::new().unwrap();
    let store = FeedStore::new(temp.path().join("out"));
    store
        .persist(
            "music",
            &[
                record("vnew", "New", 2),
                record("vold", "Old", 1).with_status(Status::Failed),
            ],
        )
        .unwrap();
    let runner = runner(&temp);

    runner.execute(&store).unwrap();
    assert_eq!(calls(&temp), vec!["http://youtube.com/watch?v=vnew"]);

    // Everything now has an outcome; a second pass runs nothing.
    let summary = runner.execute(&store).unwrap();
    assert_eq!(summary.processed(), 0);
    assert_eq!(calls(&temp).len(), 1);
}

#[test]
fn broken_feed_does_not_block_other_playlists() {
    let temp = TempDir::new().unwrap();
    let store = FeedStore::new(temp.path().join("out"));
    store.persist("good", &[record("v1", "One", 1)]).unwrap();
    temp.child("out/data/broken").create_dir_all().unwrap();
    temp.child("out/data/broken/feed.json")
        .write_str("[{ not json")
        .unwrap();

    let summary = runner(&temp).execute(&store).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].0, "broken");
    assert!(matches!(summary.errors[0].1, PluginError::Store(_)));
    assert_eq!(store.load("good").unwrap()[0].status(), Some(Status::Success));
}

#[test]
fn unsupported_entries_never_run() {
    let temp = TempDir::new().unwrap();
    let store = FeedStore::new(temp.path().join("out"));
    store.persist("music", &[record("v1", "One", 1)]).unwrap();
    let plugins = temp.path().join("plugins");
    install_script(&plugins, &temp.path().join("calls.log"));

    let mut config = config("${script} '${url}'");
    config.plugins[0].defaults = false;
    let runner = PluginRunner::new(config, &plugins).unwrap();
    assert!(!runner.is_active());

    let summary = runner.execute(&store).unwrap();
    assert_eq!(summary.processed(), 0);
    assert!(calls(&temp).is_empty());
    assert!(store.load("music").unwrap()[0].is_pending());
}
