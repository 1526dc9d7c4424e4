use std::fs;
use std::path::Path;

use tempfile::tempdir;

use dir_mimic_core::plan::Operation;
use dir_mimic_core::record::IdentityLevel;
use dir_mimic_core::{executor, inventory, scanner};
use dir_mimic_core::{MirrorEngine, MirrorOptions, MirrorSummary, SilentReporter};

fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Scan `source`, write its inventory, and return the inventory path.
fn inventory_of(source: &Path, dir: &Path, level: IdentityLevel) -> std::path::PathBuf {
    let records = scanner::scan_directory(source, level, &[], &SilentReporter).unwrap();
    let path = dir.join("inventory.jsonl");
    inventory::write(&path, &records, level).unwrap();
    path
}

fn options(inventory_path: &Path, target: &Path) -> MirrorOptions {
    MirrorOptions {
        inventory_path: inventory_path.to_path_buf(),
        target_dir: target.to_path_buf(),
        level: None,
        delete_extra: true,
        echo_unchanged: false,
        ignore_patterns: vec![],
    }
}

fn relative_paths(root: &Path, level: IdentityLevel) -> Vec<String> {
    let mut paths: Vec<String> = scanner::scan_directory(root, level, &[], &SilentReporter)
        .unwrap()
        .iter()
        .map(|record| record.relative_path())
        .collect();
    paths.sort();
    paths
}

/// The spec's end-to-end scenario: the inventory wants `a.txt` at the root,
/// the target holds it under `old/`. One move, nothing else.
#[test]
fn relocated_file_is_moved_back() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "a.txt", b"abc");
    write_file(&target, "old/a.txt", b"abc");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::NameSize);

    let engine = MirrorEngine::new(options(&inventory_path, &target));
    let outcome = engine.plan(&SilentReporter).unwrap();

    assert_eq!(outcome.level, IdentityLevel::NameSize);
    assert_eq!(
        outcome.summary,
        MirrorSummary {
            unchanged: 0,
            to_copy: 1,
            missing: 0,
            extra: 0,
            moves: 1,
            copies: 0,
            deletes: 0,
        }
    );
    assert_eq!(
        outcome.plan.operations,
        vec![Operation::Move {
            from: "old/a.txt".into(),
            to: "a.txt".into()
        }]
    );
    assert_eq!(outcome.plan.render(), vec!["mv old/a.txt a.txt"]);

    let applied = executor::apply(&outcome.plan, &target, &SilentReporter);
    assert!(applied.all_succeeded());
    assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"abc");
    assert!(!target.join("old/a.txt").exists());
}

/// A reorganized tree at level 2: one file moved to the root, one moved into
/// a different folder, one untouched, one extra, one missing entirely.
#[test]
fn reorganized_tree_is_restored() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");

    let jpg = vec![0xABu8; 1024];
    write_file(&source, "docs/report.txt", b"quarterly numbers");
    write_file(&source, "pics/a.jpg", &jpg);
    write_file(&source, "pics/b.jpg", &jpg);
    write_file(&source, "notes.md", b"todo");

    write_file(&target, "report.txt", b"quarterly numbers");
    write_file(&target, "pics/a.jpg", &jpg);
    write_file(&target, "archive/b.jpg", &jpg);
    write_file(&target, "junk/extra.bin", b"leftover");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::SampleHash);

    let engine = MirrorEngine::new(options(&inventory_path, &target));
    let outcome = engine.plan(&SilentReporter).unwrap();

    assert_eq!(outcome.level, IdentityLevel::SampleHash);
    assert_eq!(outcome.summary.unchanged, 1);
    assert_eq!(outcome.summary.moves, 2);
    assert_eq!(outcome.summary.copies, 0);
    assert_eq!(outcome.summary.missing, 1, "notes.md has no source anywhere");
    assert_eq!(outcome.summary.deletes, 1);

    let applied = executor::apply(&outcome.plan, &target, &SilentReporter);
    assert!(applied.all_succeeded());

    // Everything the inventory demands except the unsatisfiable notes.md.
    assert_eq!(
        relative_paths(&target, IdentityLevel::SampleHash),
        vec!["docs/report.txt", "pics/a.jpg", "pics/b.jpg"]
    );
    assert_eq!(
        fs::read(target.join("docs/report.txt")).unwrap(),
        b"quarterly numbers"
    );
}

/// Without --delete-extra the surplus file survives, and no Delete is ever
/// planned.
#[test]
fn extras_survive_unless_deletion_is_requested() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "a.txt", b"abc");
    write_file(&target, "a.txt", b"abc");
    write_file(&target, "junk.tmp", b"zzz");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::NameSize);

    let mut opts = options(&inventory_path, &target);
    opts.delete_extra = false;
    let outcome = MirrorEngine::new(opts).plan(&SilentReporter).unwrap();

    assert_eq!(outcome.summary.extra, 1);
    assert_eq!(outcome.summary.deletes, 0);
    assert!(outcome.plan.is_empty());

    executor::apply(&outcome.plan, &target, &SilentReporter);
    assert!(target.join("junk.tmp").exists());
}

/// Duplicate demand on a live filesystem: the single occurrence is copied
/// to the second destination before being moved to the first.
#[test]
fn duplicate_demand_is_satisfied_from_one_occurrence() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "a/x", b"shared");
    write_file(&source, "b/x", b"shared");
    write_file(&target, "c/x", b"shared");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::SampleHash);

    let outcome = MirrorEngine::new(options(&inventory_path, &target))
        .plan(&SilentReporter)
        .unwrap();
    assert_eq!(outcome.summary.missing, 0);
    assert_eq!(outcome.summary.moves, 1);
    assert_eq!(outcome.summary.copies, 1);
    assert_eq!(outcome.summary.deletes, 0);

    let applied = executor::apply(&outcome.plan, &target, &SilentReporter);
    assert!(applied.all_succeeded());

    assert_eq!(fs::read(target.join("a/x")).unwrap(), b"shared");
    assert_eq!(fs::read(target.join("b/x")).unwrap(), b"shared");
    assert!(!target.join("c/x").exists());
}

/// A source that vanishes between planning and applying fails that one
/// operation; the rest of the plan still runs.
#[test]
fn vanished_source_fails_only_its_own_operation() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "kept/a.txt", b"aaa");
    write_file(&source, "kept/b.txt", b"bbb");
    write_file(&target, "a.txt", b"aaa");
    write_file(&target, "b.txt", b"bbb");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::NameSize);

    let outcome = MirrorEngine::new(options(&inventory_path, &target))
        .plan(&SilentReporter)
        .unwrap();
    assert_eq!(outcome.summary.moves, 2);

    // Pull one move source out from under the executor.
    fs::remove_file(target.join("a.txt")).unwrap();

    let applied = executor::apply(&outcome.plan, &target, &SilentReporter);
    assert_eq!(applied.failed, 1);
    assert!(!applied.all_succeeded());
    assert_eq!(fs::read(target.join("kept/b.txt")).unwrap(), b"bbb");
}

/// Ignored paths are invisible to the scan and never classified as extra.
#[test]
fn ignore_patterns_hide_target_paths() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "a.txt", b"abc");
    write_file(&target, "a.txt", b"abc");
    write_file(&target, "cache/blob.bin", b"scratch");

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::NameSize);

    let mut opts = options(&inventory_path, &target);
    opts.ignore_patterns = vec!["cache/**".to_string()];
    let outcome = MirrorEngine::new(opts).plan(&SilentReporter).unwrap();

    assert_eq!(outcome.summary.extra, 0);
    assert!(outcome.plan.is_empty());
}

/// Mirroring an empty target from a level-3 inventory reports everything
/// missing and plans nothing.
#[test]
fn empty_target_reports_all_missing() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    let target = tmp.path().join("target");
    write_file(&source, "a.txt", b"abc");
    write_file(&source, "sub/b.txt", b"def");
    fs::create_dir_all(&target).unwrap();

    let inventory_path = inventory_of(&source, tmp.path(), IdentityLevel::FullHash);

    let outcome = MirrorEngine::new(options(&inventory_path, &target))
        .plan(&SilentReporter)
        .unwrap();

    assert_eq!(outcome.level, IdentityLevel::FullHash);
    assert_eq!(outcome.summary.missing, 2);
    assert!(outcome.plan.is_empty());
    let rendered = outcome.plan.render();
    assert!(rendered
        .iter()
        .all(|line| line.starts_with("# missing: ")));
    assert_eq!(rendered.len(), 2);
}
