//! End-to-end scan/clean integration tests.
//!
//! These exercise the real scanner and cleaner against a real temporary
//! filesystem: thread spawning, rayon fan-out, pruning, progress channels,
//! and actual deletion. Mocking the OS filesystem interface would cost more
//! than it buys; `tempfile` fixtures cover every code path with zero mocks.

use junksweep_core::scanner::progress::ScanProgress;
use junksweep_core::{
    clean, scan, start_scan, CleanTarget, Error, JunkCatalog, ScanOptions, ScanResult,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = File::create(path).unwrap();
    f.write_all(&vec![1u8; n]).unwrap();
}

/// The reference project layout:
///
/// ```text
/// root/
///   proj/
///     .venv/lib/foo.py            (10 bytes)
///     node_modules/pkg/index.js   (20 bytes)
///     src/main.py                 (5 bytes)
/// ```
fn build_project_tree(root: &Path) {
    let proj = root.join("proj");
    fs::create_dir_all(proj.join(".venv").join("lib")).unwrap();
    fs::create_dir_all(proj.join("node_modules").join("pkg")).unwrap();
    fs::create_dir_all(proj.join("src")).unwrap();
    write_bytes(&proj.join(".venv").join("lib").join("foo.py"), 10);
    write_bytes(&proj.join("node_modules").join("pkg").join("index.js"), 20);
    write_bytes(&proj.join("src").join("main.py"), 5);
}

fn scan_default(roots: &[PathBuf]) -> ScanResult {
    let catalog = JunkCatalog::default_catalog();
    scan(&catalog, roots, &ScanOptions::default()).unwrap()
}

fn item_paths(result: &ScanResult) -> Vec<&Path> {
    result.items.iter().map(|i| i.path.as_path()).collect()
}

// ── Scanner ──────────────────────────────────────────────────────────────────

#[test]
fn scan_finds_exactly_the_junk_directories() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());
    let proj = tmp.path().join("proj");

    let result = scan_default(&[tmp.path().to_path_buf()]);

    assert_eq!(result.item_count(), 2);
    assert_eq!(result.total_size_bytes(), 30);
    assert_eq!(result.total_file_count(), 2);

    let venv = result
        .items
        .iter()
        .find(|i| i.path == proj.join(".venv"))
        .expect(".venv must be reported");
    assert_eq!(venv.kind, "python_venv");
    assert_eq!(venv.size_bytes, 10);
    assert_eq!(venv.file_count, 1);

    let nm = result
        .items
        .iter()
        .find(|i| i.path == proj.join("node_modules"))
        .expect("node_modules must be reported");
    assert_eq!(nm.kind, "node_modules");
    assert_eq!(nm.size_bytes, 20);
    assert_eq!(nm.file_count, 1);

    assert!(!item_paths(&result).contains(&proj.join("src").as_path()));
}

#[test]
fn matched_directories_are_terminal_no_nested_items() {
    let tmp = TempDir::new().unwrap();
    // node_modules containing a vendored .venv and a nested node_modules:
    // only the outer match may be reported, with everything attributed to it.
    let outer = tmp.path().join("proj").join("node_modules");
    fs::create_dir_all(outer.join(".venv")).unwrap();
    fs::create_dir_all(outer.join("dep").join("node_modules")).unwrap();
    write_bytes(&outer.join(".venv").join("a.py"), 7);
    write_bytes(&outer.join("dep").join("node_modules").join("b.js"), 11);
    write_bytes(&outer.join("c.js"), 3);

    let result = scan_default(&[tmp.path().to_path_buf()]);

    assert_eq!(result.item_count(), 1);
    assert_eq!(result.items[0].path, outer);
    assert_eq!(result.items[0].size_bytes, 21);
    assert_eq!(result.items[0].file_count, 3);
}

#[test]
fn hidden_directories_are_skipped_unless_included() {
    let tmp = TempDir::new().unwrap();
    let hidden = tmp.path().join(".config").join("node_modules");
    fs::create_dir_all(&hidden).unwrap();
    write_bytes(&hidden.join("x.js"), 4);

    let catalog = JunkCatalog::default_catalog();
    let roots = vec![tmp.path().to_path_buf()];

    let without = scan(&catalog, &roots, &ScanOptions::default()).unwrap();
    assert_eq!(without.item_count(), 0);

    let with = scan(
        &catalog,
        &roots,
        &ScanOptions::default().with_hidden(true),
    )
    .unwrap();
    assert_eq!(with.item_count(), 1);
    assert_eq!(with.items[0].path, hidden);
}

#[test]
fn hidden_named_patterns_match_regardless_of_hidden_flag() {
    let tmp = TempDir::new().unwrap();
    let venv = tmp.path().join("proj").join(".venv");
    fs::create_dir_all(&venv).unwrap();
    write_bytes(&venv.join("pyvenv.cfg"), 9);

    // include_hidden is false, but the pattern itself denotes a hidden name.
    let result = scan_default(&[tmp.path().to_path_buf()]);
    assert_eq!(result.item_count(), 1);
    assert_eq!(result.items[0].kind, "python_venv");
}

#[test]
fn max_depth_limits_descent_but_not_classification_at_the_limit() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("a").join("b").join("node_modules");
    fs::create_dir_all(&deep).unwrap();
    write_bytes(&deep.join("x.js"), 1);

    let catalog = JunkCatalog::default_catalog();
    let roots = vec![tmp.path().to_path_buf()];

    // node_modules sits at depth 3 below the root.
    let shallow = scan(
        &catalog,
        &roots,
        &ScanOptions::default().with_max_depth(2),
    )
    .unwrap();
    assert_eq!(shallow.item_count(), 0);

    let deep_enough = scan(
        &catalog,
        &roots,
        &ScanOptions::default().with_max_depth(3),
    )
    .unwrap();
    assert_eq!(deep_enough.item_count(), 1);
}

#[cfg(unix)]
#[test]
fn symlinked_junk_is_not_an_item_and_not_followed() {
    let tmp = TempDir::new().unwrap();
    let real = TempDir::new().unwrap();
    let real_nm = real.path().join("node_modules");
    fs::create_dir_all(&real_nm).unwrap();
    write_bytes(&real_nm.join("x.js"), 100);

    std::os::unix::fs::symlink(&real_nm, tmp.path().join("node_modules")).unwrap();

    let result = scan_default(&[tmp.path().to_path_buf()]);
    assert_eq!(result.item_count(), 0);
}

#[test]
fn overlapping_roots_are_deduplicated_by_path() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());

    let result = scan_default(&[tmp.path().to_path_buf(), tmp.path().join("proj")]);

    // Both roots discover the same two directories; each appears once.
    assert_eq!(result.item_count(), 2);
    let mut paths = item_paths(&result);
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 2);
}

#[test]
fn invalid_root_fails_only_that_root() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());
    let missing = tmp.path().join("no_such_dir");

    let result = scan_default(&[tmp.path().to_path_buf(), missing.clone()]);

    assert_eq!(result.item_count(), 2);
    assert!(result.skipped.iter().any(|s| s.path == missing));
}

#[test]
fn scan_fails_only_when_every_root_is_invalid() {
    let tmp = TempDir::new().unwrap();
    let file_root = tmp.path().join("plain.txt");
    write_bytes(&file_root, 1);

    let catalog = JunkCatalog::default_catalog();
    let err = scan(
        &catalog,
        &[tmp.path().join("missing"), file_root],
        &ScanOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::NoValidRoots(2)));
}

#[test]
fn unreadable_subdirectory_is_a_skip_not_a_failure() {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        build_project_tree(tmp.path());
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged processes ignore permission bits; nothing to test then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = scan_default(&[tmp.path().to_path_buf()]);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.item_count(), 2);
        assert!(result.skipped.iter().any(|s| s.path == locked));
    }
}

#[test]
fn background_scan_reports_progress_and_joins_with_result() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());

    let handle = start_scan(
        Arc::new(JunkCatalog::default_catalog()),
        vec![tmp.path().to_path_buf()],
        ScanOptions::default(),
    );

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut saw_terminal = false;
    while std::time::Instant::now() < deadline {
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Complete {
                items_found,
                dirs_scanned,
                ..
            }) => {
                assert_eq!(items_found, 2);
                assert!(dirs_scanned >= 2);
                saw_terminal = true;
                break;
            }
            Ok(ScanProgress::Update {
                items_found,
                dirs_scanned,
                ..
            }) => {
                // Counters are monotonic and never exceed the final totals.
                assert!(items_found <= 2);
                assert!(dirs_scanned >= 1);
            }
            Ok(_) => {}
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => break,
        }
    }
    assert!(saw_terminal, "scan must send Complete within 30 s");

    let result = handle.join().unwrap();
    assert_eq!(result.item_count(), 2);
}

#[test]
fn cancelled_scan_yields_no_result() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());

    let handle = start_scan(
        Arc::new(JunkCatalog::default_catalog()),
        vec![tmp.path().to_path_buf()],
        ScanOptions::default(),
    );
    // The scan may already have finished by the time the flag is read, so
    // either outcome is acceptable; a partial result is not.
    handle.cancel();
    match handle.join() {
        Ok(result) => assert_eq!(result.item_count(), 2),
        Err(Error::Cancelled) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

// ── Cleaner ──────────────────────────────────────────────────────────────────

#[test]
fn cleaning_one_selection_leaves_the_rest_intact() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());
    let proj = tmp.path().join("proj");

    let result = scan_default(&[tmp.path().to_path_buf()]);
    let venv_item = result
        .items
        .iter()
        .find(|i| i.kind == "python_venv")
        .unwrap();

    let clean_result = clean(&[CleanTarget::from(venv_item)], false);

    assert!(clean_result.is_success());
    assert_eq!(clean_result.deleted_count(), 1);
    assert_eq!(clean_result.bytes_freed, 10);
    assert!(!proj.join(".venv").exists());
    assert!(proj.join("node_modules").exists());
    assert!(proj.join("src").join("main.py").exists());
}

#[test]
fn dry_run_changes_nothing_on_disk() {
    let tmp = TempDir::new().unwrap();
    build_project_tree(tmp.path());

    let before = scan_default(&[tmp.path().to_path_buf()]);
    let targets: Vec<CleanTarget> = before.items.iter().map(CleanTarget::from).collect();

    let clean_result = clean(&targets, true);
    assert!(clean_result.was_dry_run);
    assert!(clean_result.is_success());
    assert_eq!(clean_result.deleted_count(), 2);
    assert_eq!(clean_result.bytes_freed, 30);

    // Discovery order is not guaranteed across scans; compare as sets.
    let mut after = scan_default(&[tmp.path().to_path_buf()]);
    let mut before = before;
    before.sort_by_path();
    after.sort_by_path();
    assert_eq!(item_paths(&before), item_paths(&after));
    assert_eq!(before.total_size_bytes(), after.total_size_bytes());
}

#[cfg(unix)]
#[test]
fn one_undeletable_path_does_not_stop_the_batch() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dirs: Vec<PathBuf> = (0..3)
        .map(|i| {
            let d = tmp.path().join(format!("junk{i}"));
            fs::create_dir_all(&d).unwrap();
            write_bytes(&d.join("f.bin"), 10);
            d
        })
        .collect();

    // Read-only directory: its child cannot be unlinked, so removal fails.
    fs::set_permissions(&dirs[1], fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged processes ignore permission bits; nothing to test then.
    if File::create(dirs[1].join("probe")).is_ok() {
        fs::set_permissions(&dirs[1], fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let targets: Vec<CleanTarget> = dirs
        .iter()
        .map(|d| CleanTarget::new(d.clone(), 10))
        .collect();
    let result = clean(&targets, false);

    fs::set_permissions(&dirs[1], fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.deleted_count(), 2);
    assert_eq!(result.failed_count(), 1);
    assert!(!result.is_success());
    assert_eq!(result.bytes_freed, 20);
    assert_eq!(result.failed[0].path, dirs[1]);
    assert!(!dirs[0].exists());
    assert!(dirs[1].exists());
    assert!(!dirs[2].exists());
}

#[test]
fn clean_partition_covers_every_requested_path() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("node_modules");
    fs::create_dir_all(&good).unwrap();
    let ghost = tmp.path().join("vanished");

    let targets = vec![
        CleanTarget::new(good.clone(), 5),
        CleanTarget::new(ghost.clone(), 5),
    ];
    let result = clean(&targets, false);

    assert_eq!(result.deleted_count() + result.failed_count(), targets.len());
    assert_eq!(result.deleted_count(), 1);
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.bytes_freed, 5);
}
