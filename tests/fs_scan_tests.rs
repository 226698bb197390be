// Bounded walker, browse and delete tests

use std::fs::File;
use std::path::Path;
use systempulse::fs_scan::{ScanOptions, ScanRoot, browse, delete_files, scan_large_files};

const MIB: u64 = 1024 * 1024;

/// Creates a sparse file of the given size.
fn make_file(path: &Path, size: u64) {
    let f = File::create(path).unwrap();
    f.set_len(size).unwrap();
}

fn opts(min_size: u64, max_depth: usize, max_results: usize) -> ScanOptions {
    ScanOptions {
        min_size,
        max_depth,
        max_results,
    }
}

fn recursive_root(path: &Path) -> Vec<ScanRoot> {
    vec![ScanRoot {
        path: path.to_path_buf(),
        recursive: true,
    }]
}

#[test]
fn test_size_filter_and_descending_order() {
    let dir = tempfile::TempDir::new().unwrap();
    make_file(&dir.path().join("a.bin"), 50 * MIB);
    make_file(&dir.path().join("b.bin"), 99 * MIB);
    make_file(&dir.path().join("c.bin"), 100 * MIB);
    make_file(&dir.path().join("d.bin"), 150 * MIB);

    let entries = scan_large_files(&recursive_root(dir.path()), &opts(100 * MIB, 3, 50));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].size, 150 * MIB);
    assert_eq!(entries[1].size, 100 * MIB);
}

#[test]
fn test_depth_bound_prunes_deep_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let shallow = dir.path().join("d1");
    let at_bound = dir.path().join("d1/d2");
    let too_deep = dir.path().join("d1/d2/d3");
    std::fs::create_dir_all(&too_deep).unwrap();
    make_file(&shallow.join("shallow.bin"), 10 * MIB);
    make_file(&at_bound.join("at_bound.bin"), 10 * MIB);
    make_file(&too_deep.join("deep.bin"), 10 * MIB);

    let entries = scan_large_files(&recursive_root(dir.path()), &opts(MIB, 2, 50));
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.iter().any(|p| p.ends_with("shallow.bin")));
    assert!(paths.iter().any(|p| p.ends_with("at_bound.bin")));
    assert!(
        !paths.iter().any(|p| p.ends_with("deep.bin")),
        "files below the depth bound must never appear"
    );
}

#[test]
fn test_non_recursive_root_only_lists_direct_children() {
    let dir = tempfile::TempDir::new().unwrap();
    let nested = dir.path().join("sub");
    std::fs::create_dir(&nested).unwrap();
    make_file(&dir.path().join("direct.bin"), 5 * MIB);
    make_file(&nested.join("nested.bin"), 5 * MIB);

    let roots = vec![ScanRoot {
        path: dir.path().to_path_buf(),
        recursive: false,
    }];
    let entries = scan_large_files(&roots, &opts(MIB, 3, 50));
    assert_eq!(entries.len(), 1);
    assert!(entries[0].path.ends_with("direct.bin"));
}

#[test]
fn test_missing_root_is_skipped_silently() {
    let roots = vec![ScanRoot {
        path: Path::new("/definitely/not/a/real/dir").to_path_buf(),
        recursive: true,
    }];
    let entries = scan_large_files(&roots, &opts(MIB, 3, 50));
    assert!(entries.is_empty());
}

#[test]
fn test_results_truncated_to_max() {
    let dir = tempfile::TempDir::new().unwrap();
    for i in 0..60u64 {
        make_file(&dir.path().join(format!("f{:02}.bin", i)), MIB + i);
    }
    let entries = scan_large_files(&recursive_root(dir.path()), &opts(MIB, 3, 50));
    assert_eq!(entries.len(), 50);
    // Largest first; the 10 smallest fell off the end.
    assert_eq!(entries[0].size, MIB + 59);
    assert_eq!(entries[49].size, MIB + 10);
}

#[test]
fn test_browse_orders_directories_first_then_by_name() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("zeta")).unwrap();
    std::fs::create_dir(dir.path().join("alpha")).unwrap();
    make_file(&dir.path().join("beta.txt"), 10);
    make_file(&dir.path().join("aaa.txt"), 10);

    let entries = browse(dir.path()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta", "aaa.txt", "beta.txt"]);
    assert!(entries[0].is_dir);
    assert!(!entries[2].is_dir);
}

#[test]
fn test_browse_missing_directory_errors() {
    assert!(browse(Path::new("/definitely/not/a/real/dir")).is_err());
}

#[test]
fn test_delete_partial_failure_enumerates_failing_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let missing = dir.path().join("missing.txt");
    make_file(&a, 10);
    make_file(&b, 10);

    let paths = vec![
        a.to_string_lossy().into_owned(),
        missing.to_string_lossy().into_owned(),
        b.to_string_lossy().into_owned(),
    ];
    let report = delete_files(&paths, Some(dir.path()));
    assert_eq!(report.deleted_count, 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].contains("missing.txt"));
    assert!(report.message.contains("missing.txt"));
    // The two deletable files really are gone.
    assert!(!a.exists());
    assert!(!b.exists());
}

#[test]
fn test_delete_confinement_rejects_outside_paths() {
    let confine = tempfile::TempDir::new().unwrap();
    let outside = tempfile::TempDir::new().unwrap();
    let victim = outside.path().join("victim.txt");
    make_file(&victim, 10);

    let report = delete_files(
        &[victim.to_string_lossy().into_owned()],
        Some(confine.path()),
    );
    assert_eq!(report.deleted_count, 0);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].contains("outside"));
    assert!(victim.exists());
}
