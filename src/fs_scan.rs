//! Large-file scan (bounded-depth walk), directory browsing, deletion.

use crate::models::{BrowseEntry, DeleteReport, FileEntry};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub min_size: u64,
    pub max_depth: usize,
    pub max_results: usize,
}

/// A root to scan; non-recursive roots enumerate direct file children only.
#[derive(Debug, Clone)]
pub struct ScanRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

/// Well-known subfolders (recursive) plus the home directory itself
/// (non-recursive, to avoid rescanning everything beneath it).
pub fn default_scan_roots() -> Vec<ScanRoot> {
    let mut roots = Vec::new();
    let Some(home) = dirs_next::home_dir() else {
        return roots;
    };
    for sub in ["Downloads", "Documents", "Desktop", "Movies", "Videos", "Music", "Pictures"] {
        roots.push(ScanRoot {
            path: home.join(sub),
            recursive: true,
        });
    }
    roots.push(ScanRoot {
        path: home,
        recursive: false,
    });
    roots
}

/// Best-effort scan: nonexistent roots and unreadable entries are skipped,
/// never fatal. Results are filtered by size, sorted descending by size and
/// truncated to `max_results`.
pub fn scan_large_files(roots: &[ScanRoot], opts: &ScanOptions) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    for root in roots {
        if !root.path.exists() {
            continue;
        }
        if root.recursive {
            walk(&root.path, 0, opts.max_depth, opts.min_size, &mut entries);
        } else {
            collect_direct_files(&root.path, opts.min_size, &mut entries);
        }
    }
    entries.sort_by(|a, b| b.size.cmp(&a.size));
    entries.truncate(opts.max_results);
    entries
}

/// Visits `dir` (at `depth` levels below the scan root), collecting files
/// and recursing while depth < max_depth. Directories at the bound still
/// contribute their files; the walk just stops descending there.
fn walk(dir: &Path, depth: usize, max_depth: usize, min_size: u64, out: &mut Vec<FileEntry>) {
    let read = match std::fs::read_dir(dir) {
        Ok(r) => r,
        Err(_) => return,
    };
    for entry in read.flatten() {
        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        if meta.is_dir() {
            if depth < max_depth {
                walk(&path, depth + 1, max_depth, min_size, out);
            }
        } else if meta.is_file() && meta.len() >= min_size {
            out.push(file_entry(&path, &meta));
        }
    }
}

fn collect_direct_files(dir: &Path, min_size: u64, out: &mut Vec<FileEntry>) {
    let read = match std::fs::read_dir(dir) {
        Ok(r) => r,
        Err(_) => return,
    };
    for entry in read.flatten() {
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        if meta.is_file() && meta.len() >= min_size {
            out.push(file_entry(&entry.path(), &meta));
        }
    }
}

fn file_entry(path: &Path, meta: &std::fs::Metadata) -> FileEntry {
    FileEntry {
        path: path.to_string_lossy().into_owned(),
        size: meta.len(),
        modified: modified_rfc3339(meta),
    }
}

fn modified_rfc3339(meta: &std::fs::Metadata) -> String {
    meta.modified()
        .ok()
        .map(|t| DateTime::<Local>::from(t).to_rfc3339())
        .unwrap_or_default()
}

/// Directory listing: directories first, then files, each sorted by name.
pub fn browse(path: &Path) -> anyhow::Result<Vec<BrowseEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let record = BrowseEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: modified_rfc3339(&meta),
        };
        if record.is_dir {
            dirs.push(record);
        } else {
            files.push(record);
        }
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.extend(files);
    Ok(dirs)
}

/// Deletes each path, confining targets to `confine_to` when given.
/// Successful deletions stand even when siblings fail; failures are
/// enumerated in the report.
pub fn delete_files(paths: &[String], confine_to: Option<&Path>) -> DeleteReport {
    let mut deleted_count = 0;
    let mut failed = Vec::new();
    let confine_to = confine_to.map(|root| root.canonicalize().unwrap_or_else(|_| root.into()));

    for raw in paths {
        let path = PathBuf::from(raw);
        if let Some(root) = &confine_to {
            match path.canonicalize() {
                Ok(p) if p.starts_with(root) => {}
                Ok(_) => {
                    failed.push(format!("{}: outside the allowed directory", raw));
                    continue;
                }
                Err(e) => {
                    failed.push(format!("{}: {}", raw, e));
                    continue;
                }
            }
        }
        match std::fs::remove_file(&path) {
            Ok(()) => deleted_count += 1,
            Err(e) => failed.push(format!("{}: {}", raw, e)),
        }
    }

    let message = if failed.is_empty() {
        format!("deleted {} file(s)", deleted_count)
    } else {
        format!(
            "deleted {} file(s); {} failed: {}",
            deleted_count,
            failed.len(),
            failed.join("; ")
        )
    };
    DeleteReport {
        deleted_count,
        failed,
        message,
    }
}
