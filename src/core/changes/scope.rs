//! Change sets and the "does this directory contain a changed file" test.

use std::path::Path;

/// Lexically normalize a path: `/` separators, no `.` segments, `..` folded, no trailing slash.
///
/// Never touches the filesystem, so it works for paths reported by the API that do not exist
/// locally. A leading `/` is kept; a leading `./` is dropped.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/') || path.starts_with('\\');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(&last) if last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }
    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Normalized `root/dir`, the prefix changed files are compared against.
pub fn directory_key(root: &Path, dir: &str) -> String {
    normalize_path(&root.join(dir).to_string_lossy())
}

/// Files touched by the triggering event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<String>,
}

impl ChangeSet {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            files: files.iter().map(|f| normalize_path(f)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True if some changed file is `root/dir` itself or lies beneath it.
    ///
    /// The separator-suffixed prefix keeps `dir10/x` from matching `dir1`.
    pub fn touches(&self, root: &Path, dir: &str) -> bool {
        if self.files.is_empty() {
            log::debug!("No changed files provided, directory {} will be excluded", dir);
            return false;
        }
        let dir_path = directory_key(root, dir);
        let with_sep = format!("{}/", dir_path);
        log::debug!("Checking if directory {} has changes", dir_path);

        match self
            .files
            .iter()
            .find(|f| **f == dir_path || f.starts_with(&with_sep))
        {
            Some(file) => {
                log::debug!("Found change in directory {}: {}", dir, file);
                true
            }
            None => {
                log::debug!("No changes found in directory {}", dir);
                false
            }
        }
    }
}
