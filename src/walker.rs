use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::Result;

/// A markdown file found under a content directory.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the walked directory.
    pub relative_path: PathBuf,
    /// Path as found (the walked directory joined with `relative_path`).
    pub path: PathBuf,
    /// Last modification time; the Unix epoch when unavailable.
    pub mtime: SystemTime,
}

impl DiscoveredFile {
    /// `relative_path` without its extension, `/`-separated.
    pub fn url_path(&self) -> String {
        self.relative_path
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Extensions treated as markdown.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Recursively discover markdown files under `root`, sorted by relative
/// path.
///
/// Hidden files and directories (names starting with `.`) are skipped, and
/// symlinked directories are never descended into. A missing `root` yields
/// no files.
pub fn discover_markdown(root: &Path) -> Result<Vec<DiscoveredFile>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut results = Vec::new();
    walk_dir(root, root, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(root, &path, results)?;
        } else if file_type.is_symlink() {
            // Broken links are skipped; linked directories may form cycles.
            let Ok(resolved) = path.canonicalize() else {
                continue;
            };
            if resolved.is_file() && is_markdown(&path) {
                results.push(discovered(root, &path, &resolved)?);
            }
        } else if file_type.is_file() && is_markdown(&path) {
            results.push(discovered(root, &path, &path)?);
        }
    }

    Ok(())
}

/// Whether `path` has a markdown extension (case-insensitive).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| m.eq_ignore_ascii_case(ext))
        })
}

fn discovered(root: &Path, path: &Path, target: &Path) -> Result<DiscoveredFile> {
    let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let mtime = std::fs::metadata(target)?
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH);

    Ok(DiscoveredFile {
        relative_path,
        path: path.to_path_buf(),
        mtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[DiscoveredFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn discovers_markdown_only() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("note.md"), "# Hello").unwrap();
        std::fs::write(tmp.path().join("long.markdown"), "Hello").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), "Hello").unwrap();
        std::fs::write(tmp.path().join("image.png"), "binary").unwrap();

        let files = discover_markdown(tmp.path()).unwrap();
        assert_eq!(names(&files), vec!["long.markdown", "note.md"]);
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let hidden = tmp.path().join(".git");
        std::fs::create_dir(&hidden).unwrap();
        std::fs::write(hidden.join("config.md"), "git config").unwrap();
        std::fs::write(tmp.path().join(".draft.md"), "secret").unwrap();
        std::fs::write(tmp.path().join("notes.md"), "notes").unwrap();

        let files = discover_markdown(tmp.path()).unwrap();
        assert_eq!(names(&files), vec!["notes.md"]);
    }

    #[test]
    fn recurses_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("network");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("ebpf.md"), "deep").unwrap();
        std::fs::write(tmp.path().join("z.md"), "z").unwrap();
        std::fs::write(tmp.path().join("a.md"), "a").unwrap();

        let files = discover_markdown(tmp.path()).unwrap();
        assert_eq!(names(&files), vec!["a.md", "network/ebpf.md", "z.md"]);
        assert_eq!(files[1].url_path(), "network/ebpf");
        assert_eq!(files[1].stem(), "ebpf");
        assert_eq!(files[1].path, sub.join("ebpf.md"));
    }

    #[test]
    fn mtime_is_recorded() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("file.md"), "content").unwrap();

        let files = discover_markdown(tmp.path()).unwrap();
        assert!(files[0].mtime > SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let files = discover_markdown(&tmp.path().join("_nope")).unwrap();
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_followed_but_not_directories() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("note.md"), "note").unwrap();
        symlink(outside.path(), outside.path().join("again")).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        symlink(outside.path(), tmp.path().join("ext")).unwrap();
        symlink(outside.path().join("note.md"), tmp.path().join("linked.md"))
            .unwrap();
        symlink(tmp.path().join("gone.md"), tmp.path().join("broken.md"))
            .unwrap();

        let files = discover_markdown(tmp.path()).unwrap();
        assert_eq!(names(&files), vec!["linked.md"]);
        assert_eq!(files[0].path, tmp.path().join("linked.md"));
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_markdown(Path::new("A.MD")));
        assert!(!is_markdown(Path::new("notes")));
    }
}
