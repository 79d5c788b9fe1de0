//! Input discovery for histogram files.
//!
//! Looks only at the entries directly inside the input directory and
//! keeps the regular files whose name matches a simple `*` wildcard
//! pattern such as `histo_*.dat`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Default file name pattern for histogram inputs.
pub const DEFAULT_PATTERN: &str = "histo_*.dat";

/// Find files in `dir` (non-recursive) matching `pattern`, sorted by path.
pub fn discover_histograms(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1);

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matched = matches_pattern(&entry.file_name().to_string_lossy(), pattern);
        if matched {
            files.push(entry.into_path());
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    files.sort();
    Ok(files)
}

/// Match `name` against a pattern where `*` stands for any run of characters.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, last) = match parts.as_slice() {
        [only] => return name == *only,
        [first, .., last] => (*first, *last),
        [] => return false,
    };

    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_matches_default_pattern() {
        assert!(matches_pattern("histo_001.dat", DEFAULT_PATTERN));
        assert!(matches_pattern("histo_.dat", DEFAULT_PATTERN));
        assert!(!matches_pattern("histo_001.dat.bak", DEFAULT_PATTERN));
        assert!(!matches_pattern("histograma-001.dat", DEFAULT_PATTERN));
        assert!(!matches_pattern("xhisto_001.dat", DEFAULT_PATTERN));
    }

    #[test]
    fn test_matches_other_patterns() {
        assert!(matches_pattern("exact.dat", "exact.dat"));
        assert!(!matches_pattern("exact.dat2", "exact.dat"));
        assert!(matches_pattern("anything", "*"));
        assert!(matches_pattern("run_a_histo_b.txt", "run_*_histo_*.txt"));
        assert!(!matches_pattern("run_a.txt", "run_*_histo_*.txt"));
        // prefix and suffix may not overlap
        assert!(!matches_pattern("ab", "ab*b"));
    }

    #[test]
    fn test_discover_is_sorted_and_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("histo_010.dat"), "").unwrap();
        std::fs::write(root.join("histo_002.dat"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        std::fs::create_dir(root.join("histo_dir.dat")).unwrap();
        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("nested").join("histo_001.dat"), "").unwrap();

        let files = discover_histograms(root, DEFAULT_PATTERN).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["histo_002.dat", "histo_010.dat"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_histograms(temp_dir.path(), DEFAULT_PATTERN).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_missing_directory_is_error() {
        let result = discover_histograms(Path::new("/nonexistent/histoplot"), DEFAULT_PATTERN);
        assert!(result.is_err());
    }
}
