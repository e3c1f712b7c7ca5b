//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Whether `value` parses as an absolute `http`/`https` URL with a host.
pub fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is returned as-is when it exists.
///
/// # Example
/// ```text
/// /home/user/owb/rules/unit/   ← start
/// /home/user/owb/rulebook.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://tow.whfb.app"));
        assert!(is_http_url("http://localhost:8080/owb/rules"));
        assert!(!is_http_url("ftp://tow.whfb.app"));
        assert!(!is_http_url("tow.whfb.app"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("rulebook.toml");
        fs::write(&config, "").unwrap();
        let nested = dir.path().join("rules/unit");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(Path::new("rulebook.toml"), &nested).unwrap();
        assert_eq!(found, config);
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&config, dir.path()), None);

        fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(&config, Path::new("/")), Some(config));
    }

    #[test]
    fn test_find_config_file_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("rulebook-dir.toml")).unwrap();
        assert_eq!(
            find_config_file(Path::new("rulebook-dir.toml"), dir.path()),
            None
        );
    }
}
