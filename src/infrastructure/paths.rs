//! Filesystem locations for paneflow data.
//!
//! Data lives in `$PANEFLOW_DATA_DIR` when set, otherwise in
//! `~/.local/share/paneflow`. Saved layouts and span logs both go there.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PANEFLOW_DATA_DIR";

/// File name of the default saved layout inside the data directory.
pub const LAYOUT_FILE_NAME: &str = "layout.json";

/// Returns the data directory.
///
/// Resolution order: `$PANEFLOW_DATA_DIR`, then `$HOME/.local/share/paneflow`,
/// then `.paneflow` relative to the working directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var(DATA_DIR_ENV).ok().as_deref(),
        std::env::var("HOME").ok().as_deref(),
    )
}

fn resolve_data_dir(override_dir: Option<&str>, home: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join("paneflow"),
        None => PathBuf::from(".paneflow"),
    }
}

/// Default location of the saved layout.
#[must_use]
pub fn default_layout_path() -> PathBuf {
    get_data_dir().join(LAYOUT_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when `$HOME` is unset, are
/// returned unchanged.
///
/// ```
/// use paneflow::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, std::env::var("HOME").ok().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> String {
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return path.to_string();
    };
    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_prefers_override_then_home() {
        assert_eq!(resolve_data_dir(Some("/srv/pf"), Some("/home/u")), PathBuf::from("/srv/pf"));
        assert_eq!(
            resolve_data_dir(Some(""), Some("/home/u")),
            PathBuf::from("/home/u/.local/share/paneflow")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from(".paneflow"));
    }

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde_with("~/layouts/a.json", Some("/home/u/")), "/home/u/layouts/a.json");
        assert_eq!(expand_tilde_with("~", Some("/home/u")), "/home/u");
        assert_eq!(expand_tilde_with("~other/x", Some("/home/u")), "~other/x");
        assert_eq!(expand_tilde_with("~/x", None), "~/x");
    }
}
