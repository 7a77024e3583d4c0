//! Utility helpers — data-dir paths, filename shaping, string truncation.

use std::path::PathBuf;

/// The Scenewright data directory (`~/.scenewright/`).
pub fn get_data_path() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".scenewright")
}

/// Local wall-clock time as `HH:MM:SS`, used to stamp progress lines.
pub fn clock_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Truncate to `max_len` characters, appending "..." when cut. Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Engine-side asset name for a model: lowercase, spaces to underscores.
///
/// `"Low Poly Fox"` → `"low_poly_fox"`. Path separators are replaced too so
/// the result is always a single path component.
pub fn asset_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().unwrap_or_else(|| PathBuf::from(".")).join(rest)
    } else if path == "~" {
        home_dir().unwrap_or_else(|| PathBuf::from("."))
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> Option<PathBuf> {
    dirs_next::home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("cube", 10), "cube");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_string("a red cube on top of a blue sphere", 15);
        assert_eq!(result, "a red cube o...");
        assert_eq!(result.chars().count(), 15);
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate_string("こんにちは世界です", 5), "こん...");
    }

    #[test]
    fn test_asset_stem() {
        assert_eq!(asset_stem("Low Poly Fox"), "low_poly_fox");
        assert_eq!(asset_stem("Water Bottle"), "water_bottle");
        assert_eq!(asset_stem("../evil/Name"), ".._evil_name");
    }

    #[test]
    fn test_expand_home_tilde() {
        let expanded = expand_home("~/proj/Assets");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("proj/Assets"));
    }

    #[test]
    fn test_expand_home_absolute() {
        assert_eq!(expand_home("/abs/Assets"), PathBuf::from("/abs/Assets"));
    }

    #[test]
    fn test_clock_time_format() {
        let t = clock_time();
        assert_eq!(t.len(), 8);
        assert_eq!(t.chars().nth(2), Some(':'));
    }

    #[test]
    fn test_data_path() {
        assert!(get_data_path().ends_with(".scenewright"));
    }

    #[test]
    fn test_expand_home_uses_platform_home() {
        if let Some(home) = dirs_next::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(get_data_path(), home.join(".scenewright"));
        }
    }
}
