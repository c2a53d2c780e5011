//! Path helpers for the Zellij sandbox.

use std::path::PathBuf;

/// File name of the OTLP trace export inside the data directory.
pub const TRACE_FILE_NAME: &str = "flashdeck-otlp.jsonl";

/// Returns the directory Flashdeck writes its traces to.
///
/// `/host` is where Zellij mounts the directory it was started from, which is
/// normally the user's home, so this usually lands in
/// `~/.local/share/zellij/flashdeck`.
///
/// ```
/// use flashdeck::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/flashdeck"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("flashdeck")
}

/// Returns the full path of the rotating trace file.
#[must_use]
pub fn trace_file_path() -> PathBuf {
    get_data_dir().join(TRACE_FILE_NAME)
}

/// Expands a leading `~` to the sandbox's `/host` mount.
///
/// ```
/// use flashdeck::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/paper.toml"), "/host/themes/paper.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_inside_path_is_kept() {
        assert_eq!(expand_tilde("/tmp/~backup"), "/tmp/~backup");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
    }

    #[test]
    fn trace_file_lives_in_data_dir() {
        assert!(trace_file_path().starts_with(get_data_dir()));
        assert!(trace_file_path().ends_with(TRACE_FILE_NAME));
    }
}
