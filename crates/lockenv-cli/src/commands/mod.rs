pub mod check;
pub mod generate;

use lockenv_core::CoreError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_LOCKFILE_ERROR: u8 = 2;
pub const EXIT_STALE: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Flatten a core error into the message printed by `main`. Lockfile
/// problems get a prefix that selects `EXIT_LOCKFILE_ERROR`.
pub fn describe(err: &CoreError) -> String {
    if err.is_lockfile_error() {
        format!("lockfile error: {err}")
    } else {
        err.to_string()
    }
}

pub fn check_mark(ok: bool) -> String {
    use console::Style;
    if ok {
        Style::new().green().apply_to("✓").to_string()
    } else {
        Style::new().red().apply_to("✗").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn json_pretty_serializes_object() {
        let val = serde_json::json!({"status": "written"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"status\""));
        assert!(result.contains("\"written\""));
    }

    #[test]
    fn describe_prefixes_lockfile_errors() {
        let err = CoreError::MissingInput {
            path: PathBuf::from("conda-lock.yml"),
        };
        let msg = describe(&err);
        assert!(msg.starts_with("lockfile error:"), "{msg}");
        assert!(msg.contains("conda-lock.yml"));
    }

    #[test]
    fn describe_leaves_write_errors_unprefixed() {
        let err = CoreError::Write {
            path: PathBuf::from("env.yml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(describe(&err).starts_with("failed to write env.yml"));
    }

    #[test]
    fn check_mark_contains_symbol() {
        assert!(check_mark(true).contains('✓'));
        assert!(check_mark(false).contains('✗'));
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_FAILURE);
        assert_ne!(EXIT_FAILURE, EXIT_LOCKFILE_ERROR);
        assert_ne!(EXIT_LOCKFILE_ERROR, EXIT_STALE);
    }
}
