//! Newtype wrappers for the selector strings used to filter lock entries.
//!
//! Both serialize as plain strings (JSON summaries report the platform).

use serde::Serialize;
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_newtype!(
    /// Conda subdir a lock entry was solved for, e.g. `linux-64`.
    Platform
);

string_newtype!(
    /// Package manager that owns a lock entry, e.g. `conda` or `pip`.
    Manager
);

pub const DEFAULT_PLATFORM: &str = "linux-64";
pub const DEFAULT_MANAGER: &str = "conda";

/// The platform/manager pair a generated environment is pinned for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub platform: Platform,
    pub manager: Manager,
}

impl Target {
    pub fn new(platform: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            platform: Platform::new(platform),
            manager: Manager::new(manager),
        }
    }

    /// Exact, case-sensitive match on both fields. Missing fields never match.
    pub fn matches(&self, platform: Option<&str>, manager: Option<&str>) -> bool {
        platform == Some(self.platform.as_str()) && manager == Some(self.manager.as_str())
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM, DEFAULT_MANAGER)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.manager)
    }
}
