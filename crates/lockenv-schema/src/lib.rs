//! Lockfile parsing and environment-file rendering for lockenv.
//!
//! This crate defines the schema layer: the tolerant view of a conda-lock
//! document (`LockDocument`), the derived environment definition
//! (`EnvDocument`) with its generated header (`EnvHeader`), and the
//! platform/manager newtypes that select which lock entries qualify.

pub mod env;
pub mod lock;
pub mod types;

pub use env::{parse_env_str, EnvDocument, EnvError, EnvHeader};
pub use lock::{
    parse_lock_file, parse_lock_str, ChannelEntry, LockDocument, LockError, LockMetadata,
    PackageRecord,
};
pub use types::{Manager, Platform, Target};
