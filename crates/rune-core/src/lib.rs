//! rune-core: shared types for rune-spec
//!
//! - Error types and Result alias
//! - Host probing (cgroup mode, effective identity)

pub mod error;
pub mod host;

pub use error::{Result, SpecError};
pub use host::{FixedHost, HostIdentity, HostInfo, HostProbe, SystemHost};
