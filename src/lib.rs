//! rune-spec: container specs for enclave runtimes
//!
//! Builds the default OCI runtime spec used by rune-style enclave containers
//! and converts it for rootless execution.
//!
//! # Modules
//!
//! - **spec**: OCI runtime spec model (serde, `config.json` field names)
//! - **example**: security-hardened default spec
//! - **rootless**: conversion for unprivileged users
//! - **enclave**: enclave runtime annotations
//! - **bundle**: `config.json` I/O
//!
//! # Example
//!
//! ```ignore
//! use rune_spec::{example, to_rootless, HostIdentity, SystemHost};
//!
//! let spec = example(&SystemHost);
//! let spec = to_rootless(spec, HostIdentity::current())?;
//! rune_spec::bundle::write_config(Path::new("mycontainer"), &spec, false)?;
//! ```

pub mod bundle;
pub mod enclave;
pub mod example;
pub mod rootless;
pub mod spec;

pub use enclave::EnclaveConfig;
pub use example::{example, example_for_host};
pub use rootless::to_rootless;
pub use rune_core::{
    FixedHost, HostIdentity, HostInfo, HostProbe, Result, SpecError, SystemHost,
};
pub use spec::{Linux, Mount, Namespace, NamespaceType, Process, Spec};
