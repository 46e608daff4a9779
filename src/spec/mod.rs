//! OCI runtime specification model
//!
//! Field names and nesting follow the OCI runtime-spec `config.json` schema so
//! the documents written here can be consumed by any compliant runtime. Only
//! the parts of the schema this crate produces are modeled.

pub mod linux;
pub mod mount;
pub mod process;

use rune_core::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use linux::{DeviceRule, IdMapping, Linux, Namespace, NamespaceType, Resources};
pub use mount::Mount;
pub use process::{Capabilities, Process, Rlimit, RlimitType, User};

/// Version of the OCI runtime spec the documents conform to
pub const OCI_VERSION: &str = "1.0.2-dev";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub path: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
}

/// A container runtime specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    pub oci_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Root>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<Linux>,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            oci_version: OCI_VERSION.to_string(),
            process: None,
            root: None,
            hostname: String::new(),
            mounts: Vec::new(),
            annotations: BTreeMap::new(),
            linux: None,
        }
    }
}

impl Spec {
    /// Linux section, or `MissingLinux` for specs targeting another platform
    pub fn linux(&self) -> Result<&Linux> {
        self.linux.as_ref().ok_or(SpecError::MissingLinux)
    }

    pub fn linux_mut(&mut self) -> Result<&mut Linux> {
        self.linux.as_mut().ok_or(SpecError::MissingLinux)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Check the structural invariants the runtime relies on.
    ///
    /// This is not an OCI schema validator; it only rejects combinations the
    /// runtime cannot set up: repeated namespace types, ID mappings without a
    /// user namespace and mounts without a destination.
    pub fn validate(&self) -> Result<()> {
        if self.oci_version.is_empty() {
            return Err(SpecError::InvalidSpec("ociVersion is empty".to_string()));
        }

        if let Some(mount) = self.mounts.iter().find(|m| m.destination.is_empty()) {
            return Err(SpecError::InvalidSpec(format!(
                "mount of {} ({}) has no destination",
                mount.source, mount.kind
            )));
        }

        if let Some(linux) = &self.linux {
            if let Some(kind) = linux.duplicate_namespace() {
                return Err(SpecError::InvalidSpec(format!(
                    "namespace {} listed more than once",
                    kind
                )));
            }
            if linux.has_id_mappings() && !linux.has_namespace(NamespaceType::User) {
                return Err(SpecError::InvalidSpec(
                    "uid/gid mappings require a user namespace".to_string(),
                ));
            }
        }

        Ok(())
    }
}
