//! Host state consulted while building specs
//!
//! The baseline spec depends on one piece of host configuration, whether the
//! cgroup hierarchy is mounted in unified (v2) mode. That query sits behind
//! [`HostProbe`] so callers and tests can force either answer.

use log::{debug, warn};
use std::path::Path;
use std::sync::OnceLock;

const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Source of host facts the spec builder depends on
pub trait HostProbe {
    /// Whether the cgroup subsystem runs in unified (v2) mode
    fn cgroup_unified_mode(&self) -> bool;
}

/// Probe backed by the running kernel. The answer is cached per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostProbe for SystemHost {
    fn cgroup_unified_mode(&self) -> bool {
        static UNIFIED: OnceLock<bool> = OnceLock::new();
        *UNIFIED.get_or_init(detect_cgroup_v2)
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHost {
    pub cgroup_v2: bool,
}

impl FixedHost {
    pub fn new(cgroup_v2: bool) -> Self {
        Self { cgroup_v2 }
    }
}

impl HostProbe for FixedHost {
    fn cgroup_unified_mode(&self) -> bool {
        self.cgroup_v2
    }
}

/// Effective user and group of a host process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentity {
    pub uid: u32,
    pub gid: u32,
}

impl HostIdentity {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Effective UID/GID of the calling process
    pub fn current() -> Self {
        unsafe {
            Self {
                uid: libc::geteuid(),
                gid: libc::getegid(),
            }
        }
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

/// Host facts reported by `rune-ctl check`
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub identity: HostIdentity,
    pub cgroup_v2: bool,
}

impl HostInfo {
    pub fn detect() -> Self {
        Self {
            identity: HostIdentity::current(),
            cgroup_v2: SystemHost.cgroup_unified_mode(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.identity.is_root()
    }

    /// Whether a generated spec should be converted for rootless use
    pub fn needs_rootless(&self) -> bool {
        !self.is_root()
    }

    pub fn summary(&self) -> String {
        let check = |available: bool| if available { "[ok]" } else { "[--]" };

        [
            format!("{} Root privileges", check(self.is_root())),
            format!("{} Cgroup v2 unified mode", check(self.cgroup_v2)),
            format!("     Effective UID: {}", self.identity.uid),
            format!("     Effective GID: {}", self.identity.gid),
        ]
        .join("\n")
    }
}

#[cfg(target_os = "linux")]
fn detect_cgroup_v2() -> bool {
    use nix::sys::statfs::{statfs, CGROUP2_SUPER_MAGIC};

    match statfs(CGROUP_ROOT) {
        Ok(st) => {
            let unified = st.filesystem_type() == CGROUP2_SUPER_MAGIC;
            debug!("{} unified mode: {}", CGROUP_ROOT, unified);
            unified
        }
        Err(e) => {
            warn!("statfs({}) failed: {}, checking cgroup.controllers", CGROUP_ROOT, e);
            controllers_file_exists()
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn detect_cgroup_v2() -> bool {
    controllers_file_exists()
}

fn controllers_file_exists() -> bool {
    Path::new(CGROUP_ROOT).join("cgroup.controllers").exists()
}
