//! Default spec for enclave containers
//!
//! Produces a conservative baseline: minimal capabilities, no new privileges,
//! host information under `/proc` and `/sys` masked, and every device denied
//! until the runtime adds explicit allow rules.

use log::debug;
use rune_core::{HostProbe, SystemHost};

use crate::enclave::EnclaveConfig;
use crate::spec::{
    Capabilities, DeviceRule, Linux, Mount, Namespace, NamespaceType, Process, Resources, Rlimit,
    RlimitType, Root, Spec, User, OCI_VERSION,
};

pub const DEFAULT_ROOTFS: &str = "rootfs";
pub const DEFAULT_HOSTNAME: &str = "rune";
pub const DEFAULT_CWD: &str = "/var/run/rune";
pub const DEFAULT_PATH: &str = "PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Host directory of the SGX architectural enclave service socket
pub const AESMD_SOCKET_DIR: &str = "/var/run/aesmd";

pub const DEFAULT_CAPABILITIES: [&str; 3] = ["CAP_AUDIT_WRITE", "CAP_KILL", "CAP_NET_BIND_SERVICE"];

pub const DEFAULT_NOFILE: u64 = 1024;

pub const MASKED_PATHS: [&str; 10] = [
    "/proc/acpi",
    "/proc/asound",
    "/proc/kcore",
    "/proc/keys",
    "/proc/latency_stats",
    "/proc/timer_list",
    "/proc/timer_stats",
    "/proc/sched_debug",
    "/sys/firmware",
    "/proc/scsi",
];

pub const READONLY_PATHS: [&str; 5] = [
    "/proc/bus",
    "/proc/fs",
    "/proc/irq",
    "/proc/sys",
    "/proc/sysrq-trigger",
];

/// Build the default spec, adding a cgroup namespace when `probe` reports a
/// unified cgroup hierarchy
pub fn example(probe: &dyn HostProbe) -> Spec {
    let mut spec = Spec {
        oci_version: OCI_VERSION.to_string(),
        root: Some(Root {
            path: DEFAULT_ROOTFS.to_string(),
            readonly: false,
        }),
        process: Some(default_process()),
        hostname: DEFAULT_HOSTNAME.to_string(),
        mounts: default_mounts(),
        linux: Some(default_linux()),
        ..Default::default()
    };
    EnclaveConfig::default().apply(&mut spec);

    if probe.cgroup_unified_mode() {
        debug!("cgroup v2 unified mode, adding cgroup namespace");
        if let Some(linux) = spec.linux.as_mut() {
            linux.namespaces.push(Namespace::new(NamespaceType::Cgroup));
        }
    }

    spec
}

/// [`example`] against the running host
pub fn example_for_host() -> Spec {
    example(&SystemHost)
}

fn default_process() -> Process {
    Process {
        terminal: true,
        user: User::default(),
        args: vec!["sh".to_string()],
        env: vec![DEFAULT_PATH.to_string(), "TERM=xterm".to_string()],
        cwd: DEFAULT_CWD.to_string(),
        capabilities: Some(Capabilities::uniform(&DEFAULT_CAPABILITIES)),
        rlimits: vec![Rlimit::fixed(RlimitType::Nofile, DEFAULT_NOFILE)],
        no_new_privileges: true,
    }
}

fn default_mounts() -> Vec<Mount> {
    vec![
        Mount::new("/proc", "proc", "proc", &[]),
        Mount::new(
            "/dev",
            "tmpfs",
            "tmpfs",
            &["nosuid", "strictatime", "mode=755", "size=65536k"],
        ),
        Mount::new(
            "/dev/pts",
            "devpts",
            "devpts",
            &[
                "nosuid",
                "noexec",
                "newinstance",
                "ptmxmode=0666",
                "mode=0620",
                "gid=5",
            ],
        ),
        Mount::new(
            "/dev/shm",
            "tmpfs",
            "shm",
            &["nosuid", "noexec", "nodev", "mode=1777", "size=65536k"],
        ),
        Mount::new("/dev/mqueue", "mqueue", "mqueue", &["nosuid", "noexec", "nodev"]),
        Mount::new("/sys", "sysfs", "sysfs", &["nosuid", "noexec", "nodev", "ro"]),
        Mount::new(
            "/sys/fs/cgroup",
            "cgroup",
            "cgroup",
            &["nosuid", "noexec", "nodev", "relatime", "ro"],
        ),
        Mount::new(AESMD_SOCKET_DIR, "bind", AESMD_SOCKET_DIR, &["rbind", "rprivate"]),
    ]
}

fn default_linux() -> Linux {
    Linux {
        masked_paths: MASKED_PATHS.iter().map(|p| p.to_string()).collect(),
        readonly_paths: READONLY_PATHS.iter().map(|p| p.to_string()).collect(),
        resources: Some(Resources {
            devices: vec![DeviceRule::catch_all(false, "rwm")],
        }),
        namespaces: [
            NamespaceType::Pid,
            NamespaceType::Ipc,
            NamespaceType::Uts,
            NamespaceType::Mount,
        ]
        .into_iter()
        .map(Namespace::new)
        .collect(),
        ..Default::default()
    }
}
