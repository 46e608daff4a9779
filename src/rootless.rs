//! Conversion of a spec for rootless containers (euid != 0)
//!
//! An unprivileged user cannot join a new network namespace, write arbitrary
//! ID maps, mount a fresh sysfs or manage cgroups. [`to_rootless`] removes
//! those parts of a spec and adds what a user namespace needs instead. Each
//! step is a separate function applied in a fixed order.

use log::debug;
use rune_core::{HostIdentity, Result};

use crate::spec::{IdMapping, Mount, Namespace, NamespaceType, Spec};

/// Destination prefix of mounts an unprivileged user cannot create
pub const SYSFS_PREFIX: &str = "/sys";

pub const SYSFS_BIND_OPTIONS: [&str; 5] = ["rbind", "nosuid", "noexec", "nodev", "ro"];

/// Convert `spec` into one a non-root user can run.
///
/// The linux section is required. Applying the conversion to its own output
/// returns the same spec.
pub fn to_rootless(spec: Spec, identity: HostIdentity) -> Result<Spec> {
    let spec = rewrite_namespaces(spec)?;
    let spec = map_identity(spec, identity)?;
    let spec = rewrite_mounts(spec);
    strip_resources(spec)
}

/// Drop network and user namespaces, then add a single user namespace
pub fn rewrite_namespaces(mut spec: Spec) -> Result<Spec> {
    let linux = spec.linux_mut()?;

    let mut namespaces: Vec<Namespace> = linux
        .namespaces
        .drain(..)
        .filter(|ns| !matches!(ns.kind, NamespaceType::Network | NamespaceType::User))
        .collect();
    namespaces.push(Namespace::new(NamespaceType::User));

    debug!(
        "rootless namespaces: {:?}",
        namespaces.iter().map(|ns| ns.kind).collect::<Vec<_>>()
    );
    linux.namespaces = namespaces;

    Ok(spec)
}

/// Map the caller's effective UID/GID to root inside the container and
/// nothing else
pub fn map_identity(mut spec: Spec, identity: HostIdentity) -> Result<Spec> {
    let linux = spec.linux_mut()?;

    linux.uid_mappings = vec![IdMapping::to_root(identity.uid)];
    linux.gid_mappings = vec![IdMapping::to_root(identity.gid)];
    debug!("mapping uid {} and gid {} to root", identity.uid, identity.gid);

    Ok(spec)
}

/// Remove mounts under `/sys` and ownership options, then bind the host's
/// `/sys` read-only
pub fn rewrite_mounts(mut spec: Spec) -> Spec {
    let mut mounts: Vec<Mount> = Vec::with_capacity(spec.mounts.len() + 1);

    for mut mount in spec.mounts.drain(..) {
        if mount.destination_starts_with(SYSFS_PREFIX) {
            debug!("dropping mount {} ({})", mount.destination, mount.kind);
            continue;
        }
        mount.options.retain(|opt| !is_ownership_option(opt));
        mounts.push(mount);
    }

    mounts.push(Mount::new(
        SYSFS_PREFIX,
        "none",
        SYSFS_PREFIX,
        &SYSFS_BIND_OPTIONS,
    ));
    spec.mounts = mounts;

    spec
}

/// Drop cgroup resource settings, which need delegation a rootless user
/// cannot be assumed to have
pub fn strip_resources(mut spec: Spec) -> Result<Spec> {
    let linux = spec.linux_mut()?;
    if linux.resources.take().is_some() {
        debug!("removed cgroup resources");
    }
    Ok(spec)
}

fn is_ownership_option(option: &str) -> bool {
    option.starts_with("uid=") || option.starts_with("gid=")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Linux, Resources};
    use rune_core::SpecError;

    fn spec_with(namespaces: &[NamespaceType], mounts: Vec<Mount>) -> Spec {
        Spec {
            mounts,
            linux: Some(Linux {
                namespaces: namespaces.iter().copied().map(Namespace::new).collect(),
                resources: Some(Resources::default()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn kinds(spec: &Spec) -> Vec<NamespaceType> {
        spec.linux
            .as_ref()
            .unwrap()
            .namespaces
            .iter()
            .map(|ns| ns.kind)
            .collect()
    }

    #[test]
    fn test_network_namespace_removed() {
        let spec = spec_with(&[NamespaceType::Pid, NamespaceType::Network], vec![]);
        let spec = rewrite_namespaces(spec).unwrap();
        assert_eq!(kinds(&spec), vec![NamespaceType::Pid, NamespaceType::User]);
    }

    #[test]
    fn test_existing_user_namespace_not_duplicated() {
        let spec = spec_with(
            &[NamespaceType::User, NamespaceType::Mount, NamespaceType::User],
            vec![],
        );
        let spec = rewrite_namespaces(spec).unwrap();
        assert_eq!(kinds(&spec), vec![NamespaceType::Mount, NamespaceType::User]);
    }

    #[test]
    fn test_empty_namespaces_gain_user() {
        let spec = rewrite_namespaces(spec_with(&[], vec![])).unwrap();
        assert_eq!(kinds(&spec), vec![NamespaceType::User]);
    }

    #[test]
    fn test_identity_mapping() {
        let spec = map_identity(spec_with(&[], vec![]), HostIdentity::new(1234, 5678)).unwrap();
        let linux = spec.linux.unwrap();
        assert_eq!(linux.uid_mappings, vec![IdMapping::to_root(1234)]);
        assert_eq!(linux.gid_mappings, vec![IdMapping::to_root(5678)]);
    }

    #[test]
    fn test_identity_mapping_replaces_previous() {
        let mut spec = spec_with(&[], vec![]);
        spec.linux.as_mut().unwrap().uid_mappings = vec![
            IdMapping {
                container_id: 0,
                host_id: 100000,
                size: 65536,
            },
            IdMapping::to_root(1),
        ];
        let spec = map_identity(spec, HostIdentity::new(1000, 1000)).unwrap();
        assert_eq!(spec.linux.unwrap().uid_mappings.len(), 1);
    }

    #[test]
    fn test_sys_mounts_dropped_by_prefix() {
        let spec = rewrite_mounts(spec_with(
            &[],
            vec![
                Mount::new("/proc", "proc", "proc", &[]),
                Mount::new("/sys", "sysfs", "sysfs", &["ro"]),
                Mount::new("/sys/kernel/security", "securityfs", "securityfs", &[]),
                Mount::new("/tmp", "tmpfs", "tmpfs", &[]),
            ],
        ));

        let destinations: Vec<&str> = spec.mounts.iter().map(|m| m.destination.as_str()).collect();
        assert_eq!(destinations, vec!["/proc", "/tmp", "/sys"]);
    }

    #[test]
    fn test_ownership_options_scrubbed_in_order() {
        let spec = rewrite_mounts(spec_with(
            &[],
            vec![Mount::new(
                "/dev/pts",
                "devpts",
                "devpts",
                &["nosuid", "uid=5", "noexec", "gid=5", "mode=0620", "nouid=1"],
            )],
        ));
        assert_eq!(
            spec.mounts[0].options,
            vec!["nosuid", "noexec", "mode=0620", "nouid=1"]
        );
    }

    #[test]
    fn test_sysfs_bind_appended() {
        let spec = rewrite_mounts(spec_with(&[], vec![]));
        assert_eq!(spec.mounts.len(), 1);

        let sys = &spec.mounts[0];
        assert_eq!(sys.destination, "/sys");
        assert_eq!(sys.source, "/sys");
        assert_eq!(sys.kind, "none");
        assert_eq!(sys.options, SYSFS_BIND_OPTIONS);
    }

    #[test]
    fn test_resources_stripped() {
        let spec = strip_resources(spec_with(&[], vec![])).unwrap();
        assert!(spec.linux.unwrap().resources.is_none());
    }

    #[test]
    fn test_missing_linux_is_rejected() {
        let result = to_rootless(Spec::default(), HostIdentity::new(1000, 1000));
        assert!(matches!(result, Err(SpecError::MissingLinux)));
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let spec = spec_with(
            &[NamespaceType::Pid, NamespaceType::Network],
            vec![
                Mount::new("/dev", "tmpfs", "tmpfs", &["uid=0", "mode=755"]),
                Mount::new("/sys", "sysfs", "sysfs", &["ro"]),
            ],
        );
        let id = HostIdentity::new(1000, 1000);

        let once = to_rootless(spec, id).unwrap();
        let twice = to_rootless(once.clone(), id).unwrap();
        assert_eq!(once, twice);
    }
}
