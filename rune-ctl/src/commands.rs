use log::{debug, info, warn};
use rune_spec::{
    bundle, example, to_rootless, EnclaveConfig, HostIdentity, HostInfo, HostProbe, Result, Spec,
    SystemHost,
};
use std::path::PathBuf;

use crate::cli::SpecArgs;

/// Build the spec requested by `args` for the given host
pub fn build_spec(args: &SpecArgs, probe: &dyn HostProbe, identity: HostIdentity) -> Result<Spec> {
    let mut spec = example(probe);

    let defaults = EnclaveConfig::default();
    let enclave = EnclaveConfig {
        kind: args.enclave_type.clone().unwrap_or(defaults.kind),
        runtime_path: args
            .enclave_runtime_path
            .clone()
            .unwrap_or(defaults.runtime_path),
        runtime_args: args
            .enclave_runtime_args
            .clone()
            .unwrap_or(defaults.runtime_args),
    };
    debug!("Enclave: {:?}", enclave);
    enclave.apply(&mut spec);

    if args.rootless {
        debug!("Converting spec for uid {} gid {}", identity.uid, identity.gid);
        spec = to_rootless(spec, identity)?;
    } else if !identity.is_root() {
        warn!("Running as uid {}, consider --rootless", identity.uid);
    }

    Ok(spec)
}

pub fn generate_spec(args: &SpecArgs) -> Result<PathBuf> {
    info!("Generating spec in {}", args.bundle.display());
    let spec = build_spec(args, &SystemHost, HostIdentity::current())?;
    bundle::write_config(&args.bundle, &spec, args.force)
}

pub fn check_requirements() {
    info!("Checking host");
    println!("Checking host...\n");
    println!("{}", HostInfo::detect().summary());
}
