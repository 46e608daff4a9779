//! Enclave runtime metadata carried in spec annotations

use crate::spec::Spec;

pub const ANNOTATION_ENCLAVE_TYPE: &str = "enclave.type";
pub const ANNOTATION_RUNTIME_PATH: &str = "enclave.runtime.path";
pub const ANNOTATION_RUNTIME_ARGS: &str = "enclave.runtime.args";

/// Which enclave to launch and the runtime (PAL) that drives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclaveConfig {
    pub kind: String,
    pub runtime_path: String,
    pub runtime_args: String,
}

impl Default for EnclaveConfig {
    fn default() -> Self {
        Self {
            kind: "intelSgx".to_string(),
            runtime_path: "/var/run/rune/liberpal-skeleton-v1.so".to_string(),
            runtime_args: "skeleton,debug".to_string(),
        }
    }
}

impl EnclaveConfig {
    /// Read the enclave annotations back out of a spec
    pub fn from_spec(spec: &Spec) -> Option<Self> {
        Some(Self {
            kind: spec.annotation(ANNOTATION_ENCLAVE_TYPE)?.to_string(),
            runtime_path: spec.annotation(ANNOTATION_RUNTIME_PATH)?.to_string(),
            runtime_args: spec
                .annotation(ANNOTATION_RUNTIME_ARGS)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Write the three enclave annotations, replacing existing values
    pub fn apply(&self, spec: &mut Spec) {
        let entries = [
            (ANNOTATION_ENCLAVE_TYPE, &self.kind),
            (ANNOTATION_RUNTIME_PATH, &self.runtime_path),
            (ANNOTATION_RUNTIME_ARGS, &self.runtime_args),
        ];
        for (key, value) in entries {
            spec.annotations.insert(key.to_string(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_writes_annotations() {
        let mut spec = Spec::default();
        EnclaveConfig::default().apply(&mut spec);

        assert_eq!(spec.annotations.len(), 3);
        assert_eq!(spec.annotation(ANNOTATION_ENCLAVE_TYPE), Some("intelSgx"));
        assert_eq!(spec.annotation(ANNOTATION_RUNTIME_ARGS), Some("skeleton,debug"));
    }

    #[test]
    fn test_apply_replaces_existing_values() {
        let mut spec = Spec::default();
        EnclaveConfig::default().apply(&mut spec);

        let custom = EnclaveConfig {
            runtime_path: "/opt/pal/liberpal-occlum.so".to_string(),
            runtime_args: String::new(),
            ..Default::default()
        };
        custom.apply(&mut spec);

        assert_eq!(EnclaveConfig::from_spec(&spec), Some(custom));
    }

    #[test]
    fn test_from_spec_without_annotations() {
        assert_eq!(EnclaveConfig::from_spec(&Spec::default()), None);
    }
}
