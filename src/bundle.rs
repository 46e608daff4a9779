//! Reading and writing `config.json` in a bundle directory

use log::{debug, info};
use rune_core::{Result, SpecError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::spec::Spec;

pub const CONFIG_FILE: &str = "config.json";

pub fn config_path(bundle: &Path) -> PathBuf {
    bundle.join(CONFIG_FILE)
}

/// Validate `spec` and write it to `<bundle>/config.json`.
///
/// An existing config is only replaced when `overwrite` is set.
pub fn write_config(bundle: &Path, spec: &Spec, overwrite: bool) -> Result<PathBuf> {
    spec.validate()?;

    let path = config_path(bundle);
    if !overwrite && path.exists() {
        return Err(SpecError::ConfigExists(path));
    }

    fs::create_dir_all(bundle)?;
    let mut data = serde_json::to_vec_pretty(spec)?;
    data.push(b'\n');

    let mut file = fs::File::create(&path)?;
    file.write_all(&data)?;
    file.sync_all()?;

    info!("Wrote {} ({} bytes)", path.display(), data.len());
    Ok(path)
}

/// Load `<bundle>/config.json`
pub fn load_config(bundle: &Path) -> Result<Spec> {
    let path = config_path(bundle);
    if !path.is_file() {
        return Err(SpecError::BundleNotFound(bundle.to_path_buf()));
    }

    debug!("Loading {}", path.display());
    let data = fs::read(&path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::example;
    use rune_core::FixedHost;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let spec = example(&FixedHost::new(true));

        let path = write_config(dir.path(), &spec, false).unwrap();
        assert_eq!(path, dir.path().join("config.json"));

        let loaded = load_config(dir.path()).unwrap();
        assert_eq!(loaded, spec);
    }

    #[test]
    fn test_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();

        let err = write_config(dir.path(), &Spec::default(), false).unwrap_err();
        assert!(matches!(err, SpecError::ConfigExists(_)));
        assert_eq!(fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(), "{}");
    }

    #[test]
    fn test_overwrite_replaces_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();

        write_config(dir.path(), &Spec::default(), true).unwrap();
        let loaded = load_config(dir.path()).unwrap();
        assert_eq!(loaded, Spec::default());
    }

    #[test]
    fn test_creates_missing_bundle_dir() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("nested").join("bundle");

        write_config(&bundle, &Spec::default(), false).unwrap();
        assert!(bundle.join(CONFIG_FILE).is_file());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, SpecError::BundleNotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_invalid_spec_not_written() {
        let dir = TempDir::new().unwrap();
        let spec = Spec {
            oci_version: String::new(),
            ..Default::default()
        };

        assert!(write_config(dir.path(), &spec, false).is_err());
        assert!(!dir.path().join(CONFIG_FILE).exists());
    }
}
