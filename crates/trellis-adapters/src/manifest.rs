//! Filesystem-based configuration manifest loader.
//!
//! A manifest declares configuration units and their property sources:
//!
//! ```toml
//! [[unit]]
//! name = "BaseConfig"
//!
//! [[unit.property_source]]
//! name = "app"
//! locations = ["classpath:app.properties", "file:conf/${profile:dev}.properties"]
//! ignore_resource_not_found = false   # optional
//! factory = "properties"              # optional; default picks by extension
//! encoding = "UTF-8"                  # optional
//! ```
//!
//! A directory is loaded by reading every `*.toml` below it in file-name
//! order.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use trellis_core::{
    application::ApplicationError,
    domain::{ConfigurationUnit, DomainValidator as validator},
    error::{TrellisError, TrellisResult},
};

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default, rename = "unit")]
    units: Vec<ConfigurationUnit>,
}

/// Reads configuration units from TOML manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse manifest text. `origin` names the source in errors.
    pub fn parse_str(&self, text: &str, origin: &str) -> TrellisResult<Vec<ConfigurationUnit>> {
        let manifest: Manifest = toml::from_str(text).map_err(|e| ApplicationError::InvalidManifest {
            path: origin.to_string(),
            reason: e.message().to_string(),
        })?;

        for unit in &manifest.units {
            validator::validate_configuration_unit(unit)?;
        }
        Ok(manifest.units)
    }

    /// Load a single manifest file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> TrellisResult<Vec<ConfigurationUnit>> {
        let text = fs::read_to_string(path).map_err(|e| map_io_error(path, e))?;
        let units = self.parse_str(&text, &path.display().to_string())?;
        debug!(units = units.len(), "Manifest loaded");
        Ok(units)
    }

    /// Load every `*.toml` manifest under `dir`, in file-name order.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn load_dir(&self, dir: &Path) -> TrellisResult<Vec<ConfigurationUnit>> {
        if !dir.is_dir() {
            return Err(ApplicationError::ResourceNotFound {
                location: dir.display().to_string(),
                reason: "manifest directory not found".into(),
            }
            .into());
        }

        let mut units = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::ResourceUnreadable {
                location: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                units.extend(self.load_file(path)?);
            }
        }
        debug!(units = units.len(), "Manifest directory loaded");
        Ok(units)
    }

    /// Load a file or a directory, whichever `path` is.
    pub fn load(&self, path: &Path) -> TrellisResult<Vec<ConfigurationUnit>> {
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path)
        }
    }
}

/// Directory relative locations of a manifest resolve against.
pub fn manifest_base_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

fn map_io_error(path: &Path, e: io::Error) -> TrellisError {
    let location = path.display().to_string();
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::ResourceNotFound {
            location,
            reason: "manifest not found".into(),
        },
        _ => ApplicationError::ResourceUnreadable {
            location,
            reason: e.to_string(),
        },
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use trellis_core::error::ErrorCategory;

    const MANIFEST: &str = r#"
[[unit]]
name = "BaseConfig"

[[unit.property_source]]
name = "app"
locations = ["classpath:app.properties"]

[[unit.property_source]]
locations = ["file:optional.toml"]
ignore_resource_not_found = true
factory = "toml"

[[unit]]
name = "ProdConfig"

[[unit.property_source]]
name = "app"
locations = ["prod.properties"]
encoding = "ISO-8859-1"
"#;

    #[test]
    fn parses_units_in_order() {
        let units = ManifestLoader::new().parse_str(MANIFEST, "inline").unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name(), "BaseConfig");
        assert_eq!(units[0].property_sources().len(), 2);
        let optional = &units[0].property_sources()[1];
        assert!(optional.ignore_resource_not_found());
        assert_eq!(optional.factory(), Some("toml"));
        assert_eq!(units[1].property_sources()[0].encoding(), Some("ISO-8859-1"));
    }

    #[test]
    fn empty_locations_fail_validation() {
        let text = "[[unit]]\nname = \"x\"\n[[unit.property_source]]\nlocations = []\n";

        let err = ManifestLoader::new().parse_str(text, "inline").unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn syntax_error_is_invalid_manifest() {
        let err = ManifestLoader::new().parse_str("[[unit]\n", "broken.toml").unwrap_err();

        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::InvalidManifest { ref path, .. }) if path == "broken.toml"
        ));
    }

    #[test]
    fn directory_loads_in_file_name_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("20-prod.toml"), "[[unit]]\nname = \"Prod\"\n").unwrap();
        fs::write(temp.path().join("10-base.toml"), "[[unit]]\nname = \"Base\"\n").unwrap();
        fs::write(temp.path().join("README.md"), "ignored").unwrap();

        let units = ManifestLoader::new().load(temp.path()).unwrap();

        let names: Vec<&str> = units.iter().map(ConfigurationUnit::name).collect();
        assert_eq!(names, vec!["Base", "Prod"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = ManifestLoader::new()
            .load_file(Path::new("/does/not/exist/trellis.toml"))
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::ResourceResolution);
    }

    #[test]
    fn base_dir_of_bare_file_is_current_dir() {
        assert_eq!(manifest_base_dir(Path::new("trellis.toml")), PathBuf::from("."));
        assert_eq!(
            manifest_base_dir(Path::new("conf/trellis.toml")),
            PathBuf::from("conf")
        );
    }
}
