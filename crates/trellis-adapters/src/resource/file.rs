//! Filesystem resource loader using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use trellis_core::{
    application::{ApplicationError, ports::ResourceLoader},
    domain::Resource,
    error::{TrellisError, TrellisResult},
};

/// Prefix selecting the class path roots.
pub const CLASSPATH_PREFIX: &str = "classpath:";

/// Prefix selecting a plain file path.
pub const FILE_PREFIX: &str = "file:";

/// Production resource loader.
///
/// - `classpath:NAME` is looked up in each class path root in turn
/// - `file:PATH` and unprefixed locations are files; relative paths are
///   taken against the base directory
#[derive(Debug, Clone)]
pub struct FileSystemResourceLoader {
    base_dir: PathBuf,
    classpath_roots: Vec<PathBuf>,
}

impl FileSystemResourceLoader {
    /// Loader rooted at `base_dir`, which is also the only class path root.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            classpath_roots: vec![base_dir.clone()],
            base_dir,
        }
    }

    /// Replace the class path roots. Earlier roots win.
    pub fn with_classpath_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.classpath_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve_file(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn load_classpath(&self, location: &str, name: &str) -> TrellisResult<Resource> {
        let name = name.trim_start_matches('/');
        let found = self
            .classpath_roots
            .iter()
            .map(|root| root.join(name))
            .find(|candidate| candidate.is_file());

        match found {
            Some(path) => read(location, &path, format!("class path resource [{name}]")),
            None => Err(ApplicationError::ResourceNotFound {
                location: location.to_string(),
                reason: format!(
                    "class path resource [{name}] not found in {} root(s)",
                    self.classpath_roots.len()
                ),
            }
            .into()),
        }
    }
}

impl Default for FileSystemResourceLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ResourceLoader for FileSystemResourceLoader {
    #[instrument(skip(self))]
    fn get_resource(&self, location: &str) -> TrellisResult<Resource> {
        if let Some(name) = location.strip_prefix(CLASSPATH_PREFIX) {
            return self.load_classpath(location, name);
        }
        let path = self.resolve_file(location.strip_prefix(FILE_PREFIX).unwrap_or(location));
        let description = format!("file [{}]", path.display());
        read(location, &path, description)
    }
}

fn read(location: &str, path: &Path, description: String) -> TrellisResult<Resource> {
    let content = fs::read(path).map_err(|e| map_io_error(location, path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "Resource loaded");
    Ok(Resource::new(location, description, content))
}

fn map_io_error(location: &str, path: &Path, e: io::Error) -> TrellisError {
    let reason = format!("{}: {}", path.display(), e);
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::ResourceNotFound {
            location: location.to_string(),
            reason,
        },
        _ => ApplicationError::ResourceUnreadable {
            location: location.to_string(),
            reason,
        },
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        fs::write(temp.path().join("config/app.properties"), "k=v").unwrap();
        temp
    }

    #[test]
    fn loads_plain_and_file_prefixed_locations() {
        let temp = fixture();
        let loader = FileSystemResourceLoader::new(temp.path());

        let plain = loader.get_resource("config/app.properties").unwrap();
        let prefixed = loader.get_resource("file:config/app.properties").unwrap();

        assert_eq!(plain.content(), b"k=v");
        assert_eq!(prefixed.content(), b"k=v");
        assert!(plain.description().starts_with("file ["));
        assert_eq!(prefixed.location(), "file:config/app.properties");
    }

    #[test]
    fn classpath_searches_roots_in_order() {
        let first = TempDir::new().unwrap();
        let second = fixture();
        fs::write(first.path().join("app.properties"), "k=first").unwrap();
        let loader = FileSystemResourceLoader::new(first.path())
            .with_classpath_roots([first.path().to_path_buf(), second.path().join("config")]);

        let resource = loader.get_resource("classpath:app.properties").unwrap();

        assert_eq!(resource.content(), b"k=first");
        assert_eq!(resource.description(), "class path resource [app.properties]");
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let temp = fixture();
        let loader = FileSystemResourceLoader::new(temp.path());

        let err = loader.get_resource("classpath:nope.properties").unwrap_err();
        assert!(err.is_resource_resolution());

        let err = loader.get_resource("nope.properties").unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::ResourceNotFound { .. })
        ));
    }
}
