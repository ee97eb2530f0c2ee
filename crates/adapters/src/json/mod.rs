use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;
use scopecap_application::{ApplicationError, CatalogStore};
use scopecap_domain::ProjectRecord;

/// The project manifest as a single JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<(), ApplicationError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| io_error(parent, error))?;
            }
        }
        Ok(())
    }
}

impl CatalogStore for JsonCatalogStore {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "catalog path must not be empty".to_string(),
            ));
        }
        if self.path.exists() {
            return Ok(());
        }
        self.ensure_parent()?;
        self.save(&[])?;
        debug!("created empty manifest at {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Vec<ProjectRecord>, ApplicationError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(io_error(&self.path, error)),
        };
        serde_json::from_slice(&bytes).map_err(|error| {
            ApplicationError::CorruptManifest(format!("{}: {error}", self.path.display()))
        })
    }

    fn save(&self, records: &[ProjectRecord]) -> Result<(), ApplicationError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        let staging = self.staging_path();
        {
            let mut file = fs::File::create(&staging).map_err(|error| io_error(&staging, error))?;
            file.write_all(&json)
                .and_then(|()| file.sync_all())
                .map_err(|error| io_error(&staging, error))?;
        }
        fs::rename(&staging, &self.path).map_err(|error| io_error(&self.path, error))
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ApplicationError {
    ApplicationError::Io(format!("{}: {error}", path.display()))
}
