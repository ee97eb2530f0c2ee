use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use scopecap_application::{ApplicationError, ProjectStorage};
use scopecap_domain::ProjectName;
use walkdir::{DirEntry, WalkDir};

/// `{root}/{project}/{file}`: one flat directory per project.
#[derive(Debug, Clone)]
pub struct FsProjectStorage {
    root: PathBuf,
}

impl FsProjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_dir(&self, project: &ProjectName) -> PathBuf {
        self.root.join(project.as_str())
    }

    /// Regular files directly inside the project directory. Symlinks are
    /// followed, so a link to a file counts as a file.
    fn regular_files(&self, project: &ProjectName) -> Result<Vec<DirEntry>, ApplicationError> {
        let dir = self.project_dir(project);
        if !dir.is_dir() {
            return Err(ApplicationError::NotFound(format!(
                "directory {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|error| ApplicationError::Io(error.to_string()))?;
            if entry.path().is_file() {
                files.push(entry);
            }
        }
        Ok(files)
    }
}

impl ProjectStorage for FsProjectStorage {
    fn initialize(&self) -> Result<(), ApplicationError> {
        fs::create_dir_all(&self.root).map_err(|error| io_error(&self.root, error))
    }

    fn project_exists(&self, project: &ProjectName) -> Result<bool, ApplicationError> {
        Ok(self.project_dir(project).is_dir())
    }

    fn create_project_dir(&self, project: &ProjectName) -> Result<(), ApplicationError> {
        let dir = self.project_dir(project);
        match fs::create_dir(&dir) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                if !dir.is_dir() {
                    return Err(ApplicationError::AlreadyExists(format!(
                        "{} exists and is not a directory",
                        dir.display()
                    )));
                }
                let mut entries = fs::read_dir(&dir).map_err(|error| io_error(&dir, error))?;
                if entries.next().is_some() {
                    return Err(ApplicationError::AlreadyExists(format!(
                        "{} already holds files",
                        dir.display()
                    )));
                }
                debug!("adopting empty directory {}", dir.display());
                Ok(())
            }
            Err(error) => Err(io_error(&dir, error)),
        }
    }

    fn remove_project_dir(&self, project: &ProjectName) -> Result<bool, ApplicationError> {
        let dir = self.project_dir(project);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(io_error(&dir, error)),
        }
    }

    fn list_files(&self, project: &ProjectName) -> Result<Vec<String>, ApplicationError> {
        let mut files = Vec::new();
        for entry in self.regular_files(project)? {
            match entry.file_name().to_str() {
                Some(name) => files.push(name.to_string()),
                None => debug!("not listing non UTF-8 file name {:?}", entry.file_name()),
            }
        }
        Ok(files)
    }

    fn count_files(&self, project: &ProjectName) -> Result<u64, ApplicationError> {
        Ok(self.regular_files(project)?.len() as u64)
    }

    fn file_exists(
        &self,
        project: &ProjectName,
        file_name: &str,
    ) -> Result<bool, ApplicationError> {
        Ok(self.file_path(project, file_name).is_file())
    }

    fn remove_file(&self, project: &ProjectName, file_name: &str) -> Result<(), ApplicationError> {
        let path = self.file_path(project, file_name);
        if !path.is_file() {
            return Err(ApplicationError::NotFound(format!(
                "image {}",
                path.display()
            )));
        }
        fs::remove_file(&path).map_err(|error| io_error(&path, error))
    }

    fn file_path(&self, project: &ProjectName, file_name: &str) -> PathBuf {
        self.project_dir(project).join(file_name)
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ApplicationError {
    ApplicationError::Io(format!("{}: {error}", path.display()))
}
