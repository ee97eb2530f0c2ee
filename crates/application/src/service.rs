use std::path::PathBuf;

use log::{debug, info, warn};
use scopecap_domain::{
    is_recognized_image, validate_file_name, ProjectName, ProjectRecord, SyncStatus,
};

use crate::catalog::{find_by_name, find_by_name_mut};
use crate::{
    ApplicationError, BeginSyncCommand, BootstrapCommand, CatalogStore, Clock,
    CreateProjectCommand, DeleteImageCommand, DeleteProjectCommand, EditSession, ImageEditor,
    ListImagesCommand, ListProjectsCommand, OpenEditorCommand, ProjectStorage,
    ReconcileProjectCommand, ShowProjectCommand,
};

/// Keeps the manifest and the project directory tree in lockstep.
pub struct ProjectService {
    catalog: Box<dyn CatalogStore>,
    storage: Box<dyn ProjectStorage>,
    editor: Box<dyn ImageEditor>,
    clock: Box<dyn Clock>,
}

impl ProjectService {
    pub fn new(
        catalog: Box<dyn CatalogStore>,
        storage: Box<dyn ProjectStorage>,
        editor: Box<dyn ImageEditor>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            storage,
            editor,
            clock,
        }
    }

    /// First-run setup. Also reads the manifest once so a corrupt catalog
    /// fails at startup rather than on the first user action.
    pub fn bootstrap(&self, _command: BootstrapCommand) -> Result<(), ApplicationError> {
        self.catalog.initialize()?;
        self.storage.initialize()?;
        let records = self.catalog.load()?;
        debug!("catalog ready with {} project(s)", records.len());
        Ok(())
    }

    pub fn create_project(
        &self,
        command: CreateProjectCommand,
    ) -> Result<ProjectRecord, ApplicationError> {
        let name = parse_project_name(&command.name)?;
        let previous = self.catalog.load()?;
        if find_by_name(&previous, name.as_str()).is_some() {
            return Err(ApplicationError::AlreadyExists(format!("project {name}")));
        }

        let record = ProjectRecord::new(&name, &command.description, self.clock.now());
        let mut records = previous.clone();
        records.push(record.clone());
        self.catalog.save(&records)?;

        if let Err(error) = self.storage.create_project_dir(&name) {
            warn!("rolling back catalog entry for {name}: {error}");
            self.catalog.save(&previous)?;
            return Err(error);
        }

        info!("created project {name}");
        Ok(record)
    }

    /// The catalog record is gone once this returns, even when removing the
    /// directory fails afterwards.
    pub fn delete_project(&self, command: DeleteProjectCommand) -> Result<(), ApplicationError> {
        let name = parse_project_name(&command.name)?;
        let mut records = self.catalog.load()?;
        let position = records
            .iter()
            .position(|record| record.name == name.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("project {name}")))?;
        records.remove(position);
        self.catalog.save(&records)?;

        if !self.storage.remove_project_dir(&name)? {
            warn!("directory for deleted project {name} was already missing");
        }
        info!("deleted project {name}");
        Ok(())
    }

    pub fn find_project(
        &self,
        command: ShowProjectCommand,
    ) -> Result<ProjectRecord, ApplicationError> {
        let records = self.catalog.load()?;
        find_by_name(&records, &command.name)
            .cloned()
            .ok_or_else(|| ApplicationError::NotFound(format!("project {}", command.name)))
    }

    pub fn list_projects(
        &self,
        command: ListProjectsCommand,
    ) -> Result<Vec<ProjectRecord>, ApplicationError> {
        let mut records = self.catalog.load()?;
        if !command.reconcile {
            return Ok(records);
        }

        let mut drifted = false;
        for record in records.iter_mut() {
            let name = match ProjectName::parse(&record.name) {
                Ok(name) => name,
                Err(error) => {
                    warn!("skipping reconcile of {:?}: {error}", record.name);
                    continue;
                }
            };
            let actual = self.count_files(&name)?;
            if actual != record.total_data {
                warn!(
                    "project {name} listed {} file(s) but holds {actual}",
                    record.total_data
                );
                record.total_data = actual;
                drifted = true;
            }
        }
        if drifted {
            self.catalog.save(&records)?;
        }
        Ok(records)
    }

    /// Recognized image files of the project, in directory enumeration order.
    pub fn list_images(&self, command: ListImagesCommand) -> Result<Vec<String>, ApplicationError> {
        let name = parse_project_name(&command.project)?;
        self.require_project(&name)?;
        let files = self.storage.list_files(&name)?;
        Ok(files
            .into_iter()
            .filter(|file_name| is_recognized_image(file_name))
            .collect())
    }

    /// Removes one file and recounts every regular file left in the
    /// directory, whatever its extension.
    pub fn delete_image(
        &self,
        command: DeleteImageCommand,
    ) -> Result<ProjectRecord, ApplicationError> {
        let name = parse_project_name(&command.project)?;
        validate_file_name(&command.file_name)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        let mut records = self.catalog.load()?;
        if find_by_name(&records, name.as_str()).is_none() {
            return Err(ApplicationError::NotFound(format!("project {name}")));
        }

        self.storage.remove_file(&name, &command.file_name)?;
        let remaining = self.count_files(&name)?;
        let record = find_by_name_mut(&mut records, name.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("project {name}")))?;
        record.total_data = remaining;
        let updated = record.clone();
        self.catalog.save(&records)?;

        info!(
            "deleted image {} from {name}, {remaining} file(s) left",
            command.file_name
        );
        Ok(updated)
    }

    /// First half of a capture: reserves the next sequence number
    /// (`regular files + 1`) and bumps `total_data`. The caller writes the
    /// image afterwards and calls `reconcile` if that write fails.
    pub fn record_capture(&self, project: &ProjectName) -> Result<u32, ApplicationError> {
        let mut records = self.catalog.load()?;
        let record = find_by_name_mut(&mut records, project.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("project {project}")))?;

        if !self.storage.project_exists(project)? {
            warn!("recreating missing directory for project {project}");
            self.storage.create_project_dir(project)?;
        }
        let existing = self.storage.count_files(project)?;
        let sequence = u32::try_from(existing + 1).map_err(|_| {
            ApplicationError::InvalidInput(format!("project {project} holds too many files"))
        })?;

        record.total_data += 1;
        self.catalog.save(&records)?;
        debug!("reserved capture sequence {sequence} in {project}");
        Ok(sequence)
    }

    /// Sets `total_data` to the number of regular files actually present.
    /// Saves only when the count drifted.
    pub fn reconcile(&self, project: &ProjectName) -> Result<ProjectRecord, ApplicationError> {
        let mut records = self.catalog.load()?;
        let actual = self.count_files(project)?;
        let record = find_by_name_mut(&mut records, project.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("project {project}")))?;
        if record.total_data == actual {
            debug!("project {project} already consistent at {actual} file(s)");
            return Ok(record.clone());
        }

        warn!(
            "reconciling project {project}: {} -> {actual} file(s)",
            record.total_data
        );
        record.total_data = actual;
        let updated = record.clone();
        self.catalog.save(&records)?;
        Ok(updated)
    }

    pub fn reconcile_project(
        &self,
        command: ReconcileProjectCommand,
    ) -> Result<ProjectRecord, ApplicationError> {
        let name = parse_project_name(&command.project)?;
        self.reconcile(&name)
    }

    /// Placeholder for networked sync: only flips the status.
    pub fn begin_sync(&self, command: BeginSyncCommand) -> Result<ProjectRecord, ApplicationError> {
        let mut records = self.catalog.load()?;
        let record = find_by_name_mut(&mut records, &command.project)
            .ok_or_else(|| ApplicationError::NotFound(format!("project {}", command.project)))?;
        record.sync_status = SyncStatus::Syncing;
        let updated = record.clone();
        self.catalog.save(&records)?;
        info!("project {} marked as syncing", command.project);
        Ok(updated)
    }

    pub fn open_editor(
        &self,
        command: OpenEditorCommand,
    ) -> Result<Box<dyn EditSession>, ApplicationError> {
        let name = parse_project_name(&command.project)?;
        validate_file_name(&command.file_name)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        self.require_project(&name)?;
        if !self.storage.file_exists(&name, &command.file_name)? {
            return Err(ApplicationError::NotFound(format!(
                "image {} in project {name}",
                command.file_name
            )));
        }
        self.editor
            .open(&self.storage.file_path(&name, &command.file_name))
    }

    pub fn image_exists(
        &self,
        project: &ProjectName,
        file_name: &str,
    ) -> Result<bool, ApplicationError> {
        self.storage.file_exists(project, file_name)
    }

    pub fn image_path(&self, project: &ProjectName, file_name: &str) -> PathBuf {
        self.storage.file_path(project, file_name)
    }

    fn require_project(&self, name: &ProjectName) -> Result<(), ApplicationError> {
        let records = self.catalog.load()?;
        if find_by_name(&records, name.as_str()).is_none() {
            return Err(ApplicationError::NotFound(format!("project {name}")));
        }
        Ok(())
    }

    /// A missing directory counts as empty.
    fn count_files(&self, project: &ProjectName) -> Result<u64, ApplicationError> {
        if !self.storage.project_exists(project)? {
            return Ok(0);
        }
        self.storage.count_files(project)
    }
}

pub(crate) fn parse_project_name(value: &str) -> Result<ProjectName, ApplicationError> {
    ProjectName::parse(value).map_err(|error| ApplicationError::InvalidInput(error.to_string()))
}
