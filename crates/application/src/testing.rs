//! In-memory fakes for every port, shared by the service tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use scopecap_domain::{CropRect, Frame, ProjectName, ProjectRecord, Stroke, ZoomLevel};

use crate::{
    ApplicationError, CameraHandle, CameraProvider, CatalogStore, Clock, EditSession,
    ImageCodec, ImageEditor, ProjectService, ProjectStorage,
};

pub(crate) const ROOT: &str = "projects";

#[derive(Default)]
struct CatalogState {
    manifest: Option<Vec<ProjectRecord>>,
    corrupt: bool,
    saves: usize,
}

#[derive(Clone, Default)]
pub(crate) struct FakeCatalog {
    state: Rc<RefCell<CatalogState>>,
}

impl FakeCatalog {
    pub(crate) fn corrupt() -> Self {
        let catalog = Self::default();
        catalog.state.borrow_mut().manifest = Some(Vec::new());
        catalog.state.borrow_mut().corrupt = true;
        catalog
    }

    pub(crate) fn records(&self) -> Vec<ProjectRecord> {
        self.state.borrow().manifest.clone().unwrap_or_default()
    }

    pub(crate) fn has_manifest(&self) -> bool {
        self.state.borrow().manifest.is_some()
    }

    pub(crate) fn saves(&self) -> usize {
        self.state.borrow().saves
    }

    pub(crate) fn set_total_data(&self, name: &str, total_data: u64) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state
            .manifest
            .as_mut()
            .and_then(|records| records.iter_mut().find(|record| record.name == name))
        {
            record.total_data = total_data;
        }
    }
}

impl CatalogStore for FakeCatalog {
    fn initialize(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.borrow_mut();
        if state.manifest.is_none() {
            state.manifest = Some(Vec::new());
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<ProjectRecord>, ApplicationError> {
        let state = self.state.borrow();
        if state.corrupt {
            return Err(ApplicationError::CorruptManifest(
                "expected value at line 1 column 1".to_string(),
            ));
        }
        Ok(state.manifest.clone().unwrap_or_default())
    }

    fn save(&self, records: &[ProjectRecord]) -> Result<(), ApplicationError> {
        let mut state = self.state.borrow_mut();
        state.manifest = Some(records.to_vec());
        state.saves += 1;
        Ok(())
    }
}

#[derive(Default)]
struct StorageState {
    initialized: bool,
    dirs: BTreeMap<String, Vec<String>>,
    unnamed: BTreeMap<String, u64>,
    fail_create: bool,
    fail_remove: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeStorage {
    state: Rc<RefCell<StorageState>>,
}

impl FakeStorage {
    pub(crate) fn failing_create() -> Self {
        let storage = Self::default();
        storage.state.borrow_mut().fail_create = true;
        storage
    }

    pub(crate) fn fail_remove(&self) {
        self.state.borrow_mut().fail_remove = true;
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    pub(crate) fn has_dir(&self, project: &str) -> bool {
        self.state.borrow().dirs.contains_key(project)
    }

    pub(crate) fn files(&self, project: &str) -> Vec<String> {
        self.state
            .borrow()
            .dirs
            .get(project)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn add_file(&self, project: &str, file_name: &str) {
        self.state
            .borrow_mut()
            .dirs
            .entry(project.to_string())
            .or_default()
            .push(file_name.to_string());
    }

    /// A regular file whose name cannot be listed as UTF-8.
    pub(crate) fn add_unnamed_file(&self, project: &str) {
        let mut state = self.state.borrow_mut();
        state.dirs.entry(project.to_string()).or_default();
        *state.unnamed.entry(project.to_string()).or_default() += 1;
    }

    pub(crate) fn drop_dir(&self, project: &str) {
        let mut state = self.state.borrow_mut();
        state.dirs.remove(project);
        state.unnamed.remove(project);
    }
}

impl ProjectStorage for FakeStorage {
    fn initialize(&self) -> Result<(), ApplicationError> {
        self.state.borrow_mut().initialized = true;
        Ok(())
    }

    fn project_exists(&self, project: &ProjectName) -> Result<bool, ApplicationError> {
        Ok(self.has_dir(project.as_str()))
    }

    fn create_project_dir(&self, project: &ProjectName) -> Result<(), ApplicationError> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err(ApplicationError::Io("permission denied".to_string()));
        }
        let files = state.dirs.entry(project.as_str().to_string()).or_default();
        if !files.is_empty() {
            return Err(ApplicationError::AlreadyExists(format!(
                "directory for project {project} is not empty"
            )));
        }
        Ok(())
    }

    fn remove_project_dir(&self, project: &ProjectName) -> Result<bool, ApplicationError> {
        let mut state = self.state.borrow_mut();
        if state.fail_remove {
            return Err(ApplicationError::Io("permission denied".to_string()));
        }
        state.unnamed.remove(project.as_str());
        Ok(state.dirs.remove(project.as_str()).is_some())
    }

    fn list_files(&self, project: &ProjectName) -> Result<Vec<String>, ApplicationError> {
        self.state
            .borrow()
            .dirs
            .get(project.as_str())
            .cloned()
            .ok_or_else(|| ApplicationError::NotFound(format!("directory for {project}")))
    }

    fn count_files(&self, project: &ProjectName) -> Result<u64, ApplicationError> {
        let state = self.state.borrow();
        let named = state
            .dirs
            .get(project.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("directory for {project}")))?
            .len() as u64;
        Ok(named + state.unnamed.get(project.as_str()).copied().unwrap_or(0))
    }

    fn file_exists(
        &self,
        project: &ProjectName,
        file_name: &str,
    ) -> Result<bool, ApplicationError> {
        Ok(self.files(project.as_str()).iter().any(|name| name == file_name))
    }

    fn remove_file(&self, project: &ProjectName, file_name: &str) -> Result<(), ApplicationError> {
        let mut state = self.state.borrow_mut();
        let files = state
            .dirs
            .get_mut(project.as_str())
            .ok_or_else(|| ApplicationError::NotFound(format!("directory for {project}")))?;
        let position = files
            .iter()
            .position(|name| name == file_name)
            .ok_or_else(|| ApplicationError::NotFound(format!("image {file_name}")))?;
        files.remove(position);
        Ok(())
    }

    fn file_path(&self, project: &ProjectName, file_name: &str) -> PathBuf {
        Path::new(ROOT).join(project.as_str()).join(file_name)
    }
}

/// Writes land in the fake storage, keyed by the last two path components.
pub(crate) struct FakeCodec {
    storage: FakeStorage,
    fail: bool,
}

impl FakeCodec {
    pub(crate) fn new(storage: FakeStorage) -> Self {
        Self {
            storage,
            fail: false,
        }
    }

    pub(crate) fn failing(storage: FakeStorage) -> Self {
        Self {
            storage,
            fail: true,
        }
    }
}

impl ImageCodec for FakeCodec {
    fn write_frame(&self, _frame: &Frame, path: &Path) -> Result<(), ApplicationError> {
        if self.fail {
            return Err(ApplicationError::Codec("disk full".to_string()));
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApplicationError::Io(format!("bad path {path:?}")))?;
        let project = path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApplicationError::Io(format!("bad path {path:?}")))?;
        if !self.storage.has_dir(project) {
            return Err(ApplicationError::Io(format!("no directory for {path:?}")));
        }
        self.storage.add_file(project, file_name);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct CameraLog {
    pub(crate) opened: Rc<Cell<usize>>,
    pub(crate) closed: Rc<Cell<usize>>,
}

pub(crate) struct FakeCameras {
    devices: Vec<u32>,
    fail_reads: bool,
    log: CameraLog,
}

impl FakeCameras {
    pub(crate) fn new(devices: Vec<u32>) -> Self {
        Self {
            devices,
            fail_reads: false,
            log: CameraLog::default(),
        }
    }

    pub(crate) fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn log(&self) -> CameraLog {
        self.log.clone()
    }
}

struct FakeHandle {
    index: u32,
    fail_reads: bool,
    log: CameraLog,
}

impl CameraHandle for FakeHandle {
    fn device_index(&self) -> u32 {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame, ApplicationError> {
        if self.fail_reads {
            return Err(ApplicationError::ReadFailure(format!(
                "camera {} returned no frame",
                self.index
            )));
        }
        Ok(Frame::from_rgb(2, 2, vec![self.index as u8; 12])?)
    }

    fn close(self: Box<Self>) {
        self.log.closed.set(self.log.closed.get() + 1);
    }
}

impl CameraProvider for FakeCameras {
    fn open(&self, device_index: u32) -> Result<Box<dyn CameraHandle>, ApplicationError> {
        if !self.devices.contains(&device_index) {
            return Err(ApplicationError::DeviceUnavailable(format!(
                "camera {device_index}"
            )));
        }
        self.log.opened.set(self.log.opened.get() + 1);
        Ok(Box::new(FakeHandle {
            index: device_index,
            fail_reads: self.fail_reads,
            log: self.log.clone(),
        }))
    }
}

pub(crate) struct FakeEditor;

struct FakeSession {
    path: PathBuf,
    width: u32,
    height: u32,
    zoom: ZoomLevel,
}

impl EditSession for FakeSession {
    fn source_path(&self) -> &Path {
        &self.path
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn display_dimensions(&self) -> (u32, u32) {
        self.zoom.scale(self.width, self.height)
    }

    fn crop(&mut self, rect: CropRect) -> Result<(), ApplicationError> {
        let clamped = rect.clamp_to(self.width, self.height)?;
        self.width = clamped.width;
        self.height = clamped.height;
        Ok(())
    }

    fn draw_stroke(&mut self, stroke: &Stroke) -> Result<(), ApplicationError> {
        Ok(stroke.validate()?)
    }

    fn resize_to_width(&mut self, new_width: u32) -> Result<(), ApplicationError> {
        self.height = scopecap_domain::resized_height(self.width, self.height, new_width)?;
        self.width = new_width;
        Ok(())
    }

    fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    fn save(&self, _path: &Path, _at_display_scale: bool) -> Result<(), ApplicationError> {
        Ok(())
    }
}

impl ImageEditor for FakeEditor {
    fn open(&self, path: &Path) -> Result<Box<dyn EditSession>, ApplicationError> {
        Ok(Box::new(FakeSession {
            path: path.to_path_buf(),
            width: 64,
            height: 48,
            zoom: ZoomLevel::default(),
        }))
    }
}

pub(crate) struct FixedClock(pub(crate) NaiveDateTime);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .and_then(|date| date.and_hms_opt(9, 30, 15))
                .expect("valid datetime"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub(crate) fn project_service(catalog: &FakeCatalog, storage: &FakeStorage) -> ProjectService {
    ProjectService::new(
        Box::new(catalog.clone()),
        Box::new(storage.clone()),
        Box::new(FakeEditor),
        Box::<FixedClock>::default(),
    )
}
