use scopecap_domain::Frame;

#[derive(Debug, Clone, Default)]
pub struct BootstrapCommand;

#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct DeleteProjectCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ShowProjectCommand {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListProjectsCommand {
    pub reconcile: bool,
}

#[derive(Debug, Clone)]
pub struct ListImagesCommand {
    pub project: String,
}

#[derive(Debug, Clone)]
pub struct DeleteImageCommand {
    pub project: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ReconcileProjectCommand {
    pub project: String,
}

#[derive(Debug, Clone)]
pub struct BeginSyncCommand {
    pub project: String,
}

#[derive(Debug, Clone)]
pub struct OpenEditorCommand {
    pub project: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct CaptureCommand {
    pub project: String,
}

/// Outcome of one capture, returned to the shell for messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub project: String,
    pub file_name: String,
    pub sequence: u32,
    pub total_data: u64,
}

/// A frame handed out for live preview; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub device_index: u32,
    pub frame: Frame,
}
