use scopecap_application::CaptureReport;
use scopecap_domain::ProjectRecord;

pub fn present_project_row(record: &ProjectRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.name, record.created_at, record.total_data, record.sync_status
    )
}

pub fn present_project_details(record: &ProjectRecord) -> String {
    let description = if record.description.is_empty() {
        "-"
    } else {
        record.description.as_str()
    };
    format!(
        "Project: {}\nCreated: {}\nTotal Data: {}\nStatus: {}\nDescription: {}",
        record.name, record.created_at, record.total_data, record.sync_status, description
    )
}

pub fn present_capture(report: &CaptureReport) -> String {
    format!(
        "captured {} into {} (sequence {}, total {})",
        report.file_name, report.project, report.sequence, report.total_data
    )
}

pub fn present_dimensions(label: &str, (width, height): (u32, u32)) -> String {
    format!("{label} {width}x{height}")
}
