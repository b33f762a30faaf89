use chrono::NaiveDateTime;
use dossier_protocol::frame::ImportStage;
use dossier_protocol::records::TaskStatus;

/// Byte count in the unit the archive UI uses: 1024 steps, two decimals
/// from KB up.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.2} KB", value / KB)
    } else if value < GB {
        format!("{:.2} MB", value / MB)
    } else {
        format!("{:.2} GB", value / GB)
    }
}

pub fn stage_label(stage: ImportStage) -> &'static str {
    match stage {
        ImportStage::Upload => "uploading",
        ImportStage::Parse => "parsing",
        ImportStage::Analyze => "analyzing",
        ImportStage::Complete => "done",
    }
}

pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::Running => "Running",
        TaskStatus::Paused => "Paused",
        TaskStatus::Completed => "Completed",
        TaskStatus::Failed => "Failed",
    }
}

/// Table-friendly rendering of a backend timestamp. The server emits
/// ISO-8601 without an offset; anything unparseable is shown as received.
pub fn format_timestamp(raw: &str) -> String {
    const WIRE: &str = "%Y-%m-%dT%H:%M:%S%.f";
    const DISPLAY: &str = "%Y-%m-%d %H:%M";
    match NaiveDateTime::parse_from_str(raw.trim(), WIRE) {
        Ok(stamp) => stamp.format(DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}
