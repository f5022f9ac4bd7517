use chrono::NaiveDateTime;

/// Logical folder every report object is stored under.
pub const REPORT_FOLDER: &str = "Old-AMI-Snapshot";

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d__%H-%M-%S";

/// File name embedding the capture instant. The `AMIs__` segment is present
/// only when stale AMI data exists.
pub fn report_file_name(include_amis: bool, captured_at: NaiveDateTime) -> String {
    let timestamp = captured_at.format(FILE_TIMESTAMP_FORMAT);
    if include_amis {
        format!("AMIs__Snapshots__before_7_days__{timestamp}.csv")
    } else {
        format!("Snapshots__before_7_days__{timestamp}.csv")
    }
}

pub fn report_object_key(file_name: &str) -> String {
    format!("{REPORT_FOLDER}/{file_name}")
}
