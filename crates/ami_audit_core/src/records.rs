use chrono::NaiveDateTime;

/// Placeholder shown for resources that carry no name.
pub const UNNAMED_RESOURCE: &str = "N/A";

/// A machine image owned by the account, tagged with its source region.
///
/// The creation date is carried verbatim as the provider's ISO-8601 string
/// (`%Y-%m-%dT%H:%M:%S%.fZ`, UTC); it is parsed during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub image_id: String,
    pub name: Option<String>,
    pub creation_date: String,
    pub region: String,
}

impl ImageRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_RESOURCE)
    }
}

/// A block storage snapshot owned by the account, tagged with its source
/// region. The start time is normalized to timezone-naive UTC by the
/// collector before the record is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub snapshot_id: String,
    pub name: Option<String>,
    pub start_time: NaiveDateTime,
    pub region: String,
}

impl SnapshotRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_RESOURCE)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn display_name_defaults_to_placeholder() {
        let image = ImageRecord {
            image_id: "ami-0123".to_string(),
            name: None,
            creation_date: "2024-03-01T10:00:00.000Z".to_string(),
            region: "eu-west-1".to_string(),
        };
        assert_eq!(image.display_name(), "N/A");

        let snapshot = SnapshotRecord {
            snapshot_id: "snap-0123".to_string(),
            name: Some("nightly-backup".to_string()),
            start_time: NaiveDate::from_ymd_opt(2024, 3, 1)
                .expect("valid date")
                .and_hms_opt(10, 0, 0)
                .expect("valid time"),
            region: "us-east-1".to_string(),
        };
        assert_eq!(snapshot.display_name(), "nightly-backup");
    }
}
