use chrono::{Duration, NaiveDateTime};

use crate::records::{ImageRecord, SnapshotRecord};

/// Resources created strictly before `now - STALE_AFTER_DAYS` are stale.
pub const STALE_AFTER_DAYS: i64 = 7;

/// Format of the provider's image creation timestamp.
pub const IMAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyError {
    message: String,
}

impl ClassifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClassifyError {}

/// One stale resource, flattened to the strings that appear in report rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleItem {
    pub name: String,
    pub id: String,
    pub date: String,
    pub time: String,
    pub region: String,
}

/// Per-collection counts. The oldest instant is tracked across the whole
/// collection, stale or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionStats {
    pub total: usize,
    pub stale: usize,
    pub oldest: Option<NaiveDateTime>,
}

impl CollectionStats {
    pub fn recent(&self) -> usize {
        self.total - self.stale
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub image_stats: CollectionStats,
    pub snapshot_stats: CollectionStats,
    pub stale_images: Vec<StaleItem>,
    pub stale_snapshots: Vec<StaleItem>,
    pub summary_text: String,
}

impl Classification {
    pub fn has_stale_snapshots(&self) -> bool {
        !self.stale_snapshots.is_empty()
    }

    pub fn has_stale_images(&self) -> bool {
        !self.stale_images.is_empty()
    }
}

/// Partitions both collections against a single cutoff computed once from
/// `now`. A malformed image timestamp aborts the whole classification; the
/// snapshot pass cannot fail because start times arrive pre-parsed.
pub fn classify(
    images: &[ImageRecord],
    snapshots: &[SnapshotRecord],
    now: NaiveDateTime,
) -> Result<Classification, ClassifyError> {
    let cutoff = now - Duration::days(STALE_AFTER_DAYS);

    let (image_stats, stale_images, image_summary) = classify_images(images, cutoff)?;
    let (snapshot_stats, stale_snapshots, snapshot_summary) =
        classify_snapshots(snapshots, cutoff);

    Ok(Classification {
        image_stats,
        snapshot_stats,
        stale_images,
        stale_snapshots,
        summary_text: format!("{image_summary}{snapshot_summary}"),
    })
}

fn classify_images(
    images: &[ImageRecord],
    cutoff: NaiveDateTime,
) -> Result<(CollectionStats, Vec<StaleItem>, String), ClassifyError> {
    if images.is_empty() {
        let summary = "AMIs:\nTotal AMIs created within the last 7 days: 0\n\
                       Total AMIs created before the last 7 days: 0\n"
            .to_string();
        return Ok((CollectionStats::default(), Vec::new(), summary));
    }

    let mut stats = CollectionStats {
        total: images.len(),
        stale: 0,
        oldest: None,
    };
    let mut stale_items = Vec::new();

    for image in images {
        let created = NaiveDateTime::parse_from_str(&image.creation_date, IMAGE_TIMESTAMP_FORMAT)
            .map_err(|error| {
                ClassifyError::new(format!(
                    "invalid creation date '{}' for image {}: {error}",
                    image.creation_date, image.image_id
                ))
            })?;

        if created < cutoff {
            stats.stale += 1;
            stale_items.push(StaleItem {
                name: image.display_name().to_string(),
                id: image.image_id.clone(),
                date: created.format(DATE_FORMAT).to_string(),
                time: created.format(TIME_FORMAT).to_string(),
                region: image.region.clone(),
            });
        }
        if stats.oldest.map_or(true, |oldest| created < oldest) {
            stats.oldest = Some(created);
        }
    }

    let oldest = match stats.oldest {
        Some(value) => value,
        None => {
            return Err(ClassifyError::new(
                "image collection yielded no creation dates",
            ))
        }
    };

    let summary = format!(
        "AMIs:\nTotal AMIs created within the last 7 days: {}\n\
         Total AMIs created before the last 7 days: {}\n\
         Oldest AMI Creation Date: {} Time: {} TimeZone: UTC\n\n",
        stats.recent(),
        stats.stale,
        oldest.format(DATE_FORMAT),
        oldest.format(TIME_FORMAT),
    );

    Ok((stats, stale_items, summary))
}

fn classify_snapshots(
    snapshots: &[SnapshotRecord],
    cutoff: NaiveDateTime,
) -> (CollectionStats, Vec<StaleItem>, String) {
    if snapshots.is_empty() {
        return (CollectionStats::default(), Vec::new(), String::new());
    }

    let mut stats = CollectionStats {
        total: snapshots.len(),
        stale: 0,
        oldest: None,
    };
    let mut stale_items = Vec::new();

    for snapshot in snapshots {
        let started = snapshot.start_time;
        if started < cutoff {
            stats.stale += 1;
            stale_items.push(StaleItem {
                name: snapshot.display_name().to_string(),
                id: snapshot.snapshot_id.clone(),
                date: started.format(DATE_FORMAT).to_string(),
                time: started.format(TIME_FORMAT).to_string(),
                region: snapshot.region.clone(),
            });
        }
        if stats.oldest.map_or(true, |oldest| started < oldest) {
            stats.oldest = Some(started);
        }
    }

    let summary = match stats.oldest {
        Some(oldest) => format!(
            "Snapshots:\nTotal Snapshots created within the last 7 days: {}\n\
             Total Snapshots created before the last 7 days: {}\n\
             Oldest Snapshot Creation Date: {} Time: {} TimeZone: UTC\n\n",
            stats.recent(),
            stats.stale,
            oldest.format(DATE_FORMAT),
            oldest.format(TIME_FORMAT),
        ),
        None => String::new(),
    };

    (stats, stale_items, summary)
}
