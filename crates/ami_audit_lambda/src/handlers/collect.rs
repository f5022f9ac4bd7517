use ami_audit_core::records::{ImageRecord, SnapshotRecord};
use futures::stream::{self, StreamExt};
use serde_json::json;

use crate::adapters::listing::ResourceLister;

/// Width of each listing wave; every region is dispatched, at most this many
/// calls in flight at a time.
pub const REGION_FAN_OUT_LIMIT: usize = 16;

/// Runs the image wave and then the snapshot wave across all regions, each
/// fully joined before the next starts. A failed per-region call is logged
/// and contributes an empty list; the other regions' results are unaffected.
/// The merged output does not distinguish a failed call from a region with
/// zero resources.
pub async fn collect_account_resources(
    regions: &[String],
    lister: &impl ResourceLister,
) -> (Vec<ImageRecord>, Vec<SnapshotRecord>) {
    let image_waves: Vec<Vec<ImageRecord>> = stream::iter(regions)
        .map(|region| async move {
            match lister.images_in(region).await {
                Ok(records) => records,
                Err(error) => {
                    log_collect_error("image_listing_failed", region, &error);
                    Vec::new()
                }
            }
        })
        .buffer_unordered(REGION_FAN_OUT_LIMIT)
        .collect()
        .await;

    let snapshot_waves: Vec<Vec<SnapshotRecord>> = stream::iter(regions)
        .map(|region| async move {
            match lister.snapshots_in(region).await {
                Ok(records) => records,
                Err(error) => {
                    log_collect_error("snapshot_listing_failed", region, &error);
                    Vec::new()
                }
            }
        })
        .buffer_unordered(REGION_FAN_OUT_LIMIT)
        .collect()
        .await;

    (
        image_waves.into_iter().flatten().collect(),
        snapshot_waves.into_iter().flatten().collect(),
    )
}

fn log_collect_error(event: &str, region: &str, error: &str) {
    eprintln!(
        "{}",
        json!({
            "component": "resource_collector",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": {
                "region": region,
                "error": error,
            },
        })
    );
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;

    struct ScriptedLister {
        images: HashMap<String, Vec<ImageRecord>>,
        snapshots: HashMap<String, Vec<SnapshotRecord>>,
        failing_regions: HashSet<String>,
    }

    impl ScriptedLister {
        fn new() -> Self {
            Self {
                images: HashMap::new(),
                snapshots: HashMap::new(),
                failing_regions: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl ResourceLister for ScriptedLister {
        async fn images_in(&self, region: &str) -> Result<Vec<ImageRecord>, String> {
            if self.failing_regions.contains(region) {
                return Err(format!("simulated listing outage in {region}"));
            }
            Ok(self.images.get(region).cloned().unwrap_or_default())
        }

        async fn snapshots_in(&self, region: &str) -> Result<Vec<SnapshotRecord>, String> {
            if self.failing_regions.contains(region) {
                return Err(format!("simulated listing outage in {region}"));
            }
            Ok(self.snapshots.get(region).cloned().unwrap_or_default())
        }
    }

    fn image(id: &str, region: &str) -> ImageRecord {
        ImageRecord {
            image_id: id.to_string(),
            name: None,
            creation_date: "2024-03-01T10:00:00.000Z".to_string(),
            region: region.to_string(),
        }
    }

    fn snapshot(id: &str, region: &str) -> SnapshotRecord {
        SnapshotRecord {
            snapshot_id: id.to_string(),
            name: None,
            start_time: NaiveDate::from_ymd_opt(2024, 3, 1)
                .expect("valid date")
                .and_hms_opt(10, 0, 0)
                .expect("valid time"),
            region: region.to_string(),
        }
    }

    #[tokio::test]
    async fn merges_results_across_regions() {
        let mut lister = ScriptedLister::new();
        lister
            .images
            .insert("region-a".to_string(), vec![image("ami-a", "region-a")]);
        lister.snapshots.insert(
            "region-b".to_string(),
            vec![snapshot("snap-b1", "region-b"), snapshot("snap-b2", "region-b")],
        );

        let regions = vec!["region-a".to_string(), "region-b".to_string()];
        let (images, snapshots) = collect_account_resources(&regions, &lister).await;

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].region, "region-a");
        assert_eq!(snapshots.len(), 2);
    }

    #[tokio::test]
    async fn failing_region_is_isolated_from_the_rest() {
        let mut lister = ScriptedLister::new();
        lister
            .images
            .insert("region-a".to_string(), vec![image("ami-a", "region-a")]);
        lister
            .images
            .insert("region-b".to_string(), vec![image("ami-b", "region-b")]);
        lister.failing_regions.insert("region-b".to_string());

        let regions = vec!["region-a".to_string(), "region-b".to_string()];
        let (images, snapshots) = collect_account_resources(&regions, &lister).await;

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image_id, "ami-a");
        assert!(snapshots.is_empty());
    }

    #[tokio::test]
    async fn empty_region_list_yields_empty_aggregates() {
        let lister = ScriptedLister::new();
        let (images, snapshots) = collect_account_resources(&[], &lister).await;

        assert!(images.is_empty());
        assert!(snapshots.is_empty());
    }
}
