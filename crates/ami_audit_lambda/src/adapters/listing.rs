use ami_audit_core::records::{ImageRecord, SnapshotRecord};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use chrono::NaiveDateTime;

/// Lists the account's own images and snapshots in one region, tagging each
/// record with its source region.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn images_in(&self, region: &str) -> Result<Vec<ImageRecord>, String>;
    async fn snapshots_in(&self, region: &str) -> Result<Vec<SnapshotRecord>, String>;
}

pub struct Ec2ResourceLister;

impl Ec2ResourceLister {
    pub fn new() -> Self {
        Self
    }

    async fn regional_client(&self, region: &str) -> aws_sdk_ec2::Client {
        let conf = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        aws_sdk_ec2::Client::new(&conf)
    }
}

#[async_trait]
impl ResourceLister for Ec2ResourceLister {
    async fn images_in(&self, region: &str) -> Result<Vec<ImageRecord>, String> {
        let client = self.regional_client(region).await;
        let response = client
            .describe_images()
            .owners("self")
            .send()
            .await
            .map_err(|error| format!("failed to list images in {region}: {error}"))?;

        let mut records = Vec::new();
        for image in response.images() {
            let image_id = match image.image_id() {
                Some(value) => value.to_string(),
                None => continue,
            };
            records.push(ImageRecord {
                image_id,
                name: image.name().map(|name| name.to_string()),
                // An absent creation date is carried as an empty string and
                // rejected during classification.
                creation_date: image.creation_date().unwrap_or_default().to_string(),
                region: region.to_string(),
            });
        }
        Ok(records)
    }

    async fn snapshots_in(&self, region: &str) -> Result<Vec<SnapshotRecord>, String> {
        let client = self.regional_client(region).await;
        let response = client
            .describe_snapshots()
            .owner_ids("self")
            .send()
            .await
            .map_err(|error| format!("failed to list snapshots in {region}: {error}"))?;

        let mut records = Vec::new();
        for snapshot in response.snapshots() {
            let snapshot_id = match snapshot.snapshot_id() {
                Some(value) => value.to_string(),
                None => continue,
            };
            let start_time = match snapshot.start_time().and_then(naive_utc_from_sdk) {
                Some(value) => value,
                None => continue,
            };
            records.push(SnapshotRecord {
                snapshot_id,
                name: name_tag(snapshot.tags()),
                start_time,
                region: region.to_string(),
            });
        }
        Ok(records)
    }
}

fn naive_utc_from_sdk(timestamp: &aws_sdk_ec2::primitives::DateTime) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
        .map(|value| value.naive_utc())
}

fn name_tag(tags: &[aws_sdk_ec2::types::Tag]) -> Option<String> {
    tags.iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(|tag| tag.value())
        .map(|value| value.to_string())
}
