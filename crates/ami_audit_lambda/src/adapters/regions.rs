use async_trait::async_trait;

/// Lists the regions visible to the account.
#[async_trait]
pub trait RegionSource: Send + Sync {
    async fn region_names(&self) -> Result<Vec<String>, String>;
}

pub struct Ec2RegionSource {
    ec2_client: aws_sdk_ec2::Client,
}

impl Ec2RegionSource {
    pub fn new(ec2_client: aws_sdk_ec2::Client) -> Self {
        Self { ec2_client }
    }
}

#[async_trait]
impl RegionSource for Ec2RegionSource {
    async fn region_names(&self) -> Result<Vec<String>, String> {
        let output = self
            .ec2_client
            .describe_regions()
            .send()
            .await
            .map_err(|error| format!("failed to list regions: {error}"))?;

        let mut regions = Vec::new();
        for region in output.regions() {
            if let Some(name) = region.region_name() {
                regions.push(name.to_string());
            }
        }
        Ok(regions)
    }
}
