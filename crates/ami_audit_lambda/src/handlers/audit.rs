use std::time::Duration;

use ami_audit_core::classify::{classify, Classification};
use ami_audit_core::report::render_report;
use ami_audit_core::storage_keys::{report_file_name, report_object_key, REPORT_FOLDER};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::listing::ResourceLister;
use crate::adapters::notifier::Notifier;
use crate::adapters::regions::RegionSource;
use crate::adapters::report_store::ReportStore;
use crate::handlers::collect::collect_account_resources;

/// Pre-signed download links stay valid for 12 hours.
pub const PRESIGNED_URL_EXPIRY: Duration = Duration::from_secs(43_200);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditConfig {
    pub account_name: String,
    pub account_id: Option<String>,
    pub bucket: String,
    pub topic_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

pub fn success_response() -> AuditResponse {
    AuditResponse {
        status_code: 200,
        body: "Function execution completed successfully!".to_string(),
    }
}

pub fn error_response() -> AuditResponse {
    AuditResponse {
        status_code: 500,
        body: "Function encountered an error!".to_string(),
    }
}

/// The account id is the fourth colon-delimited segment of the invoked
/// function ARN.
pub fn account_id_from_arn(invoked_function_arn: &str) -> Option<String> {
    invoked_function_arn
        .split(':')
        .nth(4)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}

/// Sequences the audit pipeline: enumerate regions, collect resources,
/// classify by age, upload the report, notify. Every failure branch is
/// logged and converted into an early exit; only the stale-snapshot count
/// gates the report and notification steps.
pub async fn run_audit(
    config: &AuditConfig,
    now: NaiveDateTime,
    region_source: &impl RegionSource,
    lister: &impl ResourceLister,
    store: &impl ReportStore,
    notifier: &impl Notifier,
) -> AuditResponse {
    log_audit_info(
        "audit_started",
        json!({ "account_name": config.account_name }),
    );

    let regions = match region_source.region_names().await {
        Ok(regions) => regions,
        Err(error) => {
            log_audit_error("region_listing_failed", json!({ "error": error }));
            Vec::new()
        }
    };

    let (all_images, all_snapshots) = collect_account_resources(&regions, lister).await;

    if all_images.is_empty() && all_snapshots.is_empty() {
        log_audit_info(
            "no_resources_found",
            json!({ "regions_scanned": regions.len() }),
        );
        return success_response();
    }

    let classification = match classify(&all_images, &all_snapshots, now) {
        Ok(classification) => classification,
        Err(error) => {
            log_audit_error("classification_failed", json!({ "error": error.message() }));
            return success_response();
        }
    };

    log_audit_info(
        "resources_classified",
        json!({
            "images_total": classification.image_stats.total,
            "images_stale": classification.image_stats.stale,
            "snapshots_total": classification.snapshot_stats.total,
            "snapshots_stale": classification.snapshot_stats.stale,
            "summary": classification.summary_text,
        }),
    );

    // Only the stale-snapshot count gates the report path; stale images
    // alone end the run here.
    if !classification.has_stale_snapshots() {
        log_audit_info("no_stale_snapshots", json!({}));
        return success_response();
    }

    let file_name = report_file_name(classification.has_stale_images(), now);
    let object_key = report_object_key(&file_name);
    let document = render_report(&classification.stale_images, &classification.stale_snapshots);

    if let Err(error) = store.write_object(&object_key, document.as_bytes()).await {
        log_audit_error(
            "report_upload_failed",
            json!({ "bucket": config.bucket, "key": object_key, "error": error }),
        );
        return success_response();
    }
    log_audit_info(
        "report_uploaded",
        json!({ "bucket": config.bucket, "key": object_key }),
    );

    notify(config, &classification, store, notifier, &file_name).await;

    success_response()
}

async fn notify(
    config: &AuditConfig,
    classification: &Classification,
    store: &impl ReportStore,
    notifier: &impl Notifier,
    file_name: &str,
) {
    let object_key = report_object_key(file_name);
    let presigned_url = match store.presign_get(&object_key, PRESIGNED_URL_EXPIRY).await {
        Ok(url) => url,
        Err(error) => {
            log_audit_error(
                "presign_failed",
                json!({ "key": object_key, "error": error }),
            );
            return;
        }
    };

    let account_id = config.account_id.as_deref().unwrap_or("unknown");
    let subject = format!(
        "AMIs and Snapshots in the Account Name: {} Account id: {}",
        config.account_name, account_id
    );
    let message = format!(
        "Account Name: {}\nAccount ID: {}\n\n{}\n\
         CSV got saved in s3 bucket in this full path: s3://{}/{}/{}\n\n\
         Presigned url(active for 12 hour only): {}",
        config.account_name,
        account_id,
        classification.summary_text,
        config.bucket,
        REPORT_FOLDER,
        file_name,
        presigned_url,
    );

    match notifier.publish(&subject, &message).await {
        Ok(()) => log_audit_info(
            "notification_published",
            json!({ "topic_arn": config.topic_arn }),
        ),
        Err(error) => log_audit_error(
            "notification_failed",
            json!({ "topic_arn": config.topic_arn, "error": error }),
        ),
    }
}

fn log_audit_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "audit_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_audit_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "audit_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
