use ami_audit_lambda::adapters::listing::Ec2ResourceLister;
use ami_audit_lambda::adapters::notifier::SnsNotifier;
use ami_audit_lambda::adapters::regions::Ec2RegionSource;
use ami_audit_lambda::adapters::report_store::S3ReportStore;
use ami_audit_lambda::handlers::audit::{
    account_id_from_arn, error_response, run_audit, AuditConfig, AuditResponse,
};
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

async fn handle_request(event: LambdaEvent<Value>) -> Result<AuditResponse, Error> {
    let account_name = std::env::var("ACCOUNT_NAME").unwrap_or_else(|_| "unknown".to_string());
    let (bucket, topic_arn) = match (std::env::var("BUCKET_NAME"), std::env::var("TOPIC_ARN")) {
        (Ok(bucket), Ok(topic_arn)) => (bucket, topic_arn),
        _ => {
            eprintln!(
                "{}",
                json!({
                    "component": "audit_lambda",
                    "level": "error",
                    "event": "misconfigured",
                    "timestamp": Utc::now().to_rfc3339(),
                    "details": { "error": "BUCKET_NAME and TOPIC_ARN must be configured" },
                })
            );
            return Ok(error_response());
        }
    };

    let config = AuditConfig {
        account_name,
        account_id: account_id_from_arn(&event.context.invoked_function_arn),
        bucket: bucket.clone(),
        topic_arn: topic_arn.clone(),
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let region_source = Ec2RegionSource::new(aws_sdk_ec2::Client::new(&aws_config));
    let lister = Ec2ResourceLister::new();
    let store = S3ReportStore::new(bucket, aws_sdk_s3::Client::new(&aws_config));
    let notifier = SnsNotifier::new(topic_arn, aws_sdk_sns::Client::new(&aws_config));

    // One capture instant serves both the classification cutoff and the
    // report file name.
    let now = Utc::now().naive_utc();

    Ok(run_audit(&config, now, &region_source, &lister, &store, &notifier).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
