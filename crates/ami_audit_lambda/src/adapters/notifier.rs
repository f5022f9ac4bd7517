use async_trait::async_trait;

/// Publishes the human-facing notification for a finished audit.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), String>;
}

pub struct SnsNotifier {
    topic_arn: String,
    sns_client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(topic_arn: impl Into<String>, sns_client: aws_sdk_sns::Client) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            sns_client,
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), String> {
        self.sns_client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| format!("failed to publish notification: {error}"))
    }
}
