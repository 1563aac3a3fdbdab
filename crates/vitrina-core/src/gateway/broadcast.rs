use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::error::GatewayError;
use crate::model::BroadcastMessage;
use crate::validation::validate_broadcast;

impl ApiClient {
    /// `POST /broadcast/message`
    ///
    /// The text is checked locally first; a message that is too short is
    /// rejected without a request.
    pub async fn create_broadcast_message(&self, message: &BroadcastMessage) -> Result<Value, GatewayError> {
        validate_broadcast(message)?;
        let response: Value = self
            .send(self.request(Method::POST, "broadcast/message")?.json(message))
            .await?;
        tracing::info!(has_attachment = message.image_url.is_some(), "Broadcast message queued");
        Ok(response)
    }
}
