//! Templated email delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AdapterError;

/// Variables substituted into the notification template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
}

/// Sends a templated message to an address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, params: &TemplateParams) -> Result<(), AdapterError>;
}

/// Credentials for the EmailJS REST API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJsSettings {
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

/// [`Notifier`] backed by the EmailJS `email/send` endpoint.
#[derive(Clone)]
pub struct EmailJsNotifier {
    http: reqwest::Client,
    settings: EmailJsSettings,
}

impl EmailJsNotifier {
    pub fn new(settings: EmailJsSettings) -> Result<Self, AdapterError> {
        Ok(Self {
            http: crate::http::build_client()?,
            settings,
        })
    }

    pub fn settings(&self) -> &EmailJsSettings {
        &self.settings
    }

    fn request_body(&self, params: &TemplateParams) -> serde_json::Value {
        json!({
            "service_id": self.settings.service_id,
            "template_id": self.settings.template_id,
            "user_id": self.settings.public_key,
            "template_params": params,
        })
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send(&self, params: &TemplateParams) -> Result<(), AdapterError> {
        let response = self
            .http
            .post(&self.settings.api_url)
            .json(&self.request_body(params))
            .send()
            .await
            .map_err(|e| AdapterError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AdapterError::Notification(format!(
                "email service returned HTTP {status}: {detail}"
            )));
        }
        Ok(())
    }
}
