use super::media_store::{DeleteOutcome, Folder, IncomingFile, MediaStore, StoreError, StoredAsset};
use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;

/// Let the store decide between image and raw document handling
const RESOURCE_TYPE: &str = "auto";

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Signs request parameters the way the Cloudinary API expects: sorted
/// `key=value` pairs joined with `&`, secret appended, SHA-256 hex digest.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.config.api_base, self.config.cloud_name, resource_type, action
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => StoreError::Rejected(err.error.message),
                Err(_) => StoreError::Rejected(format!("Media store responded with status {}", status)),
            });
        }

        serde_json::from_str(&body).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn provider_id(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(&self, file: &IncomingFile, folder: Folder) -> Result<StoredAsset, StoreError> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.as_str().to_string());
        params.insert("timestamp", Self::timestamp());
        let signature = sign_params(&params, &self.config.api_secret);

        let part = Part::stream_with_length(file.bytes.clone(), file.size() as u64)
            .file_name(file.original_name.clone())
            .mime_str(&file.content_type)?;

        let mut form = Form::new().part("file", part);
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint(RESOURCE_TYPE, "upload"))
            .multipart(form)
            .send()
            .await?;

        let asset: StoredAsset = Self::parse_response(response).await?;
        tracing::debug!(public_id = %asset.public_id, folder = %folder, "Stored asset");
        Ok(asset)
    }

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, StoreError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", Self::timestamp());
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));

        let response = self
            .client
            .post(self.endpoint("image", "destroy"))
            .form(&form)
            .send()
            .await?;

        let destroyed: DestroyResponse = Self::parse_response(response).await?;
        match destroyed.result.as_str() {
            "ok" => Ok(DeleteOutcome::Deleted),
            "not found" => Ok(DeleteOutcome::NotFound),
            other => Err(StoreError::Rejected(other.to_string())),
        }
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1_1/{}/ping", self.config.api_base, self.config.cloud_name);
        match self
            .client
            .get(url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await
        {
            Ok(res) => res.status().is_success(),
            Err(e) => {
                tracing::warn!("Media store ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_params_sorts_and_appends_secret() {
        let mut params = BTreeMap::new();
        params.insert("timestamp", "1700000000".to_string());
        params.insert("folder", "restaurant-documents".to_string());
        assert_eq!(
            sign_params(&params, "abcd"),
            "4cfbfc45cb93c543ee0f7736ad95314770bcf9d42756baf04d40e245545d8567"
        );
    }

    #[test]
    fn test_sign_params_uses_raw_public_id() {
        let mut params = BTreeMap::new();
        params.insert("public_id", "folder/sub/id123".to_string());
        params.insert("timestamp", "1700000000".to_string());
        assert_eq!(
            sign_params(&params, "abcd"),
            "b019c432d439bc94c9d90ba54353a9842de99054e7db9e14635fe950efc42e60"
        );
    }
}
