#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use media_upload_gateway::services::media_store::{
    DeleteOutcome, Folder, IncomingFile, MediaStore, StoreError, StoredAsset,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

/// In-memory stand-in for the media store that records every call
#[derive(Default)]
pub struct MockMediaStore {
    attempts: AtomicUsize,
    /// Successful uploads in completion order: (original name, folder)
    pub completed: Mutex<Vec<(String, Folder)>>,
    pub deleted: Mutex<Vec<String>>,
    failing_uploads: Vec<String>,
    delays_ms: HashMap<String, u64>,
    fail_deletes: bool,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads of a file with this original name fail
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing_uploads.push(name.to_string());
        self
    }

    /// Uploads of a file with this original name finish after `ms` milliseconds
    pub fn delayed(mut self, name: &str, ms: u64) -> Self {
        self.delays_ms.insert(name.to_string(), ms);
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn upload_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn completed_names(&self) -> Vec<String> {
        self.completed
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

pub fn public_id_for(name: &str, folder: Folder) -> String {
    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
    format!("{}/{}", folder.as_str(), stem)
}

#[async_trait]
impl MediaStore for MockMediaStore {
    fn provider_id(&self) -> &'static str {
        "mock"
    }

    async fn upload(&self, file: &IncomingFile, folder: Folder) -> Result<StoredAsset, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(ms) = self.delays_ms.get(&file.original_name) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }

        if self.failing_uploads.contains(&file.original_name) {
            return Err(StoreError::Rejected(format!(
                "Upload of {} rejected by store",
                file.original_name
            )));
        }

        self.completed
            .lock()
            .unwrap()
            .push((file.original_name.clone(), folder));

        let public_id = public_id_for(&file.original_name, folder);
        Ok(StoredAsset {
            secure_url: format!("https://res.cloudinary.com/demo/image/upload/{}", public_id),
            public_id,
            bytes: file.size() as u64,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, StoreError> {
        if self.fail_deletes {
            return Err(StoreError::Rejected("Invalid Signature".to_string()));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(DeleteOutcome::Deleted)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// One part of a multipart body. `filename: None` makes it a plain text field.
pub struct FormPart<'a> {
    pub field: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: &'a str,
    pub data: Vec<u8>,
}

impl<'a> FormPart<'a> {
    pub fn file(field: &'a str, filename: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            field,
            filename: Some(filename),
            content_type,
            data,
        }
    }

    pub fn text(field: &'a str, value: &str) -> Self {
        Self {
            field,
            filename: None,
            content_type: "text/plain",
            data: value.as_bytes().to_vec(),
        }
    }
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(
                    format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.field
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn png(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G'];
    data.resize(len.max(4), 0);
    data
}
