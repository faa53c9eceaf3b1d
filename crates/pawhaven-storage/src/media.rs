// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local filesystem implementation of [`MediaAdapter`].
//!
//! Uploads are content-addressed by SHA-256 and sharded two levels deep
//! (`ab/cd/abcd....ext`), so identical images are stored once.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use pawhaven_config::model::MediaConfig;
use pawhaven_core::{AdapterType, HealthStatus, MediaAdapter, PawhavenError, PluginAdapter};

pub struct LocalMediaStore {
    root: PathBuf,
    url_prefix: String,
    max_upload_bytes: usize,
    allowed_content_types: Vec<String>,
}

impl LocalMediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_dir),
            url_prefix: config.public_url_prefix.trim_end_matches('/').to_string(),
            max_upload_bytes: config.max_upload_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    /// Root directory files are written under.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn relative_path(hash: &str, ext: &str) -> String {
        format!("{}/{}/{hash}.{ext}", &hash[0..2], &hash[2..4])
    }
}

fn media_err(message: impl Into<String>, source: std::io::Error) -> PawhavenError {
    PawhavenError::Media {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

/// File extension for an accepted image type.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[async_trait]
impl PluginAdapter for LocalMediaStore {
    fn name(&self) -> &str {
        "local-media"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Media
    }

    async fn health_check(&self) -> Result<HealthStatus, PawhavenError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            // Created lazily on first upload.
            Err(_) => Ok(HealthStatus::Degraded(format!(
                "{} does not exist yet",
                self.root.display()
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PawhavenError> {
        Ok(())
    }
}

#[async_trait]
impl MediaAdapter for LocalMediaStore {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, PawhavenError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&content_type))
        {
            return Err(PawhavenError::Validation(format!(
                "unsupported image type `{content_type}`"
            )));
        }
        if bytes.is_empty() {
            return Err(PawhavenError::Validation("upload is empty".to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(PawhavenError::Validation(format!(
                "upload of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_upload_bytes
            )));
        }

        let hash = hex::encode(Sha256::digest(&bytes));
        let relative = Self::relative_path(&hash, extension_for(&content_type));
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| media_err(format!("failed to create {}", parent.display()), e))?;
        }

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!(%hash, "upload already stored");
        } else {
            tokio::fs::write(&target, &bytes)
                .await
                .map_err(|e| media_err(format!("failed to write {}", target.display()), e))?;
            debug!(%hash, bytes = bytes.len(), "upload stored");
        }

        Ok(format!("{}/{relative}", self.url_prefix))
    }
}
