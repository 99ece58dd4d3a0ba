//! Isilon (OneFS) backend implementation of the volume lifecycle.
//!
//! Volumes are directories under the configured export root, created through
//! the namespace API. Quotas and NFS exports go through the Platform API.
//! Every call authenticates with HTTP basic auth.

mod api;
mod error;
mod export;
mod namespace;
mod quota;

use std::time::Duration;

use camino::Utf8PathBuf;
use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::debug;

use crate::backend::{
    BackendFuture, ExportId, QuotaInfo, StorageBackend, VolumeHandle, VolumeMode, VolumeName,
};
use crate::config::ProvisionerConfig;

pub use error::IsilonBackendError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend that manages volumes through the OneFS Platform API.
#[derive(Clone, Debug)]
pub struct IsilonBackend {
    http: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
    group: String,
    root_dir: Utf8PathBuf,
}

/// Raw response of a call the API accepted.
struct Accepted {
    status: StatusCode,
    body: Vec<u8>,
}

impl IsilonBackend {
    /// Constructs a new backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IsilonBackendError::Config`] when the configuration fails
    /// validation or the HTTP client cannot be built.
    pub fn new(config: &ProvisionerConfig) -> Result<Self, IsilonBackendError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .danger_accept_invalid_certs(config.insecure())
            .build()
            .map_err(|err| IsilonBackendError::Config(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint(),
            user: config.user.trim().to_owned(),
            password: config.password.clone(),
            group: config.group.trim().to_owned(),
            root_dir: Utf8PathBuf::from(config.path.trim()),
        })
    }

    /// Returns the Platform API endpoint this backend talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn volume_path(&self, name: &VolumeName) -> Utf8PathBuf {
        self.root_dir.join(name.as_str())
    }

    fn namespace_url(&self, name: &VolumeName) -> String {
        format!(
            "{}{}{}",
            self.endpoint,
            api::NAMESPACE_PREFIX,
            self.volume_path(name)
        )
    }

    fn platform_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password))
    }

    /// Sends a request and returns the body of a successful response.
    ///
    /// Statuses in `tolerated` are returned as successes so callers can
    /// interpret them.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        tolerated: &[StatusCode],
    ) -> Result<Accepted, IsilonBackendError> {
        let transport = |err: reqwest::Error| IsilonBackendError::Transport {
            operation,
            message: err.to_string(),
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?.to_vec();
        debug!(operation, status = status.as_u16(), "platform API response");

        if status.is_success() || tolerated.contains(&status) {
            return Ok(Accepted { status, body });
        }
        Err(IsilonBackendError::Api {
            operation,
            status: status.as_u16(),
            message: api::ApiErrors::describe(&body),
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        body: &[u8],
    ) -> Result<T, IsilonBackendError> {
        serde_json::from_slice(body).map_err(|err| IsilonBackendError::Decode {
            operation,
            message: err.to_string(),
        })
    }
}

impl StorageBackend for IsilonBackend {
    type Error = IsilonBackendError;

    fn create_volume<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, VolumeHandle, Self::Error> {
        Box::pin(async move { self.create_directory(name).await })
    }

    fn set_volume_mode<'a>(
        &'a self,
        name: &'a VolumeName,
        mode: VolumeMode,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.set_directory_mode(name, mode).await })
    }

    fn create_quota<'a>(
        &'a self,
        name: &'a VolumeName,
        container: bool,
        size_bytes: u64,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.create_directory_quota(name, container, size_bytes).await })
    }

    fn get_quota<'a>(
        &'a self,
        name: &'a VolumeName,
    ) -> BackendFuture<'a, Option<QuotaInfo>, Self::Error> {
        Box::pin(async move { self.find_directory_quota(name).await })
    }

    fn clear_quota<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.delete_directory_quota(name).await })
    }

    fn export_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, ExportId, Self::Error> {
        Box::pin(async move { self.create_export(name, zone).await })
    }

    fn unexport_volume<'a>(
        &'a self,
        name: &'a VolumeName,
        zone: &'a str,
    ) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.delete_export(name, zone).await })
    }

    fn delete_volume<'a>(&'a self, name: &'a VolumeName) -> BackendFuture<'a, (), Self::Error> {
        Box::pin(async move { self.delete_directory(name).await })
    }
}

#[cfg(test)]
mod tests;
