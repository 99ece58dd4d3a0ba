//! Directory quota operations through the Platform API.

use reqwest::Method;

use crate::backend::{QuotaInfo, VolumeName};

use super::api::{CreateQuotaRequest, QUOTAS_PATH, QuotaList};
use super::{IsilonBackend, IsilonBackendError};

impl IsilonBackend {
    /// Creates a directory quota with a hard limit.
    pub(super) async fn create_directory_quota(
        &self,
        name: &VolumeName,
        container: bool,
        size_bytes: u64,
    ) -> Result<(), IsilonBackendError> {
        let body = CreateQuotaRequest::directory(
            self.volume_path(name).into_string(),
            container,
            size_bytes,
        );
        let request = self
            .request(Method::POST, &self.platform_url(QUOTAS_PATH))
            .json(&body);
        self.send("create quota", request, &[]).await?;
        Ok(())
    }

    /// Looks up the directory quota scoped to the volume.
    pub(super) async fn find_directory_quota(
        &self,
        name: &VolumeName,
    ) -> Result<Option<QuotaInfo>, IsilonBackendError> {
        let path = self.volume_path(name);
        let request = self
            .request(Method::GET, &self.platform_url(QUOTAS_PATH))
            .query(&[("path", path.as_str()), ("type", "directory")]);
        let accepted = self.send("get quota", request, &[]).await?;
        let list: QuotaList = Self::decode("get quota", &accepted.body)?;
        Ok(list.find(path.as_str()))
    }

    /// Removes the directory quotas scoped to the volume.
    pub(super) async fn delete_directory_quota(
        &self,
        name: &VolumeName,
    ) -> Result<(), IsilonBackendError> {
        let path = self.volume_path(name);
        let request = self
            .request(Method::DELETE, &self.platform_url(QUOTAS_PATH))
            .query(&[("path", path.as_str()), ("type", "directory")]);
        self.send("clear quota", request, &[]).await?;
        Ok(())
    }
}
