//! Volume directory operations through the namespace API.

use reqwest::{Method, StatusCode};

use crate::backend::{VolumeHandle, VolumeMode, VolumeName};

use super::api::{SetModeRequest, TARGET_TYPE_CONTAINER, TARGET_TYPE_HEADER};
use super::{IsilonBackend, IsilonBackendError};

impl IsilonBackend {
    /// Creates the volume directory without an access-control list.
    pub(super) async fn create_directory(
        &self,
        name: &VolumeName,
    ) -> Result<VolumeHandle, IsilonBackendError> {
        let request = self
            .request(Method::PUT, &self.namespace_url(name))
            .header(TARGET_TYPE_HEADER, TARGET_TYPE_CONTAINER);
        self.send("create volume directory", request, &[]).await?;
        Ok(VolumeHandle {
            name: name.clone(),
            path: self.volume_path(name).into_string(),
        })
    }

    /// Sets the directory mode and owning group.
    pub(super) async fn set_directory_mode(
        &self,
        name: &VolumeName,
        mode: VolumeMode,
    ) -> Result<(), IsilonBackendError> {
        let url = format!("{}?acl", self.namespace_url(name));
        let request = self
            .request(Method::PUT, &url)
            .json(&SetModeRequest::new(mode, &self.group));
        self.send("set volume mode", request, &[]).await?;
        Ok(())
    }

    /// Deletes the directory and everything in it. A directory that is
    /// already gone counts as deleted.
    pub(super) async fn delete_directory(
        &self,
        name: &VolumeName,
    ) -> Result<(), IsilonBackendError> {
        let request = self
            .request(Method::DELETE, &self.namespace_url(name))
            .query(&[("recursive", "true")]);
        self.send("delete volume directory", request, &[StatusCode::NOT_FOUND])
            .await?;
        Ok(())
    }
}
