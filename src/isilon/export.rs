//! NFS export operations through the Platform API.

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use crate::backend::{ExportId, VolumeName};

use super::api::{ApiErrors, CreateExportRequest, CreatedResource, EXPORTS_PATH, ExportList};
use super::{IsilonBackend, IsilonBackendError};

impl IsilonBackend {
    /// Exports the volume directory in `zone`.
    ///
    /// A retry after a partially failed provision may find the export
    /// already in place; the existing export is returned in that case.
    pub(super) async fn create_export(
        &self,
        name: &VolumeName,
        zone: &str,
    ) -> Result<ExportId, IsilonBackendError> {
        let path = self.volume_path(name).into_string();
        let body = CreateExportRequest {
            paths: vec![path.clone()],
        };
        let request = self
            .request(Method::POST, &self.platform_url(EXPORTS_PATH))
            .query(&[("zone", zone)])
            .json(&body);
        let accepted = self
            .send("create export", request, &[StatusCode::CONFLICT])
            .await?;

        if accepted.status.is_success() {
            let created: CreatedResource = Self::decode("create export", &accepted.body)?;
            return Ok(ExportId(created.id));
        }

        info!(
            %path,
            zone,
            detail = %ApiErrors::describe(&accepted.body),
            "export already present; reusing it"
        );
        self.find_export(&path, zone)
            .await?
            .map(ExportId)
            .ok_or_else(|| IsilonBackendError::ExportNotFound {
                path,
                zone: zone.to_owned(),
            })
    }

    /// Removes the export of the volume directory from `zone`. A missing
    /// export counts as removed.
    pub(super) async fn delete_export(
        &self,
        name: &VolumeName,
        zone: &str,
    ) -> Result<(), IsilonBackendError> {
        let path = self.volume_path(name).into_string();
        let Some(id) = self.find_export(&path, zone).await? else {
            debug!(%path, zone, "no export to remove");
            return Ok(());
        };
        let url = format!("{}/{id}", self.platform_url(EXPORTS_PATH));
        let request = self.request(Method::DELETE, &url).query(&[("zone", zone)]);
        self.send("delete export", request, &[StatusCode::NOT_FOUND])
            .await?;
        Ok(())
    }

    async fn find_export(&self, path: &str, zone: &str) -> Result<Option<u64>, IsilonBackendError> {
        let request = self
            .request(Method::GET, &self.platform_url(EXPORTS_PATH))
            .query(&[("zone", zone), ("path", path)]);
        let accepted = self.send("list exports", request, &[]).await?;
        let list: ExportList = Self::decode("list exports", &accepted.body)?;
        Ok(list.find(path))
    }
}
