//! Wire types for the OneFS namespace, quota, and NFS export APIs.

use serde::{Deserialize, Serialize};

use crate::backend::{QuotaInfo, VolumeMode};

pub(super) const QUOTAS_PATH: &str = "/platform/1/quota/quotas";
pub(super) const EXPORTS_PATH: &str = "/platform/2/protocols/nfs/exports";
pub(super) const NAMESPACE_PREFIX: &str = "/namespace";

pub(super) const TARGET_TYPE_HEADER: &str = "x-isi-ifs-target-type";
pub(super) const TARGET_TYPE_CONTAINER: &str = "container";

/// Identity reference used in namespace ACL updates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(super) struct Persona {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Body of `PUT /namespace/<path>?acl`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(super) struct SetModeRequest {
    pub authoritative: &'static str,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Persona>,
}

impl SetModeRequest {
    pub(super) fn new(mode: VolumeMode, group: &str) -> Self {
        let owner = group.trim();
        Self {
            authoritative: "mode",
            mode: mode.to_string(),
            group: (!owner.is_empty()).then(|| Persona {
                name: owner.to_owned(),
                kind: "group",
            }),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(super) struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<u64>,
}

/// Body of `POST /platform/1/quota/quotas`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(super) struct CreateQuotaRequest {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub container: bool,
    pub enforced: bool,
    pub include_snapshots: bool,
    pub thresholds_include_overhead: bool,
    pub thresholds: Thresholds,
}

impl CreateQuotaRequest {
    pub(super) const fn directory(path: String, container: bool, size_bytes: u64) -> Self {
        Self {
            path,
            kind: "directory",
            container,
            enforced: true,
            include_snapshots: false,
            thresholds_include_overhead: false,
            thresholds: Thresholds {
                hard: Some(size_bytes),
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(super) struct Quota {
    pub id: String,
    pub path: String,
    #[serde(default)]
    pub container: bool,
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Body of `GET /platform/1/quota/quotas`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub(super) struct QuotaList {
    #[serde(default)]
    pub quotas: Vec<Quota>,
}

impl QuotaList {
    /// Returns the directory quota scoped exactly to `path`.
    pub(super) fn find(self, path: &str) -> Option<QuotaInfo> {
        self.quotas
            .into_iter()
            .find(|quota| quota.path == path)
            .map(|quota| QuotaInfo {
                id: quota.id,
                path: quota.path,
                container: quota.container,
                hard_limit_bytes: quota.thresholds.hard,
            })
    }
}

/// Body of `POST /platform/2/protocols/nfs/exports`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(super) struct CreateExportRequest {
    pub paths: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(super) struct CreatedResource {
    pub id: u64,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(super) struct Export {
    pub id: u64,
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Body of `GET /platform/2/protocols/nfs/exports`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub(super) struct ExportList {
    #[serde(default)]
    pub exports: Vec<Export>,
}

impl ExportList {
    /// Returns the identifier of the export that serves `path`.
    pub(super) fn find(&self, path: &str) -> Option<u64> {
        self.exports
            .iter()
            .find(|export| export.paths.iter().any(|candidate| candidate == path))
            .map(|export| export.id)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct ApiErrorEntry {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Error envelope returned by the Platform API.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(super) struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

impl ApiErrors {
    /// Renders an error body as a single message, falling back to the raw
    /// body when it is not an error envelope.
    pub(super) fn describe(body: &[u8]) -> String {
        let parsed = serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|envelope| !envelope.errors.is_empty());
        parsed.map_or_else(
            || String::from_utf8_lossy(body).trim().to_owned(),
            |envelope| {
                envelope
                    .errors
                    .iter()
                    .map(|entry| match (entry.code.is_empty(), entry.message.is_empty()) {
                        (false, false) => format!("{}: {}", entry.code, entry.message),
                        (true, _) => entry.message.clone(),
                        (false, true) => entry.code.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        )
    }
}
