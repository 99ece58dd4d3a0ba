//! Configuration loading via `ortho-config`.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::backend::VolumeMode;
use crate::provisioner::ProvisionerSettings;
use crate::quota::QuotaPolicy;

/// Domain prefixed to the provisioner name when registering with the
/// orchestrator.
pub const PROVISIONER_DOMAIN: &str = "isilon.com";

/// Isilon provisioner configuration derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ISI",
    discovery(
        app_name = "isilon-provisioner",
        env_var = "ISI_CONFIG_PATH",
        config_file_name = "isilon-provisioner.toml",
        dotfile_name = ".isilon-provisioner.toml",
        project_file_name = "isilon-provisioner.toml"
    )
)]
pub struct ProvisionerConfig {
    /// NFS server address written into mount targets.
    pub server: String,
    /// Platform API host. Defaults to [`ProvisionerConfig::server`].
    pub api_server: Option<String>,
    /// Platform API port.
    #[ortho_config(default = 8080)]
    pub api_port: u16,
    /// Backend directory under which volumes are created and exported.
    pub path: String,
    /// Access zone for new exports.
    #[ortho_config(default = "System".to_owned())]
    pub zone: String,
    /// API user name.
    pub user: String,
    /// API password. Required, but may arrive through `ISI_PASS` after the
    /// layers merge.
    #[serde(default)]
    pub password: String,
    /// Group that owns new volume directories.
    pub group: String,
    /// Apply a container quota sized to each request. Disabled when unset.
    pub quota_enable: Option<bool>,
    /// Short provisioner name, qualified with [`PROVISIONER_DOMAIN`].
    #[ortho_config(default = "isilon".to_owned())]
    pub provisioner_name: String,
    /// Identity stamped on descriptors. Defaults to the NFS server address.
    pub identity: Option<String>,
    /// Skip TLS certificate verification for the Platform API. Enabled when
    /// unset.
    pub insecure: Option<bool>,
    /// Mode applied to new volume directories.
    #[ortho_config(default = 0o777)]
    pub volume_mode: u32,
    /// Permission bits cleared from `volume_mode`.
    #[ortho_config(default = 0)]
    pub umask: u32,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl ProvisionerConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to isilon-provisioner.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("isilon-provisioner")])
            .map(|cfg| cfg.with_env_aliases(|key| std::env::var(key).ok()))
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Folds the unprefixed `ISI_PASS` and `PROVISIONER_NAME` variables into
    /// the password and provisioner name. An alias only applies while its
    /// prefixed variable is unset or blank.
    #[must_use]
    pub fn with_env_aliases<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let aliased = |alias: &str, prefixed: &str| match present(prefixed) {
            Some(_) => None,
            None => present(alias),
        };
        if let Some(password) = aliased("ISI_PASS", "ISI_PASSWORD") {
            self.password = password;
        }
        if let Some(name) = aliased("PROVISIONER_NAME", "ISI_PROVISIONER_NAME") {
            self.provisioner_name = name;
        }
        self
    }

    /// Performs semantic validation on required fields. Error messages name
    /// the environment variable and configuration key to set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.server,
            &FieldMetadata::new("NFS server address", "ISI_SERVER", "server"),
        )?;
        Self::require_field(
            &self.path,
            &FieldMetadata::new("export root directory", "ISI_PATH", "path"),
        )?;
        Self::require_field(
            &self.zone,
            &FieldMetadata::new("access zone", "ISI_ZONE", "zone"),
        )?;
        Self::require_field(
            &self.user,
            &FieldMetadata::new("Platform API user", "ISI_USER", "user"),
        )?;
        Self::require_field(
            &self.password,
            &FieldMetadata::new("Platform API password", "ISI_PASSWORD", "password"),
        )?;
        Self::require_field(
            &self.group,
            &FieldMetadata::new("volume owner group", "ISI_GROUP", "group"),
        )?;
        Self::require_field(
            &self.provisioner_name,
            &FieldMetadata::new("provisioner name", "ISI_PROVISIONER_NAME", "provisioner_name"),
        )?;
        if !self.path.trim().starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "export root directory must be absolute, got '{}'",
                self.path
            )));
        }
        if self.volume_mode > 0o7777 || self.umask > 0o7777 {
            return Err(ConfigError::Invalid(String::from(
                "volume_mode and umask must be permission bits (at most 0o7777)",
            )));
        }
        Ok(())
    }

    /// Returns the Platform API host, falling back to the NFS server.
    #[must_use]
    pub fn api_host(&self) -> &str {
        self.api_server
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| self.server.trim())
    }

    /// Returns whether new volumes receive a container quota.
    #[must_use]
    pub fn quota_enabled(&self) -> bool {
        self.quota_enable.unwrap_or(false)
    }

    /// Returns whether TLS certificate verification is skipped.
    #[must_use]
    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or(true)
    }

    /// Returns the Platform API endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("https://{}:{}", self.api_host(), self.api_port)
    }

    /// Returns the qualified name the provisioner registers under.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{PROVISIONER_DOMAIN}/{}", self.provisioner_name.trim())
    }

    /// Returns the identity stamped on descriptors.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.identity
            .as_deref()
            .map(str::trim)
            .filter(|identity| !identity.is_empty())
            .unwrap_or_else(|| self.server.trim())
    }

    /// Builds the settings shared by every provision and delete call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn settings(&self) -> Result<ProvisionerSettings, ConfigError> {
        self.validate()?;
        Ok(ProvisionerSettings {
            identity: self.identity().to_owned(),
            server: self.server.trim().to_owned(),
            root_dir: Utf8PathBuf::from(self.path.trim()),
            access_zone: self.zone.trim().to_owned(),
            quota: QuotaPolicy::new(self.quota_enabled()),
            volume_mode: VolumeMode::from_bits(self.volume_mode).masked(self.umask),
        })
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
