use std::str::FromStr;

use scopecap_domain::ImageKind;
use thiserror::Error;

pub const CATALOG_ENV: &str = "SCOPECAP_CATALOG";
pub const PROJECTS_ROOT_ENV: &str = "SCOPECAP_PROJECTS_ROOT";
pub const PROBE_LIMIT_ENV: &str = "SCOPECAP_CAMERA_PROBE_LIMIT";
pub const DEVICE_ENV: &str = "SCOPECAP_DEVICE";
pub const CAPTURE_EXT_ENV: &str = "SCOPECAP_CAPTURE_EXT";
pub const RECONCILE_ENV: &str = "SCOPECAP_RECONCILE_ON_LIST";
pub const CAMERA_BACKEND_ENV: &str = "SCOPECAP_CAMERA_BACKEND";

/// Where frames come from. `Native` exists only in builds with the
/// `native-camera` feature and is their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraBackend {
    #[cfg(feature = "native-camera")]
    #[default]
    Native,
    #[cfg_attr(not(feature = "native-camera"), default)]
    Pattern,
}

impl FromStr for CameraBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            #[cfg(feature = "native-camera")]
            "native" => Ok(Self::Native),
            "pattern" => Ok(Self::Pattern),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog_path: String,
    pub projects_root: String,
    pub camera_probe_limit: u32,
    pub default_device: u32,
    pub capture_extension: String,
    pub reconcile_on_list: bool,
    pub camera_backend: CameraBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: "projects.json".to_string(),
            projects_root: "projects".to_string(),
            camera_probe_limit: 10,
            default_device: 0,
            capture_extension: "jpg".to_string(),
            reconcile_on_list: true,
            camera_backend: CameraBackend::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(CATALOG_ENV) {
            config.catalog_path = value;
        }
        if let Some(value) = lookup(PROJECTS_ROOT_ENV) {
            config.projects_root = value;
        }
        if let Some(value) = lookup(PROBE_LIMIT_ENV) {
            config.camera_probe_limit = parse(PROBE_LIMIT_ENV, &value)?;
        }
        if let Some(value) = lookup(DEVICE_ENV) {
            config.default_device = parse(DEVICE_ENV, &value)?;
        }
        if let Some(value) = lookup(CAPTURE_EXT_ENV) {
            if ImageKind::from_extension(&value).is_none() {
                return Err(ConfigError {
                    key: CAPTURE_EXT_ENV,
                    value,
                });
            }
            config.capture_extension = value.to_ascii_lowercase();
        }
        if let Some(value) = lookup(RECONCILE_ENV) {
            config.reconcile_on_list = parse_flag(RECONCILE_ENV, &value)?;
        }
        if let Some(value) = lookup(CAMERA_BACKEND_ENV) {
            config.camera_backend = parse(CAMERA_BACKEND_ENV, &value)?;
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: value.to_string(),
        }),
    }
}
