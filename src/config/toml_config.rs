use crate::adapters::feed::is_remote;
use crate::adapters::maps_script::{ScriptRequest, DEFAULT_SCRIPT_BASE};
use crate::domain::model::LatLng;
use crate::domain::ports::{ConfigProvider, MapOptions, STREET_ZOOM};
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "store-locator.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocatorConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,
    #[serde(default = "default_script_base")]
    pub script_base: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            version: default_version(),
            libraries: default_libraries(),
            script_base: default_script_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_search_input")]
    pub search_input: String,
    #[serde(default = "default_center")]
    pub center: LatLng,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_place_zoom")]
    pub place_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            search_input: default_search_input(),
            center: default_center(),
            zoom: default_zoom(),
            place_zoom: default_place_zoom(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_location")]
    pub location: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            location: default_feed_location(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_version() -> String { "weekly".to_string() }
fn default_libraries() -> Vec<String> { vec!["places".to_string()] }
fn default_script_base() -> String { DEFAULT_SCRIPT_BASE.to_string() }
fn default_container() -> String { "google-map".to_string() }
fn default_search_input() -> String { "search-bar".to_string() }
fn default_center() -> LatLng { LatLng::new(20.0, 0.0) }
fn default_zoom() -> u8 { 3 }
fn default_place_zoom() -> u8 { STREET_ZOOM }
fn default_feed_location() -> String { "public/stores.json".to_string() }
fn default_timeout_seconds() -> u64 { 10 }

impl LocatorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| LocatorError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parse_error = |e: toml::de::Error| LocatorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        };

        let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
        let mut value = toml::Value::Table(table);
        Self::substitute_env_vars(&mut value)?;
        value.try_into().map_err(parse_error)
    }

    /// 替換字串值裡的環境變數 (例如 ${MAPS_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(value: &mut toml::Value) -> Result<()> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            LocatorError::ConfigError {
                message: format!("env substitution pattern: {}", e),
            }
        })?;
        Self::substitute_in(value, &re);
        Ok(())
    }

    fn substitute_in(value: &mut toml::Value, re: &regex::Regex) {
        match value {
            toml::Value::String(text) => {
                let replaced = re.replace_all(text.as_str(), |caps: &regex::Captures| {
                    let var_name = &caps[1];
                    std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                });
                *text = replaced.into_owned();
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_in(item, re);
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    Self::substitute_in(item, re);
                }
            }
            _ => {}
        }
    }

    pub fn script_request(&self) -> ScriptRequest {
        ScriptRequest {
            base: self.provider.script_base.clone(),
            api_key: self.api_key().unwrap_or_default().to_string(),
            version: self.provider.version.clone(),
            libraries: self.provider.libraries.clone(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        // 憑證缺失是致命錯誤
        validation::validate_credential("provider.api_key", self.api_key())?;
        validation::validate_non_empty_string("provider.version", &self.provider.version)?;
        validation::validate_url("provider.script_base", &self.provider.script_base)?;

        validation::validate_non_empty_string("map.container", &self.map.container)?;
        validation::validate_non_empty_string("map.search_input", &self.map.search_input)?;
        validation::validate_lat_lng("map.center", self.map.center)?;
        validation::validate_range("map.zoom", self.map.zoom, 0, 22)?;
        validation::validate_range("map.place_zoom", self.map.place_zoom, 0, 22)?;

        if is_remote(&self.feed.location) {
            validation::validate_url("feed.location", &self.feed.location)?;
        } else {
            validation::validate_path("feed.location", &self.feed.location)?;
        }
        validation::validate_range("feed.timeout_seconds", self.feed.timeout_seconds, 1, 300)?;

        Ok(())
    }
}

impl ConfigProvider for LocatorConfig {
    fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref()
    }

    fn feed_location(&self) -> &str {
        &self.feed.location
    }

    fn feed_timeout_seconds(&self) -> u64 {
        self.feed.timeout_seconds
    }

    fn map_options(&self) -> MapOptions {
        MapOptions {
            container: self.map.container.clone(),
            search_input: self.map.search_input.clone(),
            center: self.map.center,
            zoom: self.map.zoom,
            place_zoom: self.map.place_zoom,
        }
    }
}

impl Validate for LocatorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
