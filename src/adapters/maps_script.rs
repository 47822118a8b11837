use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::validate_credential;
use url::Url;

pub const DEFAULT_SCRIPT_BASE: &str = "https://maps.googleapis.com/maps/api/js";

/// Parameters the provider's loader sends when bootstrapping its script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub base: String,
    pub api_key: String,
    pub version: String,
    pub libraries: Vec<String>,
}

impl ScriptRequest {
    pub fn url(&self) -> Result<Url> {
        validate_credential("provider.api_key", Some(self.api_key.as_str()))?;

        let mut url = Url::parse(&self.base).map_err(|e| LocatorError::InvalidConfigValueError {
            field: "provider.script_base".to_string(),
            value: self.base.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api_key);
            query.append_pair("v", &self.version);
            if !self.libraries.is_empty() {
                query.append_pair("libraries", &self.libraries.join(","));
            }
        }
        Ok(url)
    }

    /// Same as [`ScriptRequest::url`] with the key masked, for logs.
    pub fn redacted_url(&self) -> Result<String> {
        let mut url = self.url()?;
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let value = if k == "key" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        Ok(url.to_string())
    }
}
