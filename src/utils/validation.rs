use crate::domain::model::LatLng;
use crate::utils::error::{LocatorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LocatorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 憑證不可為空，也不可以是沒有被替換掉的 `${VAR}` 佔位符
pub fn validate_credential(field_name: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim) {
        None | Some("") => Err(LocatorError::MissingConfigError {
            field: field_name.to_string(),
        }),
        Some(v) if v.starts_with("${") && v.ends_with('}') => {
            Err(LocatorError::MissingConfigError {
                field: field_name.to_string(),
            })
        }
        Some(v) if v.chars().any(char::is_whitespace) => {
            Err(LocatorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: "<redacted>".to_string(),
                reason: "Credential cannot contain whitespace".to_string(),
            })
        }
        Some(_) => Ok(()),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LocatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_lat_lng(field_name: &str, position: LatLng) -> Result<()> {
    if position.is_valid() {
        return Ok(());
    }
    Err(LocatorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: position.to_string(),
        reason: "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string(),
    })
}
