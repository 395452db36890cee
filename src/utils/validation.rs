use crate::utils::error::{Result, ScatterError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScatterError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// The drawable area must stay positive once margins are taken off.
pub fn validate_viewport(width: f64, height: f64, margin_left: f64, margin_bottom: f64) -> Result<()> {
    if !width.is_finite() || width <= margin_left {
        return Err(ScatterError::InvalidConfigValue {
            field: "viewport.width".to_string(),
            value: width.to_string(),
            reason: format!("Width must be larger than the left margin ({})", margin_left),
        });
    }
    if !height.is_finite() || height <= margin_bottom {
        return Err(ScatterError::InvalidConfigValue {
            field: "viewport.height".to_string(),
            value: height.to_string(),
            reason: format!("Height must be larger than the bottom margin ({})", margin_bottom),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    if formats.is_empty() {
        return Err(ScatterError::InvalidConfigValue {
            field: field_name.to_string(),
            value: String::new(),
            reason: format!("At least one format is required: {}", allowed.join(", ")),
        });
    }

    for format in formats {
        if !allowed_set.contains(format.as_str()) {
            return Err(ScatterError::InvalidConfigValue {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ScatterError::MissingConfig {
        field: field_name.to_string(),
    })
}
