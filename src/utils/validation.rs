use crate::utils::error::{Result, TeamBuilderError};
use url::Url;

pub const MIN_TEAM_NAME_LENGTH: usize = 2;
pub const MAX_TEAM_NAME_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TeamBuilderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TeamBuilderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TeamBuilderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TeamBuilderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TeamBuilderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TeamBuilderError::validation(
            field_name,
            format!("{} cannot be empty or whitespace-only", field_name),
        ));
    }
    Ok(())
}

/// Counts characters, not bytes, so "Pokémon" is seven long.
pub fn validate_max_length(field_name: &str, value: &str, max: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max {
        return Err(TeamBuilderError::validation(
            field_name,
            format!(
                "{} must be at most {} characters (got {})",
                field_name, max, length
            ),
        ));
    }
    Ok(())
}

pub fn validate_min_length(field_name: &str, value: &str, min: usize) -> Result<()> {
    let length = value.chars().count();
    if length < min {
        return Err(TeamBuilderError::validation(
            field_name,
            format!(
                "{} must be at least {} characters (got {})",
                field_name, min, length
            ),
        ));
    }
    Ok(())
}

/// Trims and checks a team name, returning the value to store.
pub fn normalize_team_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    validate_non_empty_string("name", trimmed)?;
    validate_min_length("name", trimmed, MIN_TEAM_NAME_LENGTH)?;
    validate_max_length("name", trimmed, MAX_TEAM_NAME_LENGTH)?;
    Ok(trimmed.to_string())
}

/// Blank descriptions collapse to `None`.
pub fn normalize_description(description: Option<&str>) -> Result<Option<String>> {
    match description.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            validate_max_length("description", text, MAX_DESCRIPTION_LENGTH)?;
            Ok(Some(text.to_string()))
        }
    }
}
