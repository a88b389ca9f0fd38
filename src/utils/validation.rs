use crate::utils::error::{ResolverError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ResolverError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檢查檔案副檔名，例如資料集只接受 .toml、客戶資料只接受 .csv
pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    validate_path(field_name, file)?;

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ResolverError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ResolverError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("lead_store.endpoint", "https://example.com/leads").is_ok());
        assert!(validate_url("lead_store.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("lead_store.endpoint", "").is_err());
        assert!(validate_url("lead_store.endpoint", "invalid-url").is_err());
        assert!(validate_url("lead_store.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("resolver.dataset_path", "offices.toml", &["toml"]).is_ok());
        assert!(validate_file_extension("resolver.dataset_path", "offices.json", &["toml"]).is_err());
        assert!(validate_file_extension("lead_store.path", "leads", &["csv"]).is_err());
        assert!(validate_file_extension("lead_store.path", "", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("leads.csv".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("lead_store.path", &present).unwrap(), "leads.csv");
        assert!(matches!(
            validate_required_field("lead_store.path", &absent),
            Err(ResolverError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_positive_number_and_strings() {
        assert!(validate_positive_number("lead_store.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("lead_store.timeout_seconds", 0, 1).is_err());
        assert!(validate_non_empty_string("name", "Alfândega").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }
}
