use crate::utils::error::{EtlError, Result};
use ipnetwork::IpNetwork;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_factor(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

/// 解析 CIDR 清單，單一 IP 視為 /32 或 /128
pub fn parse_subnets(field_name: &str, subnets: &[String]) -> Result<Vec<IpNetwork>> {
    subnets
        .iter()
        .map(|subnet| {
            subnet
                .trim()
                .parse::<IpNetwork>()
                .map_err(|e| EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: subnet.clone(),
                    reason: format!("Invalid subnet: {}", e),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("splynx.api_url", "https://splynx.example.net").is_ok());
        assert!(validate_url("splynx.api_url", "http://10.0.0.1:8080").is_ok());
        assert!(validate_url("splynx.api_url", "").is_err());
        assert!(validate_url("splynx.api_url", "invalid-url").is_err());
        assert!(validate_url("splynx.api_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_factor() {
        assert!(validate_positive_factor("shaping.bandwidth_overhead_factor", 1.0).is_ok());
        assert!(validate_positive_factor("shaping.bandwidth_overhead_factor", 1.15).is_ok());
        assert!(validate_positive_factor("shaping.bandwidth_overhead_factor", 0.0).is_err());
        assert!(validate_positive_factor("shaping.bandwidth_overhead_factor", f64::NAN).is_err());
    }

    #[test]
    fn test_parse_subnets() {
        let subnets = vec!["100.64.0.0/10".to_string(), "192.168.1.5".to_string()];
        let parsed = parse_subnets("shaping.allowed_subnets", &subnets).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].prefix(), 32);

        let invalid = vec!["300.1.1.0/24".to_string()];
        assert!(parse_subnets("shaping.allowed_subnets", &invalid).is_err());
    }
}
