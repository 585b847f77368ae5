//! Input validation for query options: excluded domains, periods and proxies.
//!
//! Everything here runs while a `SearchQuery` is being built, before any
//! network call is attempted.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid excluded domain '{0}': {1}")]
    InvalidDomain(String, &'static str),

    #[error("Invalid period '{0}': expected <number><d|h|m>, e.g. 7d")]
    InvalidPeriod(String),

    #[error("Invalid proxy scheme '{0}': expected http or https")]
    InvalidProxyScheme(String),

    #[error("Invalid proxy URL: {0}")]
    InvalidProxyUrl(String),
}

/// Normalize an excluded domain for host-prefix matching
///
/// Accepts `cnn.com`, `www.CNN.com` or `https://cnn.com` and returns the bare,
/// lowercased host (`cnn.com`). Paths, whitespace and control characters are rejected.
pub fn normalize_exclude_domain(domain: &str) -> Result<String, ValidationError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidDomain(
            domain.to_string(),
            "empty domain",
        ));
    }

    let lower = trimmed.to_lowercase();
    let host = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() {
        return Err(ValidationError::InvalidDomain(
            domain.to_string(),
            "empty domain",
        ));
    }

    for ch in host.chars() {
        if ch.is_whitespace() || ch.is_control() {
            return Err(ValidationError::InvalidDomain(
                domain.to_string(),
                "contains whitespace or control characters",
            ));
        }
        if matches!(ch, '/' | '?' | '#' | '@' | '\\') {
            return Err(ValidationError::InvalidDomain(
                domain.to_string(),
                "must be a host name without path or query",
            ));
        }
    }

    Ok(host.to_string())
}

/// Split a period string such as `7d` into amount and unit
pub fn parse_period(period: &str) -> Result<(u32, char), ValidationError> {
    let period = period.trim();
    let invalid = || ValidationError::InvalidPeriod(period.to_string());

    let unit = period.chars().last().ok_or_else(invalid)?;
    if !matches!(unit, 'd' | 'h' | 'm') {
        return Err(invalid());
    }

    let digits = &period[..period.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let amount: u32 = digits.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    Ok((amount, unit))
}

/// Validate a proxy map entry (`scheme -> proxy URL`)
pub fn validate_proxy(scheme: &str, proxy_url: &str) -> Result<(String, String), ValidationError> {
    let scheme = scheme.trim().to_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ValidationError::InvalidProxyScheme(scheme));
    }

    let proxy_url = proxy_url.trim();
    if proxy_url.contains('\0') || proxy_url.contains('\n') || proxy_url.contains('\r') {
        return Err(ValidationError::InvalidProxyUrl(
            "contains control characters".to_string(),
        ));
    }

    let parsed =
        url::Url::parse(proxy_url).map_err(|e| ValidationError::InvalidProxyUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" | "socks5" | "socks5h" => {}
        other => {
            return Err(ValidationError::InvalidProxyUrl(format!(
                "unsupported proxy scheme: {}",
                other
            )))
        }
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidProxyUrl("missing host".to_string()));
    }

    Ok((scheme, proxy_url.to_string()))
}
