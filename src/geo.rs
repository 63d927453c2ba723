/**
 * Visitor Geolocation
 * Best-effort country/city lookup against an external HTTP API. Any
 * failure degrades to no geo data; recording the visit never depends on
 * this collaborator.
 */
use once_cell::sync::Lazy;
use serde::Deserialize;

static GEO_API_BASE: Lazy<String> = Lazy::new(|| {
    std::env::var("GEO_API_BASE").unwrap_or_else(|_| "http://ip-api.com/json".to_string())
});

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoInfo {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
}

pub async fn lookup(ip: &str) -> Option<GeoInfo> {
    if ip.is_empty() || ip == "127.0.0.1" || ip == "::1" {
        return None;
    }

    let url = format!("{}/{}", *GEO_API_BASE, ip);

    let response = match HTTP_CLIENT.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(ip = %ip, error = %e, "geo lookup request failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(ip = %ip, status = %status, "geo lookup returned error");
        return None;
    }

    match response.json::<GeoInfo>().await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(ip = %ip, error = %e, "failed to parse geo response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_skips_loopback() {
        assert!(lookup("127.0.0.1").await.is_none());
        assert!(lookup("::1").await.is_none());
        assert!(lookup("").await.is_none());
    }
}
