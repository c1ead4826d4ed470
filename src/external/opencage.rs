use crate::config::OpenCageConfig;
use crate::error::{AppError, AppResult};
use crate::models::GeocodeResponse;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: Geometry,
    #[serde(default)]
    formatted: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted: String,
}

/// The full address followed by progressively coarser variants, each
/// dropping the leading comma-separated component ("street, district, city"
/// -> "district, city" -> "city").
pub fn coarser_candidates(address: &str) -> Vec<String> {
    let parts: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    (0..parts.len()).map(|i| parts[i..].join(", ")).collect()
}

#[derive(Clone)]
pub struct OpenCageService {
    client: Client,
    config: OpenCageConfig,
}

impl OpenCageService {
    pub fn new(config: OpenCageConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Single lookup; `Ok(None)` when OpenCage has no match.
    pub async fn geocode(&self, query: &str) -> AppResult<Option<GeocodeHit>> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError(
                "OpenCage API key is not configured".to_string(),
            ));
        }

        let url = format!("{}/geocode/v1/json", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("key", self.config.api_key.as_str()),
                ("countrycode", self.config.country_code.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Geocoding failed (HTTP {}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: OpenCageResponse = response.json().await?;
        Ok(body.results.into_iter().next().map(|r| GeocodeHit {
            latitude: r.geometry.lat,
            longitude: r.geometry.lng,
            formatted: r.formatted,
        }))
    }

    /// Tries each of [`coarser_candidates`] until one resolves.
    pub async fn geocode_with_fallback(&self, address: &str) -> AppResult<Option<GeocodeResponse>> {
        let candidates = coarser_candidates(address);
        if candidates.is_empty() {
            return Err(AppError::ValidationError("Address is required".to_string()));
        }

        for (i, candidate) in candidates.iter().enumerate() {
            if let Some(hit) = self.geocode(candidate).await? {
                if i > 0 {
                    log::info!("Geocoded '{address}' using coarser query '{candidate}'");
                }
                return Ok(Some(GeocodeResponse {
                    latitude: hit.latitude,
                    longitude: hit.longitude,
                    formatted: hit.formatted,
                    matched_query: candidate.clone(),
                    approximate: i > 0,
                }));
            }
        }

        log::warn!("No geocoding result for '{address}'");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarser_candidates() {
        let c = coarser_candidates("Jl. Sudirman No. 5, Senayan, Jakarta Selatan, 12190");
        assert_eq!(
            c,
            vec![
                "Jl. Sudirman No. 5, Senayan, Jakarta Selatan, 12190",
                "Senayan, Jakarta Selatan, 12190",
                "Jakarta Selatan, 12190",
                "12190",
            ]
        );
    }

    #[test]
    fn test_coarser_candidates_skips_blank_parts() {
        assert_eq!(coarser_candidates(" Bandung ,, "), vec!["Bandung"]);
        assert!(coarser_candidates("  , ").is_empty());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "results": [{"geometry": {"lat": -6.2, "lng": 106.8}, "formatted": "Jakarta, Indonesia"}],
            "status": {"code": 200, "message": "OK"}
        }"#;
        let parsed: OpenCageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].geometry.lng, 106.8);

        let empty: OpenCageResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn test_disabled_without_key() {
        assert!(!OpenCageService::new(OpenCageConfig::default()).is_enabled());
    }
}
