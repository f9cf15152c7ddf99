use crate::core::currency::RateSource;
use crate::core::error::{ConversionError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, instrument};

const SUCCESS: &str = "success";

/// Client for the rate proxy that fronts the exchange-rate provider.
pub struct RateProxyProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RateProxyProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().user_agent("fxconv/1.0").build()?;
        Ok(RateProxyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&url, params)
            .map_err(|e| ConversionError::Network(format!("Invalid proxy URL {url}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        debug!("Requesting {} from {}", context, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ConversionError::Network(format!("Request error: {e} for {context}")))?;

        if !response.status().is_success() {
            return Err(ConversionError::Network(format!(
                "HTTP error: {} for {}",
                response.status(),
                context
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ConversionError::Upstream(format!("Failed to parse JSON response for {context}: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(alias = "error-type")]
    error: Option<String>,
    conversion_rates: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct PairRateResponse {
    result: Option<String>,
    #[serde(alias = "error-type")]
    error: Option<String>,
    conversion_rate: Option<f64>,
}

fn upstream_failure(error: Option<String>, fallback: &str) -> ConversionError {
    ConversionError::Upstream(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait]
impl RateSource for RateProxyProvider {
    #[instrument(skip(self))]
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = self.endpoint("/api/rates/latest", &[("base", base.to_uppercase())])?;
        let data: LatestRatesResponse = self.get_json(url, &format!("base {base}")).await?;

        match (data.result.as_deref(), data.conversion_rates) {
            (Some(SUCCESS), Some(rates)) => Ok(rates),
            _ => Err(upstream_failure(data.error, "Failed to fetch rates")),
        }
    }

    #[instrument(skip(self))]
    async fn pair_rate(&self, from: &str, to: &str) -> Result<f64> {
        let url = self.endpoint(
            "/api/rates/pair",
            &[("from", from.to_uppercase()), ("to", to.to_uppercase())],
        )?;
        let data: PairRateResponse = self
            .get_json(url, &format!("currency pair: {from}->{to}"))
            .await?;

        match (data.result.as_deref(), data.conversion_rate) {
            (Some(SUCCESS), Some(rate)) => Ok(rate),
            _ => Err(upstream_failure(data.error, "Failed to fetch pair rate")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_latest(mock_server: &MockServer, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/api/rates/latest"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    async fn mount_pair(mock_server: &MockServer, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/api/rates/pair"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_latest_rates_fetch() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            200,
            r#"{"result": "success", "conversion_rates": {"USD": 1, "EUR": 0.9, "GBP": 0.8}}"#,
        )
        .await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let rates = provider.latest_rates("usd").await.unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["EUR"], 0.9);
    }

    #[tokio::test]
    async fn test_latest_rates_upstream_error() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            200,
            r#"{"result": "error", "error": "invalid-key"}"#,
        )
        .await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.latest_rates("USD").await;
        assert_eq!(
            result.unwrap_err(),
            ConversionError::Upstream("invalid-key".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_rates_missing_rates_uses_generic_message() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, 200, r#"{"result": "success"}"#).await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.latest_rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch rates"
        );
    }

    #[tokio::test]
    async fn test_successful_pair_rate_fetch() {
        let mock_server = MockServer::start().await;
        mount_pair(
            &mock_server,
            200,
            r#"{"result": "success", "conversion_rate": 0.9}"#,
        )
        .await;

        let provider = RateProxyProvider::new(&format!("{}/", mock_server.uri())).unwrap();
        let rate = provider
            .pair_rate("usd", "eur")
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 0.9);
    }

    #[tokio::test]
    async fn test_pair_rate_upstream_error() {
        let mock_server = MockServer::start().await;
        mount_pair(
            &mock_server,
            200,
            r#"{"result": "error", "error": "rate limit"}"#,
        )
        .await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.pair_rate("USD", "EUR").await;
        assert_eq!(result.unwrap_err().to_string(), "rate limit");
    }

    #[tokio::test]
    async fn test_pair_rate_accepts_error_type_field() {
        let mock_server = MockServer::start().await;
        mount_pair(
            &mock_server,
            200,
            r#"{"result": "error", "error-type": "unsupported-code"}"#,
        )
        .await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.pair_rate("USD", "EUR").await;
        assert_eq!(result.unwrap_err().to_string(), "unsupported-code");
    }

    #[tokio::test]
    async fn test_pair_rate_http_error_is_network_error() {
        let mock_server = MockServer::start().await;
        mount_pair(&mock_server, 500, "").await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.pair_rate("USD", "EUR").await;
        assert_eq!(
            result.unwrap_err(),
            ConversionError::Network(
                "HTTP error: 500 Internal Server Error for currency pair: USD->EUR".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_pair_rate_malformed_response() {
        let mock_server = MockServer::start().await;
        mount_pair(&mock_server, 200, "<html>oops</html>").await;

        let provider = RateProxyProvider::new(&mock_server.uri()).unwrap();
        let result = provider.pair_rate("USD", "EUR").await;
        let err = result.unwrap_err();
        assert!(matches!(err, ConversionError::Upstream(_)));
        assert!(
            err.to_string()
                .contains("Failed to parse JSON response for currency pair: USD->EUR")
        );
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_network_error() {
        let mock_server = MockServer::start().await;
        let uri = mock_server.uri();
        drop(mock_server);

        let provider = RateProxyProvider::new(&uri).unwrap();
        let result = provider.pair_rate("USD", "EUR").await;
        assert!(matches!(result, Err(ConversionError::Network(_))));
    }
}
