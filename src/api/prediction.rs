// ============================================================================
// API Client : service de prédiction
// ============================================================================
// Demande la prédiction des prochains jours pour un token
//
// Contrat du service :
//   GET <api_url>?token=<id>
//   succès : {"token": "bitcoin", "next_5_days": [61000.0, ...]}
//   échec  : {"error": "Unsupported token. ..."}
//
// Le champ "error" signale un échec quel que soit le statut HTTP.
// ============================================================================

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::ForecastSource;
use crate::error::ForecastError;
use crate::models::{ForecastResult, FORECAST_HORIZON};

// ============================================================================
// Structure pour parser la réponse JSON du service
// ============================================================================
// Tous les champs sont optionnels : un succès et un échec partagent la même
// forme, c'est decode_response() qui décide.
// ============================================================================

#[derive(Debug, Deserialize)]
struct PredictResponse {
    token: Option<String>,
    next_5_days: Option<Vec<f64>>,
    error: Option<serde_json::Value>,
}

/// Client HTTP du service de prédiction
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Crée un client pour l'URL donnée
    ///
    /// # Arguments
    /// * `base_url` - Endpoint de prédiction, sans query string
    /// * `timeout` - Timeout par requête (None = attendre indéfiniment)
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("tokentrend/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Construit la requête GET pour un token
    fn build_request(&self, token_id: &str) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(&self.base_url)
            .query(&[("token", token_id)])
            .build()
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn fetch_forecast(&self, token_id: &str) -> Result<ForecastResult, ForecastError> {
        let request = self
            .build_request(token_id)
            .map_err(|e| ForecastError::Transport(e.to_string()))?;
        debug!(url = %request.url(), "Sending prediction request");

        let response = self.http.execute(request).await.map_err(|e| {
            error!(error = %e, "Prediction request failed");
            ForecastError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            ForecastError::Transport(e.to_string())
        })?;

        let forecast = decode_response(token_id, status.as_u16(), &body)?;
        info!(prices = ?forecast.daily_prices, "Forecast received");
        Ok(forecast)
    }
}

/// Convertit une réponse brute (statut + corps) en ForecastResult
///
/// Ordre des vérifications :
/// 1. champ "error" présent → Service (même avec HTTP 200)
/// 2. statut non-2xx → Status
/// 3. corps illisible ou "next_5_days" absent/invalide → Malformed
pub fn decode_response(
    token_id: &str,
    status: u16,
    body: &str,
) -> Result<ForecastResult, ForecastError> {
    let is_success = (200..300).contains(&status);

    let parsed: PredictResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if is_success => {
            warn!(error = %e, "Undecodable prediction body");
            return Err(ForecastError::Malformed(e.to_string()));
        }
        Err(_) => {
            warn!(status, "Prediction service returned error status");
            return Err(ForecastError::Status { status });
        }
    };

    if let Some(message) = parsed.error {
        let message = match message {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        warn!(status, message = %message, "Prediction service reported an error");
        return Err(ForecastError::Service(message));
    }

    if !is_success {
        warn!(status, "Prediction service returned error status");
        return Err(ForecastError::Status { status });
    }

    if let Some(token) = parsed.token.as_deref() {
        if !token.eq_ignore_ascii_case(token_id) {
            return Err(ForecastError::Malformed(format!(
                "forecast is for '{}', requested '{}'",
                token, token_id
            )));
        }
    }

    let prices = parsed
        .next_5_days
        .ok_or_else(|| ForecastError::Malformed("missing field next_5_days".to_string()))?;

    if prices.len() != FORECAST_HORIZON {
        return Err(ForecastError::Malformed(format!(
            "expected {} prices, got {}",
            FORECAST_HORIZON,
            prices.len()
        )));
    }

    if let Some(bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(ForecastError::Malformed(format!("invalid price {}", bad)));
    }

    Ok(ForecastResult::new(token_id, prices))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_url() {
        let client = ForecastClient::new("http://localhost:5000/predict", None).unwrap();
        let request = client.build_request("avalanche-2").unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:5000/predict?token=avalanche-2"
        );
    }

    #[test]
    fn test_decode_success() {
        let body = r#"{"token": "bitcoin", "next_5_days": [61000, 61500, 60800, 62000, 62500]}"#;
        let forecast = decode_response("bitcoin", 200, body).unwrap();
        assert_eq!(forecast.token_id, "bitcoin");
        assert_eq!(
            forecast.daily_prices,
            vec![61000.0, 61500.0, 60800.0, 62000.0, 62500.0]
        );
    }

    #[test]
    fn test_error_field_with_http_200_is_failure() {
        let result = decode_response("bitcoin", 200, r#"{"error": "unknown token"}"#);
        assert_eq!(result, Err(ForecastError::Service("unknown token".to_string())));
    }

    #[test]
    fn test_error_field_wins_over_status() {
        let body = r#"{"error": "Model not trained for this token"}"#;
        let result = decode_response("solana", 503, body);
        assert!(matches!(result, Err(ForecastError::Service(msg)) if msg.contains("not trained")));
    }

    #[test]
    fn test_non_success_without_error_field() {
        assert_eq!(
            decode_response("bitcoin", 502, "<html>Bad Gateway</html>"),
            Err(ForecastError::Status { status: 502 })
        );
    }

    #[test]
    fn test_missing_prices_is_malformed() {
        let result = decode_response("bitcoin", 200, r#"{"token": "bitcoin"}"#);
        assert!(matches!(result, Err(ForecastError::Malformed(_))));
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        let result = decode_response("bitcoin", 200, "not json");
        assert!(matches!(result, Err(ForecastError::Malformed(_))));
    }

    #[test]
    fn test_wrong_horizon_is_malformed() {
        let body = r#"{"token": "bitcoin", "next_5_days": [1.0, 2.0]}"#;
        assert!(matches!(
            decode_response("bitcoin", 200, body),
            Err(ForecastError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_positive_price_is_malformed() {
        let body = r#"{"token": "bitcoin", "next_5_days": [1.0, 2.0, 0.0, 3.0, 4.0]}"#;
        assert!(matches!(
            decode_response("bitcoin", 200, body),
            Err(ForecastError::Malformed(_))
        ));
    }

    #[test]
    fn test_token_mismatch_is_malformed() {
        let body = r#"{"token": "ethereum", "next_5_days": [1.0, 2.0, 3.0, 4.0, 5.0]}"#;
        assert!(matches!(
            decode_response("bitcoin", 200, body),
            Err(ForecastError::Malformed(_))
        ));
    }

    /// Serveur HTTP minimal : répond une seule fois avec le statut et le corps donnés
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = [0u8; 1024];
            let _ = socket.read(&mut buffer).await.unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/predict", addr)
    }

    #[tokio::test]
    async fn test_fetch_error_field_with_http_200() {
        let url = serve_once("200 OK", r#"{"error": "Unsupported token"}"#).await;
        let client = ForecastClient::new(url, Some(Duration::from_secs(5))).unwrap();

        let result = client.fetch_forecast("bitcoin").await;
        assert_eq!(result, Err(ForecastError::Service("Unsupported token".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_success_over_http() {
        let url = serve_once(
            "200 OK",
            r#"{"token": "bitcoin", "next_5_days": [61000, 61500, 60800, 62000, 62500]}"#,
        )
        .await;
        let client = ForecastClient::new(url, Some(Duration::from_secs(5))).unwrap();

        let forecast = client.fetch_forecast("bitcoin").await.unwrap();
        assert_eq!(forecast.token_id, "bitcoin");
        assert_eq!(forecast.first_price(), Some(61000.0));
    }

    #[tokio::test]
    async fn test_fetch_bad_gateway_over_http() {
        let url = serve_once("502 Bad Gateway", "<html>Bad Gateway</html>").await;
        let client = ForecastClient::new(url, Some(Duration::from_secs(5))).unwrap();

        let result = client.fetch_forecast("bitcoin").await;
        assert_eq!(result, Err(ForecastError::Status { status: 502 }));
    }

    // Test avec un vrai appel réseau vers un port fermé
    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = ForecastClient::new("http://127.0.0.1:9/predict", Some(Duration::from_secs(2)))
            .unwrap();
        let result = client.fetch_forecast("bitcoin").await;
        assert!(matches!(result, Err(ForecastError::Transport(_))));
    }
}
