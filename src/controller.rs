// ============================================================================
// Selection Controller
// ============================================================================
// Machine à états de la sélection :
//
//   Idle ──select(A)──> Loading(A) ──complete──> Success(A) | Failed(A)
//   (tout état) ──select(B)──> Loading(B)
//
// CONCEPTS RUST :
// 1. Enum avec données : un seul RequestState vivant à la fois
// 2. Séparation select / run / complete :
//    - select() modifie l'état et rend une PendingRequest
//    - PendingRequest::run() fait l'appel réseau, sans emprunter le contrôleur
//    - complete() applique le résultat si la requête est toujours la dernière
// 3. Numéro de génération : une réponse d'une sélection dépassée est ignorée
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::ForecastSource;
use crate::error::{ForecastError, SelectError};
use crate::models::{ChartPoint, ForecastResult, Token};
use crate::series::build_series;
use crate::table::{prediction_rows, summarize, ForecastSummary, PredictionRow};

/// État de la requête pour le token sélectionné
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    /// Aucun token sélectionné
    Idle,
    /// Requête en cours pour ce token
    Loading(&'static Token),
    /// Prédiction reçue
    Success(&'static Token, ForecastResult),
    /// Échec de la requête (affiché, jamais réessayé automatiquement)
    Failed(&'static Token, ForecastError),
}

impl RequestState {
    /// Token concerné par l'état (None si Idle)
    pub fn token(&self) -> Option<&'static Token> {
        match self {
            RequestState::Idle => None,
            RequestState::Loading(token)
            | RequestState::Success(token, _)
            | RequestState::Failed(token, _) => Some(*token),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading(_))
    }
}

/// Requête émise par select(), à exécuter par l'appelant
pub struct PendingRequest {
    token: &'static Token,
    generation: u64,
    source: Arc<dyn ForecastSource>,
}

impl PendingRequest {
    pub fn token(&self) -> &'static Token {
        self.token
    }

    /// Exécute l'appel au service
    ///
    /// Consomme la requête : peut tourner sur un autre thread / runtime
    pub async fn run(self) -> Completion {
        let outcome = self.source.fetch_forecast(self.token.id).await;
        Completion {
            token: self.token,
            generation: self.generation,
            outcome,
        }
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("token", &self.token.id)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Résultat d'une PendingRequest, à rendre au contrôleur via complete()
#[derive(Debug)]
pub struct Completion {
    pub token: &'static Token,
    generation: u64,
    pub outcome: Result<ForecastResult, ForecastError>,
}

/// Contrôleur de sélection : seul propriétaire de RequestState
pub struct SelectionController {
    source: Arc<dyn ForecastSource>,
    baseline_window_size: usize,
    state: RequestState,

    /// Série calculée une fois par succès
    series: Vec<ChartPoint>,

    /// Incrémenté à chaque requête émise (et à chaque reset)
    generation: u64,
}

impl SelectionController {
    pub fn new(source: Arc<dyn ForecastSource>, baseline_window_size: usize) -> Self {
        Self {
            source,
            baseline_window_size,
            state: RequestState::Idle,
            series: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Token actuellement sélectionné
    pub fn selected(&self) -> Option<&'static Token> {
        self.state.token()
    }

    /// Sélectionne un token
    ///
    /// # Retourne
    /// * `Ok(Some(request))` - nouvelle requête à exécuter
    /// * `Ok(None)` - même token déjà chargé ou en cours : rien à faire
    /// * `Err(UnknownToken)` - id hors catalogue (bug de l'appelant)
    pub fn select(&mut self, token_id: &str) -> Result<Option<PendingRequest>, SelectError> {
        let token =
            Token::find(token_id).ok_or_else(|| SelectError::UnknownToken(token_id.to_string()))?;

        match &self.state {
            RequestState::Loading(current) | RequestState::Success(current, _)
                if current.id == token.id =>
            {
                debug!(token = %token.id, "Token already selected, no new request");
                return Ok(None);
            }
            _ => {}
        }

        self.generation += 1;
        self.state = RequestState::Loading(token);
        self.series.clear();
        info!(token = %token.id, generation = self.generation, "Requesting forecast");

        Ok(Some(PendingRequest {
            token,
            generation: self.generation,
            source: Arc::clone(&self.source),
        }))
    }

    /// Applique le résultat d'une requête
    ///
    /// Retourne false si la réponse est périmée (ignorée silencieusement)
    pub fn complete(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation || !self.state.is_loading() {
            debug!(
                token = %completion.token.id,
                generation = completion.generation,
                current = self.generation,
                "Discarding stale forecast response"
            );
            return false;
        }

        let token = completion.token;
        match completion.outcome {
            Ok(forecast) => {
                self.series = build_series(&forecast, self.baseline_window_size);
                info!(token = %token.id, points = self.series.len(), "Forecast applied");
                self.state = RequestState::Success(token, forecast);
            }
            Err(error) => {
                warn!(token = %token.id, error = %error, "Forecast request failed");
                self.series.clear();
                self.state = RequestState::Failed(token, error);
            }
        }

        true
    }

    /// select() + run() + complete() en une fois
    ///
    /// Retourne true si une requête a été émise et appliquée
    pub async fn select_and_fetch(&mut self, token_id: &str) -> Result<bool, SelectError> {
        match self.select(token_id)? {
            Some(pending) => {
                let completion = pending.run().await;
                Ok(self.complete(completion))
            }
            None => Ok(false),
        }
    }

    /// Retour à Idle ; les requêtes en vol deviennent périmées
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
        self.series.clear();
    }

    /// Série du graphique, uniquement en Success
    pub fn series(&self) -> Option<&[ChartPoint]> {
        match self.state {
            RequestState::Success(..) => Some(&self.series),
            _ => None,
        }
    }

    /// Prédiction brute, uniquement en Success
    pub fn forecast(&self) -> Option<&ForecastResult> {
        match &self.state {
            RequestState::Success(_, forecast) => Some(forecast),
            _ => None,
        }
    }

    /// Lignes du tableau de prédiction (vide hors Success)
    pub fn prediction_rows(&self) -> Vec<PredictionRow> {
        self.series().map(prediction_rows).unwrap_or_default()
    }

    pub fn summary(&self) -> Option<ForecastSummary> {
        self.series().and_then(summarize)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Source en mémoire : réponses scriptées + compteur d'appels
    #[derive(Default)]
    struct FakeSource {
        responses: HashMap<&'static str, Result<Vec<f64>, ForecastError>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with(mut self, token_id: &'static str, response: Result<Vec<f64>, ForecastError>) -> Self {
            self.responses.insert(token_id, response);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastSource for FakeSource {
        async fn fetch_forecast(&self, token_id: &str) -> Result<ForecastResult, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(token_id) {
                Some(Ok(prices)) => Ok(ForecastResult::new(token_id, prices.clone())),
                Some(Err(error)) => Err(error.clone()),
                None => Err(ForecastError::Service("unknown token".to_string())),
            }
        }
    }

    fn source() -> Arc<FakeSource> {
        Arc::new(
            FakeSource::default()
                .with("bitcoin", Ok(vec![61000.0, 61500.0, 60800.0, 62000.0, 62500.0]))
                .with("ethereum", Ok(vec![3000.0, 3010.0, 2990.0, 3050.0, 3100.0]))
                .with("solana", Err(ForecastError::Status { status: 503 })),
        )
    }

    #[test]
    fn test_starts_idle() {
        let controller = SelectionController::new(source(), 3);
        assert_eq!(controller.state(), &RequestState::Idle);
        assert!(controller.selected().is_none());
        assert!(controller.series().is_none());
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let mut controller = SelectionController::new(source(), 3);
        let result = controller.select("not-a-coin");
        assert!(matches!(result, Err(SelectError::UnknownToken(id)) if id == "not-a-coin"));
        assert_eq!(controller.state(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn test_success_builds_series_once() {
        let fake = source();
        let mut controller = SelectionController::new(fake.clone(), 3);

        assert!(controller.select_and_fetch("bitcoin").await.unwrap());

        assert!(matches!(controller.state(), RequestState::Success(t, _) if t.id == "bitcoin"));
        let series = controller.series().unwrap();
        assert_eq!(series.len(), 8);
        assert_eq!(controller.forecast().unwrap().daily_prices.len(), 5);
        assert_eq!(controller.prediction_rows().len(), 5);
        assert!(controller.summary().is_some());
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_reselecting_loaded_token_is_a_noop() {
        let fake = source();
        let mut controller = SelectionController::new(fake.clone(), 3);

        controller.select_and_fetch("bitcoin").await.unwrap();
        assert!(controller.select("bitcoin").unwrap().is_none());
        assert!(!controller.select_and_fetch("bitcoin").await.unwrap());

        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn test_reselecting_in_flight_token_is_a_noop() {
        let mut controller = SelectionController::new(source(), 3);
        let _pending = controller.select("bitcoin").unwrap().unwrap();
        assert!(controller.select("bitcoin").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failure_is_surfaced_not_retried() {
        let fake = source();
        let mut controller = SelectionController::new(fake.clone(), 3);

        controller.select_and_fetch("solana").await.unwrap();

        assert_eq!(
            controller.state().clone(),
            RequestState::Failed(
                Token::find("solana").unwrap(),
                ForecastError::Status { status: 503 }
            )
        );
        assert!(controller.series().is_none());
        assert!(controller.prediction_rows().is_empty());
        assert_eq!(fake.calls(), 1);

        // L'utilisateur peut relancer en resélectionnant
        assert!(controller.select("solana").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut controller = SelectionController::new(source(), 3);

        let request_a = controller.select("bitcoin").unwrap().unwrap();
        let request_b = controller.select("ethereum").unwrap().unwrap();

        // A répond avant B : ignoré, on reste en Loading(B)
        let completion_a = request_a.run().await;
        assert!(!controller.complete(completion_a));
        assert!(matches!(controller.state(), RequestState::Loading(t) if t.id == "ethereum"));

        let completion_b = request_b.run().await;
        assert!(controller.complete(completion_b));
        assert!(matches!(controller.state(), RequestState::Success(t, _) if t.id == "ethereum"));
    }

    #[tokio::test]
    async fn test_late_response_does_not_overwrite_newer_success() {
        let mut controller = SelectionController::new(source(), 3);

        let request_a = controller.select("bitcoin").unwrap().unwrap();
        let request_b = controller.select("ethereum").unwrap().unwrap();

        let completion_b = request_b.run().await;
        assert!(controller.complete(completion_b));

        let completion_a = request_a.run().await;
        assert!(!controller.complete(completion_a));

        let forecast = controller.forecast().unwrap();
        assert_eq!(forecast.token_id, "ethereum");
        assert_eq!(controller.series().unwrap()[3].price, 3000.0);
    }

    #[tokio::test]
    async fn test_a_b_a_only_latest_request_counts() {
        let mut controller = SelectionController::new(source(), 3);

        let first_a = controller.select("bitcoin").unwrap().unwrap();
        let _b = controller.select("ethereum").unwrap().unwrap();
        let second_a = controller.select("bitcoin").unwrap().unwrap();

        assert!(!controller.complete(first_a.run().await));
        assert!(controller.state().is_loading());
        assert!(controller.complete(second_a.run().await));
        assert!(matches!(controller.state(), RequestState::Success(t, _) if t.id == "bitcoin"));
    }

    #[tokio::test]
    async fn test_reset_makes_in_flight_request_stale() {
        let mut controller = SelectionController::new(source(), 3);

        let pending = controller.select("bitcoin").unwrap().unwrap();
        controller.reset();

        assert!(!controller.complete(pending.run().await));
        assert_eq!(controller.state(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn test_pending_request_runs_on_another_task() {
        let mut controller = SelectionController::new(source(), 2);

        let pending = controller.select("ethereum").unwrap().unwrap();
        let completion = tokio::spawn(pending.run()).await.unwrap();

        assert!(controller.complete(completion));
        assert_eq!(controller.series().unwrap().len(), 7);
    }
}
