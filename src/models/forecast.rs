// ============================================================================
// Structure : ForecastResult
// ============================================================================
// Prédiction reçue du service pour un token
//
// CONCEPTS RUST :
// 1. Données immuables : une prédiction n'est jamais modifiée,
//    la suivante la remplace entièrement
// 2. DateTime<Utc> : horodatage de réception (chrono)
// ============================================================================

use chrono::{DateTime, Utc};

/// Nombre de jours prédits par le service (contrat "next_5_days")
pub const FORECAST_HORIZON: usize = 5;

/// Prédiction de prix sur l'horizon du service
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Id du token du catalogue (ex: "bitcoin")
    pub token_id: String,

    /// Prix prédits, jour +1 en premier (tous finis et > 0)
    pub daily_prices: Vec<f64>,

    /// Instant de réception de la réponse
    pub fetched_at: DateTime<Utc>,
}

impl ForecastResult {
    pub fn new(token_id: impl Into<String>, daily_prices: Vec<f64>) -> Self {
        Self {
            token_id: token_id.into(),
            daily_prices,
            fetched_at: Utc::now(),
        }
    }

    /// Premier prix prédit (jour +1)
    pub fn first_price(&self) -> Option<f64> {
        self.daily_prices.first().copied()
    }

    /// Heure de réception pour l'affichage ("14:03:12 UTC")
    pub fn fetched_label(&self) -> String {
        self.fetched_at.format("%H:%M:%S UTC").to_string()
    }
}
