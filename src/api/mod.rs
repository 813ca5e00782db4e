// ============================================================================
// Module : api
// ============================================================================
// Accès au service de prédiction distant
//
// CONCEPT RUST : Trait asynchrone (async-trait)
// - ForecastSource abstrait "qui fournit la prédiction"
// - ForecastClient : implémentation HTTP (reqwest)
// - Les tests du contrôleur utilisent une source en mémoire
// ============================================================================

use async_trait::async_trait;

use crate::error::ForecastError;
use crate::models::ForecastResult;

pub mod prediction; // Client HTTP du service de prédiction

pub use prediction::{decode_response, ForecastClient};

/// Source de prédictions pour un token du catalogue
///
/// L'appelant valide l'id avant l'appel ; l'implémentation ne cache rien
/// et ne réessaie pas.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, token_id: &str) -> Result<ForecastResult, ForecastError>;
}
