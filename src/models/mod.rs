// ============================================================================
// Module : models
// ============================================================================
// Structures de données du pipeline de prédiction
// ============================================================================

pub mod token;       // Catalogue des tokens supportés
pub mod forecast;    // Prédiction reçue du service
pub mod chart_point; // Points de la série affichée

// Re-export des structures principales pour simplifier les imports
pub use token::{Token, TOKEN_CATALOG};
pub use forecast::{ForecastResult, FORECAST_HORIZON};
pub use chart_point::{format_change, ChartPoint, Trend};
