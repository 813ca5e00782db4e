// ============================================================================
// Erreurs typées du pipeline de prédiction
// ============================================================================
// Toutes les pannes attendues sont converties en valeurs à la frontière du
// client de prédiction : rien au-dessus ne panique pour un cas prévu.
// ============================================================================

use thiserror::Error;

/// Échec d'une requête de prédiction
///
/// CONCEPT RUST : Clone + PartialEq
/// - L'erreur est stockée dans RequestState::Failed, qui doit être clonable
/// - On garde donc des String plutôt que les erreurs sources (reqwest::Error)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Réseau injoignable, timeout, connexion coupée
    #[error("transport error: {0}")]
    Transport(String),

    /// Statut HTTP non-2xx sans message d'erreur du service
    #[error("prediction service returned HTTP {status}")]
    Status { status: u16 },

    /// Le service a répondu avec un champ "error"
    #[error("prediction service error: {0}")]
    Service(String),

    /// Corps illisible, champ manquant, prix invalides
    #[error("malformed forecast response: {0}")]
    Malformed(String),
}

impl ForecastError {
    /// Raison lisible, affichée telle quelle par la vue
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Erreur de contrat côté appelant du contrôleur
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("token '{0}' is not in the catalog")]
    UnknownToken(String),
}
