// ============================================================================
// TokenTrend - Library
// ============================================================================
// Pipeline de prédiction : client du service, assemblage de la série,
// contrôleur de sélection. L'interface terminal consomme ces modules.
// ============================================================================

pub mod api;        // Client du service de prédiction
pub mod app;        // État de l'application TUI
pub mod config;     // Configuration (variables d'environnement)
pub mod controller; // Machine à états de la sélection
pub mod error;      // Erreurs typées
pub mod models;     // Structures de données
pub mod series;     // Assemblage de la série historique + prédite
pub mod table;      // Lignes du tableau de prédiction
pub mod ui;         // Interface utilisateur
