// ============================================================================
// Module : ui
// ============================================================================
// Interface terminal : catalogue, graphique et tableau de la prédiction
// ============================================================================

use ratatui::style::Color;

use crate::models::Token;

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu de l'interface principale
pub mod chart;     // Graphique de la série
pub mod table;     // Tableau de prédiction

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;

/// Couleur d'accent du token, cyan si la couleur du catalogue est invalide
pub fn token_color(token: &Token) -> Color {
    token
        .rgb()
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Cyan)
}
