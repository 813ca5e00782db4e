// ============================================================================
// Structure : App
// ============================================================================
// État de l'application TUI
//
// PATTERN : "Application State"
// - Le rendu lit depuis App
// - Les modifications passent par les méthodes de App
// - L'état de la prédiction reste dans le SelectionController
// ============================================================================

use crate::controller::{PendingRequest, SelectionController};
use crate::error::SelectError;
use crate::models::{Token, TOKEN_CATALOG};

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Index du token en surbrillance dans le catalogue
    pub highlighted_index: usize,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false
    pub confirm_quit: bool,

    /// Sélection et prédiction courantes
    pub controller: SelectionController,
}

impl App {
    pub fn new(controller: SelectionController) -> Self {
        Self {
            running: true,
            highlighted_index: 0,
            confirm_quit: false,
            controller,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigue vers le haut dans le catalogue
    ///
    /// CONCEPT RUST : saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.highlighted_index = self.highlighted_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans le catalogue
    pub fn navigate_down(&mut self) {
        let max_index = TOKEN_CATALOG.len().saturating_sub(1);
        self.highlighted_index = (self.highlighted_index + 1).min(max_index);
    }

    /// Token en surbrillance
    pub fn highlighted_token(&self) -> Option<&'static Token> {
        TOKEN_CATALOG.get(self.highlighted_index)
    }

    /// Sélectionne le token en surbrillance
    ///
    /// Retourne la requête à envoyer au worker, ou None si rien à faire
    pub fn select_highlighted(&mut self) -> Result<Option<PendingRequest>, SelectError> {
        match self.highlighted_token() {
            Some(token) => self.controller.select(token.id),
            None => Ok(None),
        }
    }

    /// Retour à l'état initial (aucune sélection)
    pub fn clear_selection(&mut self) {
        self.controller.reset();
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
