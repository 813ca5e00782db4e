// ============================================================================
// Structure : ChartPoint
// ============================================================================
// Un point de la série affichée (graphique et tableau)
//
// CONCEPT RUST : Option<f64> au lieu de NaN
// - change_percent = None quand la variation n'est pas définie
//   (premier point, prix précédent nul)
// - Aucun NaN/Infinity ne peut atteindre l'affichage
// ============================================================================

/// Direction de la variation d'un point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Variation définie et >= 0
    Up,
    /// Variation définie et négative
    Down,
    /// Variation non définie
    Flat,
}

impl Trend {
    pub fn from_change(change_percent: Option<f64>) -> Self {
        match change_percent {
            Some(change) if change >= 0.0 => Trend::Up,
            Some(_) => Trend::Down,
            None => Trend::Flat,
        }
    }

    /// Flèche pour l'affichage
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "■",
        }
    }
}

/// Point de la série : historique ou prédit
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Label de l'axe X ("Day -3", "Day +1", ...)
    pub label: String,

    pub price: f64,

    /// true pour les points de la prédiction, false pour la fenêtre historique
    pub is_predicted: bool,

    /// Variation en % depuis le point précédent
    pub change_percent: Option<f64>,
}

impl ChartPoint {
    pub fn trend(&self) -> Trend {
        Trend::from_change(self.change_percent)
    }

    /// Variation formatée ("+1.23%", "-0.40%", "—")
    pub fn change_label(&self) -> String {
        format_change(self.change_percent)
    }
}

/// Formatte une variation optionnelle pour l'affichage
pub fn format_change(change_percent: Option<f64>) -> String {
    match change_percent {
        Some(change) => format!("{:+.2}%", change),
        None => "—".to_string(),
    }
}
