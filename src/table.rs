// ============================================================================
// Tableau de prédiction
// ============================================================================
// Lignes "Day / Predicted Price / Change / Trend / Confidence" dérivées de la
// partie prédite de la série, plus un résumé sur tout l'horizon.
// ============================================================================

use crate::models::{ChartPoint, Trend};
use crate::series::change_percent;

/// Confiance du premier jour prédit, en %
pub const BASE_CONFIDENCE: u8 = 95;
/// Perte de confiance par jour supplémentaire
pub const CONFIDENCE_STEP: u8 = 5;
/// Plancher de confiance
pub const MIN_CONFIDENCE: u8 = 75;

/// Une ligne du tableau de prédiction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    /// Jour prédit, à partir de 1
    pub day: usize,
    pub price: f64,
    pub change_percent: Option<f64>,
    pub trend: Trend,
    /// Indication de confiance décroissante avec l'horizon (%)
    pub confidence: u8,
}

/// Résumé de la prédiction sur l'horizon complet
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    /// Prix de référence : dernier point historique, sinon premier prédit
    pub reference: f64,
    /// Prix à la fin de l'horizon
    pub target: f64,
    pub horizon_change_percent: Option<f64>,
    pub trend: Trend,
}

/// Confiance pour le jour `day` (1-based) : 95, 90, 85, 80, puis 75
pub fn confidence_for_day(day: usize) -> u8 {
    let step = (day.saturating_sub(1)).min(u8::MAX as usize) as u8;
    BASE_CONFIDENCE
        .saturating_sub(step.saturating_mul(CONFIDENCE_STEP))
        .max(MIN_CONFIDENCE)
}

/// Extrait les lignes du tableau à partir de la série complète
pub fn prediction_rows(series: &[ChartPoint]) -> Vec<PredictionRow> {
    series
        .iter()
        .filter(|point| point.is_predicted)
        .enumerate()
        .map(|(i, point)| {
            let day = i + 1;
            PredictionRow {
                day,
                price: point.price,
                change_percent: point.change_percent,
                trend: point.trend(),
                confidence: confidence_for_day(day),
            }
        })
        .collect()
}

/// Résume la série : du dernier point connu jusqu'à la fin de l'horizon
pub fn summarize(series: &[ChartPoint]) -> Option<ForecastSummary> {
    let target = series.iter().rev().find(|p| p.is_predicted)?.price;

    let reference = series
        .iter()
        .rev()
        .find(|p| !p.is_predicted)
        .or_else(|| series.iter().find(|p| p.is_predicted))?
        .price;

    let horizon_change_percent = change_percent(reference, target);

    Some(ForecastSummary {
        reference,
        target,
        horizon_change_percent,
        trend: Trend::from_change(horizon_change_percent),
    })
}
