// ============================================================================
// Series Assembler
// ============================================================================
// Construit la série affichée : fenêtre historique puis points prédits
//
//   [Day -N ... Day -1][Day +1 ... Day +H]
//    historique (N)     prédiction (H = forecast.daily_prices.len())
//
// La frontière historique/prédit dépend uniquement de l'index.
// ============================================================================

use tracing::warn;

use crate::models::{ChartPoint, ForecastResult};

/// Dérive de la rampe synthétique au début de la fenêtre (-5%)
pub const BASELINE_DRIFT: f64 = 0.05;

/// Fournit les prix de la fenêtre historique
///
/// CONCEPT : Strategy pattern
/// - SyntheticRamp tant qu'aucun flux d'historique réel n'est branché
/// - Un fournisseur réel implémente ce trait sans changer build_series
pub trait BaselineSource {
    /// Retourne exactement `window` prix, du plus ancien au plus récent
    fn baseline(&self, forecast: &ForecastResult, window: usize) -> Vec<f64>;
}

/// Rampe déterministe ancrée sur le premier prix prédit
///
/// price(i) = first * (1 - drift * (window - i) / window)
/// Le facteur croît de (1 - drift) vers 1.0 à l'approche de la frontière.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticRamp {
    pub drift: f64,
}

impl Default for SyntheticRamp {
    fn default() -> Self {
        Self { drift: BASELINE_DRIFT }
    }
}

impl SyntheticRamp {
    pub fn factor(&self, i: usize, window: usize) -> f64 {
        1.0 - self.drift * (window - i) as f64 / window as f64
    }
}

impl BaselineSource for SyntheticRamp {
    fn baseline(&self, forecast: &ForecastResult, window: usize) -> Vec<f64> {
        // Rien à ancrer sans prédiction
        let Some(anchor) = forecast.first_price() else {
            return Vec::new();
        };

        (0..window)
            .map(|i| anchor * self.factor(i, window))
            .collect()
    }
}

/// Construit la série avec la rampe synthétique par défaut
pub fn build_series(forecast: &ForecastResult, baseline_window_size: usize) -> Vec<ChartPoint> {
    build_series_with(forecast, baseline_window_size, &SyntheticRamp::default())
}

/// Construit la série avec une source d'historique donnée
///
/// CONCEPT RUST : Fonction pure
/// - Pas d'état caché : mêmes entrées → même sortie
/// - La fenêtre vaut toujours `baseline_window_size`, quelle que soit la source
pub fn build_series_with(
    forecast: &ForecastResult,
    baseline_window_size: usize,
    source: &dyn BaselineSource,
) -> Vec<ChartPoint> {
    if forecast.daily_prices.is_empty() {
        return Vec::new();
    }

    let window = baseline_window_size;
    let history = fit_window(source.baseline(forecast, window), window, forecast);

    let labels = (0..window)
        .map(|i| format!("Day -{}", window - i))
        .chain((1..=forecast.daily_prices.len()).map(|day| format!("Day +{}", day)));

    let prices = history.iter().chain(forecast.daily_prices.iter()).copied();

    let mut points: Vec<ChartPoint> = Vec::with_capacity(window + forecast.daily_prices.len());
    for (i, (label, price)) in labels.zip(prices).enumerate() {
        let change = points
            .last()
            .and_then(|previous| change_percent(previous.price, price));

        points.push(ChartPoint {
            label,
            price,
            is_predicted: i >= window,
            change_percent: change,
        });
    }

    points
}

/// Ramène l'historique fourni à exactement `window` prix
///
/// - trop long : on garde les `window` plus récents
/// - trop court : on complète au début avec le plus ancien prix connu
///   (ou le premier prix prédit si la source n'a rien renvoyé)
fn fit_window(mut history: Vec<f64>, window: usize, forecast: &ForecastResult) -> Vec<f64> {
    if history.len() == window {
        return history;
    }

    warn!(
        expected = window,
        got = history.len(),
        token = %forecast.token_id,
        "Baseline source returned a window of the wrong size"
    );

    if history.len() > window {
        return history.split_off(history.len() - window);
    }

    let filler = history
        .first()
        .copied()
        .or_else(|| forecast.first_price())
        .unwrap_or_default();
    let mut fitted = vec![filler; window - history.len()];
    fitted.extend(history);
    fitted
}

/// Variation en % de `previous` vers `current`
///
/// None si `previous` est nul ou si le résultat n'est pas fini
pub fn change_percent(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;

    fn bitcoin() -> ForecastResult {
        ForecastResult::new("bitcoin", vec![61000.0, 61500.0, 60800.0, 62000.0, 62500.0])
    }

    /// Historique fixe, pour tester le calcul sans la rampe
    struct FixedHistory(Vec<f64>);

    impl BaselineSource for FixedHistory {
        fn baseline(&self, _forecast: &ForecastResult, window: usize) -> Vec<f64> {
            self.0.iter().copied().take(window).collect()
        }
    }

    #[test]
    fn test_bitcoin_scenario() {
        let series = build_series(&bitcoin(), 3);

        assert_eq!(series.len(), 8);
        let flags: Vec<bool> = series.iter().map(|p| p.is_predicted).collect();
        assert_eq!(flags, vec![false, false, false, true, true, true, true, true]);

        // Point 2 : dernier point synthétique, juste avant la frontière
        let ramp = SyntheticRamp::default();
        let last_history = 61000.0 * ramp.factor(2, 3);
        assert!((series[2].price - last_history).abs() < 1e-9);

        let expected = (61000.0 - last_history) / last_history * 100.0;
        let actual = series[3].change_percent.unwrap();
        assert!((actual - expected).abs() < 1e-9);
        assert_eq!(series[3].trend(), Trend::Up);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = build_series(&bitcoin(), 3)
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(
            labels,
            vec!["Day -3", "Day -2", "Day -1", "Day +1", "Day +2", "Day +3", "Day +4", "Day +5"]
        );
    }

    #[test]
    fn test_length_and_flags_for_various_windows() {
        for window in [0, 1, 7, 30] {
            let series = build_series(&bitcoin(), window);
            assert_eq!(series.len(), window + 5);
            for (i, point) in series.iter().enumerate() {
                assert_eq!(point.is_predicted, i >= window, "window={} i={}", window, i);
            }
        }
    }

    #[test]
    fn test_first_point_has_no_change() {
        assert_eq!(build_series(&bitcoin(), 3)[0].change_percent, None);
        assert_eq!(build_series(&bitcoin(), 0)[0].change_percent, None);
    }

    #[test]
    fn test_ramp_is_monotonic_toward_anchor() {
        let series = build_series(&bitcoin(), 30);
        let history: Vec<f64> = series.iter().take(30).map(|p| p.price).collect();

        assert!((history[0] - 61000.0 * 0.95).abs() < 1e-9);
        assert!(history.windows(2).all(|w| w[0] < w[1]));
        assert!(history[29] < 61000.0);
    }

    #[test]
    fn test_zero_previous_price_gives_undefined_change() {
        let forecast = ForecastResult::new("bitcoin", vec![10.0, 11.0]);
        let series = build_series_with(&forecast, 2, &FixedHistory(vec![5.0, 0.0]));

        assert_eq!(series[1].change_percent, Some(-100.0));
        assert_eq!(series[2].change_percent, None);
        assert_eq!(series[2].trend(), Trend::Flat);
        assert!(series
            .iter()
            .filter_map(|p| p.change_percent)
            .all(f64::is_finite));
    }

    #[test]
    fn test_short_history_keeps_window_boundary() {
        let series = build_series_with(&bitcoin(), 3, &FixedHistory(vec![59000.0, 60000.0]));

        assert_eq!(series.len(), 8);
        let flags: Vec<bool> = series.iter().map(|p| p.is_predicted).collect();
        assert_eq!(flags, vec![false, false, false, true, true, true, true, true]);
        assert_eq!(series[2].label, "Day -1");
        assert_eq!(series[3].label, "Day +1");

        // Complété au début avec le plus ancien prix fourni
        let history: Vec<f64> = series.iter().take(3).map(|p| p.price).collect();
        assert_eq!(history, vec![59000.0, 59000.0, 60000.0]);
    }

    #[test]
    fn test_empty_history_is_filled_with_first_prediction() {
        let series = build_series_with(&bitcoin(), 2, &FixedHistory(Vec::new()));

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].price, 61000.0);
        assert_eq!(series[1].price, 61000.0);
        assert!(!series[1].is_predicted);
        assert!(series[2].is_predicted);
    }

    #[test]
    fn test_long_history_keeps_most_recent_prices() {
        /// Ignore la taille demandée
        struct Oversized;

        impl BaselineSource for Oversized {
            fn baseline(&self, _forecast: &ForecastResult, _window: usize) -> Vec<f64> {
                vec![1.0, 2.0, 3.0, 4.0]
            }
        }

        let series = build_series_with(&bitcoin(), 2, &Oversized);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].price, 3.0);
        assert_eq!(series[1].price, 4.0);
        assert!(series[2].is_predicted);
    }

    #[test]
    fn test_idempotent() {
        let forecast = bitcoin();
        assert_eq!(build_series(&forecast, 10), build_series(&forecast, 10));
    }

    #[test]
    fn test_empty_forecast_gives_empty_series() {
        let forecast = ForecastResult::new("bitcoin", Vec::new());
        assert!(build_series(&forecast, 5).is_empty());
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(change_percent(100.0, 110.0), Some(10.0));
        assert_eq!(change_percent(0.0, 110.0), None);
        assert_eq!(change_percent(f64::MIN_POSITIVE, f64::MAX), None);
    }
}
