// ============================================================================
// Chart - Graphique de la série prédite
// ============================================================================
// Deux datasets sur le même axe X :
// - fenêtre historique (gris)
// - prédiction (couleur du token), reliée au dernier point historique
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : bornes et labels
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{ChartPoint, Token};
use crate::ui::token_color;

/// Dessine le graphique de la série
pub fn render_chart(frame: &mut Frame, token: &Token, series: &[ChartPoint], area: Rect) {
    if series.is_empty() {
        render_message(frame, area, "Pas de données à afficher", Color::Gray);
        return;
    }

    let boundary = series.iter().position(|p| p.is_predicted).unwrap_or(series.len());

    // Convertit les points en (x, y)
    let history: Vec<(f64, f64)> = series[..boundary]
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    // La prédiction repart du dernier point historique pour garder une ligne continue
    let prediction: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .skip(boundary.saturating_sub(1))
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    // Bornes : fold en un seul passage
    let (min_price, max_price) = series.iter().fold((f64::MAX, f64::MIN), |(min, max), p| {
        (min.min(p.price), max.max(p.price))
    });

    // Marge de 5% pour que le graphique respire
    let margin = ((max_price - min_price) * 0.05).max(max_price * 0.001);
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    let color = token_color(token);
    let mut datasets = Vec::new();
    if !history.is_empty() {
        datasets.push(
            Dataset::default()
                .name("historique")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(&history),
        );
    }
    datasets.push(
        Dataset::default()
            .name("prédiction")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&prediction),
    );

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (series.len().saturating_sub(1)).max(1) as f64])
        .labels(x_axis_labels(series).into_iter().map(Span::raw).collect());

    let y_axis = Axis::default()
        .title("Prix ($)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_price(y_min)),
            Span::raw(format_price((y_min + y_max) / 2.0)),
            Span::raw(format_price(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} - Prediction Trend ", token.symbol)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Labels de l'axe X : extrémités de la série uniquement
///
/// ratatui répartit les labels à intervalles égaux, un label intermédiaire ne
/// tomberait pas sur la frontière historique/prédit.
pub fn x_axis_labels(series: &[ChartPoint]) -> Vec<String> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => {
            vec![first.label.clone(), last.label.clone()]
        }
        (Some(only), _) => vec![only.label.clone()],
        _ => Vec::new(),
    }
}

/// Prix avec une précision adaptée à l'ordre de grandeur
pub fn format_price(price: f64) -> String {
    if price >= 100.0 {
        format!("${:.0}", price)
    } else if price >= 1.0 {
        format!("${:.2}", price)
    } else {
        format!("${:.4}", price)
    }
}

/// Affiche un message centré dans un bloc
pub fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
