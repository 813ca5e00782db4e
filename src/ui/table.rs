// ============================================================================
// Tableau - Analyse détaillée de la prédiction
// ============================================================================
// Colonnes : Day | Predicted Price | Change | Trend | Confidence
// ============================================================================

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::{format_change, Trend};
use crate::table::PredictionRow;
use crate::ui::chart::format_price;

/// Couleur associée à une tendance
pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Flat => Color::Gray,
    }
}

/// Barre de confiance en texte ("████████░░ 80%")
pub fn confidence_bar(confidence: u8) -> String {
    let filled = (confidence as usize + 5) / 10;
    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(10usize.saturating_sub(filled)),
        confidence
    )
}

/// Dessine le tableau des jours prédits
pub fn render_prediction_table(frame: &mut Frame, rows: &[PredictionRow], area: Rect) {
    let header = Row::new(vec!["Day", "Predicted Price", "Change", "Trend", "Confidence"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let color = trend_color(row.trend);
            Row::new(vec![
                Cell::from(format!("Day {}", row.day)),
                Cell::from(format_price(row.price)),
                Cell::from(format_change(row.change_percent)).style(Style::default().fg(color)),
                Cell::from(row.trend.arrow()).style(Style::default().fg(color)),
                Cell::from(confidence_bar(row.confidence)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Min(16),
    ];

    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Detailed Prediction Analysis "),
    );

    frame.render_widget(table, area);
}
