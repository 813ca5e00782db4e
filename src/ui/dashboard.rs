// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
//
//   ┌──────────────── header ────────────────┐
//   │ catalogue │ résumé 5 jours             │
//   │           │ graphique                  │
//   │           │ tableau                    │
//   └──────────────── footer ────────────────┘
//
// Le panneau de droite dépend de RequestState :
// Idle → invitation, Loading → attente, Failed → erreur, Success → données
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::controller::RequestState;
use crate::models::{format_change, Token, TOKEN_CATALOG};
use crate::ui::chart::{format_price, render_chart, render_message};
use crate::ui::table::{render_prediction_table, trend_color};
use crate::ui::token_color;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(chunks[1])
        .to_vec();

    render_catalog(frame, app, body[0]);
    render_prediction_panel(frame, app, body[1]);

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" TokenTrend ")
        .title_alignment(Alignment::Center);

    let text = Line::from(Span::styled(
        "Multi-Asset Crypto Forecasting",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Catalogue
// ============================================================================

/// Liste des tokens : surbrillance = curseur, "●" = token sélectionné
fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let selected_id = app.controller.selected().map(|t| t.id);

    let items: Vec<ListItem> = TOKEN_CATALOG
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let marker = if Some(token.id) == selected_id { "●" } else { " " };
            let style = Style::default().fg(token_color(token));

            let mut item = ListItem::new(format!("{} {}", marker, token.display())).style(style);
            if index == app.highlighted_index {
                item = item.style(style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED));
            }
            item
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" All Coins "),
    );

    frame.render_widget(list, area);
}

// ============================================================================
// Panneau de prédiction
// ============================================================================

fn render_prediction_panel(frame: &mut Frame, app: &App, area: Rect) {
    match app.controller.state() {
        RequestState::Idle => render_message(
            frame,
            area,
            "Sélectionnez un token et appuyez sur [Enter] pour voir la prédiction",
            Color::Gray,
        ),
        RequestState::Loading(token) => render_message(
            frame,
            area,
            &format!("Analyse du marché pour {}...", token.name),
            Color::Yellow,
        ),
        RequestState::Failed(token, error) => render_message(
            frame,
            area,
            &format!("Prédiction impossible pour {} : {}", token.name, error.reason()),
            Color::Red,
        ),
        RequestState::Success(token, _) => render_success(frame, app, token, area),
    }
}

fn render_success(frame: &mut Frame, app: &App, token: &Token, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Résumé
            Constraint::Min(8),    // Graphique
            Constraint::Length(9), // Tableau (header + 5 lignes + bordures)
        ])
        .split(area)
        .to_vec();

    let rows = app.controller.prediction_rows();

    // Résumé : une case par jour prédit
    let mut days = Vec::new();
    let mut changes = Vec::new();
    for row in &rows {
        let color = trend_color(row.trend);
        days.push(Span::styled(
            format!("{:^16}", format!("Day {} {}", row.day, format_price(row.price))),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        changes.push(Span::styled(
            format!("{:^16}", format!("{} {}", row.trend.arrow(), format_change(row.change_percent))),
            Style::default().fg(color),
        ));
    }

    let fetched = app
        .controller
        .forecast()
        .map(|forecast| format!("@ {} ", forecast.fetched_label()))
        .unwrap_or_default();

    let title = match app.controller.summary() {
        Some(summary) => format!(
            " {} ({}) - Next {} Days : {} {} {}",
            token.name,
            token.symbol,
            rows.len(),
            summary.trend.arrow(),
            format_change(summary.horizon_change_percent),
            fetched
        ),
        None => format!(" {} ({}) {}", token.name, token.symbol, fetched),
    };

    let summary = Paragraph::new(vec![Line::from(days), Line::from(changes)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(token_color(token)))
                .title(title),
        )
        .alignment(Alignment::Center);
    frame.render_widget(summary, chunks[0]);

    if let Some(series) = app.controller.series() {
        render_chart(frame, token, series, chunks[1]);
    }

    render_prediction_table(frame, &rows, chunks[2]);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key),
            Span::raw(" Navigate  "),
            Span::styled("[Enter / p]", key),
            Span::raw(" Predict  "),
            Span::styled("[ESC]", key),
            Span::raw(" Clear"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
