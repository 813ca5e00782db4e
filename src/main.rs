// ============================================================================
// TokenTrend - Prédictions de prix crypto dans le terminal
// ============================================================================
// Choisir un token, demander la prédiction au service distant, afficher la
// série (historique + prédiction) en graphique et en tableau.
//
// CONCEPTS RUST CLÉS :
// 1. Event loop : render → input → résultats du worker
// 2. Worker thread : runtime tokio dédié aux requêtes HTTP
// 3. Channels mpsc : PendingRequest vers le worker, Completion vers l'UI
// 4. Le contrôleur reste sur le thread UI : pas de Mutex
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use tokentrend::api::ForecastClient;
use tokentrend::app::App;
use tokentrend::config::Config;
use tokentrend::controller::{Completion, PendingRequest, SelectionController};
use tokentrend::ui::{events, render, Event, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/tokentrend/logs/tokentrend.log.*
/// RUST_LOG=tokentrend=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "tokentrend.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile : UI et worker sur des threads différents
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokentrend=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env().context("Configuration invalide")?;

    // Si le logging échoue, on continue sans
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, baseline_days = config.baseline_days, "TokenTrend starting up");

    let client = ForecastClient::new(config.api_url.clone(), config.request_timeout)?;
    let controller = SelectionController::new(Arc::new(client), config.baseline_days);
    let mut app = App::new(controller);

    // Canaux UI <-> worker
    let (request_tx, request_rx) = mpsc::channel::<PendingRequest>();
    let (completion_tx, completion_rx) = mpsc::channel::<Completion>();

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    info!("Spawning background worker thread");
    spawn_background_worker(runtime, request_rx, completion_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &request_tx, &completion_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Chaque PendingRequest devient une tâche tokio : plusieurs requêtes peuvent
// être en vol, l'ordre d'arrivée n'est pas garanti. Le contrôleur trie les
// réponses périmées à la réception.
// ============================================================================

fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    request_rx: mpsc::Receiver<PendingRequest>,
    completion_tx: mpsc::Sender<Completion>,
) {
    std::thread::spawn(move || {
        // recv() retourne Err quand l'UI a fermé le canal
        while let Ok(pending) = request_rx.recv() {
            info!(token = %pending.token().id, "Worker received request");

            let completion_tx = completion_tx.clone();
            runtime.spawn(async move {
                let completion = pending.run().await;
                if completion_tx.send(completion).is_err() {
                    debug!("UI closed before forecast arrived");
                }
            });
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    request_tx: &mpsc::Sender<PendingRequest>,
    completion_rx: &mpsc::Receiver<Completion>,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : applique toutes les réponses arrivées
        loop {
            match completion_rx.try_recv() {
                Ok(completion) => {
                    app.controller.complete(completion);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => handle_event(app, event, request_tx),
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

fn handle_event(app: &mut App, event: Event, request_tx: &mpsc::Sender<PendingRequest>) {
    use events::{is_down_event, is_escape_event, is_predict_event, is_quit_event, is_up_event};

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step quit : première pression = confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }

        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }

        Event::Key(_) if is_predict_event(&event) => {
            app.cancel_quit();
            match app.select_highlighted() {
                Ok(Some(pending)) => {
                    info!(token = %pending.token().id, "User requested prediction");
                    if request_tx.send(pending).is_err() {
                        error!("Worker thread is gone, request dropped");
                    }
                }
                Ok(None) => debug!("Prediction already loaded or in flight"),
                Err(e) => error!(error = %e, "Invalid selection"),
            }
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.cancel_quit();
            debug!("User cleared selection");
            app.clear_selection();
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
