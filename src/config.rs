// ============================================================================
// Configuration
// ============================================================================
// Lue depuis l'environnement (après chargement d'un éventuel fichier .env)
//
// | variable                  | défaut                          |
// |---------------------------|---------------------------------|
// | TOKENTREND_API_URL        | http://localhost:5000/predict   |
// | TOKENTREND_BASELINE_DAYS  | 30                              |
// | TOKENTREND_TIMEOUT_SECS   | 10 (0 = pas de timeout)         |
// | TOKENTREND_LOG_DIR        | <data_local_dir>/tokentrend/logs|
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/predict";
pub const DEFAULT_BASELINE_DAYS: usize = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Paramètres de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL de base du service de prédiction (sans query string)
    pub api_url: String,

    /// Nombre de points historiques synthétiques avant la prédiction
    pub baseline_days: usize,

    /// Timeout des requêtes HTTP (None = attendre indéfiniment)
    pub request_timeout: Option<Duration>,

    /// Répertoire des fichiers de log
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            baseline_days: DEFAULT_BASELINE_DAYS,
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lookup
    ///
    /// Séparé de from_env() pour tester sans toucher à l'environnement du process
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("TOKENTREND_API_URL") {
            let url = url.trim().trim_end_matches('?').to_string();
            if url.is_empty() {
                anyhow::bail!("TOKENTREND_API_URL est vide");
            }
            config.api_url = url;
        }

        if let Some(days) = lookup("TOKENTREND_BASELINE_DAYS") {
            config.baseline_days = days
                .trim()
                .parse()
                .with_context(|| format!("TOKENTREND_BASELINE_DAYS invalide : {:?}", days))?;
        }

        if let Some(secs) = lookup("TOKENTREND_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("TOKENTREND_TIMEOUT_SECS invalide : {:?}", secs))?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(dir) = lookup("TOKENTREND_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

/// ~/.local/share/tokentrend/logs sur Linux, ./logs si introuvable
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("tokentrend").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}
