//! Initialisation du système de tracing
//!
//! Un `LevelFilter` est installé en premier sur le `Registry`, suivi d'une
//! couche console optionnelle.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options de configuration du logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
    pub min_level: String,
    /// Activer la sortie console
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: "INFO".to_string(),
            enable_console: true,
        }
    }
}

/// Convertit un nom de niveau (insensible à la casse) en `Level`
pub fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installe le subscriber global
///
/// Un niveau inconnu retombe sur `INFO`. Échoue si un subscriber global est
/// déjà installé.
///
/// # Exemple
///
/// ```no_run
/// use wdlserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions {
///     min_level: "DEBUG".to_string(),
///     enable_console: true,
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(options: LoggingOptions) -> Result<()> {
    let level = string_to_level(&options.min_level).unwrap_or(Level::INFO);
    let filter = LevelFilter::from_level(level);

    // Le filtre doit être appliqué avant les autres couches
    let subscriber = Registry::default().with(filter);

    if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_level() {
        assert_eq!(string_to_level("debug"), Some(Level::DEBUG));
        assert_eq!(string_to_level(" Warning "), Some(Level::WARN));
        assert_eq!(string_to_level("INFO"), Some(Level::INFO));
        assert_eq!(string_to_level("loud"), None);
    }
}
