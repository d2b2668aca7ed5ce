//! # Module Server - enveloppe minimale autour d'Axum
//!
//! Lie le routeur à une adresse d'écoute, le sert dans une tâche dédiée et
//! s'arrête proprement sur Ctrl+C.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tracing::{error, info};

/// Serveur principal
pub struct Server {
    name: String,
    listen_addr: String,
    router: Router,
    local_addr: Option<SocketAddr>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `listen_addr` - Adresse d'écoute (ex: "127.0.0.1:8080")
    /// * `router` - Routes à servir
    pub fn new(name: impl Into<String>, listen_addr: impl Into<String>, router: Router) -> Self {
        Self {
            name: name.into(),
            listen_addr: listen_addr.into(),
            router,
            local_addr: None,
            join_handle: None,
        }
    }

    /// Lie l'adresse d'écoute et lance le service en tâche de fond.
    ///
    /// L'arrêt gracieux est déclenché par Ctrl+C : les requêtes en cours se
    /// terminent avant que [`Server::wait`] ne rende la main.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.listen_addr)
            .await
            .with_context(|| format!("cannot listen on {}", self.listen_addr))?;
        let local_addr = listener.local_addr()?;
        info!("Server {} listening on http://{}", self.name, local_addr);

        let router = self.router.clone();
        self.join_handle = Some(tokio::spawn(async move {
            let served = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await;
            if let Err(err) = served {
                error!(error = %err, "HTTP server stopped");
            }
        }));

        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
        Err(err) => {
            // Sans gestionnaire de signal, on sert jusqu'à l'arrêt du processus
            error!(error = %err, "failed to listen for ctrl_c");
            std::future::pending::<()>().await;
        }
    }
}
