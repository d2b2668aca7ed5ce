//! # wdlserver - Frontal HTTP de WebDLNA
//!
//! - `/` : page HTML des dossiers, servie depuis le [`wdlcontrol::SnapshotCache`]
//!   avec les en-têtes `Cache-Control`, `Age` et `Last-Modified`
//! - tout autre chemin : 404
//! - échec du serveur amont : 502 avec le message d'erreur

pub mod listing;
pub mod logs;
pub mod render;
pub mod server;

pub use listing::{ListingState, router};
pub use logs::{LoggingOptions, init_logging};
pub use render::render_page;
pub use server::Server;
