//! Game Launcher Server - HTTP control plane for a single game process.
//!
//! Exposes `/health`, `/launch`, `/close` and `/status` over JSON, with fixed
//! CORS headers on every response so a kiosk UI in a browser can call it.

pub mod handler;
pub mod server;

pub use server::{build_router, start_server, AppState};
