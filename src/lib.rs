pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod session;
pub mod state;
pub mod views;

pub use server::app;
pub use state::AppState;
