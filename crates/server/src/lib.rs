pub mod config;
pub mod error;
pub mod intent;
pub mod routes;
pub mod state;
