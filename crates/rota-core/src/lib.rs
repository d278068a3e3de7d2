//! `rota-core` — shared configuration and error types for the rota workspace.

pub mod config;
pub mod error;

pub use config::RotaConfig;
pub use error::{Result, RotaError};
