pub mod alpha_beta;
pub mod config;
pub mod eval;

pub use alpha_beta::{LocalSearchAI, SearchDriver};
pub use config::AIConfig;
