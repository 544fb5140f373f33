pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod loader;
pub mod logging;
pub mod preview;
pub mod report;
pub mod session;
