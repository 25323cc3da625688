pub mod config;
pub mod error;
pub mod leads;
pub mod server;
pub mod sheets;
pub mod webhook;
