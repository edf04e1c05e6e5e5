pub mod cli;
pub mod config;
pub mod forwarder;
pub mod ingestor;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod thread_manager;
pub mod types;
