pub mod alerts;
pub mod app;
pub mod cli;
pub mod config;
pub mod filter;
pub mod orchestrator;
pub mod output;
pub mod render;
pub mod store;

#[cfg(test)]
mod tests;
