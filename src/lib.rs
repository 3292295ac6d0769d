//! LAGOON — trading strategies for a simulated archipelago exchange.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod book;
pub mod config;
pub mod runner;
pub mod strategy;
pub mod types;
