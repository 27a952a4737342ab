// Countdown Core Library
// Exports all modules for the CLI, widget processes, and tests

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
