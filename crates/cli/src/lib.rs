//! Command-line front end for the webpage crates.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
