//! mindful - guided breathing exercises and journaling in the terminal
//!
//! The core is [`features::breathing::SessionRunner`], a tick-driven state
//! machine that walks a technique's phases and reports a
//! [`features::breathing::Session`] when a run ends. Sessions are persisted
//! to `SQLite` through [`features::breathing::SessionRecorder`].

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::MindfulError;
