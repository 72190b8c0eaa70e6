//! # Connect Four
//!
//! Connect Four with local, versus-bot and networked two-player modes, played
//! in a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Rules engine: position, cell, board, win detection, controller
//! - [`ai`] — Bot difficulty tiers and the move evaluator
//! - [`net`] — TCP move exchange with a remote peer
//! - [`settings`] — Persisted user settings (JSON)
//! - [`config`] — TOML configuration loading and validation
//! - [`ui`] — Terminal UI
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod net;
pub mod settings;
pub mod ui;
