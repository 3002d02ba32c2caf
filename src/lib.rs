//! Decision table editor.
//!
//! Columns carry enumerated value sets; the table is the full cartesian product
//! of those enumerations. Users attach `when`/`then` text to single rows, filter
//! the visible rows and export everything as CSV.

pub mod api;
pub mod config;
pub mod db;
pub mod editor;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod text;
