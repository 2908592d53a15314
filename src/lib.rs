//! Library crate for user-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record types and phone normalization (`model`)
//! - Form validation rules (`validate`)
//! - The in-memory user list (`store`) and name search (`search`)
//! - Gateways to the remote directory (`remote`)
//! - Application state and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//! - Error and result types (`error`)
//!
//! It is used by the `user-directory` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod model;
pub mod remote;
pub mod search;
pub mod store;
pub mod ui;
pub mod validate;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
