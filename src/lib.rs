// ABOUTME: Library root for faasup - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod confirm;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod function;
pub mod output;
pub mod poll;
pub mod provider;
pub mod registry;
pub mod types;
