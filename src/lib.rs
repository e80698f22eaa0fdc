//! # Analytics Report
//!
//! Fetches one fixed Google Analytics Reporting API v4 report with a service
//! account key and prints its rows as `name: value` lines.
//!
//! ## Overview
//!
//! The run is a straight pipeline:
//! - [`credentials::load_client`] reads the JSON key and binds a JWT token
//!   source to an HTTP transport
//! - [`report::fetch_report`] issues a single `reports:batchGet` call built
//!   from a [`config::ReportConfig`]
//! - [`display::print_report`] writes the rows to stdout
//!
//! Library functions return typed errors; only the binary decides to exit.

/// OAuth2 JWT bearer token source and authorized client
pub mod auth;

/// Command-line argument parsing
pub mod cli;

/// Fixed query parameters and endpoints
pub mod config;

/// Service account key loading
pub mod credentials;

/// Console output of report rows
pub mod display;

/// Error types for each stage
pub mod error;

/// Request and response models of the Reporting API
pub mod models;

/// The batch report call
pub mod report;

/// Blocking HTTP transport abstraction
pub mod transport;

pub use auth::AuthenticatedClient;
pub use config::ReportConfig;
pub use credentials::load_client;
pub use display::print_report;
pub use report::fetch_report;
