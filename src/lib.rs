//! # Academic ERP API Library
//!
//! Organisation and HR contact management behind Google sign-in: handlers,
//! persistence, session authentication and server wiring.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod telemetry;
pub mod validation;
pub use migration;
