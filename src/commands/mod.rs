//! CLI Command handlers
//!
//! This module contains the implementation of CLI command handlers
//! extracted from main.rs.

pub mod configure;
