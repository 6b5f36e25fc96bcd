//! Hash Generator CLI Library
//!
//! Configuration loading and output formatting shared by the `hashgen`
//! binary and its integration tests.

pub mod config;
pub mod input;
pub mod output;
