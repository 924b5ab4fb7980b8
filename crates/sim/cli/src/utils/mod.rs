//! Utility functions for the SIM CLI

pub mod display;
pub mod reader;
