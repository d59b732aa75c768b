//! Module implement common utility functions.

pub mod files;
