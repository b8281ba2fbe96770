//! Utility functions for the application

pub mod crypto;
pub mod file;
pub mod html;
pub mod terminal;
pub mod url;
