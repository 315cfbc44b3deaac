//! Utility modules for the site builder.

pub mod exec;
pub mod minify;
