//! Command handlers -- one module per subcommand

pub mod compare;
pub mod config;
pub mod extract;
pub mod profile;
