//! # bunpro-export-cli
//!
//! Command-line front end for [`bunpro_export_core`]:
//! - `export`: capture or load the token, fetch every level, write the CSV
//! - `token`: capture, show or clear the cached token
//! - `config`: inspect and initialize the configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Command};
pub use commands::run;
