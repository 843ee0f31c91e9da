//! Command-line front end for the rn-debug bridge.
//!
//! Each subcommand runs one piece of the session flow on its own, which is
//! how project-detection and packager problems are diagnosed outside the IDE.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
