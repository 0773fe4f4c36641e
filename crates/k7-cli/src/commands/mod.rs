//! CLI command implementations for k7.
//!
//! Each module corresponds to a subcommand (`k7 <command>`).

pub mod init;
pub mod list;
