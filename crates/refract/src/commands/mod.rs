//! CLI subcommands.

pub mod convert;
pub mod init;
pub mod inspect;
