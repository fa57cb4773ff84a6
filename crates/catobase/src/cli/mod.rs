//! CLI module for Catobase
//!
//! Each command resolves its paths through [`context::CliContext`] and
//! reports failures as [`error::HelpfulError`].

pub mod category;
pub mod context;
pub mod error;
pub mod get;
pub mod init;
pub mod register;
