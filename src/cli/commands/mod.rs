//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod edit;
pub mod gen;
pub mod hide;
pub mod init;
pub mod query;
pub mod rem;
pub mod reveal;

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
