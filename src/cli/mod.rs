pub mod args;
pub mod commands;

pub use args::{Cli, Commands, InputArgs};
pub use commands::{build_pack, convert_documents, run, setup_logging, BuildSummary};
