pub mod cli;
pub mod db;
pub mod migration;
pub mod parser;

pub use cli::{commands, error, output, ux};
pub use cli::error::MigrastampError;

#[cfg(test)]
mod test_utils;
