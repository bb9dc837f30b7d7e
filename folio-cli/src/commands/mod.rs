//! CLI command implementations.

pub mod build;
pub mod check;
pub mod search;

pub use build::build_content;
pub use check::check_content;
pub use search::{search_content, SearchArgs};

use clap::ValueEnum;

/// Which content kinds a command runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kinds {
    Blog,
    Legal,
    All,
}

impl Kinds {
    pub fn blog(self) -> bool {
        matches!(self, Kinds::Blog | Kinds::All)
    }

    pub fn legal(self) -> bool {
        matches!(self, Kinds::Legal | Kinds::All)
    }
}
