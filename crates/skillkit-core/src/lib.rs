pub mod config;
pub mod detect;
pub mod error;
pub mod io;
pub mod paths;
pub mod preset;
pub mod release;
pub mod switch;
pub mod vcs;
pub mod version;

#[cfg(test)]
mod test_support;

pub use error::{Result, SkillkitError};
