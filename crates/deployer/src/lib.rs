pub mod cli;
pub mod domain;
pub mod infra;
mod run;
#[cfg(test)]
mod tests;

pub use self::run::{report, run, start};
