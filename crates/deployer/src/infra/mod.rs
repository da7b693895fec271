pub mod artifacts;
pub mod blockchain;

pub use self::{artifacts::Artifacts, blockchain::Blockchain};
