// Chain module - rebuilds an asset's transaction history from an unordered set

mod reconstruct;
mod spent;

pub use reconstruct::{ChainReconstructor, ChainWarning, ReconstructedChain};
pub use spent::SpentSet;
