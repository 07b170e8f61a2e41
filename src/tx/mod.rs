// Transaction module - ledger transaction model, preparation, signing and JSON codec

mod model;
mod builder;
mod codec;

pub use model::*;
pub use builder::*;
pub use codec::*;
