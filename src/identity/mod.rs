// Identity module - Ed25519 keys and signatures used to fulfill transaction inputs

mod keypair;
mod signer;

pub use keypair::*;
pub use signer::*;
