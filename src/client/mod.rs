// Client module - talking to a ledger node
// The node does storage, consensus and validation; this side only prepares,
// submits, polls and reads.

mod connection;
mod http;
mod mock;
mod records;
mod traits;

pub use connection::{Connection, ConnectionConfig, ConnectionError};
pub use http::HttpLedgerClient;
pub use mock::MockLedgerClient;
pub use records::{AssetRecord, Block, BlockBody, OutputRef, TxStatus, Vote, VoteBody};
pub use traits::{LedgerClient, LedgerError};
