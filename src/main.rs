use clap::{Parser, Subcommand};
use provchain::chain::ChainReconstructor;
use provchain::client::{Connection, ConnectionConfig};
use provchain::identity::Keypair;
use provchain::tx::TransactionCodec;
use std::error::Error;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "provchain", version, about = "Asset ledger client and provenance chain tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Order a JSON array of one asset's transactions from CREATE to tip
    Sort {
        /// File holding the transactions
        file: PathBuf,
    },
    /// Fetch an asset's transactions from a node and print them in chain order
    History {
        #[arg(long, env = "PROVCHAIN_NODE", default_value = "http://localhost:9984")]
        node: String,
        asset_id: String,
    },
    /// Fetch a single transaction
    Tx {
        #[arg(long, env = "PROVCHAIN_NODE", default_value = "http://localhost:9984")]
        node: String,
        transaction_id: String,
    },
    /// Generate a keypair
    Keygen,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sort { file } => {
            let transactions = TransactionCodec::read_list(&file)?;
            let chain = ChainReconstructor::reconstruct_checked(transactions);
            for warning in chain.warnings() {
                warn!("{}", warning);
            }
            for (position, tx) in chain.transactions().iter().enumerate() {
                println!("{:>4}  {:<8}  {}", position, tx.operation(), tx.id());
            }
        }
        Command::History { node, asset_id } => {
            let connection = Connection::http(&node, ConnectionConfig::default())?;
            let chain = connection.get_sorted_transactions_checked(&asset_id).await?;
            for warning in chain.warnings() {
                warn!("{}", warning);
            }
            for (position, tx) in chain.transactions().iter().enumerate() {
                let owners = tx
                    .outputs()
                    .iter()
                    .flat_map(|output| output.public_keys.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(",");
                println!("{:>4}  {:<8}  {}  -> {}", position, tx.operation(), tx.id(), owners);
            }
        }
        Command::Tx {
            node,
            transaction_id,
        } => {
            let connection = Connection::http(&node, ConnectionConfig::default())?;
            let tx = connection.get_transaction(&transaction_id).await?;
            println!("{}", TransactionCodec::encode_pretty(&tx)?);
        }
        Command::Keygen => {
            let keypair = Keypair::generate();
            println!("public:  {}", keypair.public_key().to_base58());
            println!("private: {}", keypair.secret_key().to_base58());
        }
    }

    Ok(())
}
