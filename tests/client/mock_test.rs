// MockLedgerClient behaviour used by the connection tests

use provchain::client::{LedgerClient, LedgerError, MockLedgerClient, TxStatus};
use provchain::tx::{Asset, Input, Operation, Transaction, TransactionBody};

fn record(id: &str) -> Transaction {
    Transaction::from_parts(
        id,
        TransactionBody::new(Operation::Create, Asset::default(), None, vec![Input::default()], vec![]),
    )
}

#[tokio::test]
async fn test_status_sequence() {
    let client = MockLedgerClient::new()
        .with_transactions(vec![record("a")])
        .with_undecided_polls(2);

    assert_eq!(client.get_status("a").await.unwrap(), TxStatus::Undecided);
    assert_eq!(client.get_status("a").await.unwrap(), TxStatus::Undecided);
    assert_eq!(client.get_status("a").await.unwrap(), TxStatus::Valid);
    assert!(TxStatus::Valid.is_final());
    assert!(!TxStatus::Undecided.is_final());
}

#[tokio::test]
async fn test_unknown_status_is_not_found() {
    let client = MockLedgerClient::new();
    assert!(matches!(
        client.get_status("x").await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_post_appends_in_order() {
    let client = MockLedgerClient::new();
    client.post_transaction(&record("a")).await.unwrap();
    client.post_transaction(&record("b")).await.unwrap();

    let held: Vec<String> = client
        .transactions()
        .iter()
        .map(|tx| tx.id().to_string())
        .collect();
    assert_eq!(held, vec!["a", "b"]);
    assert_eq!(client.post_calls(), 2);
}

#[tokio::test]
async fn test_post_failure_keeps_state() {
    let client = MockLedgerClient::new().with_post_failure("down");
    assert!(client.post_transaction(&record("a")).await.is_err());
    assert!(client.transactions().is_empty());
}

#[test]
fn test_status_wire_names() {
    assert_eq!(serde_json::to_string(&TxStatus::Valid).unwrap(), "\"valid\"");
    let parsed: TxStatus = serde_json::from_str("\"backlog\"").unwrap();
    assert_eq!(parsed, TxStatus::Backlog);
}
