use provchain::identity::Keypair;
use provchain::tx::{CodecError, TransactionBuilder, TransactionCodec};
use std::io::Write;

#[test]
fn test_encode_decode() {
    let alice = Keypair::generate();
    let tx = TransactionBuilder::create()
        .issuer(&alice.public_key())
        .output(&alice.public_key(), 1)
        .build()
        .unwrap()
        .sign(&alice)
        .unwrap();

    let json = TransactionCodec::encode(&tx).unwrap();
    let decoded = TransactionCodec::decode(&json).unwrap();

    assert_eq!(decoded, tx);
    decoded.verify().unwrap();
}

#[test]
fn test_decode_list_keeps_order() {
    let json = r#"[
        { "id": "b", "operation": "TRANSFER", "asset": { "id": "a" },
          "inputs": [ { "fulfills": { "transaction_id": "a" } } ] },
        { "id": "a", "operation": "CREATE", "inputs": [ { "fulfills": null } ] }
    ]"#;

    let list = TransactionCodec::decode_list(json).unwrap();
    let ids: Vec<&str> = list.iter().map(|tx| tx.id()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_decode_garbage_fails() {
    assert!(matches!(
        TransactionCodec::decode("{ not json"),
        Err(CodecError::DecodeError(_))
    ));
    assert!(matches!(
        TransactionCodec::decode(r#"{ "id": "a", "operation": "BURN", "inputs": [] }"#),
        Err(CodecError::DecodeError(_))
    ));
}

#[test]
fn test_read_list_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{ "id": "a", "operation": "CREATE", "inputs": [] }}]"#
    )
    .unwrap();

    let list = TransactionCodec::read_list(file.path()).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id(), "a");
}

#[test]
fn test_read_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = TransactionCodec::read_list(dir.path().join("missing.json"));
    assert!(matches!(result, Err(CodecError::ReadError { .. })));
}
