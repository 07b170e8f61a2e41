use provchain::identity::Keypair;
use provchain::tx::{
    Asset, Fulfills, Input, Operation, Output, Transaction, TransactionBody, TransactionBuilder,
    TransactionError,
};
use serde_json::json;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn signed_create(owner: &Keypair) -> Transaction {
    TransactionBuilder::create()
        .issuer(&owner.public_key())
        .asset_data(json!({ "serial": "SN-1" }))
        .output(&owner.public_key(), 1)
        .build()
        .unwrap()
        .sign(owner)
        .unwrap()
}

// ============================================================================
// ASSET ID
// ============================================================================

#[test]
fn test_create_asset_id_is_own_id() {
    let alice = Keypair::generate();
    let tx = signed_create(&alice);

    assert!(tx.is_create());
    assert_eq!(tx.asset_id(), Some(tx.id()));
}

#[test]
fn test_transfer_asset_id_is_linked_id() {
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let create = signed_create(&alice);

    let transfer = TransactionBuilder::transfer(&create, 0)
        .output(&bob.public_key(), 1)
        .build()
        .unwrap()
        .sign(&alice)
        .unwrap();

    assert_eq!(transfer.operation(), Operation::Transfer);
    assert_eq!(transfer.asset_id(), Some(create.id()));
    assert_eq!(transfer.predecessor_id(), Some(create.id()));
}

// ============================================================================
// IDS AND SIGNATURES
// ============================================================================

#[test]
fn test_id_is_sha3_hex() {
    let tx = signed_create(&Keypair::generate());

    assert_eq!(tx.id().len(), 64);
    assert!(tx.id().chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(tx.body().compute_id().unwrap(), tx.id());
}

#[test]
fn test_id_is_deterministic() {
    let body = TransactionBody::new(
        Operation::Create,
        Asset::with_data(json!({ "b": 1, "a": [1, 2] })),
        Some(json!({ "note": "x" })),
        vec![Input::default()],
        vec![],
    );

    assert_eq!(body.compute_id().unwrap(), body.clone().compute_id().unwrap());
}

#[test]
fn test_signed_transaction_verifies() {
    let tx = signed_create(&Keypair::generate());
    tx.verify().expect("freshly signed transaction should verify");
    assert!(tx.inputs()[0].fulfillment.is_some());
}

#[test]
fn test_tampered_id_fails_verification() {
    let tx = signed_create(&Keypair::generate());
    let forged = Transaction::from_parts("00".repeat(32), tx.body().clone());

    assert!(matches!(forged.verify(), Err(TransactionError::IdMismatch { .. })));
}

#[test]
fn test_unfulfilled_input_fails_verification() {
    let alice = Keypair::generate();
    let body = TransactionBuilder::create()
        .issuer(&alice.public_key())
        .output(&alice.public_key(), 1)
        .build()
        .unwrap();
    let id = body.compute_id().unwrap();
    let tx = Transaction::from_parts(id, body);

    assert!(matches!(tx.verify(), Err(TransactionError::Unfulfilled(0))));
}

#[test]
fn test_sign_by_non_owner_rejected() {
    let alice = Keypair::generate();
    let mallory = Keypair::generate();
    let body = TransactionBuilder::create()
        .issuer(&alice.public_key())
        .output(&alice.public_key(), 1)
        .build()
        .unwrap();

    let result = body.sign(&mallory);
    assert!(matches!(result, Err(TransactionError::OwnerMismatch { index: 0, .. })));
}

#[test]
fn test_fulfillment_from_other_key_fails_verification() {
    let alice = Keypair::generate();
    let mallory = Keypair::generate();
    let tx = signed_create(&alice);

    // Re-sign with mallory but keep alice as owner
    let mut body_json = serde_json::to_value(tx.body()).unwrap();
    let signature = provchain::identity::Signer::sign(&mallory, &tx.body().signing_bytes().unwrap());
    body_json["inputs"][0]["fulfillment"] = json!(signature.to_hex());
    let body: TransactionBody = serde_json::from_value(body_json).unwrap();
    let id = body.compute_id().unwrap();

    let forged = Transaction::from_parts(id, body);
    assert!(matches!(
        forged.verify(),
        Err(TransactionError::InvalidFulfillment { index: 0, .. })
    ));
}

// ============================================================================
// WIRE SHAPE
// ============================================================================

#[test]
fn test_json_shape() {
    let alice = Keypair::generate();
    let tx = signed_create(&alice);
    let value = serde_json::to_value(&tx).unwrap();

    assert_eq!(value["id"], json!(tx.id()));
    assert_eq!(value["operation"], json!("CREATE"));
    assert_eq!(value["version"], json!("2.0"));
    assert_eq!(value["asset"]["data"]["serial"], json!("SN-1"));
    assert_eq!(value["inputs"][0]["fulfills"], json!(null));
    assert_eq!(value["inputs"][0]["owners_before"][0], json!(alice.public_key().to_base58()));
    assert_eq!(value["outputs"][0]["amount"], json!("1"));
}

#[test]
fn test_spent_ids_follow_every_input() {
    let body = TransactionBody::new(
        Operation::Transfer,
        Asset::link("root"),
        None,
        vec![
            Input::spending(vec![], Fulfills::new("x", 0)),
            Input::spending(vec![], Fulfills::new("y", 1)),
        ],
        vec![],
    );
    let tx = Transaction::from_parts("z", body);

    assert_eq!(tx.spent_ids().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(tx.predecessor_id(), Some("x"));
}

#[test]
fn test_output_amount_parse() {
    let output = Output {
        public_keys: vec![],
        amount: "12".to_string(),
    };
    assert_eq!(output.amount(), Some(12));

    let garbage = Output {
        public_keys: vec![],
        amount: "twelve".to_string(),
    };
    assert_eq!(garbage.amount(), None);
}
