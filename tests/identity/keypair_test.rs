use provchain::identity::{Keypair, KeypairError, PublicKey, SecretKey};

/// Test: Each generated keypair should be unique
#[test]
fn test_keypairs_are_unique() {
    let keypair1 = Keypair::generate();
    let keypair2 = Keypair::generate();

    assert_ne!(
        keypair1.public_key().as_bytes(),
        keypair2.public_key().as_bytes(),
        "Two generated keypairs should have different public keys"
    );
}

/// Test: Can serialize keypair to bytes and restore it
#[test]
fn test_keypair_serialization() {
    let original = Keypair::generate();
    let restored = Keypair::from_bytes(&original.to_bytes())
        .expect("Should deserialize keypair from bytes");

    assert_eq!(original.public_key(), restored.public_key());
}

/// Test: Base58 public key text round-trips and matches the bs58 alphabet
#[test]
fn test_public_key_base58() {
    let public_key = Keypair::generate().public_key();
    let text = public_key.to_base58();

    assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(!text.contains('0') && !text.contains('O') && !text.contains('l'));

    let parsed: PublicKey = text.parse().expect("Should parse base58 public key");
    assert_eq!(parsed, public_key);
    assert_eq!(parsed.to_string(), text);
}

/// Test: A keypair restored from its base58 secret signs as the same owner
#[test]
fn test_restore_from_base58_secret() {
    let original = Keypair::generate();
    let secret = original.secret_key().to_base58();

    let restored = Keypair::from_base58_secret(&secret).expect("Should restore keypair");
    assert_eq!(restored.public_key(), original.public_key());
}

/// Test: Secret key bytes round-trip
#[test]
fn test_secret_key_roundtrip() {
    let keypair = Keypair::generate();
    let secret = SecretKey::from_bytes(&keypair.secret_key().to_bytes()).unwrap();
    assert_eq!(Keypair::from_secret_key(secret).public_key(), keypair.public_key());
}

/// Test: Wrong lengths are rejected with the lengths in the error
#[test]
fn test_invalid_length_rejected() {
    match Keypair::from_bytes(&[0u8; 10]) {
        Err(KeypairError::InvalidLength { expected, got }) => {
            assert_eq!(expected, 32);
            assert_eq!(got, 10);
        }
        other => panic!("expected InvalidLength, got {:?}", other.map(|_| ())),
    }
    assert!(PublicKey::from_bytes(&[1u8; 31]).is_err());
}

/// Test: Non-base58 text is rejected
#[test]
fn test_invalid_base58_rejected() {
    let result = PublicKey::from_base58("not-base58-0OIl");
    assert!(matches!(result, Err(KeypairError::InvalidBase58(_))));
}

/// Test: Public keys serialize as base58 JSON strings
#[test]
fn test_public_key_json() {
    let public_key = Keypair::generate().public_key();
    let json = serde_json::to_string(&public_key).unwrap();
    assert_eq!(json, format!("\"{}\"", public_key.to_base58()));

    let back: PublicKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, public_key);
}

/// Test: Debug output never shows secret material
#[test]
fn test_debug_hides_secret() {
    let keypair = Keypair::generate();
    let secret = keypair.secret_key().to_base58();

    assert!(!format!("{:?}", keypair).contains(&secret));
    assert_eq!(format!("{:?}", keypair.secret_key()), "SecretKey(..)");
}
