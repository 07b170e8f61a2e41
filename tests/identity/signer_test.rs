use provchain::identity::{Keypair, Signature, SignatureError, Signer};

/// Test: Signatures are 64 bytes and verify against the signer
#[test]
fn test_sign_and_verify() {
    let keypair = Keypair::generate();
    let message = b"asset transfer";

    let signature = Signer::sign(&keypair, message);

    assert_eq!(signature.as_bytes().len(), 64);
    assert!(Signer::verify(&keypair.public_key(), message, &signature));
}

/// Test: Tampered message fails verification
#[test]
fn test_tampered_message_fails() {
    let keypair = Keypair::generate();
    let signature = Signer::sign(&keypair, b"asset transfer");

    assert!(!Signer::verify(&keypair.public_key(), b"asset transfer!", &signature));
}

/// Test: Wrong public key fails verification
#[test]
fn test_wrong_public_key_fails() {
    let signer = Keypair::generate();
    let other = Keypair::generate();
    let signature = Signer::sign(&signer, b"asset transfer");

    assert!(!Signer::verify(&other.public_key(), b"asset transfer", &signature));
}

/// Test: Hex form round-trips
#[test]
fn test_signature_hex_roundtrip() {
    let signature = Signer::sign(&Keypair::generate(), b"payload");
    let text = signature.to_hex();

    assert_eq!(text.len(), 128);
    assert_eq!(Signature::from_hex(&text).unwrap(), signature);
}

/// Test: Bad hex and bad lengths are rejected
#[test]
fn test_invalid_signature_rejected() {
    assert!(matches!(
        Signature::from_hex("zz"),
        Err(SignatureError::InvalidHex(_))
    ));
    assert!(matches!(
        Signature::from_bytes(&[0u8; 63]),
        Err(SignatureError::InvalidLength(63))
    ));
}
