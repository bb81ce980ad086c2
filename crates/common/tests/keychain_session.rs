//! Integration tests for the full vault session lifecycle

use common::crypto::{Keychain, KeychainError, WrappedKey, WrappedKeyError};

const PASSPHRASE: &[u8] = b"correct horse battery staple";

#[test]
fn test_full_session_scenario() {
    // first run: create the vault and keep the blob the way a caller would,
    // as hex text
    let setup = Keychain::new();
    let wrapped = setup.init(PASSPHRASE).unwrap();
    let stored_hex = wrapped.to_hex();

    // later run: restore the blob from storage and unlock a fresh session
    let session = Keychain::new();
    let restored = WrappedKey::from_hex(&stored_hex).unwrap();
    session.unlock(restored.as_bytes(), PASSPHRASE).unwrap();

    let envelope = session.encrypt(&[0x01, 0x02, 0x03]).unwrap();
    assert_eq!(session.decrypt(&envelope).unwrap(), vec![0x01, 0x02, 0x03]);

    // a wrong passphrase on yet another fresh session is rejected outright
    let intruder = Keychain::new();
    let result = intruder.unlock(restored.as_bytes(), b"wrong password");
    assert!(matches!(
        result,
        Err(KeychainError::WrappedKey(WrappedKeyError::UnwrapFailure))
    ));
    assert!(!intruder.is_unlocked());
}

#[test]
fn test_generates_are_independent() {
    let a = WrappedKey::generate(PASSPHRASE).unwrap();
    let b = WrappedKey::generate(PASSPHRASE).unwrap();

    // same passphrase, unrelated keys: the blobs differ and each key only
    // opens its own envelopes
    assert_ne!(a, b);

    let key_a = a.unlock(PASSPHRASE).unwrap();
    let key_b = b.unlock(PASSPHRASE).unwrap();

    let envelope = key_a.encrypt(b"bound to key a").unwrap();
    assert!(key_b.decrypt(&envelope).is_err());
    assert_eq!(key_a.decrypt(&envelope).unwrap(), b"bound to key a");
}

#[test]
fn test_sealed_payloads_survive_lock_cycles() {
    let keychain = Keychain::new();
    let wrapped = keychain.init(PASSPHRASE).unwrap();

    let secret = b"wireguard private key bytes";
    let envelope = keychain.encrypt(secret).unwrap();

    keychain.lock();
    assert!(matches!(
        keychain.decrypt(&envelope),
        Err(KeychainError::NotUnlocked)
    ));

    keychain.unlock(wrapped.as_bytes(), PASSPHRASE).unwrap();
    assert_eq!(keychain.decrypt(&envelope).unwrap(), secret);
}
