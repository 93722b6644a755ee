//! Integration tests for the SecureVault crypto module.

use securevault::crypto::keys::{derive_integrity_key, derive_record_key, VaultKey};
use securevault::crypto::{decrypt, derive_vault_key, encrypt, generate_salt, CryptoProvider, KdfParams};

/// Cheap Argon2 settings so tests stay fast.
fn fast_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = b"p@ssw0rd-for-mail";

    let ciphertext = encrypt(&key, plaintext).expect("encrypt should succeed");

    // Ciphertext must be longer than plaintext (12-byte nonce + 16-byte tag).
    assert!(ciphertext.len() > plaintext.len());

    let recovered = decrypt(&key, &ciphertext).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let key = [0xCDu8; 32];
    let plaintext = b"same secret";

    let ct1 = encrypt(&key, plaintext).expect("encrypt 1");
    let ct2 = encrypt(&key, plaintext).expect("encrypt 2");

    // Because each call generates a new random nonce, the output must differ.
    assert_ne!(
        ct1, ct2,
        "two encryptions of the same plaintext must differ"
    );
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let key = [0x11u8; 32];
    let wrong_key = [0x22u8; 32];

    let ciphertext = encrypt(&key, b"top secret").expect("encrypt");
    assert!(
        decrypt(&wrong_key, &ciphertext).is_err(),
        "decryption with the wrong key must fail"
    );
}

#[test]
fn decrypt_with_truncated_data_fails() {
    // Anything shorter than 12 bytes (nonce length) should fail.
    let key = [0xAAu8; 32];
    assert!(decrypt(&key, &[0u8; 5]).is_err(), "truncated ciphertext must fail");
}

#[test]
fn decrypt_with_corrupted_ciphertext_fails() {
    let key = [0xBBu8; 32];

    let mut ciphertext = encrypt(&key, b"value").expect("encrypt");
    // Flip a byte in the ciphertext portion (after the 12-byte nonce).
    if let Some(byte) = ciphertext.get_mut(15) {
        *byte ^= 0xFF;
    }

    assert!(
        decrypt(&key, &ciphertext).is_err(),
        "corrupted ciphertext must fail auth check"
    );
}

// ---------------------------------------------------------------------------
// Vault key derivation (Argon2id)
// ---------------------------------------------------------------------------

#[test]
fn derive_vault_key_same_inputs_same_output() {
    let salt = generate_salt().unwrap();
    let k1 = derive_vault_key(b"user_abc123", &salt, &fast_params()).unwrap();
    let k2 = derive_vault_key(b"user_abc123", &salt, &fast_params()).unwrap();
    assert_eq!(k1, k2);
}

#[test]
fn derive_vault_key_differs_by_salt() {
    let k1 = derive_vault_key(b"user_abc123", &generate_salt().unwrap(), &fast_params()).unwrap();
    let k2 = derive_vault_key(b"user_abc123", &generate_salt().unwrap(), &fast_params()).unwrap();
    assert_ne!(k1, k2);
}

#[test]
fn derive_vault_key_rejects_weak_params() {
    let weak = KdfParams {
        memory_kib: 1_024,
        iterations: 1,
        parallelism: 1,
    };
    assert!(derive_vault_key(b"user", &generate_salt().unwrap(), &weak).is_err());
}

// ---------------------------------------------------------------------------
// HKDF sub-keys
// ---------------------------------------------------------------------------

#[test]
fn record_keys_differ_per_record_id() {
    let vault_key = [0x42u8; 32];
    let k1 = derive_record_key(&vault_key, "entry_aaa").unwrap();
    let k2 = derive_record_key(&vault_key, "entry_bbb").unwrap();
    assert_ne!(k1, k2);
}

#[test]
fn integrity_key_differs_from_record_keys() {
    let vault_key = [0x42u8; 32];
    let integrity = derive_integrity_key(&vault_key).unwrap();
    let record = derive_record_key(&vault_key, "entry_aaa").unwrap();
    assert_ne!(integrity, record);
}

// ---------------------------------------------------------------------------
// CryptoProvider contract
// ---------------------------------------------------------------------------

#[test]
fn provider_roundtrip_with_context() {
    let provider = CryptoProvider::from_key(VaultKey::new([0x77u8; 32]));

    let ciphertext = provider.encrypt(b"p@ss", "entry_abc").unwrap();
    let plaintext = provider.decrypt(&ciphertext, "entry_abc").unwrap();
    assert_eq!(plaintext, b"p@ss");
}

#[test]
fn provider_rejects_wrong_context() {
    let provider = CryptoProvider::from_key(VaultKey::new([0x77u8; 32]));

    // Ciphertext is bound to its record id; a different context must
    // produce a different sub-key and fail authentication.
    let ciphertext = provider.encrypt(b"p@ss", "entry_abc").unwrap();
    assert!(provider.decrypt(&ciphertext, "entry_xyz").is_err());
}

#[test]
fn provider_rejects_foreign_bytes() {
    let provider = CryptoProvider::from_key(VaultKey::new([0x77u8; 32]));
    assert!(provider.decrypt(b"not ciphertext at all", "entry_abc").is_err());
}
