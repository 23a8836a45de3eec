//! Tests for keyset resolution and the multi-key adapters.
//!
//! These tests verify critical invariants:
//! - Outputs carry the primary key's identifier and nothing else
//! - Any enabled key that produced an output can consume it again
//! - RAW keys are tried on every input, after prefix matches
//! - Construction fails as a whole on any bad enabled key

mod common;

use cipherset_core::{
    Aead, AeadSet, CryptoError, KeyStatus, KeysetError, KeysetHandle, Mac, MacSet,
    OutputPrefixType, PrimaryPolicy, Registry, Signer, SignerSet, Verifier, VerifierSet,
    format::LEGACY_SENTINEL, resolve,
};
use common::{
    AEAD_TYPE, SIGNER_TYPE, TAG_SIZE, ToyAead, ToyMac, ToySigner, VERIFIER_TYPE, aead_key, key,
    keyset, mac_key, registry, with_status,
};
use proptest::prelude::*;

fn aead(primary: u32, keys: Vec<cipherset_core::Key>) -> AeadSet {
    KeysetHandle::new(keyset(primary, keys)).primitive(&registry()).unwrap()
}

/// INVARIANT: TINK output is `0x01 || key_id (BE) || raw ciphertext`.
#[test]
fn tink_ciphertext_carries_prefix() {
    let set = aead(0x0102_0304, vec![aead_key(0x0102_0304, OutputPrefixType::Tink, 7)]);

    let ciphertext = set.encrypt(b"hello", b"ad").unwrap();

    assert_eq!(&ciphertext[..5], &[0x01, 0x01, 0x02, 0x03, 0x04]);
    assert_eq!(set.decrypt(&ciphertext, b"ad").unwrap(), b"hello");
}

/// INVARIANT: prefixed output length is `5 + underlying output length`.
#[test]
fn ciphertext_length_is_prefix_plus_raw_output() {
    let set = aead(3, vec![aead_key(3, OutputPrefixType::Crunchy, 7)]);

    for len in [0, 1, 5, 100] {
        let plaintext = vec![0x5A; len];
        let ciphertext = set.encrypt(&plaintext, b"").unwrap();
        assert_eq!(ciphertext.len(), 5 + len + TAG_SIZE);
        assert_eq!(ciphertext[0], 0x00);
    }
}

/// INVARIANT: RAW output is exactly the underlying ciphertext.
#[test]
fn raw_ciphertext_has_no_prefix() {
    let set = aead(9, vec![aead_key(9, OutputPrefixType::Raw, 7)]);

    let ciphertext = set.encrypt(b"hello", b"").unwrap();

    assert_eq!(ciphertext, ToyAead(7).encrypt(b"hello", b"").unwrap());
    assert_eq!(set.decrypt(&ciphertext, b"").unwrap(), b"hello");
}

/// INVARIANT: a RAW key decrypts outputs of another keyset holding the same
/// key, whichever key is primary there.
#[test]
fn raw_key_accepted_across_keysets() {
    let producer = aead(
        2,
        vec![aead_key(1, OutputPrefixType::Raw, 11), aead_key(2, OutputPrefixType::Raw, 22)],
    );
    let consumer = aead(
        1,
        vec![aead_key(1, OutputPrefixType::Raw, 11), aead_key(2, OutputPrefixType::Raw, 22)],
    );

    let ciphertext = producer.encrypt(b"payload", b"ad").unwrap();
    assert_eq!(consumer.decrypt(&ciphertext, b"ad").unwrap(), b"payload");
}

/// INVARIANT: output of a key not in the set is rejected with the generic
/// error.
#[test]
fn foreign_key_is_rejected() {
    let producer = aead(1, vec![aead_key(1, OutputPrefixType::Tink, 11)]);
    let consumer = aead(1, vec![aead_key(1, OutputPrefixType::Tink, 12)]);

    let ciphertext = producer.encrypt(b"payload", b"").unwrap();
    assert_eq!(consumer.decrypt(&ciphertext, b""), Err(CryptoError::DecryptionFailed));
}

/// INVARIANT: wrong associated data fails authentication.
#[test]
fn associated_data_is_bound() {
    let set = aead(1, vec![aead_key(1, OutputPrefixType::Tink, 11)]);
    let ciphertext = set.encrypt(b"payload", b"ad-1").unwrap();
    assert_eq!(set.decrypt(&ciphertext, b"ad-2"), Err(CryptoError::DecryptionFailed));
}

/// A RAW ciphertext that happens to start with a live identifier still falls
/// through to the RAW keys.
#[test]
fn raw_fallback_after_prefix_mismatch() {
    let raw = ToyAead(33);
    let mut plaintext = vec![0x01 ^ 33u8, 33, 33, 33, 5 ^ 33];
    plaintext.extend_from_slice(b"rest");
    let ciphertext = raw.encrypt(&plaintext, b"").unwrap();
    assert_eq!(&ciphertext[..5], &[0x01, 0, 0, 0, 5]);

    let set = aead(
        5,
        vec![aead_key(5, OutputPrefixType::Tink, 44), aead_key(6, OutputPrefixType::Raw, 33)],
    );

    assert_eq!(set.decrypt(&ciphertext, b"").unwrap(), plaintext);
}

/// INVARIANT: inputs shorter than a prefix only reach RAW keys and never
/// panic.
#[test]
fn short_input_fails_cleanly() {
    let set = aead(1, vec![aead_key(1, OutputPrefixType::Tink, 11)]);
    for len in 0..5 {
        assert_eq!(set.decrypt(&vec![1; len], b""), Err(CryptoError::DecryptionFailed));
    }
}

/// INVARIANT: LEGACY keys seal `plaintext || 0x00` and strip it again.
#[test]
fn legacy_aead_appends_and_strips_sentinel() {
    let set = aead(4, vec![aead_key(4, OutputPrefixType::Legacy, 55)]);

    let ciphertext = set.encrypt(b"msg", b"").unwrap();
    assert_eq!(&ciphertext[..5], &[0x00, 0, 0, 0, 4]);

    let mut sealed = b"msg".to_vec();
    sealed.push(LEGACY_SENTINEL);
    assert_eq!(ToyAead(55).decrypt(&ciphertext[5..], b"").unwrap(), sealed);

    assert_eq!(set.decrypt(&ciphertext, b"").unwrap(), b"msg");
}

/// INVARIANT: LEGACY MAC tags are computed over `data || 0x00`.
#[test]
fn legacy_mac_covers_sentinel() {
    let handle = KeysetHandle::new(keyset(8, vec![mac_key(8, OutputPrefixType::Legacy, 66)]));
    let mac: MacSet = handle.primitive(&registry()).unwrap();

    let tag = mac.compute_mac(b"data").unwrap();

    assert_eq!(&tag[5..], ToyMac(66).compute_mac(b"data\0").unwrap());
    assert!(mac.verify_mac(&tag, b"data").is_ok());
}

/// INVARIANT: flipping any bit of `data || tag` makes verification fail.
#[test]
fn mac_tamper_is_detected() {
    let handle = KeysetHandle::new(keyset(
        1,
        vec![mac_key(1, OutputPrefixType::Tink, 1), mac_key(2, OutputPrefixType::Raw, 2)],
    ));
    let mac: MacSet = handle.primitive(&registry()).unwrap();
    let tag = mac.compute_mac(b"data").unwrap();

    for bit in 0..tag.len() * 8 {
        let mut tampered = tag.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert_eq!(
            mac.verify_mac(&tampered, b"data"),
            Err(CryptoError::MacVerificationFailed),
            "tag bit {bit} flip accepted"
        );
    }
    for bit in 0..4 * 8 {
        let mut tampered = *b"data";
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert_eq!(
            mac.verify_mac(&tag, &tampered),
            Err(CryptoError::MacVerificationFailed),
            "data bit {bit} flip accepted"
        );
    }
    assert_eq!(mac.verify_mac(&tag, b"other"), Err(CryptoError::MacVerificationFailed));
}

/// INVARIANT: a declared primary that is not an enabled key fails
/// construction.
#[test]
fn missing_primary_fails_construction() {
    let keyset = keyset(
        2,
        vec![
            aead_key(1, OutputPrefixType::Tink, 1),
            with_status(aead_key(2, OutputPrefixType::Tink, 2), KeyStatus::Disabled),
        ],
    );

    let result = resolve::<dyn Aead>(&registry(), &keyset, None, PrimaryPolicy::Required);
    assert!(matches!(result, Err(KeysetError::PrimaryKeyNotFound { key_id: 2 })));
}

/// INVARIANT: a keyset with no enabled keys fails construction.
#[test]
fn no_enabled_keys_fails_construction() {
    let keyset = keyset(
        1,
        vec![
            with_status(aead_key(1, OutputPrefixType::Tink, 1), KeyStatus::Disabled),
            with_status(aead_key(2, OutputPrefixType::Tink, 2), KeyStatus::Destroyed),
        ],
    );

    for policy in [PrimaryPolicy::Required, PrimaryPolicy::Optional] {
        let result = resolve::<dyn Aead>(&registry(), &keyset, None, policy);
        assert!(matches!(result, Err(KeysetError::EmptyPrimitiveSet)));
    }
}

#[test]
fn duplicate_primary_is_ambiguous() {
    let keyset = keyset(
        1,
        vec![aead_key(1, OutputPrefixType::Tink, 1), aead_key(1, OutputPrefixType::Raw, 2)],
    );

    let result = resolve::<dyn Aead>(&registry(), &keyset, None, PrimaryPolicy::Required);
    assert!(matches!(result, Err(KeysetError::AmbiguousPrimary { key_id: 1, count: 2 })));
}

#[test]
fn bad_enabled_key_aborts_construction() {
    let registry = registry();

    let mut malformed = aead_key(2, OutputPrefixType::Tink, 2);
    if let Some(data) = malformed.key_data.as_mut() {
        data.value.truncate(3);
    }
    let keyset_with = |key| keyset(1, vec![aead_key(1, OutputPrefixType::Tink, 1), key]);

    let cases = [
        (keyset_with(malformed), "malformed material"),
        (keyset_with(key("type.test/Missing", 2, OutputPrefixType::Tink, 2)), "unknown type"),
        (keyset_with(mac_key(2, OutputPrefixType::Tink, 2)), "wrong family"),
        (keyset_with(aead_key(2, OutputPrefixType::Unknown, 2)), "unknown prefix"),
    ];

    for (keyset, case) in cases {
        let result = resolve::<dyn Aead>(&registry, &keyset, None, PrimaryPolicy::Required);
        let error = result.err().unwrap_or_else(|| panic!("{case}: construction succeeded"));
        match case {
            "malformed material" => {
                assert!(matches!(error, KeysetError::KeyMaterialInvalid { .. }))
            }
            "unknown type" => assert!(matches!(error, KeysetError::NoKeyManagerFound { .. })),
            "wrong family" => assert!(matches!(error, KeysetError::WrongPrimitive { .. })),
            _ => assert!(matches!(error, KeysetError::UnsupportedPrefixType { key_id: 2 })),
        }
    }
}

/// INVARIANT: non-enabled keys are never resolved, even when unusable.
#[test]
fn disabled_keys_are_not_resolved() {
    let keyset = keyset(
        1,
        vec![
            aead_key(1, OutputPrefixType::Tink, 1),
            with_status(
                key("type.test/Missing", 2, OutputPrefixType::Unknown, 2),
                KeyStatus::Disabled,
            ),
        ],
    );

    let set = resolve::<dyn Aead>(&registry(), &keyset, None, PrimaryPolicy::Required).unwrap();
    assert_eq!(set.len(), 1);
}

#[test]
fn enabled_key_without_material_is_invalid() {
    let mut key = aead_key(1, OutputPrefixType::Tink, 1);
    key.key_data = None;

    let result =
        resolve::<dyn Aead>(&registry(), &keyset(1, vec![key]), None, PrimaryPolicy::Required);
    let error = result.err().unwrap();
    assert_eq!(error, KeysetError::MissingKeyMaterial { key_id: 1 });
    assert_eq!(error.to_string(), "enabled key 1 has no key material");
}

/// INVARIANT: a decrypt-only set rejects encryption but still decrypts.
#[test]
fn verify_only_set_has_no_primary() {
    let full = aead(1, vec![aead_key(1, OutputPrefixType::Tink, 1)]);
    let ciphertext = full.encrypt(b"old", b"").unwrap();

    let handle = KeysetHandle::new(keyset(
        2,
        vec![
            aead_key(1, OutputPrefixType::Tink, 1),
            with_status(aead_key(2, OutputPrefixType::Tink, 2), KeyStatus::Disabled),
        ],
    ));
    let decrypt_only: AeadSet = handle.verifying_primitive(&registry()).unwrap();

    assert_eq!(decrypt_only.encrypt(b"new", b""), Err(CryptoError::NoPrimaryKey));
    assert_eq!(decrypt_only.decrypt(&ciphertext, b"").unwrap(), b"old");
    assert!(handle.primitive::<AeadSet>(&registry()).is_err());
}

/// A custom manager takes precedence for the types it supports.
#[test]
fn custom_manager_overrides_registry() {
    struct FixedKeyManager;

    impl cipherset_core::KeyFactory for FixedKeyManager {
        fn new_key_data(
            &self,
            _template: &cipherset_core::KeyTemplate,
        ) -> Result<cipherset_core::KeyData, KeysetError> {
            unreachable!()
        }
    }

    impl cipherset_core::KeyManager<dyn Aead> for FixedKeyManager {
        fn key_type(&self) -> &str {
            AEAD_TYPE
        }

        fn primitive(
            &self,
            _key_data: &cipherset_core::KeyData,
        ) -> Result<Box<dyn Aead>, KeysetError> {
            Ok(Box::new(ToyAead(999)))
        }
    }

    let handle = KeysetHandle::new(keyset(1, vec![aead_key(1, OutputPrefixType::Raw, 1)]));
    let set = handle
        .primitive_with::<AeadSet>(
            &Registry::new(),
            Some(&FixedKeyManager),
            PrimaryPolicy::Required,
        )
        .unwrap();

    let ciphertext = set.encrypt(b"x", b"").unwrap();
    assert_eq!(ToyAead(999).decrypt(&ciphertext, b"").unwrap(), b"x");
}

#[test]
fn signatures_verify_with_public_keyset() {
    let registry = registry();
    let private = KeysetHandle::new(keyset(
        7,
        vec![
            key(SIGNER_TYPE, 6, OutputPrefixType::Raw, 60),
            key(SIGNER_TYPE, 7, OutputPrefixType::Tink, 70),
        ],
    ));
    let public = private.public_keyset_handle(&registry).unwrap();

    let signer: SignerSet = private.primitive(&registry).unwrap();
    let verifier: VerifierSet = public.primitive(&registry).unwrap();

    let signature = signer.sign(b"message").unwrap();
    assert_eq!(signature[0], 0x01);
    assert!(verifier.verify(&signature, b"message").is_ok());
    assert_eq!(
        verifier.verify(&signature, b"forged"),
        Err(CryptoError::SignatureVerificationFailed)
    );

    // RAW key of the public keyset verifies unprefixed signatures
    let raw_signature = ToySigner(60).sign(b"message").unwrap();
    assert!(verifier.verify(&raw_signature, b"message").is_ok());

    let info = public.keyset_info();
    assert_eq!(info.primary_key_id, 7);
    assert!(info.keys.iter().all(|key| key.type_url.as_deref() == Some(VERIFIER_TYPE)));
}

#[test]
fn symmetric_keyset_has_no_public_keyset() {
    let handle = KeysetHandle::new(keyset(1, vec![aead_key(1, OutputPrefixType::Tink, 1)]));
    assert!(matches!(
        handle.public_keyset_handle(&registry()),
        Err(KeysetError::NotPrivateKey { .. })
    ));
}

/// Adapters are shared across threads without locking.
#[test]
fn adapters_are_shareable() {
    let set = aead(
        1,
        vec![aead_key(1, OutputPrefixType::Tink, 1), aead_key(2, OutputPrefixType::Raw, 2)],
    );

    std::thread::scope(|scope| {
        for thread in 0..4u8 {
            let set = &set;
            scope.spawn(move || {
                for i in 0..50u8 {
                    let plaintext = [thread, i];
                    let ciphertext = set.encrypt(&plaintext, &[thread]).unwrap();
                    assert_eq!(set.decrypt(&ciphertext, &[thread]).unwrap(), plaintext);
                }
            });
        }
    });
}

fn prefix_type() -> impl Strategy<Value = OutputPrefixType> {
    prop_oneof![
        Just(OutputPrefixType::Tink),
        Just(OutputPrefixType::Legacy),
        Just(OutputPrefixType::Crunchy),
        Just(OutputPrefixType::Raw),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// INVARIANT: output of any enabled key decrypts through the set once that
    /// key is primary, and the set's own primary output decrypts too.
    #[test]
    fn every_enabled_key_round_trips(
        keys in prop::collection::btree_map(any::<u32>(), (prefix_type(), any::<u64>()), 1..6),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        associated_data in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let keys: Vec<_> = keys
            .into_iter()
            .map(|(key_id, (prefix, value))| aead_key(key_id, prefix, value))
            .collect();

        let readers = aead(keys[0].key_id, keys.clone());
        for key in &keys {
            let writer = aead(key.key_id, vec![key.clone()]);
            let ciphertext = writer.encrypt(&plaintext, &associated_data).unwrap();

            if key.output_prefix_type == OutputPrefixType::Raw {
                prop_assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
            } else {
                prop_assert_eq!(&ciphertext[1..5], &key.key_id.to_be_bytes());
            }
            prop_assert_eq!(
                readers.decrypt(&ciphertext, &associated_data).unwrap(),
                plaintext.clone()
            );
        }
    }

    /// INVARIANT: arbitrary input never panics; it either decrypts or fails
    /// with the generic error.
    #[test]
    fn arbitrary_ciphertext_fails_generically(input in prop::collection::vec(any::<u8>(), 0..40)) {
        let set = aead(
            1,
            vec![aead_key(1, OutputPrefixType::Tink, 1), aead_key(2, OutputPrefixType::Raw, 2)],
        );
        match set.decrypt(&input, b"") {
            Ok(_) => {},
            Err(error) => prop_assert_eq!(error, CryptoError::DecryptionFailed),
        }
    }
}
