//! Signing and verification through keysets.
//!
//! Private keysets produce signatures; the derived public keyset verifies
//! them without ever holding secret material.

mod common;

use cipherset_core::{
    CryptoError, Key, KeyMaterialType, Keyset, KeysetError, KeysetHandle, KeysetManager,
    OutputPrefixType, Signer, SignerSet, Verifier, VerifierSet,
};
use cipherset_crypto::{ECDSA_PUBLIC_TYPE_URL, ED25519_PUBLIC_TYPE_URL, templates};
use common::{TestEnv, generate, registry};

/// INVARIANT: the public keyset verifies every signature of the private
/// keyset and rejects tampered messages.
#[test]
fn public_keyset_verifies_private_signatures() {
    let env = TestEnv::with_seed(100);
    let registry = registry(&env);

    for template in [
        templates::ed25519(),
        templates::ecdsa_p256(),
        templates::ecdsa_p256_ieee_p1363(),
    ] {
        let private = generate(&template, &registry, &env);
        let public = private.public_keyset_handle(&registry).unwrap();

        let signer: SignerSet = private.primitive(&registry).unwrap();
        let verifier: VerifierSet = public.primitive(&registry).unwrap();

        let signature = signer.sign(b"release v1.2.3").unwrap();
        assert_eq!(signature[0], 0x01);
        assert_eq!(&signature[1..5], &private.keyset_info().primary_key_id.to_be_bytes());

        verifier.verify(&signature, b"release v1.2.3").unwrap();
        assert_eq!(
            verifier.verify(&signature, b"release v1.2.4"),
            Err(CryptoError::SignatureVerificationFailed)
        );
    }
}

#[test]
fn signature_sizes() {
    let env = TestEnv::with_seed(101);
    let registry = registry(&env);

    let ed25519: SignerSet =
        generate(&templates::ed25519(), &registry, &env).primitive(&registry).unwrap();
    let p1363: SignerSet = generate(&templates::ecdsa_p256_ieee_p1363(), &registry, &env)
        .primitive(&registry)
        .unwrap();

    assert_eq!(ed25519.sign(b"m").unwrap().len(), 5 + 64);
    assert_eq!(p1363.sign(b"m").unwrap().len(), 5 + 64);
}

#[test]
fn public_keyset_preserves_metadata() {
    let env = TestEnv::with_seed(102);
    let registry = registry(&env);
    let mut manager = KeysetManager::new(registry.clone(), env.clone());
    manager.rotate(&templates::ed25519()).unwrap();
    let second = manager.add(&templates::ecdsa_p256()).unwrap();
    manager.disable(second).unwrap();

    let private = manager.handle();
    let public = private.public_keyset_handle(&registry).unwrap();
    let private_info = private.keyset_info();
    let public_info = public.keyset_info();

    assert_eq!(public_info.primary_key_id, private_info.primary_key_id);
    assert_eq!(public_info.keys.len(), 2);
    for (public_key, private_key) in public_info.keys.iter().zip(&private_info.keys) {
        assert_eq!(public_key.key_id, private_key.key_id);
        assert_eq!(public_key.status, private_key.status);
        assert_eq!(public_key.output_prefix_type, private_key.output_prefix_type);
    }
    assert_eq!(public_info.keys[0].type_url.as_deref(), Some(ED25519_PUBLIC_TYPE_URL));
    assert_eq!(public_info.keys[1].type_url.as_deref(), Some(ECDSA_PUBLIC_TYPE_URL));
}

#[test]
fn old_signatures_verify_after_rotation() {
    let env = TestEnv::with_seed(103);
    let registry = registry(&env);
    let mut manager = KeysetManager::new(registry.clone(), env.clone());

    manager.rotate(&templates::ecdsa_p256()).unwrap();
    let old_signer: SignerSet = manager.handle().primitive(&registry).unwrap();
    let old_signature = old_signer.sign(b"doc").unwrap();

    manager.rotate(&templates::ed25519()).unwrap();
    let public = manager.handle().public_keyset_handle(&registry).unwrap();
    let verifier: VerifierSet = public.primitive(&registry).unwrap();

    verifier.verify(&old_signature, b"doc").unwrap();
}

/// INVARIANT: only asymmetric private keysets have a public counterpart.
#[test]
fn symmetric_keyset_has_no_public_keyset() {
    let env = TestEnv::with_seed(104);
    let registry = registry(&env);
    let handle = generate(&templates::hmac_sha256_256bit_tag(), &registry, &env);

    assert!(matches!(
        handle.public_keyset_handle(&registry),
        Err(KeysetError::NotPrivateKey { .. })
    ));
}

#[test]
fn public_keys_cannot_be_generated() {
    let env = TestEnv::with_seed(105);
    let registry = registry(&env);
    let public = generate(&templates::ed25519(), &registry, &env)
        .public_keyset_handle(&registry)
        .unwrap();

    // A public keyset cannot itself produce a public keyset or a signer
    assert!(matches!(
        public.public_keyset_handle(&registry),
        Err(KeysetError::NotPrivateKey { .. })
    ));
    assert!(matches!(
        public.primitive::<SignerSet>(&registry),
        Err(KeysetError::WrongPrimitive { .. })
    ));

    let mut template = templates::ed25519();
    template.type_url = ED25519_PUBLIC_TYPE_URL.to_string();
    assert!(KeysetHandle::generate(&template, &registry, env).is_err());
}

#[test]
fn public_key_data_is_marked_public() {
    let env = TestEnv::with_seed(106);
    let registry = registry(&env);
    let private_data = registry.new_key_data(&templates::ecdsa_p256()).unwrap();

    let public_data = registry.public_key_data(&private_data).unwrap();
    assert_eq!(public_data.material_type, KeyMaterialType::AsymmetricPublic);
    assert_eq!(public_data.type_url, ECDSA_PUBLIC_TYPE_URL);
}

/// INVARIANT: LEGACY keys sign `data || 0x00` behind a `0x00 || key_id`
/// prefix; CRUNCHY keys with the same material and id sign `data` alone.
#[test]
fn legacy_signatures_cover_sentinel() {
    let env = TestEnv::with_seed(107);
    let registry = registry(&env);

    for template in [templates::ed25519(), templates::ecdsa_p256()] {
        let private_data = registry.new_key_data(&template).unwrap();
        let keyset = |prefix: OutputPrefixType| {
            KeysetHandle::new(Keyset::new(9, vec![Key::enabled(9, prefix, private_data.clone())]))
        };
        let legacy = keyset(OutputPrefixType::Legacy);
        let crunchy = keyset(OutputPrefixType::Crunchy);

        let signer: SignerSet = legacy.primitive(&registry).unwrap();
        let signature = signer.sign(b"payload").unwrap();
        assert_eq!(signature[0], 0x00);
        assert_eq!(&signature[1..5], &9u32.to_be_bytes());

        let verifier: VerifierSet =
            legacy.public_keyset_handle(&registry).unwrap().primitive(&registry).unwrap();
        verifier.verify(&signature, b"payload").unwrap();
        assert_eq!(
            verifier.verify(&signature, b"payload\0"),
            Err(CryptoError::SignatureVerificationFailed)
        );

        let crunchy_verifier: VerifierSet =
            crunchy.public_keyset_handle(&registry).unwrap().primitive(&registry).unwrap();
        assert_eq!(
            crunchy_verifier.verify(&signature, b"payload"),
            Err(CryptoError::SignatureVerificationFailed)
        );
    }
}
