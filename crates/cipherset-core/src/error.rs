//! Error types for keyset resolution and primitive operations.
//!
//! Two layers, two enums:
//!
//! - [`KeysetError`]: raised while building a primitive set, talking to the
//!   registry or managing keys. These abort construction; no partial set is
//!   ever returned.
//! - [`CryptoError`]: raised by encrypt/decrypt/MAC/sign/verify calls. The
//!   multi-key paths collapse every failed attempt into one variant without
//!   detail, so a caller probing ciphertexts learns nothing about which key
//!   was tried or why it failed.

use thiserror::Error;

use crate::keyset::KeyStatus;

/// Errors from keyset resolution, registry lookups and key management.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeysetError {
    /// Key uses an output prefix type with no defined wire format
    #[error("unsupported output prefix type for key {key_id}")]
    UnsupportedPrefixType {
        /// Key that carried the prefix type
        key_id: u32,
    },

    /// Neither the custom manager nor the registry handles this key type
    #[error("no key manager found for type '{type_url}'")]
    NoKeyManagerFound {
        /// Type identifier that failed to resolve
        type_url: String,
    },

    /// A manager is registered for the type, but for another primitive family
    #[error(
        "wrong primitive for type '{type_url}': requested {requested}, registered {registered}"
    )]
    WrongPrimitive {
        /// Type identifier that was looked up
        type_url: String,
        /// Primitive family the caller asked for
        requested: &'static str,
        /// Primitive family the manager was registered with
        registered: &'static str,
    },

    /// Key manager rejected the serialized key material
    #[error("invalid key material for type '{type_url}': {reason}")]
    KeyMaterialInvalid {
        /// Type identifier of the rejected key
        type_url: String,
        /// Why the material was rejected
        reason: String,
    },

    /// An enabled key carries no key material
    #[error("enabled key {key_id} has no key material")]
    MissingKeyMaterial {
        /// Key without material
        key_id: u32,
    },

    /// Key manager rejected a key template
    #[error("invalid key format for type '{type_url}': {reason}")]
    InvalidKeyFormat {
        /// Type identifier of the rejected template
        type_url: String,
        /// Why the format was rejected
        reason: String,
    },

    /// The declared primary key is not among the enabled keys
    #[error("primary key {key_id} not found among enabled keys")]
    PrimaryKeyNotFound {
        /// Declared primary key id
        key_id: u32,
    },

    /// More than one enabled key carries the primary key id
    #[error("primary key {key_id} matches {count} enabled keys")]
    AmbiguousPrimary {
        /// Declared primary key id
        key_id: u32,
        /// Number of enabled keys with that id
        count: usize,
    },

    /// Keyset has no enabled keys
    #[error("keyset has no enabled keys")]
    EmptyPrimitiveSet,

    /// A different manager is already registered for the type
    #[error("a key manager for type '{type_url}' is already registered")]
    DuplicateKeyManager {
        /// Type identifier that was registered twice
        type_url: String,
    },

    /// The registry forbids generating new keys of this type
    #[error("creating new keys of type '{type_url}' is not allowed")]
    NewKeyForbidden {
        /// Type identifier of the template
        type_url: String,
    },

    /// Key is not a private key, so no public key can be derived
    #[error("key of type '{type_url}' is not a private key")]
    NotPrivateKey {
        /// Type identifier of the offending key
        type_url: String,
    },

    /// No key with this id exists in the keyset
    #[error("key {key_id} not found")]
    KeyNotFound {
        /// Requested key id
        key_id: u32,
    },

    /// Key status does not permit the requested operation
    #[error("cannot {operation} key {key_id} with status {status:?}")]
    InvalidKeyState {
        /// Key that was targeted
        key_id: u32,
        /// Its current status
        status: KeyStatus,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// The operation is not allowed on the primary key
    #[error("cannot {operation} the primary key {key_id}")]
    PrimaryKeyOperation {
        /// The primary key id
        key_id: u32,
        /// Operation that was attempted
        operation: &'static str,
    },
}

impl KeysetError {
    /// Returns true if this error points at registry setup rather than at the
    /// keyset itself.
    ///
    /// Configuration errors are fixed by registering the right key managers.
    /// Everything else means the keyset (or the requested key operation) is
    /// unusable as given.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NoKeyManagerFound { .. }
                | Self::WrongPrimitive { .. }
                | Self::DuplicateKeyManager { .. }
                | Self::NewKeyForbidden { .. }
        )
    }
}

/// Errors from primitive operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The primitive set has no primary, so it cannot encrypt, MAC or sign
    #[error("primitive set has no primary key")]
    NoPrimaryKey,

    /// No key in the set could decrypt the ciphertext
    #[error("decryption failed")]
    DecryptionFailed,

    /// No key in the set verified the tag
    #[error("mac verification failed")]
    MacVerificationFailed,

    /// No key in the set verified the signature
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// The underlying algorithm reported an error
    #[error("algorithm error: {reason}")]
    Algorithm {
        /// Reason reported by the algorithm
        reason: String,
    },
}

impl CryptoError {
    /// Returns true for the generic authentication failures produced on
    /// decrypt/verify paths.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::DecryptionFailed | Self::MacVerificationFailed | Self::SignatureVerificationFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_are_configuration_errors() {
        assert!(
            KeysetError::NoKeyManagerFound { type_url: "t".to_string() }.is_configuration_error()
        );
        assert!(
            KeysetError::NewKeyForbidden { type_url: "t".to_string() }.is_configuration_error()
        );
        let wrong = KeysetError::WrongPrimitive {
            type_url: "t".to_string(),
            requested: "a",
            registered: "b",
        };
        assert!(wrong.is_configuration_error());
    }

    #[test]
    fn keyset_errors_are_not_configuration_errors() {
        assert!(!KeysetError::EmptyPrimitiveSet.is_configuration_error());
        assert!(!KeysetError::PrimaryKeyNotFound { key_id: 7 }.is_configuration_error());
        assert!(!KeysetError::UnsupportedPrefixType { key_id: 7 }.is_configuration_error());
        assert!(!KeysetError::MissingKeyMaterial { key_id: 7 }.is_configuration_error());
    }

    #[test]
    fn verification_failures_carry_no_detail() {
        assert_eq!(CryptoError::DecryptionFailed.to_string(), "decryption failed");
        assert_eq!(CryptoError::MacVerificationFailed.to_string(), "mac verification failed");
        assert!(CryptoError::SignatureVerificationFailed.is_authentication_failure());
        assert!(!CryptoError::NoPrimaryKey.is_authentication_failure());
    }

    #[test]
    fn error_display() {
        let err = KeysetError::InvalidKeyState {
            key_id: 42,
            status: KeyStatus::Destroyed,
            operation: "enable",
        };
        assert_eq!(err.to_string(), "cannot enable key 42 with status Destroyed");
    }
}
