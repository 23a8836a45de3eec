//! Cipherset Keyset Resolution
//!
//! Turns a keyset (an ordered set of keys of possibly different algorithms
//! with one designated primary) into a single primitive that callers use
//! without knowing which key is involved. Algorithms themselves live in
//! `cipherset-crypto`; this crate only knows the primitive contracts.
//!
//! # Resolution
//!
//! ```text
//! Keyset (keys + primary id)
//!        │
//!        ▼
//! Registry: type url → KeyManager<P> → Box<P>      (enabled keys only)
//!        │
//!        ▼
//! PrimitiveSet<P>: identifier → entries, primary
//!        │
//!        ▼
//! AeadSet / MacSet / SignerSet / VerifierSet
//! ```
//!
//! # Output Prefixes
//!
//! Every ciphertext, tag or signature starts with the identifier of the key
//! that produced it:
//!
//! - TINK: `0x01 || key_id (big-endian u32)`
//! - LEGACY, CRUNCHY: `0x00 || key_id`; LEGACY also appends `0x00` to the
//!   message before the underlying primitive sees it
//! - RAW: no prefix
//!
//! Decryption and verification first try the keys whose identifier matches
//! the first five input bytes, then every RAW key on the whole input. Any
//! failure is reported as one generic error so callers learn nothing about
//! which keys were tried.
//!
//! # Key Rotation
//!
//! [`KeysetManager`] adds keys, promotes a new primary and disables or
//! destroys old keys. Adapters are immutable snapshots: after rotating, take
//! a new [`KeysetHandle`] and resolve it again.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod env;
pub mod error;
pub mod format;
pub mod handle;
pub mod keyset;
pub mod mac;
pub mod manager;
pub mod primitive;
pub mod primitive_set;
pub mod registry;
pub mod resolver;
pub mod signature;

pub use aead::AeadSet;
pub use env::Environment;
pub use error::{CryptoError, KeysetError};
pub use format::{Identifier, compute_identifier};
pub use handle::KeysetHandle;
pub use keyset::{
    Key, KeyData, KeyInfo, KeyMaterialType, KeyStatus, KeyTemplate, Keyset, KeysetInfo,
    OutputPrefixType,
};
pub use mac::MacSet;
pub use manager::KeysetManager;
pub use primitive::{Aead, Mac, Signer, Verifier, Wrapper};
pub use primitive_set::{Entry, PrimitiveSet};
pub use registry::{KeyFactory, KeyManager, Registry};
pub use resolver::{PrimaryPolicy, resolve};
pub use signature::{SignerSet, VerifierSet};
