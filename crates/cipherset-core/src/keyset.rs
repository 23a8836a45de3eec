//! Keyset data model.
//!
//! A [`Keyset`] is an ordered list of [`Key`]s plus the id of the primary key.
//! Keys carry opaque, algorithm-specific material ([`KeyData`]); only the key
//! manager registered for the key's type ever interprets those bytes.
//!
//! [`KeysetInfo`] mirrors a keyset without any key material and is the form
//! that may be logged or shown to users.

use std::fmt;

use zeroize::Zeroize;

/// Lifecycle status of a key.
///
/// Only [`KeyStatus::Enabled`] keys take part in primitive sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    /// Usable for all operations
    Enabled,
    /// Kept in the keyset but not usable
    Disabled,
    /// Key material has been erased
    Destroyed,
    /// Unrecognized status
    Unknown,
}

/// How outputs produced by a key are prefixed.
///
/// The prefix identifies which key produced a ciphertext, tag or signature.
/// See [`crate::format`] for the exact bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPrefixType {
    /// `0x01 || key_id`
    Tink,
    /// `0x00 || key_id`, with the legacy sentinel byte appended to the message
    Legacy,
    /// `0x00 || key_id`
    Crunchy,
    /// No prefix
    Raw,
    /// Unrecognized prefix type; cannot be used
    Unknown,
}

/// Kind of key material held by a [`KeyData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMaterialType {
    /// Secret symmetric key
    Symmetric,
    /// Private half of an asymmetric key pair
    AsymmetricPrivate,
    /// Public half of an asymmetric key pair
    AsymmetricPublic,
    /// Key held by a remote service
    Remote,
    /// Unrecognized material type
    Unknown,
}

/// Serialized key material tagged with the type that understands it.
///
/// `value` is zeroized on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyData {
    /// Type identifier used to resolve a key manager
    pub type_url: String,
    /// Algorithm-specific serialized key
    pub value: Vec<u8>,
    /// Kind of material in `value`
    pub material_type: KeyMaterialType,
}

impl KeyData {
    /// Create key data for the given type.
    pub fn new(
        type_url: impl Into<String>,
        value: Vec<u8>,
        material_type: KeyMaterialType,
    ) -> Self {
        Self { type_url: type_url.into(), value, material_type }
    }
}

impl fmt::Debug for KeyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyData")
            .field("type_url", &self.type_url)
            .field("value", &format_args!("<{} bytes redacted>", self.value.len()))
            .field("material_type", &self.material_type)
            .finish()
    }
}

impl Drop for KeyData {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// One key within a keyset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Key id, embedded in output prefixes
    pub key_id: u32,
    /// Lifecycle status
    pub status: KeyStatus,
    /// Prefix convention for outputs of this key
    pub output_prefix_type: OutputPrefixType,
    /// Key material. `None` once the key has been destroyed.
    pub key_data: Option<KeyData>,
}

impl Key {
    /// Create an enabled key.
    pub fn enabled(key_id: u32, output_prefix_type: OutputPrefixType, key_data: KeyData) -> Self {
        Self {
            key_id,
            status: KeyStatus::Enabled,
            output_prefix_type,
            key_data: Some(key_data),
        }
    }

    /// Metadata of this key without its material.
    pub fn info(&self) -> KeyInfo {
        KeyInfo {
            key_id: self.key_id,
            status: self.status,
            output_prefix_type: self.output_prefix_type,
            type_url: self.key_data.as_ref().map(|data| data.type_url.clone()),
        }
    }
}

/// A versioned bundle of keys with one designated primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyset {
    /// Id of the key used for new encrypt/MAC/sign operations
    pub primary_key_id: u32,
    /// Keys in declaration order
    pub keys: Vec<Key>,
}

impl Keyset {
    /// Create a keyset from its keys.
    pub fn new(primary_key_id: u32, keys: Vec<Key>) -> Self {
        Self { primary_key_id, keys }
    }

    /// First key with the given id.
    pub fn key(&self, key_id: u32) -> Option<&Key> {
        self.keys.iter().find(|key| key.key_id == key_id)
    }

    /// Number of keys with status [`KeyStatus::Enabled`].
    pub fn enabled_count(&self) -> usize {
        self.keys.iter().filter(|key| key.status == KeyStatus::Enabled).count()
    }

    /// Metadata of this keyset without key material.
    pub fn info(&self) -> KeysetInfo {
        KeysetInfo {
            primary_key_id: self.primary_key_id,
            keys: self.keys.iter().map(Key::info).collect(),
        }
    }
}

/// Metadata of one key. Contains no key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Key id
    pub key_id: u32,
    /// Lifecycle status
    pub status: KeyStatus,
    /// Prefix convention
    pub output_prefix_type: OutputPrefixType,
    /// Type identifier; `None` for destroyed keys
    pub type_url: Option<String>,
}

/// Metadata of a keyset. Contains no key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetInfo {
    /// Id of the primary key
    pub primary_key_id: u32,
    /// Per-key metadata in keyset order
    pub keys: Vec<KeyInfo>,
}

/// Parameters for generating a fresh key.
///
/// `value` is a serialized key format understood by the manager registered
/// for `type_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    /// Type identifier of the key to generate
    pub type_url: String,
    /// Serialized key format
    pub value: Vec<u8>,
    /// Prefix convention for the generated key
    pub output_prefix_type: OutputPrefixType,
}

impl KeyTemplate {
    /// Create a template.
    pub fn new(
        type_url: impl Into<String>,
        value: Vec<u8>,
        output_prefix_type: OutputPrefixType,
    ) -> Self {
        Self { type_url: type_url.into(), value, output_prefix_type }
    }

    /// Same template with a different output prefix type.
    #[must_use]
    pub fn with_prefix(mut self, output_prefix_type: OutputPrefixType) -> Self {
        self.output_prefix_type = output_prefix_type;
        self
    }
}
