//! Output-prefix codec.
//!
//! Every ciphertext, tag and signature starts with a short identifier naming
//! the key that produced it. The mapping from `(prefix type, key id)` to bytes
//! is a fixed wire contract:
//!
//! ```text
//! RAW      : (empty)
//! TINK     : 0x01 || key_id (u32, big-endian)
//! LEGACY   : 0x00 || key_id (u32, big-endian)
//! CRUNCHY  : 0x00 || key_id (u32, big-endian)
//! ```
//!
//! LEGACY keys additionally append [`LEGACY_SENTINEL`] to the message before
//! the algorithm runs, on both the producing and the verifying side.

use std::{borrow::Cow, fmt};

use crate::{error::KeysetError, keyset::OutputPrefixType};

/// Length of a TINK, LEGACY or CRUNCHY prefix.
pub const NON_RAW_PREFIX_SIZE: usize = 5;

/// First byte of a TINK prefix.
pub const TINK_START_BYTE: u8 = 0x01;

/// First byte of a LEGACY or CRUNCHY prefix.
pub const LEGACY_START_BYTE: u8 = 0x00;

/// Byte appended to the message for LEGACY keys.
pub const LEGACY_SENTINEL: u8 = 0x00;

/// Key identifier prepended to outputs.
///
/// Either empty (RAW) or exactly [`NON_RAW_PREFIX_SIZE`] bytes. Stored inline
/// so it can be copied and hashed without allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    bytes: [u8; NON_RAW_PREFIX_SIZE],
    len: u8,
}

impl Identifier {
    /// The empty identifier shared by all RAW keys.
    pub const RAW: Self = Self { bytes: [0u8; NON_RAW_PREFIX_SIZE], len: 0 };

    fn prefixed(start_byte: u8, key_id: u32) -> Self {
        let mut bytes = [0u8; NON_RAW_PREFIX_SIZE];
        bytes[0] = start_byte;
        bytes[1..5].copy_from_slice(&key_id.to_be_bytes());
        Self { bytes, len: NON_RAW_PREFIX_SIZE as u8 }
    }

    /// Read a candidate identifier from the start of `input`.
    ///
    /// Returns the identifier and the bytes that follow it, or `None` if
    /// `input` is shorter than [`NON_RAW_PREFIX_SIZE`]. The start byte is not
    /// validated: an unknown start byte simply matches no key.
    pub fn parse(input: &[u8]) -> Option<(Self, &[u8])> {
        let (head, rest) = input.split_first_chunk::<NON_RAW_PREFIX_SIZE>()?;
        Some((Self { bytes: *head, len: NON_RAW_PREFIX_SIZE as u8 }, rest))
    }

    /// Identifier bytes as they appear on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of bytes on the wire (0 or 5).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the RAW identifier.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First byte of a non-RAW identifier.
    pub fn start_byte(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// Key id encoded in a non-RAW identifier.
    pub fn key_id(&self) -> Option<u32> {
        let (_, id) = self.as_bytes().split_first()?;
        let id: [u8; 4] = id.try_into().ok()?;
        Some(u32::from_be_bytes(id))
    }

    /// `identifier || output`.
    pub fn prepend_to(&self, output: &[u8]) -> Vec<u8> {
        let mut prefixed = Vec::with_capacity(self.len() + output.len());
        prefixed.extend_from_slice(self.as_bytes());
        prefixed.extend_from_slice(output);
        prefixed
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Identifier(raw)");
        }
        write!(f, "Identifier(")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Compute the identifier for a key.
///
/// Pure and deterministic; computed once when a key is resolved.
///
/// # Errors
///
/// - `UnsupportedPrefixType` for [`OutputPrefixType::Unknown`]
pub fn compute_identifier(
    prefix_type: OutputPrefixType,
    key_id: u32,
) -> Result<Identifier, KeysetError> {
    match prefix_type {
        OutputPrefixType::Raw => Ok(Identifier::RAW),
        OutputPrefixType::Tink => Ok(Identifier::prefixed(TINK_START_BYTE, key_id)),
        OutputPrefixType::Legacy | OutputPrefixType::Crunchy => {
            Ok(Identifier::prefixed(LEGACY_START_BYTE, key_id))
        },
        OutputPrefixType::Unknown => Err(KeysetError::UnsupportedPrefixType { key_id }),
    }
}

/// The message an algorithm actually sees for a key of `prefix_type`.
///
/// LEGACY keys get [`LEGACY_SENTINEL`] appended; every other prefix type
/// borrows `data` unchanged.
pub fn with_legacy_sentinel(prefix_type: OutputPrefixType, data: &[u8]) -> Cow<'_, [u8]> {
    if prefix_type == OutputPrefixType::Legacy {
        let mut extended = Vec::with_capacity(data.len() + 1);
        extended.extend_from_slice(data);
        extended.push(LEGACY_SENTINEL);
        Cow::Owned(extended)
    } else {
        Cow::Borrowed(data)
    }
}
