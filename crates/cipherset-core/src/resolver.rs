//! Keyset resolution.
//!
//! Turns a [`Keyset`] into a [`PrimitiveSet`]: every enabled key is resolved
//! to a primitive through a key manager, tagged with its output identifier
//! and indexed. Construction is all-or-nothing; the first failing key aborts
//! it and no partial set escapes.

use crate::{
    error::KeysetError,
    keyset::{KeyStatus, Keyset},
    primitive_set::{PrimitiveSet, PrimitiveSetBuilder},
    registry::{KeyManager, Registry},
};

/// Whether a resolved set must have a primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryPolicy {
    /// The declared primary must be an enabled key. Use for sets that
    /// encrypt, compute MACs or sign.
    Required,
    /// A missing primary is accepted. Use for decrypt/verify-only sets.
    Optional,
}

/// Resolve the enabled keys of `keyset` into a primitive set of family `P`.
///
/// Keys are processed in keyset order. For each enabled key the manager is
/// `custom_manager` if it supports the key type, otherwise the manager
/// registered in `registry`.
///
/// # Errors
///
/// - `NoKeyManagerFound` / `WrongPrimitive` if a key type cannot be resolved
/// - `MissingKeyMaterial` if an enabled key has no material
/// - `KeyMaterialInvalid` if a manager rejects an enabled key's material
/// - `UnsupportedPrefixType` if an enabled key has an unknown prefix type
/// - `EmptyPrimitiveSet` if no key is enabled
/// - `PrimaryKeyNotFound` if `policy` is [`PrimaryPolicy::Required`] and no
///   enabled key has the primary id
/// - `AmbiguousPrimary` if several enabled keys have the primary id
pub fn resolve<P: ?Sized + 'static>(
    registry: &Registry,
    keyset: &Keyset,
    custom_manager: Option<&dyn KeyManager<P>>,
    policy: PrimaryPolicy,
) -> Result<PrimitiveSet<P>, KeysetError> {
    let mut builder = PrimitiveSetBuilder::new();
    let mut primary_matches = 0usize;

    for key in &keyset.keys {
        if key.status != KeyStatus::Enabled {
            tracing::trace!(key_id = key.key_id, status = ?key.status, "skipping key");
            continue;
        }

        let Some(key_data) = &key.key_data else {
            return Err(KeysetError::MissingKeyMaterial { key_id: key.key_id });
        };

        let primitive = match custom_manager {
            Some(manager) if manager.does_support(&key_data.type_url) => {
                manager.primitive(key_data)?
            },
            _ => registry.primitive::<P>(key_data)?,
        };

        let index = builder.add(primitive, key)?;

        if key.key_id == keyset.primary_key_id {
            primary_matches += 1;
            builder.set_primary(index);
        }
    }

    if builder.len() == 0 {
        return Err(KeysetError::EmptyPrimitiveSet);
    }

    match primary_matches {
        0 if policy == PrimaryPolicy::Required => {
            return Err(KeysetError::PrimaryKeyNotFound { key_id: keyset.primary_key_id });
        },
        0 | 1 => {},
        count => {
            return Err(KeysetError::AmbiguousPrimary { key_id: keyset.primary_key_id, count });
        },
    }

    let set = builder.build();
    tracing::debug!(
        entries = set.len(),
        primary = ?set.primary().map(|entry| entry.key_id()),
        "resolved keyset"
    );
    Ok(set)
}
