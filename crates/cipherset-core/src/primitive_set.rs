//! Resolved keysets.
//!
//! A [`PrimitiveSet`] holds one concrete primitive per enabled key, each
//! tagged with the identifier its outputs carry. It is built once by the
//! resolver and never mutated afterwards, so it can be shared across threads
//! without locking.
//!
//! # Lookup
//!
//! Entries are indexed by identifier. Several entries may share one
//! identifier: every RAW key shares the empty identifier, and a key id reused
//! across prefix types or rotations collides as well. Entries sharing an
//! identifier keep keyset order, which is the order decrypt/verify tries them.

use std::{collections::HashMap, fmt};

use crate::{
    error::KeysetError,
    format::{Identifier, compute_identifier},
    keyset::{Key, KeyStatus, OutputPrefixType},
};

/// One resolved key: its primitive plus the metadata needed to route outputs.
pub struct Entry<P: ?Sized> {
    primitive: Box<P>,
    identifier: Identifier,
    key_id: u32,
    status: KeyStatus,
    output_prefix_type: OutputPrefixType,
}

impl<P: ?Sized> Entry<P> {
    /// The concrete primitive for this key.
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Identifier prepended to outputs of this key.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Key id from the keyset.
    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    /// Key status at resolution time (always enabled for resolver-built sets).
    pub fn status(&self) -> KeyStatus {
        self.status
    }

    /// Prefix convention of this key.
    pub fn output_prefix_type(&self) -> OutputPrefixType {
        self.output_prefix_type
    }
}

impl<P: ?Sized> fmt::Debug for Entry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key_id", &self.key_id)
            .field("identifier", &self.identifier)
            .field("status", &self.status)
            .field("output_prefix_type", &self.output_prefix_type)
            .finish_non_exhaustive()
    }
}

/// Immutable set of resolved primitives with an optional primary.
///
/// # Invariants
///
/// - Every position in `by_identifier` points into `entries`
/// - Positions under one identifier are in keyset order
/// - `primary`, if set, points into `entries`
pub struct PrimitiveSet<P: ?Sized> {
    /// Entries in keyset order
    entries: Vec<Entry<P>>,
    /// Identifier -> positions in `entries`
    by_identifier: HashMap<Identifier, Vec<usize>>,
    /// Position of the primary entry
    primary: Option<usize>,
}

impl<P: ?Sized> PrimitiveSet<P> {
    /// The primary entry. `None` for decrypt/verify-only sets.
    pub fn primary(&self) -> Option<&Entry<P>> {
        self.primary.map(|index| &self.entries[index])
    }

    /// Entries whose outputs start with `identifier`, in keyset order.
    pub fn entries_for<'a>(
        &'a self,
        identifier: &Identifier,
    ) -> impl Iterator<Item = &'a Entry<P>> + use<'a, P> {
        self.positions(identifier).iter().map(move |&index| &self.entries[index])
    }

    /// Entries with the RAW (empty) identifier, in keyset order.
    pub fn raw_entries(&self) -> impl Iterator<Item = &Entry<P>> {
        self.entries_for(&Identifier::RAW)
    }

    /// All entries in keyset order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<P>> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the set holds no entries. Resolver-built sets are never empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry that may have produced `input`, paired with the bytes it
    /// should process.
    ///
    /// Attempt order:
    ///
    /// 1. If `input` is at least 5 bytes long, entries whose identifier equals
    ///    the first 5 bytes, each paired with the remainder.
    /// 2. Every RAW entry, paired with the whole `input`.
    ///
    /// RAW entries are always yielded, even when step 1 found candidates,
    /// because a RAW output carries no marker to rule them out.
    pub fn candidates<'a>(
        &'a self,
        input: &'a [u8],
    ) -> impl Iterator<Item = (&'a Entry<P>, &'a [u8])> + 'a {
        let prefixed = Identifier::parse(input).into_iter().flat_map(move |(identifier, rest)| {
            self.positions(&identifier).iter().map(move |&index| (&self.entries[index], rest))
        });
        let raw = self
            .positions(&Identifier::RAW)
            .iter()
            .map(move |&index| (&self.entries[index], input));

        prefixed.chain(raw)
    }

    fn positions(&self, identifier: &Identifier) -> &[usize] {
        self.by_identifier.get(identifier).map_or(&[], Vec::as_slice)
    }
}

impl<P: ?Sized> fmt::Debug for PrimitiveSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("entries", &self.entries)
            .field("primary", &self.primary().map(Entry::key_id))
            .finish()
    }
}

/// Accumulates entries during resolution.
pub(crate) struct PrimitiveSetBuilder<P: ?Sized> {
    entries: Vec<Entry<P>>,
    by_identifier: HashMap<Identifier, Vec<usize>>,
    primary: Option<usize>,
}

impl<P: ?Sized> PrimitiveSetBuilder<P> {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new(), by_identifier: HashMap::new(), primary: None }
    }

    /// Append an entry for `key`, computing its identifier.
    ///
    /// Returns the entry's position. Entries sharing an identifier are
    /// appended, never replaced.
    pub(crate) fn add(&mut self, primitive: Box<P>, key: &Key) -> Result<usize, KeysetError> {
        let identifier = compute_identifier(key.output_prefix_type, key.key_id)?;
        let index = self.entries.len();

        self.entries.push(Entry {
            primitive,
            identifier,
            key_id: key.key_id,
            status: key.status,
            output_prefix_type: key.output_prefix_type,
        });
        self.by_identifier.entry(identifier).or_default().push(index);

        Ok(index)
    }

    /// Mark the entry at `index` as primary.
    pub(crate) fn set_primary(&mut self, index: usize) {
        debug_assert!(index < self.entries.len(), "primary must point at an added entry");
        self.primary = Some(index);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn build(self) -> PrimitiveSet<P> {
        PrimitiveSet {
            entries: self.entries,
            by_identifier: self.by_identifier,
            primary: self.primary,
        }
    }
}
