//! Key rotation.
//!
//! [`KeysetManager`] edits a keyset: it generates keys, promotes a new
//! primary and moves keys through their lifecycle
//! (enabled <-> disabled -> destroyed). Primitive sets are never edited in
//! place; take a fresh [`KeysetHandle`] after changes and resolve it again.

use crate::{
    env::Environment,
    error::KeysetError,
    handle::KeysetHandle,
    keyset::{Key, KeyStatus, KeyTemplate, Keyset, OutputPrefixType},
    registry::Registry,
};

/// Mutable owner of a keyset under rotation.
pub struct KeysetManager<E: Environment> {
    keyset: Keyset,
    registry: Registry,
    env: E,
}

impl<E: Environment> KeysetManager<E> {
    /// Manager with an empty keyset.
    pub fn new(registry: Registry, env: E) -> Self {
        Self { keyset: Keyset::new(0, Vec::new()), registry, env }
    }

    /// Manager editing a copy of the keyset behind `handle`.
    pub fn from_handle(handle: &KeysetHandle, registry: Registry, env: E) -> Self {
        Self { keyset: handle.keyset().clone(), registry, env }
    }

    /// Generate a key from `template` and add it as an enabled, non-primary
    /// key. Returns its id.
    pub fn add(&mut self, template: &KeyTemplate) -> Result<u32, KeysetError> {
        let key_id = self.new_key_id();
        if template.output_prefix_type == OutputPrefixType::Unknown {
            return Err(KeysetError::UnsupportedPrefixType { key_id });
        }

        let key_data = self.registry.new_key_data(template)?;
        self.keyset.keys.push(Key::enabled(key_id, template.output_prefix_type, key_data));

        tracing::debug!(key_id, type_url = %template.type_url, "added key");
        Ok(key_id)
    }

    /// Add a key from `template` and make it the primary. Returns its id.
    ///
    /// The previous primary stays enabled, so data it protected can still be
    /// decrypted or verified.
    pub fn rotate(&mut self, template: &KeyTemplate) -> Result<u32, KeysetError> {
        let key_id = self.add(template)?;
        self.keyset.primary_key_id = key_id;

        tracing::debug!(key_id, "rotated primary key");
        Ok(key_id)
    }

    /// Enable a disabled key.
    pub fn enable(&mut self, key_id: u32) -> Result<(), KeysetError> {
        let key = self.key_mut(key_id)?;
        match key.status {
            KeyStatus::Enabled | KeyStatus::Disabled => {
                key.status = KeyStatus::Enabled;
                tracing::debug!(key_id, "enabled key");
                Ok(())
            },
            status => Err(KeysetError::InvalidKeyState { key_id, status, operation: "enable" }),
        }
    }

    /// Disable a non-primary key.
    pub fn disable(&mut self, key_id: u32) -> Result<(), KeysetError> {
        self.ensure_not_primary(key_id, "disable")?;
        let key = self.key_mut(key_id)?;
        match key.status {
            KeyStatus::Enabled | KeyStatus::Disabled => {
                key.status = KeyStatus::Disabled;
                tracing::debug!(key_id, "disabled key");
                Ok(())
            },
            status => Err(KeysetError::InvalidKeyState { key_id, status, operation: "disable" }),
        }
    }

    /// Destroy a non-primary key, erasing its material but keeping its id in
    /// the keyset.
    pub fn destroy(&mut self, key_id: u32) -> Result<(), KeysetError> {
        self.ensure_not_primary(key_id, "destroy")?;
        let key = self.key_mut(key_id)?;
        match key.status {
            KeyStatus::Enabled | KeyStatus::Disabled | KeyStatus::Destroyed => {
                key.status = KeyStatus::Destroyed;
                key.key_data = None;
                tracing::debug!(key_id, "destroyed key");
                Ok(())
            },
            status => Err(KeysetError::InvalidKeyState { key_id, status, operation: "destroy" }),
        }
    }

    /// Remove a non-primary key from the keyset entirely.
    pub fn delete(&mut self, key_id: u32) -> Result<(), KeysetError> {
        self.ensure_not_primary(key_id, "delete")?;
        let position = self
            .keyset
            .keys
            .iter()
            .position(|key| key.key_id == key_id)
            .ok_or(KeysetError::KeyNotFound { key_id })?;

        self.keyset.keys.remove(position);
        tracing::debug!(key_id, "deleted key");
        Ok(())
    }

    /// Make an enabled key the primary.
    pub fn set_primary(&mut self, key_id: u32) -> Result<(), KeysetError> {
        let key = self.key_mut(key_id)?;
        if key.status != KeyStatus::Enabled {
            return Err(KeysetError::InvalidKeyState {
                key_id,
                status: key.status,
                operation: "set as primary",
            });
        }

        self.keyset.primary_key_id = key_id;
        tracing::debug!(key_id, "set primary key");
        Ok(())
    }

    /// Number of keys in the keyset, whatever their status.
    pub fn key_count(&self) -> usize {
        self.keyset.keys.len()
    }

    /// Handle to a copy of the current keyset.
    pub fn handle(&self) -> KeysetHandle {
        KeysetHandle::new(self.keyset.clone())
    }

    fn key_mut(&mut self, key_id: u32) -> Result<&mut Key, KeysetError> {
        self.keyset
            .keys
            .iter_mut()
            .find(|key| key.key_id == key_id)
            .ok_or(KeysetError::KeyNotFound { key_id })
    }

    fn ensure_not_primary(&self, key_id: u32, operation: &'static str) -> Result<(), KeysetError> {
        if !self.keyset.keys.is_empty() && key_id == self.keyset.primary_key_id {
            return Err(KeysetError::PrimaryKeyOperation { key_id, operation });
        }
        Ok(())
    }

    /// Random id not used by any key in the keyset.
    fn new_key_id(&self) -> u32 {
        loop {
            let candidate = self.env.random_u32();
            if self.keyset.key(candidate).is_none() {
                return candidate;
            }
        }
    }
}
