//! Keyset handles.
//!
//! A [`KeysetHandle`] owns an already-parsed keyset and is how callers turn it
//! into a usable primitive. It never hands out key material; callers only see
//! [`KeysetInfo`] and the adapters built from it.

use crate::{
    env::Environment,
    error::KeysetError,
    keyset::{Key, KeyMaterialType, KeyTemplate, Keyset, KeysetInfo},
    manager::KeysetManager,
    primitive::Wrapper,
    registry::{KeyManager, Registry},
    resolver::{PrimaryPolicy, resolve},
};

/// Opaque owner of a keyset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetHandle {
    keyset: Keyset,
}

impl KeysetHandle {
    /// Wrap a keyset that was loaded by an outer layer.
    pub fn new(keyset: Keyset) -> Self {
        Self { keyset }
    }

    /// Create a handle holding one fresh primary key generated from
    /// `template`.
    pub fn generate<E: Environment>(
        template: &KeyTemplate,
        registry: &Registry,
        env: E,
    ) -> Result<Self, KeysetError> {
        let mut manager = KeysetManager::new(registry.clone(), env);
        manager.rotate(template)?;
        Ok(manager.handle())
    }

    /// Metadata of the keyset without key material.
    pub fn keyset_info(&self) -> KeysetInfo {
        self.keyset.info()
    }

    pub(crate) fn keyset(&self) -> &Keyset {
        &self.keyset
    }

    /// Resolve into adapter `W` for encrypting, computing MACs or signing.
    ///
    /// The declared primary must be an enabled key.
    pub fn primitive<W: Wrapper>(&self, registry: &Registry) -> Result<W, KeysetError> {
        self.primitive_with(registry, None, PrimaryPolicy::Required)
    }

    /// Resolve into adapter `W` for decrypting or verifying only.
    ///
    /// The keyset's primary may be disabled or absent; the adapter then fails
    /// encrypt/MAC/sign calls with [`CryptoError::NoPrimaryKey`].
    ///
    /// [`CryptoError::NoPrimaryKey`]: crate::CryptoError::NoPrimaryKey
    pub fn verifying_primitive<W: Wrapper>(&self, registry: &Registry) -> Result<W, KeysetError> {
        self.primitive_with(registry, None, PrimaryPolicy::Optional)
    }

    /// Resolve into adapter `W`, preferring `custom_manager` for the key types
    /// it supports.
    pub fn primitive_with<W: Wrapper>(
        &self,
        registry: &Registry,
        custom_manager: Option<&dyn KeyManager<W::Primitive>>,
        policy: PrimaryPolicy,
    ) -> Result<W, KeysetError> {
        let set = resolve(registry, &self.keyset, custom_manager, policy)?;
        Ok(W::wrap(set))
    }

    /// Derive the handle of the matching public keyset.
    ///
    /// Ids, statuses, prefix types and the primary are preserved. Destroyed
    /// keys stay destroyed.
    ///
    /// # Errors
    ///
    /// - `NotPrivateKey` if any key with material is not an asymmetric
    ///   private key
    pub fn public_keyset_handle(&self, registry: &Registry) -> Result<Self, KeysetError> {
        let keys = self
            .keyset
            .keys
            .iter()
            .map(|key| {
                let Some(key_data) = &key.key_data else {
                    return Ok(key.clone());
                };
                if key_data.material_type != KeyMaterialType::AsymmetricPrivate {
                    return Err(KeysetError::NotPrivateKey { type_url: key_data.type_url.clone() });
                }
                Ok(Key {
                    key_id: key.key_id,
                    status: key.status,
                    output_prefix_type: key.output_prefix_type,
                    key_data: Some(registry.public_key_data(key_data)?),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(Keyset::new(self.keyset.primary_key_id, keys)))
    }
}
