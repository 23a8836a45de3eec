//! Key manager registry.
//!
//! Maps a key's type identifier to the [`KeyManager`] that can turn its
//! serialized material into a primitive. The registry is an explicit value,
//! not process-global state: populate it during single-threaded setup, then
//! share it read-only (it is cheap to clone and `Send + Sync`).
//!
//! Managers are registered per primitive family. Looking a type up for the
//! wrong family fails with [`KeysetError::WrongPrimitive`] instead of handing
//! out a manager that builds the wrong kind of object.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use crate::{
    error::KeysetError,
    keyset::{KeyData, KeyTemplate},
};

/// Generates key material for one key type.
pub trait KeyFactory: Send + Sync {
    /// Generate fresh key material according to `template`.
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError>;

    /// Derive the public key data from private key data.
    ///
    /// Only managers of private keys support this; the default fails with
    /// [`KeysetError::NotPrivateKey`].
    fn public_key_data(&self, private_key: &KeyData) -> Result<KeyData, KeysetError> {
        Err(KeysetError::NotPrivateKey { type_url: private_key.type_url.clone() })
    }
}

/// Builds primitives of family `P` from serialized keys of one type.
pub trait KeyManager<P: ?Sized>: KeyFactory {
    /// Type identifier this manager handles.
    fn key_type(&self) -> &str;

    /// True if this manager can handle keys of `type_url`.
    fn does_support(&self, type_url: &str) -> bool {
        type_url == self.key_type()
    }

    /// Build the primitive for `key_data`.
    ///
    /// # Errors
    ///
    /// - `KeyMaterialInvalid` if the material is malformed or has unsupported
    ///   parameters
    fn primitive(&self, key_data: &KeyData) -> Result<Box<P>, KeysetError>;
}

struct Registration {
    /// `Arc<dyn KeyManager<P>>` for the registered family `P`
    manager: Arc<dyn Any + Send + Sync>,
    /// Same manager, family-erased, for key generation
    factory: Arc<dyn KeyFactory>,
    /// Concrete manager type, to detect conflicting registrations
    manager_type: TypeId,
    /// Family name, for diagnostics
    primitive: &'static str,
    new_key_allowed: bool,
}

/// Type identifier -> key manager lookup.
#[derive(Clone, Default)]
pub struct Registry {
    managers: HashMap<String, Arc<Registration>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `manager` for its key type under primitive family `P`.
    ///
    /// Registering the same manager type under the same family again is
    /// allowed and updates `new_key_allowed`, but only towards forbidding:
    /// once new keys are forbidden for a type they cannot be re-allowed.
    ///
    /// # Errors
    ///
    /// - `DuplicateKeyManager` if a different manager or family already
    ///   handles the type, or if the call would re-allow forbidden key
    ///   generation
    pub fn register<P, M>(&mut self, manager: M, new_key_allowed: bool) -> Result<(), KeysetError>
    where
        P: ?Sized + 'static,
        M: KeyManager<P> + 'static,
    {
        let type_url = manager.key_type().to_string();

        if let Some(existing) = self.managers.get(&type_url)
            && (existing.manager_type != TypeId::of::<M>()
                || existing.primitive != type_name::<P>()
                || (!existing.new_key_allowed && new_key_allowed))
        {
            return Err(KeysetError::DuplicateKeyManager { type_url });
        }

        let manager = Arc::new(manager);
        let factory: Arc<dyn KeyFactory> = manager.clone();
        let typed: Arc<dyn KeyManager<P>> = manager;

        tracing::debug!(
            %type_url,
            primitive = type_name::<P>(),
            new_key_allowed,
            "registered key manager"
        );

        self.managers.insert(
            type_url,
            Arc::new(Registration {
                manager: Arc::new(typed),
                factory,
                manager_type: TypeId::of::<M>(),
                primitive: type_name::<P>(),
                new_key_allowed,
            }),
        );
        Ok(())
    }

    /// True if any manager is registered for `type_url`.
    pub fn contains(&self, type_url: &str) -> bool {
        self.managers.contains_key(type_url)
    }

    /// Registered type identifiers, in no particular order.
    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.managers.keys().map(String::as_str)
    }

    /// Manager for `type_url` in primitive family `P`.
    ///
    /// # Errors
    ///
    /// - `NoKeyManagerFound` if nothing is registered for the type
    /// - `WrongPrimitive` if the manager belongs to another family
    pub fn key_manager<P: ?Sized + 'static>(
        &self,
        type_url: &str,
    ) -> Result<Arc<dyn KeyManager<P>>, KeysetError> {
        let registration = self.registration(type_url)?;

        registration.manager.downcast_ref::<Arc<dyn KeyManager<P>>>().cloned().ok_or_else(|| {
            KeysetError::WrongPrimitive {
                type_url: type_url.to_string(),
                requested: type_name::<P>(),
                registered: registration.primitive,
            }
        })
    }

    /// Build the primitive for `key_data` with its registered manager.
    pub fn primitive<P: ?Sized + 'static>(
        &self,
        key_data: &KeyData,
    ) -> Result<Box<P>, KeysetError> {
        self.key_manager::<P>(&key_data.type_url)?.primitive(key_data)
    }

    /// Generate key material for `template`.
    ///
    /// # Errors
    ///
    /// - `NoKeyManagerFound` if nothing is registered for the template's type
    /// - `NewKeyForbidden` if the type was registered without key generation
    pub fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let registration = self.registration(&template.type_url)?;
        if !registration.new_key_allowed {
            return Err(KeysetError::NewKeyForbidden { type_url: template.type_url.clone() });
        }
        registration.factory.new_key_data(template)
    }

    /// Derive public key data from private key data of `private_key.type_url`.
    pub fn public_key_data(&self, private_key: &KeyData) -> Result<KeyData, KeysetError> {
        self.registration(&private_key.type_url)?.factory.public_key_data(private_key)
    }

    fn registration(&self, type_url: &str) -> Result<&Registration, KeysetError> {
        self.managers
            .get(type_url)
            .map(|registration| &**registration)
            .ok_or_else(|| KeysetError::NoKeyManagerFound { type_url: type_url.to_string() })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<(&str, &str)> = self
            .managers
            .iter()
            .map(|(type_url, registration)| (type_url.as_str(), registration.primitive))
            .collect();
        types.sort_unstable();
        f.debug_struct("Registry").field("managers", &types).finish()
    }
}
