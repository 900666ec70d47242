//! # Type Registry
//!
//! Maps a [`TypeTag`] to the converter pair that turns values of that type into
//! bytes and back, together with the default parameters each call starts from.
//!
//! ## Components
//! - **Encode / Decode**: the contract every converter implements
//! - **TypeEntry**: one registered converter pair plus its merged defaults
//! - **Registry**: an owned, cloneable tag → entry mapping
//! - **Global registry**: process-wide registry seeded with the built-ins
//!
//! ## Isolation
//! Every buffer takes its own copy through [`clone_registry`] at construction.
//! Later global registrations and per-buffer default edits never leak across
//! instances.
//!
//! ## Usage
//! ```rust
//! use enchufe::registry::{ParamName, ParamValue, Registry, TypeTag};
//! use enchufe::core::SizeSpec;
//!
//! let mut registry = Registry::with_builtins();
//! registry
//!     .set_default(&TypeTag::Int, ParamValue::Size(SizeSpec::Fixed(4)))
//!     .unwrap();
//! assert_eq!(
//!     registry.get_default(&TypeTag::Int, ParamName::Size).unwrap(),
//!     ParamValue::Size(SizeSpec::Fixed(4))
//! );
//! ```

pub mod builtin;
pub mod params;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{debug, warn};

use crate::core::value::Value;
use crate::error::{constants, NetError, Result};

pub use crate::core::value::TypeTag;
pub use params::{Arg, Overrides, ParamName, ParamValue, Params};

/// Converts a value into wire bytes.
///
/// The value is always the first argument; the remaining parameters arrive as
/// a fully resolved [`Params`].
pub trait Encode: Send + Sync {
    /// Declared parameters, in positional order
    fn parameters(&self) -> &[ParamName];

    /// Defaults for the declared parameters
    fn defaults(&self) -> Params;

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>>;
}

/// Converts wire bytes into a value.
///
/// The data is always the first argument. Returns the value and the number of
/// bytes consumed from the front of `data`.
pub trait Decode: Send + Sync {
    /// Declared parameters, in positional order
    fn parameters(&self) -> &[ParamName];

    /// Defaults for the declared parameters
    fn defaults(&self) -> Params;

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)>;
}

/// A registered converter pair
#[derive(Clone)]
pub struct TypeEntry {
    encoder: Arc<dyn Encode>,
    decoder: Arc<dyn Decode>,
    encode_order: Vec<ParamName>,
    decode_order: Vec<ParamName>,
    defaults: Params,
}

impl TypeEntry {
    /// Validate a converter pair and merge its defaults
    fn new(tag: &TypeTag, decoder: Arc<dyn Decode>, encoder: Arc<dyn Encode>) -> Result<Self> {
        let contract = |reason: String| NetError::RegistrationContract {
            tag: tag.to_string(),
            reason,
        };

        if let TypeTag::Custom(name) = tag {
            if name.trim().is_empty() {
                return Err(contract(constants::ERR_EMPTY_TAG.to_string()));
            }
        }

        let encode_order = encoder.parameters().to_vec();
        let decode_order = decoder.parameters().to_vec();
        for (side, order) in [("encoder", &encode_order), ("decoder", &decode_order)] {
            for (i, name) in order.iter().enumerate() {
                if order[..i].contains(name) {
                    return Err(contract(format!(
                        "{} ({side} parameter '{name}')",
                        constants::ERR_DUPLICATE_PARAMETER
                    )));
                }
            }
        }

        let encode_defaults = encoder.defaults();
        let decode_defaults = decoder.defaults();
        let mut defaults = Params::default();
        for &name in &encode_order {
            defaults.set(encode_defaults.get(name));
        }
        for &name in &decode_order {
            let value = decode_defaults.get(name);
            if encode_order.contains(&name) && encode_defaults.get(name) != value {
                return Err(contract(format!(
                    "{} ('{name}': encoder {:?}, decoder {:?})",
                    constants::ERR_DEFAULT_MISMATCH,
                    encode_defaults.get(name),
                    value
                )));
            }
            defaults.set(value);
        }

        Ok(Self {
            encoder,
            decoder,
            encode_order,
            decode_order,
            defaults,
        })
    }

    /// Whether either converter declares `name`
    pub fn declares(&self, name: ParamName) -> bool {
        self.encode_order.contains(&name) || self.decode_order.contains(&name)
    }

    /// Declared parameter names, encoder order first
    pub fn parameters(&self) -> Vec<ParamName> {
        let mut names = self.encode_order.clone();
        names.extend(self.decode_order.iter().filter(|n| !self.encode_order.contains(*n)));
        names
    }

    pub fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Effective encode parameters: defaults with `overrides` applied
    pub fn encode_params(&self, overrides: &Overrides) -> Result<Params> {
        self.apply(&self.encode_order, overrides)
    }

    /// Effective decode parameters: defaults with `overrides` applied
    pub fn decode_params(&self, overrides: &Overrides) -> Result<Params> {
        self.apply(&self.decode_order, overrides)
    }

    fn apply(&self, order: &[ParamName], overrides: &Overrides) -> Result<Params> {
        let mut params = self.defaults;
        for value in overrides.resolve(order)? {
            params.set(value);
        }
        Ok(params)
    }

    pub fn encode(&self, value: &Value, overrides: &Overrides) -> Result<Vec<u8>> {
        let params = self.encode_params(overrides)?;
        self.encoder.encode(value, &params)
    }

    pub fn decode(&self, data: &[u8], overrides: &Overrides) -> Result<(Value, usize)> {
        let params = self.decode_params(overrides)?;
        self.decoder.decode(data, &params)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("parameters", &self.parameters())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Owned mapping from type tag to converter pair
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: BTreeMap<TypeTag, TypeEntry>,
}

impl Registry {
    /// An empty registry with no converters at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh registry holding only the built-in converters
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (tag, decoder, encoder) in builtin::converters() {
            match TypeEntry::new(&tag, decoder, encoder) {
                Ok(entry) => {
                    registry.entries.insert(tag, entry);
                }
                Err(e) => {
                    debug_assert!(false, "built-in converter for {tag} rejected: {e}");
                    warn!(%tag, error = %e, "Skipping built-in converter");
                }
            }
        }
        registry
    }

    /// Register a converter pair for `tag`.
    ///
    /// # Errors
    /// Returns `NetError::RegistrationContract` if the tag is already
    /// registered or the converters violate the parameter contract.
    pub fn register<D, E>(&mut self, tag: TypeTag, decoder: D, encoder: E) -> Result<()>
    where
        D: Decode + 'static,
        E: Encode + 'static,
    {
        self.register_shared(tag, Arc::new(decoder), Arc::new(encoder))
    }

    /// Register converters that are already shared
    pub fn register_shared(
        &mut self,
        tag: TypeTag,
        decoder: Arc<dyn Decode>,
        encoder: Arc<dyn Encode>,
    ) -> Result<()> {
        if self.entries.contains_key(&tag) {
            return Err(NetError::RegistrationContract {
                tag: tag.to_string(),
                reason: constants::ERR_ALREADY_REGISTERED.to_string(),
            });
        }
        let entry = TypeEntry::new(&tag, decoder, encoder)?;
        debug!(tag = %tag, parameters = ?entry.parameters(), "Registered type converter");
        self.entries.insert(tag, entry);
        Ok(())
    }

    /// Remove the converter pair for `tag`
    pub fn unregister(&mut self, tag: &TypeTag) -> Result<()> {
        match self.entries.remove(tag) {
            Some(_) => {
                debug!(tag = %tag, "Unregistered type converter");
                Ok(())
            }
            None => Err(NetError::UnregisteredType(tag.to_string())),
        }
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.entries.keys()
    }

    pub fn entry(&self, tag: &TypeTag) -> Option<&TypeEntry> {
        self.entries.get(tag)
    }

    fn registered(&self, tag: &TypeTag) -> Result<&TypeEntry> {
        self.entries
            .get(tag)
            .ok_or_else(|| NetError::UnregisteredType(tag.to_string()))
    }

    /// Effective encode parameters for `tag` with `overrides` applied
    pub fn encode_params(&self, tag: &TypeTag, overrides: &Overrides) -> Result<Params> {
        self.registered(tag)?.encode_params(overrides)
    }

    /// Effective decode parameters for `tag` with `overrides` applied
    pub fn decode_params(&self, tag: &TypeTag, overrides: &Overrides) -> Result<Params> {
        self.registered(tag)?.decode_params(overrides)
    }

    fn declared_entry_mut(&mut self, tag: &TypeTag, name: ParamName) -> Result<&mut TypeEntry> {
        let entry = self
            .entries
            .get_mut(tag)
            .ok_or_else(|| NetError::UnregisteredType(tag.to_string()))?;
        if !entry.declares(name) {
            return Err(NetError::ConfigError(format!(
                "Type '{tag}' has no parameter '{name}'"
            )));
        }
        Ok(entry)
    }

    /// Read one default parameter of one registered type
    pub fn get_default(&self, tag: &TypeTag, name: ParamName) -> Result<ParamValue> {
        let entry = self.registered(tag)?;
        if !entry.declares(name) {
            return Err(NetError::ConfigError(format!(
                "Type '{tag}' has no parameter '{name}'"
            )));
        }
        Ok(entry.defaults.get(name))
    }

    /// Overwrite one default parameter of one registered type
    pub fn set_default(&mut self, tag: &TypeTag, value: ParamValue) -> Result<()> {
        let entry = self.declared_entry_mut(tag, value.name())?;
        entry.defaults.set(value);
        debug!(tag = %tag, param = %value.name(), value = ?value, "Default parameter updated");
        Ok(())
    }

    /// String-keyed form of [`Registry::set_default`]
    pub fn set_default_arg(&mut self, tag: &TypeTag, name: &str, arg: Arg) -> Result<()> {
        let name: ParamName = name.parse()?;
        let value = ParamValue::from_arg(name, arg)?;
        self.set_default(tag, value)
    }
}

fn global() -> &'static RwLock<Registry> {
    static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Registry::with_builtins()))
}

/// Independent snapshot of the process-wide registry
pub fn clone_registry() -> Registry {
    // Mutations are single map operations, so a poisoned lock still holds a
    // consistent registry.
    match global().read() {
        Ok(registry) => registry.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Register a converter pair on the process-wide registry.
///
/// Buffers built before this call are not affected.
pub fn global_register<D, E>(tag: TypeTag, decoder: D, encoder: E) -> Result<()>
where
    D: Decode + 'static,
    E: Encode + 'static,
{
    global()
        .write()
        .map_err(|_| NetError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK))?
        .register(tag, decoder, encoder)
}

/// Remove a converter pair from the process-wide registry
pub fn global_unregister(tag: &TypeTag) -> Result<()> {
    global()
        .write()
        .map_err(|_| NetError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK))?
        .unregister(tag)
}

/// Whether the process-wide registry currently knows `tag`
pub fn global_contains(tag: &TypeTag) -> Result<bool> {
    Ok(global()
        .read()
        .map_err(|_| NetError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?
        .contains(tag))
}
