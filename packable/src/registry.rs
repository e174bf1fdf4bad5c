//! Type lineage and packer table.
//!
//! Every type except the root has exactly one declared parent, so the lineage
//! of a type is a finite list walked from most to least specific. Packers
//! registered on a type are visible to all of its descendants unless a more
//! specific type shadows them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::packer::DEFAULT_NAME;
use crate::{PackError, Packer, ReadStrategy, Result, TypeName, WriteStrategy};

#[derive(Default)]
struct TypeEntry {
    parent: Option<TypeName>,
    default: Option<Arc<Packer>>,
    named: HashMap<String, Arc<Packer>>,
}

struct Inner {
    types: HashMap<TypeName, TypeEntry>,
}

impl Inner {
    fn entry(&self, name: &TypeName) -> Result<&TypeEntry> {
        self.types
            .get(name)
            .ok_or_else(|| PackError::UnknownType(name.clone()))
    }

    /// `name` followed by its ancestors up to the root.
    fn lineage(&self, name: &TypeName) -> Result<Vec<TypeName>> {
        let mut chain = vec![name.clone()];
        let mut current = self.entry(name)?;
        while let Some(parent) = &current.parent {
            chain.push(parent.clone());
            current = self.entry(parent)?;
        }
        Ok(chain)
    }

    fn owners_of(&self, packer_name: &str) -> Vec<TypeName> {
        let mut owners: Vec<TypeName> = self
            .types
            .iter()
            .filter(|(_, entry)| entry.named.contains_key(packer_name))
            .map(|(name, _)| name.clone())
            .collect();
        owners.sort();
        owners
    }

    fn default_in(&self, chain: &[TypeName]) -> Option<Arc<Packer>> {
        chain
            .iter()
            .find_map(|t| self.types.get(t).and_then(|e| e.default.clone()))
    }
}

/// Shared, lock-guarded packer registry.
///
/// Lookups take a read lock and hand out `Arc` clones, so strategies never run
/// while the lock is held; registrations take the write lock and are therefore
/// never observed half-installed.
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// A registry holding only the root type.
    pub fn new() -> Self {
        let mut types = HashMap::new();
        types.insert(TypeName::OBJECT, TypeEntry::default());
        Registry {
            inner: RwLock::new(Inner { types }),
        }
    }

    /// Declares `name` as a subtype of `parent`.
    ///
    /// Redeclaring with the same parent is a no-op.
    ///
    /// # Errors
    ///
    /// [`PackError::UnknownType`] if `parent` was never declared,
    /// [`PackError::TypeConflict`] if `name` already has another parent.
    pub fn declare_type(&self, name: impl Into<TypeName>, parent: impl Into<TypeName>) -> Result<()> {
        let (name, parent) = (name.into(), parent.into());
        let mut inner = self.inner.write();

        if !inner.types.contains_key(&parent) {
            return Err(PackError::UnknownType(parent));
        }
        if let Some(existing) = inner.types.get(&name) {
            if existing.parent.as_ref() == Some(&parent) {
                return Ok(());
            }
            return Err(PackError::TypeConflict {
                name,
                existing: existing.parent.clone(),
                requested: parent,
            });
        }

        debug!(type_name = %name, parent = %parent, "declared type");
        inner.types.insert(
            name,
            TypeEntry {
                parent: Some(parent),
                ..TypeEntry::default()
            },
        );
        Ok(())
    }

    pub fn is_declared(&self, name: &TypeName) -> bool {
        self.inner.read().types.contains_key(name)
    }

    /// `name` and its ancestors, most specific first.
    pub fn lineage(&self, name: &TypeName) -> Result<Vec<TypeName>> {
        self.inner.read().lineage(name)
    }

    /// Whether `ancestor` is `name` or one of its ancestors.
    pub fn is_a(&self, name: &TypeName, ancestor: &TypeName) -> Result<bool> {
        Ok(self.lineage(name)?.contains(ancestor))
    }

    /// Installs a packer. An unnamed packer replaces the owner's default.
    pub fn register(&self, packer: Packer) -> Result<Arc<Packer>> {
        let packer = Arc::new(packer);
        let mut inner = self.inner.write();
        let entry = inner
            .types
            .get_mut(packer.owner())
            .ok_or_else(|| PackError::UnknownType(packer.owner().clone()))?;

        let replaced = match packer.name() {
            None => entry.default.replace(Arc::clone(&packer)),
            Some(name) => entry.named.insert(name.to_owned(), Arc::clone(&packer)),
        };
        if replaced.is_some() {
            debug!(owner = %packer.owner(), packer = packer.label(), "replaced packer");
        } else {
            debug!(owner = %packer.owner(), packer = packer.label(), "registered packer");
        }
        Ok(packer)
    }

    /// Finds the packer for `(type_name, name)`.
    ///
    /// A named lookup walks the lineage from `type_name` upwards. If no type
    /// in the lineage has the name but some unrelated type does, the lookup
    /// fails with [`PackError::ScopeViolation`]. Otherwise (and for unnamed
    /// lookups) the nearest default packer in the lineage is returned.
    pub fn resolve(&self, type_name: &TypeName, name: Option<&str>) -> Result<Arc<Packer>> {
        self.resolve_within(type_name, type_name, name)
    }

    /// Like [`Registry::resolve`], but when neither the name nor a default is
    /// found in the lineage of `lookup`, falls back to the nearest default in
    /// the lineage of `fallback`.
    ///
    /// Packing a value under one of its ancestor types uses this, with the
    /// value's own type as `fallback`.
    pub fn resolve_within(
        &self,
        lookup: &TypeName,
        fallback: &TypeName,
        name: Option<&str>,
    ) -> Result<Arc<Packer>> {
        let inner = self.inner.read();
        let chain = inner.lineage(lookup)?;
        let name = name.filter(|n| *n != DEFAULT_NAME);

        if let Some(name) = name {
            for t in &chain {
                if let Some(p) = inner.types.get(t).and_then(|e| e.named.get(name)) {
                    return Ok(Arc::clone(p));
                }
            }
            let owners = inner.owners_of(name);
            if !owners.is_empty() {
                return Err(PackError::ScopeViolation {
                    type_name: lookup.clone(),
                    name: name.to_owned(),
                    owners,
                });
            }
        }

        if let Some(p) = inner.default_in(&chain) {
            return Ok(p);
        }
        if fallback != lookup {
            if let Some(p) = inner.default_in(&inner.lineage(fallback)?) {
                return Ok(p);
            }
        }
        Err(PackError::UnknownPacker {
            type_name: lookup.clone(),
            name: name.unwrap_or(DEFAULT_NAME).to_owned(),
        })
    }

    /// The single type that owns a packer named `name`, for reads that give
    /// a packer name but no type.
    pub fn owner_of(&self, name: &str) -> Result<TypeName> {
        if name == DEFAULT_NAME {
            return Err(PackError::InvalidOption(
                "the default packer can only be requested together with a type".into(),
            ));
        }
        let mut owners = self.inner.read().owners_of(name);
        match owners.len() {
            0 => Err(PackError::UnknownPacker {
                type_name: TypeName::OBJECT,
                name: name.to_owned(),
            }),
            1 => Ok(owners.remove(0)),
            _ => Err(PackError::AmbiguousPacker {
                name: name.to_owned(),
                owners,
            }),
        }
    }

    /// The packer's write strategy, or that of the nearest default packer.
    pub fn write_strategy(&self, type_name: &TypeName, packer: &Packer) -> Result<WriteStrategy> {
        if let Some(s) = packer.write_strategy() {
            return Ok(Arc::clone(s));
        }
        let inner = self.inner.read();
        let chain = inner.lineage(type_name)?;
        chain
            .iter()
            .find_map(|t| {
                inner
                    .types
                    .get(t)
                    .and_then(|e| e.default.as_ref())
                    .and_then(|p| p.write_strategy().cloned())
            })
            .ok_or_else(|| PackError::UnknownPacker {
                type_name: type_name.clone(),
                name: format!("{} (write)", packer.label()),
            })
    }

    /// The packer's read strategy, or that of the nearest default packer.
    pub fn read_strategy(&self, type_name: &TypeName, packer: &Packer) -> Result<ReadStrategy> {
        if let Some(s) = packer.read_strategy() {
            return Ok(Arc::clone(s));
        }
        let inner = self.inner.read();
        let chain = inner.lineage(type_name)?;
        chain
            .iter()
            .find_map(|t| {
                inner
                    .types
                    .get(t)
                    .and_then(|e| e.default.as_ref())
                    .and_then(|p| p.read_strategy().cloned())
            })
            .ok_or_else(|| PackError::UnknownPacker {
                type_name: type_name.clone(),
                name: format!("{} (read)", packer.label()),
            })
    }

    /// Installs a type directly under `parent` together with its packers.
    /// Used to seed fresh registries, where nothing can conflict.
    pub(crate) fn seed(&self, type_name: TypeName, parent: TypeName, packers: Vec<Packer>) {
        let mut inner = self.inner.write();
        let entry = inner.types.entry(type_name).or_insert_with(|| TypeEntry {
            parent: Some(parent),
            ..TypeEntry::default()
        });
        for packer in packers {
            let packer = Arc::new(packer);
            match packer.name().map(str::to_owned) {
                None => entry.default = Some(packer),
                Some(name) => {
                    entry.named.insert(name, packer);
                }
            }
        }
    }

    /// Names of the packers registered directly on `type_name`, sorted.
    pub fn packer_names(&self, type_name: &TypeName) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let mut names: Vec<String> = inner.entry(type_name)?.named.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
