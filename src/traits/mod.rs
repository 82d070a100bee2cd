//! Trait type and factory
//!
//! A `Trait` is an immutable mapping from property name to [`Descriptor`].
//! Traits are built from a [`Record`] by the factory, or derived from other
//! traits via [`compose`](crate::compose::compose) and
//! [`Trait::resolve`]. No operation ever mutates an input trait.
//!
//! Insertion order is preserved for deterministic iteration but is
//! irrelevant to [`Trait::equivalent`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::Descriptor;
use crate::error::{TraitError, TraitResult};
use crate::object::{self, Instance};
use crate::resolve::{self, ResolveMap};
use crate::value::{Getter, NativeFn, Setter, Value};

/// An immutable set of named property definitions.
#[derive(Clone, Debug, Default)]
pub struct Trait {
    properties: IndexMap<String, Descriptor>,
}

impl Trait {
    /// The empty trait.
    pub fn new() -> Self {
        Trait::default()
    }

    /// The factory: convert a plain record into a trait.
    ///
    /// Plain values become `Data` descriptors, callable values become
    /// `Method` descriptors, accessor members become `Accessor` descriptors,
    /// and [`Member::Required`] becomes a `Required` placeholder. Every
    /// descriptor gets default attributes. A single record holds one member
    /// per name, so no conflict can arise here.
    pub fn from_record(record: Record) -> Self {
        let properties = record
            .members
            .into_iter()
            .map(|(name, member)| {
                let descriptor = match member {
                    Member::Required => Descriptor::required(&name),
                    Member::Value(value @ Value::Fn(_)) => Descriptor::method(value),
                    Member::Value(value) => Descriptor::data(value),
                    Member::Method(f) => Descriptor::method(Value::Fn(f)),
                    Member::Accessor { get, set } => Descriptor::accessor(get, set),
                };
                (name, descriptor)
            })
            .collect();
        Trait { properties }
    }

    /// Build a trait directly from name/descriptor pairs. Later entries for
    /// the same name replace earlier ones.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = (String, Descriptor)>,
    {
        Trait {
            properties: descriptors.into_iter().collect(),
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.properties.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Order-insensitive trait equivalence: same name set, and for each
    /// name an [equivalent](Descriptor::equivalent) descriptor.
    pub fn equivalent(&self, other: &Trait) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, d)| other.descriptor(name).is_some_and(|o| d.equivalent(o)))
    }

    /// Names still declared but not defined.
    pub fn required_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, d)| d.is_required())
            .map(|(name, _)| name)
            .collect()
    }

    /// Names with unresolved definition conflicts.
    pub fn conflict_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, d)| d.is_conflict())
            .map(|(name, _)| name)
            .collect()
    }

    /// Whether every name is concretely defined.
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, d)| d.is_concrete())
    }

    /// Eager completeness check: the first unresolved name, as an error.
    ///
    /// Instantiation itself never performs this check; unresolved slots
    /// fail lazily on access. This is the opt-in eager variant.
    pub fn validate(&self) -> TraitResult<()> {
        for (name, descriptor) in self.iter() {
            if descriptor.is_required() {
                return Err(TraitError::MissingRequired(name.to_owned()));
            }
            if descriptor.is_conflict() {
                return Err(TraitError::UnresolvedConflict(name.to_owned()));
            }
        }
        Ok(())
    }

    /// Rename and exclude names, producing a new trait. See
    /// [`resolve::resolve`] for the slot semantics.
    pub fn resolve(&self, map: &ResolveMap) -> Trait {
        resolve::resolve(self, map)
    }

    /// Instantiate with the shared root prototype and no extra properties.
    pub fn create(&self) -> Instance {
        object::create(self, None, None)
    }

    /// Instantiate with an explicit prototype (`None` means the shared root
    /// prototype) and optional extra properties. Extra properties are an
    /// authoritative final layer: they satisfy matching `Required` slots and
    /// override matching concrete slots without registering a conflict.
    pub fn create_with(&self, prototype: Option<Arc<Instance>>, extra: Option<Record>) -> Instance {
        object::create(self, prototype, extra)
    }
}

/// One entry of a plain record, before conversion to a descriptor.
///
/// `Required` is an explicit tagged variant, not a well-known sentinel value
/// compared by identity, so it survives crossing module boundaries.
#[derive(Clone)]
pub enum Member {
    /// A plain value; callable values become methods
    Value(Value),
    /// A method body
    Method(NativeFn),
    /// A getter/setter pair, either side optional
    Accessor {
        get: Option<Getter>,
        set: Option<Setter>,
    },
    /// Declared but left for a later composition to supply
    Required,
}

/// A plain, ordered record of members: the factory's input.
#[derive(Clone, Default)]
pub struct Record {
    members: IndexMap<String, Member>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Add a plain value member.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Value(value.into()));
        self
    }

    /// Add a method member.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> TraitResult<Value> + Send + Sync + 'static,
    {
        self.members.insert(name.into(), Member::Method(Arc::new(f)));
        self
    }

    /// Add a getter. Merges with a previously added setter for the name.
    pub fn getter<G>(mut self, name: impl Into<String>, get: G) -> Self
    where
        G: Fn(&Instance) -> TraitResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let set = match self.members.shift_remove(&name) {
            Some(Member::Accessor { set, .. }) => set,
            _ => None,
        };
        self.members.insert(
            name,
            Member::Accessor {
                get: Some(Arc::new(get)),
                set,
            },
        );
        self
    }

    /// Add a setter. Merges with a previously added getter for the name.
    pub fn setter<S>(mut self, name: impl Into<String>, set: S) -> Self
    where
        S: Fn(&Instance, Value) -> TraitResult<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let get = match self.members.shift_remove(&name) {
            Some(Member::Accessor { get, .. }) => get,
            _ => None,
        };
        self.members.insert(
            name,
            Member::Accessor {
                get,
                set: Some(Arc::new(set)),
            },
        );
        self
    }

    /// Add a full accessor pair.
    pub fn accessor(
        mut self,
        name: impl Into<String>,
        get: Option<Getter>,
        set: Option<Setter>,
    ) -> Self {
        self.members
            .insert(name.into(), Member::Accessor { get, set });
        self
    }

    /// Mark a name as required.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.members.insert(name.into(), Member::Required);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
