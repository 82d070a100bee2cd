//! Resolution engine
//!
//! [`resolve`] applies a rename/exclude map to a single trait. It shares the
//! composition engine's merge rule, which is what makes swaps, overlapping
//! exclude+rename, and renaming onto an occupied name all behave uniformly:
//!
//! 1. Route every property to its target slot: pass-throughs keep their own
//!    name, renames move to the target name, exclusions contribute nothing.
//! 2. Reduce each target slot's contributions with the merge rule.
//! 3. Backfill a `Required` placeholder at every renamed or excluded source
//!    name whose slot received no other contribution, so the vacated name is
//!    still expected unless something else legitimately occupies it.
//!
//! Map entries naming a property the trait does not have are ignored.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::compose;
use crate::descriptor::Descriptor;
use crate::traits::Trait;

/// What to do with one existing property name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Move the property to a new name
    Rename(String),
    /// Drop the property, leaving a requirement behind
    Exclude,
}

/// A rename/exclude map, applied to one trait by [`resolve`].
#[derive(Clone, Debug, Default)]
pub struct ResolveMap {
    bindings: IndexMap<String, Binding>,
}

impl ResolveMap {
    pub fn new() -> Self {
        ResolveMap::default()
    }

    /// Rename `from` to `to`.
    pub fn renaming(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.bindings.insert(from.into(), Binding::Rename(to.into()));
        self
    }

    /// Exclude `name`.
    pub fn excluding(mut self, name: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), Binding::Exclude);
        self
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, b)| (name.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Apply `map` to `input`, producing a new trait.
pub fn resolve(input: &Trait, map: &ResolveMap) -> Trait {
    debug!(
        "resolving trait of {} properties with {} bindings",
        input.len(),
        map.len()
    );

    let mut slots: IndexMap<String, SmallVec<[&Descriptor; 2]>> = IndexMap::new();
    for (name, descriptor) in input.iter() {
        match map.binding(name) {
            None => slots.entry(name.to_owned()).or_default().push(descriptor),
            Some(Binding::Exclude) => {}
            Some(Binding::Rename(target)) => {
                slots.entry(target.clone()).or_default().push(descriptor)
            }
        }
    }

    let mut out: IndexMap<String, Descriptor> = slots
        .into_iter()
        .map(|(name, contributions)| {
            let merged = compose::reduce(&name, &contributions);
            (name, merged)
        })
        .collect();

    // A renamed or excluded name stays expected unless another property now
    // occupies its slot.
    for (name, _) in input.iter() {
        if map.binding(name).is_some() && !out.contains_key(name) {
            out.insert(name.to_owned(), Descriptor::required(name));
        }
    }

    Trait::from_descriptors(out)
}
