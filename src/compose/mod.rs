//! Composition engine
//!
//! [`compose`] merges any number of traits into one. For every name in the
//! union of the inputs' name sets, the contributions are reduced pairwise
//! with one merge rule:
//!
//! - equivalent contributions collapse to one of them,
//! - a `Required` placeholder yields to any concrete definition,
//! - anything else becomes a sticky `Conflict`.
//!
//! The rule makes composition commutative and associative up to trait
//! equivalence, and diamond imports of the same unmodified property never
//! manufacture a conflict. Composition itself never fails; all error
//! signaling is deferred to property access on a created object.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::descriptor::Descriptor;
use crate::traits::Trait;

/// Merge traits into one, reconciling duplicate names with the merge rule.
pub fn compose<'a, I>(traits: I) -> Trait
where
    I: IntoIterator<Item = &'a Trait>,
{
    let traits: SmallVec<[&Trait; 4]> = traits.into_iter().collect();
    debug!("composing {} traits", traits.len());

    let mut slots: IndexMap<&str, SmallVec<[&Descriptor; 4]>> = IndexMap::new();
    for t in &traits {
        for (name, descriptor) in t.iter() {
            slots.entry(name).or_default().push(descriptor);
        }
    }

    Trait::from_descriptors(slots.into_iter().map(|(name, contributions)| {
        let merged = reduce(name, &contributions);
        (name.to_owned(), merged)
    }))
}

/// Overlay `over` on `base`, with `over` authoritative: its descriptors
/// satisfy matching `Required` slots and replace matching concrete slots
/// outright. This is the create-time extra-properties layer, the one merge
/// in the engine where priority is intended instead of symmetry.
pub(crate) fn overlay(base: &Trait, over: &Trait) -> Trait {
    let mut out: IndexMap<String, Descriptor> = base
        .iter()
        .map(|(name, d)| (name.to_owned(), d.clone()))
        .collect();
    for (name, descriptor) in over.iter() {
        out.insert(name.to_owned(), descriptor.clone());
    }
    Trait::from_descriptors(out)
}

/// Reduce all contributions for one name. At least one contribution.
pub(crate) fn reduce(name: &str, contributions: &[&Descriptor]) -> Descriptor {
    let mut merged = contributions[0].clone();
    for next in &contributions[1..] {
        merged = merge(name, &merged, next);
    }
    merged
}

/// The pairwise merge rule.
pub(crate) fn merge(name: &str, left: &Descriptor, right: &Descriptor) -> Descriptor {
    if left.equivalent(right) {
        left.clone()
    } else if left.is_required() {
        right.clone()
    } else if right.is_required() {
        // A conflict stays a conflict here: it is not required, so it is
        // kept as the merged result.
        left.clone()
    } else {
        trace!("non-equivalent definitions for '{}', deferring as conflict", name);
        Descriptor::conflict(name)
    }
}
