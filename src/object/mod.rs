//! Instantiator and host object primitive
//!
//! [`create`] turns a resolved trait into a concrete [`Instance`]. Slots are
//! capability-polymorphic: data and accessor slots implement real reads and
//! writes, while `Required` and `Conflict` slots implement both operations
//! by failing with the corresponding error. Creation itself never fails for
//! an unresolved trait; the failure surfaces on the first access of the
//! specific unresolved property.
//!
//! Property lookup walks the prototype chain with the original receiver, so
//! accessors and methods found on a prototype still observe the instance
//! they were reached through.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::compose;
use crate::descriptor::Descriptor;
use crate::error::{TraitError, TraitResult};
use crate::traits::{Record, Trait};
use crate::value::{Getter, Setter, Value};

/// One property implementation on a created object.
trait PropertySlot: Send + Sync {
    fn get(&self, receiver: &Instance) -> TraitResult<Value>;
    fn set(&self, receiver: &Instance, value: Value) -> TraitResult<()>;
}

/// What kind of slot sits behind a name; drives write routing and
/// introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Data,
    Accessor,
    Required,
    Conflict,
}

struct DataSlot {
    name: String,
    value: RwLock<Value>,
    writable: bool,
}

impl PropertySlot for DataSlot {
    fn get(&self, _receiver: &Instance) -> TraitResult<Value> {
        Ok(self.value.read().clone())
    }

    fn set(&self, _receiver: &Instance, value: Value) -> TraitResult<()> {
        if !self.writable {
            return Err(TraitError::NotWritable(self.name.clone()));
        }
        *self.value.write() = value;
        Ok(())
    }
}

struct AccessorSlot {
    name: String,
    get: Option<Getter>,
    set: Option<Setter>,
}

impl PropertySlot for AccessorSlot {
    fn get(&self, receiver: &Instance) -> TraitResult<Value> {
        match &self.get {
            Some(get) => get(receiver),
            None => Ok(Value::Unit),
        }
    }

    fn set(&self, receiver: &Instance, value: Value) -> TraitResult<()> {
        match &self.set {
            Some(set) => set(receiver, value),
            None => Err(TraitError::NotWritable(self.name.clone())),
        }
    }
}

struct RequiredSlot {
    name: String,
}

impl PropertySlot for RequiredSlot {
    fn get(&self, _receiver: &Instance) -> TraitResult<Value> {
        Err(TraitError::MissingRequired(self.name.clone()))
    }

    fn set(&self, _receiver: &Instance, _value: Value) -> TraitResult<()> {
        Err(TraitError::MissingRequired(self.name.clone()))
    }
}

struct ConflictSlot {
    name: String,
}

impl PropertySlot for ConflictSlot {
    fn get(&self, _receiver: &Instance) -> TraitResult<Value> {
        Err(TraitError::UnresolvedConflict(self.name.clone()))
    }

    fn set(&self, _receiver: &Instance, _value: Value) -> TraitResult<()> {
        Err(TraitError::UnresolvedConflict(self.name.clone()))
    }
}

struct PropertyEntry {
    kind: SlotKind,
    slot: Box<dyn PropertySlot>,
    enumerable: bool,
    configurable: bool,
}

/// A created object: an ordered slot table plus an optional prototype.
///
/// Instances are only ever produced by [`Trait::create`] and
/// [`Trait::create_with`]; the trait value they were created from is left
/// untouched.
pub struct Instance {
    slots: IndexMap<String, PropertyEntry>,
    prototype: Option<Arc<Instance>>,
}

impl Instance {
    /// Read a property, walking the prototype chain.
    pub fn get(&self, name: &str) -> TraitResult<Value> {
        self.lookup(name, self)
    }

    fn lookup(&self, name: &str, receiver: &Instance) -> TraitResult<Value> {
        if let Some(entry) = self.slots.get(name) {
            entry.slot.get(receiver)
        } else if let Some(proto) = &self.prototype {
            proto.lookup(name, receiver)
        } else {
            Err(TraitError::NoSuchProperty(name.to_owned()))
        }
    }

    /// Write a property. Own data slots are written in place; accessor
    /// slots anywhere on the chain run their setter with the original
    /// receiver; a data slot found on a prototype is not writable through
    /// the instance.
    pub fn set(&self, name: &str, value: Value) -> TraitResult<()> {
        self.store(name, self, value)
    }

    fn store(&self, name: &str, receiver: &Instance, value: Value) -> TraitResult<()> {
        if let Some(entry) = self.slots.get(name) {
            match entry.kind {
                SlotKind::Data if !std::ptr::eq(self, receiver) => {
                    Err(TraitError::NotWritable(name.to_owned()))
                }
                _ => entry.slot.set(receiver, value),
            }
        } else if let Some(proto) = &self.prototype {
            proto.store(name, receiver, value)
        } else {
            Err(TraitError::NoSuchProperty(name.to_owned()))
        }
    }

    /// Invoke a callable property with this instance as the receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> TraitResult<Value> {
        match self.get(name)? {
            Value::Fn(f) => f(self, args),
            _ => Err(TraitError::NotCallable(name.to_owned())),
        }
    }

    /// Whether the name exists on this instance or its prototype chain.
    /// Unresolved Required/Conflict slots count as present.
    pub fn has(&self, name: &str) -> bool {
        self.has_own(name)
            || self
                .prototype
                .as_ref()
                .is_some_and(|proto| proto.has(name))
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Enumerable own property names, in definition order.
    pub fn keys(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, entry)| entry.enumerable)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// All own property names, including non-enumerable placeholders.
    pub fn own_names(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }

    /// The kind of slot behind an own property name.
    pub fn slot_kind(&self, name: &str) -> Option<SlotKind> {
        self.slots.get(name).map(|entry| entry.kind)
    }

    pub fn is_enumerable(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|entry| entry.enumerable)
    }

    pub fn is_configurable(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|entry| entry.configurable)
    }

    pub fn prototype(&self) -> Option<&Arc<Instance>> {
        self.prototype.as_ref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("slots", &self.own_names())
            .field("has_prototype", &self.prototype.is_some())
            .finish()
    }
}

/// The shared root prototype. Carries a default `to_string` method that
/// formats an instance from its enumerable keys.
static ROOT: Lazy<Arc<Instance>> = Lazy::new(|| {
    let root_trait = Trait::from_record(Record::new().method(
        "to_string",
        |this: &Instance, _args: &[Value]| {
            Ok(Value::from(format!("<object {{{}}}>", this.keys().join(", "))))
        },
    ));
    Arc::new(build(&root_trait, None))
});

/// The root prototype every instance inherits from unless an explicit
/// prototype is given.
pub fn root_prototype() -> Arc<Instance> {
    ROOT.clone()
}

/// Instantiate `definition`, overlaying `extra` as the authoritative final
/// layer first. Never fails: unresolved slots are installed as failing
/// accessors and surface their error on first access.
pub(crate) fn create(
    definition: &Trait,
    prototype: Option<Arc<Instance>>,
    extra: Option<Record>,
) -> Instance {
    let overlaid;
    let final_trait = match extra {
        Some(record) => {
            overlaid = compose::overlay(definition, &Trait::from_record(record));
            &overlaid
        }
        None => definition,
    };
    debug!("creating instance with {} properties", final_trait.len());
    build(final_trait, Some(prototype.unwrap_or_else(root_prototype)))
}

fn build(definition: &Trait, prototype: Option<Arc<Instance>>) -> Instance {
    let slots = definition
        .iter()
        .map(|(name, descriptor)| (name.to_owned(), define(name, descriptor)))
        .collect();
    Instance { slots, prototype }
}

/// The host property-definition primitive: turn one descriptor into an
/// installed slot. Placeholders become present-but-non-enumerable failing
/// accessors keyed by the slot name.
fn define(name: &str, descriptor: &Descriptor) -> PropertyEntry {
    match descriptor {
        Descriptor::Data {
            value,
            enumerable,
            configurable,
            writable,
        }
        | Descriptor::Method {
            value,
            enumerable,
            configurable,
            writable,
        } => PropertyEntry {
            kind: SlotKind::Data,
            slot: Box::new(DataSlot {
                name: name.to_owned(),
                value: RwLock::new(value.clone()),
                writable: *writable,
            }),
            enumerable: *enumerable,
            configurable: *configurable,
        },
        Descriptor::Accessor {
            get,
            set,
            enumerable,
            configurable,
        } => PropertyEntry {
            kind: SlotKind::Accessor,
            slot: Box::new(AccessorSlot {
                name: name.to_owned(),
                get: get.clone(),
                set: set.clone(),
            }),
            enumerable: *enumerable,
            configurable: *configurable,
        },
        Descriptor::Required { .. } => PropertyEntry {
            kind: SlotKind::Required,
            slot: Box::new(RequiredSlot {
                name: name.to_owned(),
            }),
            enumerable: false,
            configurable: true,
        },
        Descriptor::Conflict { .. } => PropertyEntry {
            kind: SlotKind::Conflict,
            slot: Box::new(ConflictSlot {
                name: name.to_owned(),
            }),
            enumerable: false,
            configurable: true,
        },
    }
}
