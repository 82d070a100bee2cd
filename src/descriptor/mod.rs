//! Descriptor model
//!
//! A `Descriptor` is the definition of one named property: a concrete value,
//! a method, an accessor pair, or one of the two placeholder kinds that the
//! composition algebra defers errors through (`Required`, `Conflict`).
//!
//! Attributes default to `true` when unspecified. The `equivalent` relation
//! defined here is the foundation of the merge rule: any two `Required`
//! descriptors are interchangeable, any two `Conflict` descriptors are
//! interchangeable, and concrete descriptors match on value or accessor
//! identity plus their boolean attributes. `Data` and `Method` differ only
//! by intent and compare as the same concrete shape.

use std::fmt;
use std::sync::Arc;

use crate::value::{Getter, Setter, Value};

/// The definition of one named property.
#[derive(Clone)]
pub enum Descriptor {
    /// A concrete value slot
    Data {
        value: Value,
        enumerable: bool,
        configurable: bool,
        writable: bool,
    },
    /// A concrete value slot whose value is callable; identical to `Data`
    /// in every rule, distinguished only by intent
    Method {
        value: Value,
        enumerable: bool,
        configurable: bool,
        writable: bool,
    },
    /// A getter/setter pair
    Accessor {
        get: Option<Getter>,
        set: Option<Setter>,
        enumerable: bool,
        configurable: bool,
    },
    /// Declared but not yet defined; must be satisfied by a later
    /// composition or the created object fails on access
    Required { name: String },
    /// Defined incompatibly by two or more composed sources; sticky under
    /// further composition until renamed away
    Conflict { name: String },
}

impl Descriptor {
    /// A data descriptor with default attributes.
    pub fn data(value: impl Into<Value>) -> Self {
        Descriptor::Data {
            value: value.into(),
            enumerable: true,
            configurable: true,
            writable: true,
        }
    }

    /// A method descriptor with default attributes.
    pub fn method(value: impl Into<Value>) -> Self {
        Descriptor::Method {
            value: value.into(),
            enumerable: true,
            configurable: true,
            writable: true,
        }
    }

    /// An accessor descriptor with default attributes.
    pub fn accessor(get: Option<Getter>, set: Option<Setter>) -> Self {
        Descriptor::Accessor {
            get,
            set,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Descriptor::Required { name: name.into() }
    }

    pub fn conflict(name: impl Into<String>) -> Self {
        Descriptor::Conflict { name: name.into() }
    }

    /// Clear the `enumerable` attribute. No effect on placeholders.
    pub fn non_enumerable(mut self) -> Self {
        if let Descriptor::Data { enumerable, .. }
        | Descriptor::Method { enumerable, .. }
        | Descriptor::Accessor { enumerable, .. } = &mut self
        {
            *enumerable = false;
        }
        self
    }

    /// Clear the `configurable` attribute. No effect on placeholders.
    pub fn non_configurable(mut self) -> Self {
        if let Descriptor::Data { configurable, .. }
        | Descriptor::Method { configurable, .. }
        | Descriptor::Accessor { configurable, .. } = &mut self
        {
            *configurable = false;
        }
        self
    }

    /// Clear the `writable` attribute. No effect on accessors and
    /// placeholders, which carry no such attribute.
    pub fn read_only(mut self) -> Self {
        if let Descriptor::Data { writable, .. } | Descriptor::Method { writable, .. } = &mut self {
            *writable = false;
        }
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Descriptor::Required { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Descriptor::Conflict { .. })
    }

    /// A concrete descriptor actually defines the property: data, method,
    /// or accessor, as opposed to the two placeholder kinds.
    pub fn is_concrete(&self) -> bool {
        !self.is_required() && !self.is_conflict()
    }

    /// Whether the property shows up in key enumeration. Placeholders are
    /// present but never enumerable.
    pub fn enumerable(&self) -> bool {
        match self {
            Descriptor::Data { enumerable, .. }
            | Descriptor::Method { enumerable, .. }
            | Descriptor::Accessor { enumerable, .. } => *enumerable,
            Descriptor::Required { .. } | Descriptor::Conflict { .. } => false,
        }
    }

    pub fn configurable(&self) -> bool {
        match self {
            Descriptor::Data { configurable, .. }
            | Descriptor::Method { configurable, .. }
            | Descriptor::Accessor { configurable, .. } => *configurable,
            Descriptor::Required { .. } | Descriptor::Conflict { .. } => true,
        }
    }

    /// Descriptor equivalence, the relation the merge rule collapses on.
    ///
    /// Required descriptors are mutually equivalent regardless of the name
    /// they carry, and likewise Conflict descriptors. Concrete descriptors
    /// match on value equality (identity for functions and objects) or
    /// accessor identity, plus all boolean attributes.
    pub fn equivalent(&self, other: &Descriptor) -> bool {
        use Descriptor::*;
        match (self, other) {
            (Required { .. }, Required { .. }) => true,
            (Conflict { .. }, Conflict { .. }) => true,
            (
                Data {
                    value: a,
                    enumerable: ae,
                    configurable: ac,
                    writable: aw,
                }
                | Method {
                    value: a,
                    enumerable: ae,
                    configurable: ac,
                    writable: aw,
                },
                Data {
                    value: b,
                    enumerable: be,
                    configurable: bc,
                    writable: bw,
                }
                | Method {
                    value: b,
                    enumerable: be,
                    configurable: bc,
                    writable: bw,
                },
            ) => a == b && ae == be && ac == bc && aw == bw,
            (
                Accessor {
                    get: ag,
                    set: as_,
                    enumerable: ae,
                    configurable: ac,
                },
                Accessor {
                    get: bg,
                    set: bs,
                    enumerable: be,
                    configurable: bc,
                },
            ) => same_getter(ag, bg) && same_setter(as_, bs) && ae == be && ac == bc,
            _ => false,
        }
    }
}

fn same_getter(a: &Option<Getter>, b: &Option<Getter>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn same_setter(a: &Option<Setter>, b: &Option<Setter>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Data {
                value,
                enumerable,
                configurable,
                writable,
            } => f
                .debug_struct("Data")
                .field("value", value)
                .field("enumerable", enumerable)
                .field("configurable", configurable)
                .field("writable", writable)
                .finish(),
            Descriptor::Method {
                value,
                enumerable,
                configurable,
                writable,
            } => f
                .debug_struct("Method")
                .field("value", value)
                .field("enumerable", enumerable)
                .field("configurable", configurable)
                .field("writable", writable)
                .finish(),
            Descriptor::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("set", &set.is_some())
                .field("enumerable", enumerable)
                .field("configurable", configurable)
                .finish(),
            Descriptor::Required { name } => write!(f, "Required({name})"),
            Descriptor::Conflict { name } => write!(f, "Conflict({name})"),
        }
    }
}
