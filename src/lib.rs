//! traitforge: a trait composition engine
//!
//! Build objects out of independently authored sets of named properties.
//! Traits are immutable maps from property name to descriptor; composition
//! is commutative and associative, disagreements are deferred as explicit
//! `Conflict` slots instead of silently picking a winner, and declared but
//! undefined names stay visible as `Required` slots until a later
//! composition supplies them.
//!
//! # Example
//!
//! ```
//! use traitforge::{compose, Record, ResolveMap, Trait, Value};
//!
//! let comparable = Trait::from_record(
//!     Record::new()
//!         .required("compare")
//!         .method("less_than", |this, args| {
//!             let ord = this.call("compare", args)?.as_int().unwrap_or(0);
//!             Ok(Value::Bool(ord < 0))
//!         }),
//! );
//!
//! let magnitude = Trait::from_record(
//!     Record::new().value("size", 3).method("compare", |this, args| {
//!         let own = this.get("size")?.as_int().unwrap_or(0);
//!         let other = args[0].as_int().unwrap_or(0);
//!         Ok(Value::Int(own - other))
//!     }),
//! );
//!
//! let combined = compose([&comparable, &magnitude]);
//! assert!(combined.is_complete());
//!
//! let obj = combined.create();
//! assert_eq!(obj.call("less_than", &[Value::Int(5)]), Ok(Value::Bool(true)));
//!
//! // Conflicts are deferred, not resolved arbitrarily
//! let other = Trait::from_record(Record::new().value("size", 9));
//! let clash = compose([&combined, &other]);
//! assert_eq!(clash.conflict_names(), vec!["size"]);
//! let repaired = other.resolve(&ResolveMap::new().renaming("size", "other_size"));
//! assert!(compose([&combined, &repaired]).is_complete());
//! ```

#![doc(html_root_url = "https://docs.rs/traitforge")]
#![warn(rust_2018_idioms)]

pub mod compose;
pub mod descriptor;
pub mod error;
pub mod object;
pub mod resolve;
pub mod traits;
pub mod value;

pub use crate::compose::compose;
pub use crate::descriptor::Descriptor;
pub use crate::error::{TraitError, TraitResult};
pub use crate::object::{root_prototype, Instance, SlotKind};
pub use crate::resolve::{resolve, Binding, ResolveMap};
pub use crate::traits::{Member, Record, Trait};
pub use crate::value::{Getter, NativeFn, Setter, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
