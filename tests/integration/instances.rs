//! Created-object behavior: prototype chains, extra properties, and the
//! lazy failure model across a whole object graph.

use std::sync::Arc;

use traitforge::{root_prototype, Record, Trait, TraitError, Value};

#[test]
fn prototype_chain_spanning_three_levels() {
    let grandparent = Arc::new(
        Trait::from_record(Record::new().value("kind", "shape")).create(),
    );
    let parent = Arc::new(
        Trait::from_record(Record::new().method("area", |this, _| {
            let w = this.get("width")?.as_int().unwrap_or(0);
            let h = this.get("height")?.as_int().unwrap_or(0);
            Ok(Value::Int(w * h))
        }))
        .create_with(Some(grandparent), None),
    );
    let rect = Trait::from_record(Record::new().value("width", 4).value("height", 3))
        .create_with(Some(parent), None);

    // Inherited data, inherited method over own data, two levels up
    assert_eq!(rect.get("kind"), Ok(Value::from("shape")));
    assert_eq!(rect.call("area", &[]), Ok(Value::Int(12)));
    assert!(rect.has("kind"));
    assert!(!rect.has_own("kind"));
}

#[test]
fn default_prototype_is_the_shared_root() {
    let a = Trait::new().create();
    let b = Trait::new().create();
    assert!(Arc::ptr_eq(a.prototype().unwrap(), b.prototype().unwrap()));
    assert!(Arc::ptr_eq(a.prototype().unwrap(), &root_prototype()));

    // The root prototype itself terminates the chain
    assert!(root_prototype().prototype().is_none());
}

#[test]
fn explicit_prototype_replaces_the_root() {
    let proto = Arc::new(Trait::from_record(Record::new().value("tag", 1)).create());
    let obj = Trait::new().create_with(Some(proto.clone()), None);
    assert!(Arc::ptr_eq(obj.prototype().unwrap(), &proto));

    // The custom prototype was itself created over the root, so root
    // members stay reachable through the chain
    assert!(obj.has("to_string"));
}

#[test]
fn extra_properties_are_an_override_layer_not_a_peer() {
    let definition = Trait::from_record(
        Record::new()
            .required("id")
            .value("label", "anonymous"),
    );

    let obj = definition.create_with(
        None,
        Some(Record::new().value("id", 7).value("label", "named")),
    );

    // Required satisfied, concrete overridden, no conflicts anywhere
    assert_eq!(obj.get("id"), Ok(Value::Int(7)));
    assert_eq!(obj.get("label"), Ok(Value::from("named")));
}

#[test]
fn object_values_flow_through_methods() {
    let point = |x: i64| {
        Arc::new(
            Trait::from_record(Record::new().value("x", x)).create(),
        )
    };

    let t = Trait::from_record(Record::new().value("x", 5).method(
        "closer_to_origin_than",
        |this, args| {
            let own = this.get("x")?.as_int().unwrap_or(0);
            let other = match &args[0] {
                Value::Object(o) => o.get("x")?.as_int().unwrap_or(0),
                _ => 0,
            };
            Ok(Value::Bool(own.abs() < other.abs()))
        },
    ));

    let obj = t.create();
    assert_eq!(
        obj.call("closer_to_origin_than", &[Value::Object(point(9))]),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        obj.call("closer_to_origin_than", &[Value::Object(point(2))]),
        Ok(Value::Bool(false))
    );
}

#[test]
fn unresolved_slots_fail_with_their_own_name_only() {
    let t = Trait::from_record(
        Record::new()
            .required("missing_one")
            .required("missing_two")
            .value("fine", 0),
    );
    let obj = t.create();

    assert_eq!(obj.get("fine"), Ok(Value::Int(0)));
    assert_eq!(
        obj.get("missing_one"),
        Err(TraitError::MissingRequired("missing_one".to_owned()))
    );
    assert_eq!(
        obj.get("missing_two"),
        Err(TraitError::MissingRequired("missing_two".to_owned()))
    );
}

#[test]
fn error_messages_name_the_property() {
    assert_eq!(
        TraitError::MissingRequired("compare".to_owned()).to_string(),
        "Missing required property: compare"
    );
    assert_eq!(
        TraitError::UnresolvedConflict("encode".to_owned()).to_string(),
        "Remaining conflicting property: encode"
    );
}
