//! End-to-end composition pipelines: speculative composition, conflict
//! repair via renaming, and instantiation of the final trait.

use traitforge::{compose, Record, ResolveMap, Trait, TraitError, Value};

/// A trait of comparison helpers around a required `compare` method.
fn comparable() -> Trait {
    Trait::from_record(
        Record::new()
            .required("compare")
            .method("less_than", |this, args| {
                let ord = this.call("compare", args)?.as_int().unwrap_or(0);
                Ok(Value::Bool(ord < 0))
            })
            .method("equal_to", |this, args| {
                let ord = this.call("compare", args)?.as_int().unwrap_or(0);
                Ok(Value::Bool(ord == 0))
            }),
    )
}

fn interval(low: i64, high: i64) -> Trait {
    Trait::from_record(
        Record::new()
            .value("low", low)
            .value("high", high)
            .method("compare", |this, args| {
                let own = this.get("low")?.as_int().unwrap_or(0);
                let other = args[0].as_int().unwrap_or(0);
                Ok(Value::Int(own - other))
            })
            .method("length", |this, _| {
                let low = this.get("low")?.as_int().unwrap_or(0);
                let high = this.get("high")?.as_int().unwrap_or(0);
                Ok(Value::Int(high - low))
            }),
    )
}

#[test]
fn composition_satisfies_requirements_and_instantiates() {
    let combined = compose([&comparable(), &interval(2, 7)]);
    assert!(combined.is_complete());
    assert!(combined.validate().is_ok());

    let obj = combined.create();
    assert_eq!(obj.call("length", &[]), Ok(Value::Int(5)));
    assert_eq!(obj.call("less_than", &[Value::Int(10)]), Ok(Value::Bool(true)));
    assert_eq!(obj.call("equal_to", &[Value::Int(2)]), Ok(Value::Bool(true)));
}

#[test]
fn unsatisfied_requirement_fails_only_on_access() {
    let obj = comparable().create();

    // Helpers exist and the object was created without complaint
    assert!(obj.has("less_than"));
    assert!(obj.has("compare"));

    // Reading the required slot, directly or through a helper, fails
    assert_eq!(
        obj.get("compare"),
        Err(TraitError::MissingRequired("compare".to_owned()))
    );
    assert_eq!(
        obj.call("less_than", &[Value::Int(1)]),
        Err(TraitError::MissingRequired("compare".to_owned()))
    );
}

#[test]
fn conflict_repair_by_renaming() {
    let json_a = Trait::from_record(Record::new().method("encode", |_, _| Ok(Value::from("a"))));
    let json_b = Trait::from_record(Record::new().method("encode", |_, _| Ok(Value::from("b"))));

    // Speculative composition defers the disagreement
    let clash = compose([&json_a, &json_b]);
    assert_eq!(clash.conflict_names(), vec!["encode"]);

    // The conflict surfaces only when the slot is touched
    let broken = clash.create();
    assert_eq!(
        broken.get("encode"),
        Err(TraitError::UnresolvedConflict("encode".to_owned()))
    );

    // Renaming one contributor away repairs the composition
    let renamed = json_b.resolve(&ResolveMap::new().renaming("encode", "encode_b"));
    let repaired = compose([&json_a, &renamed]);
    // The vacated name left a requirement behind in `renamed`; json_a's
    // concrete `encode` satisfies it.
    assert!(repaired.is_complete());

    let fixed = repaired.create();
    assert_eq!(fixed.call("encode", &[]), Ok(Value::from("a")));
    assert_eq!(fixed.call("encode_b", &[]), Ok(Value::from("b")));
}

#[test]
fn resolve_then_compose_keeps_the_algebra_consistent() {
    let a = Trait::from_record(Record::new().value("x", 1).value("y", 2));
    let b = Trait::from_record(Record::new().value("x", 10));

    // Exclude a's x, let b supply it
    let thinned = a.resolve(&ResolveMap::new().excluding("x"));
    let merged = compose([&thinned, &b]);
    assert!(merged.is_complete());

    let obj = merged.create();
    assert_eq!(obj.get("x"), Ok(Value::Int(10)));
    assert_eq!(obj.get("y"), Ok(Value::Int(2)));
}

#[test]
fn swapped_names_compose_cleanly() {
    let t = Trait::from_record(Record::new().value("first", 1).value("second", 2));
    let swapped = t.resolve(
        &ResolveMap::new()
            .renaming("first", "second")
            .renaming("second", "first"),
    );
    assert!(swapped.is_complete());

    let obj = swapped.create();
    assert_eq!(obj.get("first"), Ok(Value::Int(2)));
    assert_eq!(obj.get("second"), Ok(Value::Int(1)));
}

#[test]
fn pipeline_runs_with_a_subscriber_installed() {
    // Captures the debug/trace output of compose, resolve, and create
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();

    let clashing = compose([
        &Trait::from_record(Record::new().value("size", 1)),
        &Trait::from_record(Record::new().value("size", 2)),
    ]);
    assert_eq!(clashing.conflict_names(), vec!["size"]);

    let repaired = clashing.resolve(&ResolveMap::new().excluding("size"));
    let merged = compose([
        &repaired,
        &Trait::from_record(Record::new().value("size", 3)),
    ]);
    assert!(merged.is_complete());

    let obj = merged.create();
    assert_eq!(obj.get("size"), Ok(Value::Int(3)));
}

#[test]
fn required_names_are_introspectable_before_any_failure() {
    let pipeline = compose([
        &comparable(),
        &Trait::from_record(Record::new().required("serialize")),
    ]);
    let mut missing = pipeline.required_names();
    missing.sort_unstable();
    assert_eq!(missing, vec!["compare", "serialize"]);
    assert!(pipeline.conflict_names().is_empty());
}
