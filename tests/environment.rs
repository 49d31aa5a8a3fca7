use finlite::{
    error::ScopeError,
    interpreter::{environment::Environment, value::core::Value},
};

fn num(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}

#[test]
fn children_see_enclosing_bindings() {
    let globals = Environment::new();
    globals.define("rate", num(0.05));
    let inner = globals.create_child().create_child();

    assert_eq!(inner.depth(), 2);
    assert_eq!(inner.get("rate").unwrap(), num(0.05));
}

#[test]
fn define_shadows_without_touching_the_parent() {
    let globals = Environment::new();
    globals.define("x", num(1.0));
    let inner = globals.create_child();
    inner.define("x", num(2.0));
    inner.define("x", num(3.0));

    assert_eq!(inner.get("x").unwrap(), num(3.0));
    assert_eq!(globals.get("x").unwrap(), num(1.0));
}

#[test]
fn assign_updates_the_nearest_definition() {
    let globals = Environment::new();
    globals.define("total", num(0.0));
    let middle = globals.create_child();
    let inner = middle.create_child();

    inner.assign("total", num(10.0)).unwrap();
    assert_eq!(globals.get("total").unwrap(), num(10.0));

    middle.define("total", num(1.0));
    inner.assign("total", num(20.0)).unwrap();
    assert_eq!(middle.get("total").unwrap(), num(20.0));
    assert_eq!(globals.get("total").unwrap(), num(10.0));
}

#[test]
fn assign_never_creates_a_binding() {
    let globals = Environment::new();
    let err = globals.create_child().assign("missing", num(1.0)).unwrap_err();

    assert_eq!(err,
               ScopeError::Undefined { name:  "missing".to_string(),
                                       depth: 1, });
    assert!(!globals.is_defined("missing"));
}

#[test]
fn null_is_a_binding() {
    let globals = Environment::new();
    globals.define("empty", None);

    assert!(globals.is_defined("empty"));
    assert_eq!(globals.get("empty").unwrap(), None);
}

#[test]
fn depth_addressed_lookups() {
    let globals = Environment::new();
    globals.define("x", num(0.0));
    let one = globals.create_child();
    one.define("x", num(1.0));
    let two = one.create_child();
    two.define("x", num(2.0));

    assert_eq!(two.get_at_depth(0, "x").unwrap(), num(0.0));
    assert_eq!(two.get_at_depth(1, "x").unwrap(), num(1.0));
    assert_eq!(two.get_at_depth(2, "x").unwrap(), num(2.0));
    assert_eq!(two.get_global("x").unwrap(), num(0.0));
    assert_eq!(two.get_parent("x").unwrap(), num(1.0));

    assert!(matches!(two.get_at_depth(3, "x"),
                     Err(ScopeError::DepthOutOfRange { requested: 3,
                                                       depth: 2 })));
}

#[test]
fn depth_lookups_do_not_search_outward() {
    let globals = Environment::new();
    globals.define("only_global", num(1.0));
    let inner = globals.create_child();

    assert!(matches!(inner.get_at_depth(1, "only_global"), Err(ScopeError::Undefined { depth: 1, .. })));
}

#[test]
fn the_root_has_no_parent() {
    let globals = Environment::new();
    globals.define("x", num(1.0));

    assert!(globals.parent().is_none());
    assert_eq!(globals.get_parent("x"), Err(ScopeError::NoParent { name: "x".to_string() }));
}

#[test]
fn handles_share_their_scope() {
    let globals = Environment::new();
    let alias = globals.clone();
    alias.define("shared", num(7.0));

    assert_eq!(globals.get("shared").unwrap(), num(7.0));
}
