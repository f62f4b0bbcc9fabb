//! Context inheritance and symbol resolution behaviors.

use std::{cell::RefCell, rc::Rc};

use assert_matches::assert_matches;
use formula_engine::{express, Context, ContextRef, ErrorKind, Expression, SymbolKind};

fn shared(context: Context) -> ContextRef {
    Rc::new(RefCell::new(context))
}

#[test]
fn basic_context() {
    let mut context = Context::new();
    context.set_variable("x", 5.0);
    context.set_variable("y", 10.0);
    assert_eq!(context.variables()["x"], 5.0);
    assert_eq!(context.variables()["y"], 10.0);

    let mut expr = Expression::new("x + y").with_context(shared(context));
    assert_eq!(expr.get_value().unwrap(), 15.0);
}

#[test]
fn context_with_custom_functions() {
    let mut context = Context::new();
    context.set_variable("x", 5.0);
    context.set_variable("y", 10.0);
    context.set_function("add", |_, _, args| Ok(args[0] + args[1]));

    let mut expr = Expression::new("add(x, y)").with_context(shared(context));
    assert_eq!(expr.get_value().unwrap(), 15.0);
}

#[test]
fn inherited_context() {
    let mut parent = Context::new();
    parent.set_variable("x", 5.0);
    let parent = shared(parent);

    let mut child = Context::new();
    child.set_variable("y", 10.0);
    child.inherit(parent);

    assert_eq!(express("x + y", None, Some(shared(child))).unwrap(), 15.0);
}

#[test]
fn local_bindings_shadow_all_ancestors() {
    // Grandparent defines x, the parent adds nothing, the child overrides:
    // the child's binding must win at any inheritance depth.
    let mut grandparent = Context::new();
    grandparent.set_variable("x", 5.0);

    let mut parent = Context::new();
    parent.inherit(shared(grandparent));

    let mut child = Context::new();
    child.set_variable("x", 10.0);
    child.inherit(shared(parent));

    assert_eq!(express("x", None, Some(shared(child))).unwrap(), 10.0);
}

#[test]
fn deep_inheritance() {
    let mut grandparent = Context::new();
    grandparent.set_variable("x", 5.0);

    let mut parent = Context::new();
    parent.set_variable("y", 10.0);
    parent.inherit(shared(grandparent));

    let mut child = Context::new();
    child.set_variable("z", 15.0);
    child.inherit(shared(parent));

    assert_eq!(express("x + y + z", None, Some(shared(child))).unwrap(), 30.0);
}

#[test]
fn first_matching_parent_wins() {
    let mut first = Context::new();
    first.set_variable("value", 1.0);
    let mut second = Context::new();
    second.set_variable("value", 2.0);

    let mut child = Context::new();
    child.inherit(shared(first));
    child.inherit(shared(second));

    assert_eq!(express("value", None, Some(shared(child))).unwrap(), 1.0);
}

#[test]
fn rebinding_is_visible_to_later_evaluations() {
    let context = shared(Context::new());
    context.borrow_mut().set_variable("x", 1.0);

    let mut expr = Expression::new("x * 10").with_context(Rc::clone(&context));
    expr.parse().unwrap();
    assert_eq!(expr.evaluate().unwrap(), 10.0);

    context.borrow_mut().set_variable("x", 2.0);
    assert_eq!(expr.evaluate().unwrap(), 20.0);
}

#[test]
fn missing_symbols_report_their_kind() {
    let err = express("x + 1", None, None).unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::UnresolvedReference { symbol, kind: SymbolKind::Variable } if symbol == "x"
    );

    let err = express("missing(1)", None, None).unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::UnresolvedReference { symbol, kind: SymbolKind::Function } if symbol == "missing"
    );

    // Variables and functions are separate namespaces.
    let mut context = Context::new();
    context.set_variable("f", 1.0);
    let err = express("f(1)", None, Some(shared(context))).unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::UnresolvedReference { kind: SymbolKind::Function, .. }
    );
}
