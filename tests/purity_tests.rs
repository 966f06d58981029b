mod common;

use common::engine;
use purefn::{
    CompileError, FunctionDefinition, Value,
    ast::{Expression, Parameter, Ty},
};

fn counter() -> Value {
    Value::record(Ty::class("Counter"), vec![("count", Value::Int32(3))])
}

fn point() -> Value {
    Value::record(Ty::structure("Point"), vec![("x", Value::Int32(3))])
}

/// `f(n) = n + <object>.<member>` over `i32`.
fn reads(object: Value, member: &str, member_ty: Ty) -> FunctionDefinition {
    let object_ty = object.static_ty();
    let member = member.to_string();
    FunctionDefinition::new("f", Ty::func1(Ty::Int32, Ty::Int32), move |_| {
        let n = Parameter::new("n", Ty::Int32);
        Expression::lambda(
            vec![n.clone()],
            Expression::add(
                Expression::parameter(&n),
                Expression::member(
                    Expression::constant_typed(object, object_ty),
                    member,
                    member_ty,
                ),
            ),
        )
    })
}

#[test]
fn reference_type_read_is_rejected_under_caching() {
    let engine = engine(1);
    let err = engine
        .build_recursive(&reads(counter(), "count", Ty::Int32), true, false)
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::PurityViolation {
            member: "count".to_string(),
            object_ty: Ty::class("Counter"),
            member_ty: Ty::Int32,
        }
    );
    insta::assert_snapshot!(err.to_string(), @r"
    [E002] PURITY VIOLATION: cannot read `count` (i32) from reference type Counter in a pure function
      hint: Read the state through a value type or a pure function wrapper
    ");
}

#[test]
fn reference_type_read_is_rejected_without_allowance() {
    let engine = engine(1);
    let result = engine.build_recursive(&reads(counter(), "count", Ty::Int32), false, true);
    assert!(matches!(result, Err(CompileError::PurityViolation { .. })));
}

#[test]
fn allowance_only_applies_without_caching() {
    let engine = engine(1);
    engine.set_allow_impure_without_caching(true);

    let uncached = engine
        .build_recursive(&reads(counter(), "count", Ty::Int32), false, true)
        .unwrap();
    assert_eq!(uncached.call(4i32), Ok(Value::Int32(7)));

    let cached = engine.build_recursive(&reads(counter(), "count", Ty::Int32), true, false);
    assert!(matches!(cached, Err(CompileError::PurityViolation { .. })));
}

#[test]
fn value_type_read_is_allowed() {
    let engine = engine(1);
    let f = engine
        .build_recursive(&reads(point(), "x", Ty::Int32), true, true)
        .unwrap();
    assert_eq!(f.call(1i32), Ok(Value::Int32(4)));
}

#[test]
fn pure_function_member_is_allowed() {
    let math = Value::record(
        Ty::class("Math"),
        vec![("zero", Value::Function(purefn::Callable::constant(Value::Int32(0))))],
    );
    let engine = engine(1);
    let definition = FunctionDefinition::new("f", Ty::func1(Ty::Int32, Ty::Int32), |_| {
        let n = Parameter::new("n", Ty::Int32);
        let zero = Expression::member(
            Expression::constant_typed(math, Ty::class("Math")),
            "zero",
            Ty::pure_func(vec![], Ty::Int32),
        );
        Expression::lambda(
            vec![n.clone()],
            Expression::add(Expression::parameter(&n), Expression::invoke(zero, vec![])),
        )
    });
    let f = engine.build_recursive(&definition, true, false).unwrap();
    assert_eq!(f.call(5i32), Ok(Value::Int32(5)));
}

#[test]
fn recursive_lambda_skips_the_check() {
    let engine = engine(1);
    let f = engine
        .recursive_lambda(&reads(counter(), "count", Ty::Int32))
        .unwrap();
    assert_eq!(f.call(1i32), Ok(Value::Int32(4)));
}
