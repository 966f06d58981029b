use purefn::{
    CompileError, RuntimeError,
    ast::operator::BinaryOp,
    diagnostics::{ERROR_CODES, ErrorType, lookup_error_code},
};

#[test]
fn registry_has_unique_codes() {
    let mut codes = std::collections::HashSet::new();
    for item in ERROR_CODES {
        assert!(
            codes.insert(item.code),
            "duplicate error code in registry: {}",
            item.code
        );
    }
}

#[test]
fn registry_get_finds_codes() {
    for item in ERROR_CODES {
        let found = lookup_error_code(item.code).expect("code missing from registry");
        assert_eq!(found.title, item.title);
    }
    assert!(lookup_error_code("E999").is_none());
}

#[test]
fn compile_errors_use_compiler_codes() {
    let errors = [
        CompileError::UnsupportedConstruct {
            construct: "memoize",
            reason: "is produced by the rewriter and cannot appear in input",
        },
        CompileError::UnboundParameter {
            name: "x".to_string(),
        },
        CompileError::ConstantEvaluation(RuntimeError::DivisionByZero),
    ];
    for err in errors {
        let code = err.error_code();
        assert_eq!(code.error_type, ErrorType::Compiler, "{}", err);
        assert_eq!(code.error_type.prefix(), "Compiler error");
        assert!(err.to_string().starts_with(&format!("[{}]", code.code)));
        assert!(ERROR_CODES.contains(code));
    }
}

#[test]
fn runtime_errors_use_runtime_codes() {
    let errors = [
        RuntimeError::UnsupportedOperator {
            operator: BinaryOp::Modulo,
        },
        RuntimeError::DivisionByZero,
        RuntimeError::NotCallable { found: "bool" },
        RuntimeError::ArityMismatch {
            expected: 1,
            found: 0,
        },
        RuntimeError::UnhandledJump {
            label: "exit".to_string(),
        },
    ];
    for err in errors {
        let code = err.error_code();
        assert_eq!(code.error_type, ErrorType::Runtime, "{}", err);
        assert!(err.to_string().starts_with(&format!("[{}]", code.code)));
        assert!(ERROR_CODES.contains(code));
    }
}

#[test]
fn constant_evaluation_keeps_its_cause() {
    use std::error::Error;

    let err = CompileError::from(RuntimeError::DivisionByZero);
    let source = err.source().expect("cause is kept");
    assert_eq!(source.to_string(), RuntimeError::DivisionByZero.to_string());
}
