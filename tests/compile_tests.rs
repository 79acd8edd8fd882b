//! Integration tests for the SixtyFortran pipeline.
//!
//! These build complete programs with the tree builder and run them through
//! analysis, generation and output, without the external assembler.

use bumpalo::Bump;
use sixty::ast::{AstBuilder, BinaryOp, Program};
use sixty::{AssemblerConfig, CompileError, CompileOptions, SemanticError};
use std::path::PathBuf;

/// A fresh output directory for one test.
fn output_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sixty-{}-{test}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn options(test: &str) -> CompileOptions {
    CompileOptions::default()
        .with_program_name("demo")
        .with_output_dir(output_dir(test))
        .with_assemble(false)
}

/// A counter type whose routine reads an outer variable, plus a free
/// routine that prints through it.
fn counter_program<'a>(b: &AstBuilder<'a>) -> Program<'a> {
    let bump = b.routine(
        "bump",
        &[],
        None,
        &[b.assign_var(
            "value",
            b.binary(b.var("value"), BinaryOp::Add, b.var("step")),
        )],
        None,
    );
    let counter = b.type_def(
        "counter",
        &[b.var_decl(b.named("integer"), &["value"])],
        &[],
        &[bump],
        &[],
    );
    let show = b.routine(
        "show",
        &[(b.named("counter"), "c")],
        None,
        &[b.call_stmt(b.chain(&[b.link_call(
            "print",
            &[b.call(
                "string",
                &[b.chain_expr(&[b.link("c"), b.link("value")])],
            )],
        )]))],
        None,
    );
    b.program(&[
        b.assign_new(b.named("integer"), &["step"], b.int(2)),
        b.type_stmt(counter),
        b.routine_stmt(show),
        b.assign_new(b.named("counter"), &["c"], b.call("counter", &[])),
        b.call_stmt(b.chain(&[b.link("c"), b.link_call("bump", &[])])),
        b.call_stmt(b.chain(&[b.link_call("show", &[b.var("c")])])),
    ])
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn build_writes_every_unit() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = counter_program(&b);
    let options = options("writes");

    let output = sixty::build(&program, 0, &options).expect("build failed");

    let names: Vec<String> = output
        .files
        .iter()
        .map(|f| f.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("demo.j"));
    assert!(names.contains(&"demo_bin/demo$counter.j".to_string()));
    assert!(names.contains(&"demo_bin/demo$counter$bump.j".to_string()));
    assert!(names.contains(&"demo_bin/demo$show.j".to_string()));
    assert_eq!(names.last().map(String::as_str), Some("demo_bin/routine.j"));

    for file in &output.files {
        let path = options.output_dir.join(file);
        let text = std::fs::read_to_string(&path).expect("unit not written");
        assert!(text.starts_with(".class public "), "{}", path.display());
    }

    let main = std::fs::read_to_string(options.output_dir.join("demo.j")).unwrap();
    assert!(main.contains(".method public static main([Ljava/lang/String;)V"));
    assert!(main.contains("invokestatic demo_bin/demo$counter/$static_init(Llibrary/integer;)V"));

    let _ = std::fs::remove_dir_all(&options.output_dir);
}

#[test]
fn routine_file_extends_the_base() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = counter_program(&b);

    let units = sixty::compile(&program, &options("in-memory")).expect("compile failed");
    let show = units.iter().find(|u| u.path == "demo_bin/demo$show").unwrap();
    let text = show.to_string();

    assert!(text.starts_with(".class public demo_bin/demo$show\n.super demo_bin/routine\n"));
    assert!(text.contains(".field public print Llibrary/print;"));
    assert!(text.contains(".method public operator_parenthesis(Ldemo_bin/demo$counter;)V"));
    assert!(text.contains("    .var 1 is c Ldemo_bin/demo$counter;"));
    assert!(text.contains("    getfield demo_bin/demo$counter/value Llibrary/integer;"));
    assert!(text.contains(
        "    invokestatic library/string/operator_parenthesis(Llibrary/integer;)Llibrary/string;"
    ));

    let base = units.last().unwrap().to_string();
    assert!(base.contains(".method public operator_parenthesis(Ldemo_bin/demo$counter;)V"));
    assert!(base.contains(".method public operator_parenthesis()V"));
}

#[test]
fn separate_compilations_number_labels_independently() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[b.loop_stmt(b.boolean(false), &[])]);
    let options = options("labels");

    let first = sixty::compile(&program, &options).unwrap();
    let second = sixty::compile(&program, &options).unwrap();

    assert_eq!(first[0].to_string(), second[0].to_string());
    assert!(first[0].to_string().contains("\nL001:\n"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn syntax_errors_abort_before_analysis() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = counter_program(&b);
    let options = options("syntax");

    let error = sixty::build(&program, 3, &options).unwrap_err();

    assert!(matches!(error, CompileError::Syntax { count: 3 }));
    assert!(!options.output_dir.exists());
}

#[test]
fn semantic_errors_are_reported_together() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[
        b.assign_new(b.named("integer"), &["a"], b.boolean(true)),
        b.assign_new(b.named("real"), &["r"], b.string("x")),
        b.declare(b.named("missing"), &["m"]),
    ]);
    let options = options("semantic");

    let error = sixty::build(&program, 0, &options).unwrap_err();

    match &error {
        CompileError::Semantic { count, errors } => {
            assert_eq!(*count, 3);
            assert!(matches!(errors[0], SemanticError::TypeConversion { .. }));
            assert!(matches!(errors[1], SemanticError::TypeConversion { .. }));
            assert!(matches!(errors[2], SemanticError::TypeNotFound { .. }));
        }
        other => panic!("expected semantic errors, got {other:?}"),
    }
    assert_eq!(error.semantic_errors().len(), 3);
    assert!(!options.output_dir.exists());
}

#[test]
fn missing_assembler_is_reported() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[]);
    let options = options("spawn")
        .with_assemble(true)
        .with_assembler(AssemblerConfig::new("sixty-no-such-assembler"));

    let error = sixty::build(&program, 0, &options).unwrap_err();

    assert!(matches!(error, CompileError::AssemblerSpawn { .. }));
    // files are written before assembly
    assert!(options.output_dir.join("demo.j").exists());
    let _ = std::fs::remove_dir_all(&options.output_dir);
}

#[cfg(unix)]
#[test]
fn failing_assembler_is_reported() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[]);
    let options = options("status")
        .with_assemble(true)
        .with_assembler(AssemblerConfig::new("false"));

    let error = sixty::build(&program, 0, &options).unwrap_err();

    match error {
        CompileError::Assembler { command, status } => {
            assert_eq!(command, "false");
            assert!(!status.success());
        }
        other => panic!("expected assembler failure, got {other:?}"),
    }
    let _ = std::fs::remove_dir_all(&options.output_dir);
}
