use super::*;
use crate::analyzer::Analyzer;
use crate::emit::AccessFlags;
use bumpalo::Bump;
use sixty_ast::{AstBuilder, BinaryOp};

fn generate(program: &Program<'_>) -> Vec<ObjectUnit> {
    let mut ctx = CompilationContext::new("demo");
    let analysis = Analyzer::new(&ctx).analyze(program);
    assert!(!analysis.has_errors(), "{:?}", analysis.diagnostics.errors());
    CodeGenerator::new(&analysis, &mut ctx).generate(program)
}

fn unit<'u>(units: &'u [ObjectUnit], path: &str) -> &'u ObjectUnit {
    units
        .iter()
        .find(|unit| unit.path == path)
        .unwrap_or_else(|| panic!("no unit {path}"))
}

fn code(units: &[ObjectUnit], path: &str, method: &str) -> Vec<String> {
    unit(units, path)
        .method(method)
        .unwrap_or_else(|| panic!("no method {method} in {path}"))
        .code
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Whether `lines` holds `expected` as a contiguous run.
fn has_run(lines: &[String], expected: &[&str]) -> bool {
    lines
        .windows(expected.len())
        .any(|window| window.iter().zip(expected).all(|(line, want)| line == want))
}

fn count(lines: &[String], expected: &str) -> usize {
    lines.iter().filter(|line| *line == expected).count()
}

#[test]
fn main_unit_creates_print_and_read() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[]);

    let units = generate(&program);

    assert_eq!(units.first().map(|u| u.path.as_str()), Some("demo"));
    assert_eq!(units.last().map(|u| u.path.as_str()), Some("demo_bin/routine"));
    let main = code(&units, "demo", "main");
    assert_eq!(
        main,
        [
            "new library/print",
            "dup",
            "invokespecial library/print/<init>()V",
            "astore 1",
            "new library/read",
            "dup",
            "invokespecial library/read/<init>()V",
            "astore 2",
            "return",
        ]
    );
    let method = unit(&units, "demo").method("main").unwrap();
    assert_eq!(method.max_locals, 3);
    assert!(method.flags.contains(AccessFlags::STATIC));
}

#[test]
fn integer_addition_calls_operator_plus() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let sum = b.binary(b.int(5), BinaryOp::Add, b.int(3));
    let program = b.program(&[b.assign_new(b.named("integer"), &["x"], sum)]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(
        &main,
        &[
            "new library/integer",
            "dup",
            "invokespecial library/integer/<init>()V",
            "astore 3",
            "aload 3",
            "new library/integer",
            "dup",
            "iconst_5",
            "invokespecial library/integer/<init>(I)V",
            "new library/integer",
            "dup",
            "iconst_3",
            "invokespecial library/integer/<init>(I)V",
            "invokevirtual library/integer/operator_plus(Llibrary/integer;)Llibrary/integer;",
            "invokevirtual library/integer/operator_assignment(Llibrary/integer;)V",
        ]
    ));
    let method = unit(&units, "demo").method("main").unwrap();
    assert_eq!(method.max_stack, 5);
    assert!(method.vars.iter().any(|v| v.slot == 3 && v.name == "x"));
}

#[test]
fn initializer_runs_once_for_all_new_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[b.assign_new(b.named("string"), &["a", "b"], b.call("read", &[]))]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert_eq!(
        count(&main, "invokevirtual library/read/operator_parenthesis()Llibrary/string;"),
        1
    );
    // each name still owns a separate value
    assert_eq!(count(&main, "invokespecial library/string/<init>()V"), 2);
    assert_eq!(
        count(&main, "invokevirtual library/string/operator_assignment(Llibrary/string;)V"),
        2
    );
    assert!(has_run(
        &main,
        &[
            "astore 4",
            "aload 4",
            "aload 3",
            "invokevirtual library/string/operator_assignment(Llibrary/string;)V",
        ]
    ));
}

#[test]
fn shared_reference_is_duplicated_for_new_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let noop = b.routine("noop", &[], None, &[], None);
    let program = b.program(&[
        b.routine_stmt(noop),
        b.assign_new(b.routine_type(&[], None), &["f", "g"], b.var("noop")),
    ]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(&main, &["aload 3", "dup", "astore 4", "astore 5"]));
    assert_eq!(count(&main, "aload 3"), 1);
}

#[test]
fn static_field_initializer_runs_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let config = b.type_def(
        "config",
        &[],
        &[b.static_field(b.named("integer"), &["lo", "hi"], b.int(7))],
        &[],
        &[],
    );
    let program = b.program(&[b.type_stmt(config)]);

    let units = generate(&program);
    let static_init = code(&units, "demo_bin/demo$config", "$static_init");

    assert_eq!(count(&static_init, "invokespecial library/integer/<init>(I)V"), 1);
    assert_eq!(count(&static_init, "invokespecial library/integer/<init>()V"), 2);
    assert!(has_run(
        &static_init,
        &[
            "putstatic demo_bin/demo$config/hi Llibrary/integer;",
            "getstatic demo_bin/demo$config/hi Llibrary/integer;",
            "getstatic demo_bin/demo$config/lo Llibrary/integer;",
            "invokevirtual library/integer/operator_assignment(Llibrary/integer;)V",
        ]
    ));
}

#[test]
fn literals_construct_library_values() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[
        b.assign_new(b.named("real"), &["r"], b.real(2.0)),
        b.assign_new(b.named("string"), &["s"], b.string("hi")),
        b.assign_new(b.named("bool"), &["f"], b.boolean(false)),
    ]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(&main, &["ldc2_w 2.0", "invokespecial library/real/<init>(D)V"]));
    assert!(has_run(
        &main,
        &["ldc \"hi\"", "invokespecial library/string/<init>(Ljava/lang/String;)V"]
    ));
    assert!(has_run(&main, &["iconst_0", "invokespecial library/bool/<init>(I)V"]));
}

#[test]
fn print_is_called_and_read_result_dropped() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(&[
        b.call_stmt(b.chain(&[b.link_call("print", &[b.string("hello")])])),
        b.call_stmt(b.chain(&[b.link_call("read", &[])])),
    ]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(
        &main,
        &[
            "aload 1",
            "new library/string",
            "dup",
            "ldc \"hello\"",
            "invokespecial library/string/<init>(Ljava/lang/String;)V",
            "invokevirtual library/print/operator_parenthesis(Llibrary/string;)V",
            "aload 2",
            "invokevirtual library/read/operator_parenthesis()Llibrary/string;",
            "pop",
            "return",
        ]
    ));
}

#[test]
fn if_elseif_else_branches() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let say = |text: &str| b.call_stmt(b.chain(&[b.link_call("print", &[b.string(text)])]));
    let program = b.program(&[b.if_stmt(
        &[
            b.cond_block(b.boolean(true), &[say("one")]),
            b.cond_block(b.boolean(false), &[say("two")]),
        ],
        Some(&[say("three")]),
    )]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    // L001 ends the statement; each branch falls through to its own label
    assert!(has_run(
        &main,
        &[
            "invokespecial library/bool/<init>(I)V",
            "getfield library/bool/value I",
            "ifeq L002",
        ]
    ));
    assert!(has_run(
        &main,
        &[
            "invokevirtual library/print/operator_parenthesis(Llibrary/string;)V",
            "goto L001",
            "L002:",
        ]
    ));
    assert!(main.contains(&"ifeq L003".to_string()));
    assert!(has_run(&main, &["goto L001", "L003:", "aload 1"]));
    assert_eq!(main.iter().rev().take(2).cloned().collect::<Vec<_>>(), ["return", "L001:"]);
}

#[test]
fn loop_tests_condition_at_the_top() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let flag = b.var("flag");
    let program = b.program(&[
        b.assign_new(b.named("bool"), &["flag"], b.boolean(true)),
        b.loop_stmt(flag, &[b.assign_var("flag", b.boolean(false))]),
    ]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(
        &main,
        &["L001:", "aload 3", "getfield library/bool/value I", "ifeq L002"]
    ));
    assert!(has_run(
        &main,
        &[
            "invokevirtual library/bool/operator_assignment(Llibrary/bool;)V",
            "goto L001",
            "L002:",
            "return",
        ]
    ));
}

#[test]
fn routine_becomes_a_unit_called_through_the_base() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let f = b.routine(
        "f",
        &[(b.named("integer"), "a")],
        Some(b.named("integer")),
        &[],
        Some(b.var("a")),
    );
    let program = b.program(&[
        b.routine_stmt(f),
        b.assign_new(b.named("integer"), &["y"], b.call("f", &[b.int(1)])),
    ]);

    let units = generate(&program);
    let signature = "(Llibrary/integer;)Llibrary/integer;";

    let routine = unit(&units, "demo_bin/demo$f");
    assert_eq!(routine.super_path, "demo_bin/routine");
    assert_eq!(
        code(&units, "demo_bin/demo$f", "operator_parenthesis"),
        ["aload 1", "areturn"]
    );
    let body = routine.method("operator_parenthesis").unwrap();
    assert_eq!(body.descriptor.to_string(), signature);
    assert_eq!(body.max_locals, 2);
    assert_eq!(body.vars[0].name, "this");

    let main = code(&units, "demo", "main");
    assert!(has_run(
        &main,
        &[
            "new demo_bin/demo$f",
            "dup",
            "invokespecial demo_bin/demo$f/<init>()V",
            "astore 3",
        ]
    ));
    assert!(main.contains(&format!("invokevirtual demo_bin/routine/operator_parenthesis{signature}")));

    let base = code(&units, "demo_bin/routine", "operator_parenthesis");
    assert_eq!(base, ["aconst_null", "areturn"]);
}

#[test]
fn nested_routine_receives_captures() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let show = b.call_stmt(b.chain(&[b.link_call("print", &[b.call("string", &[b.var("a")])])]));
    let inner = b.routine("inner", &[], None, &[show], None);
    let outer = b.routine(
        "outer",
        &[(b.named("integer"), "a")],
        None,
        &[b.routine_stmt(inner)],
        None,
    );
    let program = b.program(&[b.routine_stmt(outer)]);

    let units = generate(&program);

    let inner_unit = unit(&units, "demo_bin/demo$outer$inner");
    assert!(inner_unit.has_field("print"));
    assert!(inner_unit.has_field("a"));
    assert_eq!(
        inner_unit.method("<init>").unwrap().descriptor.to_string(),
        "(Llibrary/print;Llibrary/integer;)V"
    );
    assert!(has_run(
        &code(&units, "demo_bin/demo$outer$inner", "operator_parenthesis"),
        &["aload 0", "getfield demo_bin/demo$outer$inner/print Llibrary/print;"]
    ));

    // outer forwards its own capture and its parameter
    let outer_body = code(&units, "demo_bin/demo$outer", "operator_parenthesis");
    assert!(has_run(
        &outer_body,
        &[
            "new demo_bin/demo$outer$inner",
            "dup",
            "aload 0",
            "getfield demo_bin/demo$outer/print Llibrary/print;",
            "aload 1",
            "invokespecial demo_bin/demo$outer$inner/<init>(Llibrary/print;Llibrary/integer;)V",
            "astore 2",
        ]
    ));
    // inner units finish before their parents
    let position = |path: &str| units.iter().position(|u| u.path == path).unwrap();
    assert!(position("demo_bin/demo$outer$inner") < position("demo_bin/demo$outer"));
}

#[test]
fn type_stores_outer_bindings_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let bump = b.routine(
        "bump",
        &[],
        None,
        &[b.assign_var(
            "value",
            b.binary(b.var("value"), BinaryOp::Add, b.var("count")),
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
    let program = b.program(&[
        b.assign_new(b.named("integer"), &["count"], b.int(0)),
        b.type_stmt(counter),
    ]);

    let units = generate(&program);
    let ty = "demo_bin/demo$counter";
    let routine = "demo_bin/demo$counter$bump";

    let main = code(&units, "demo", "main");
    assert!(has_run(
        &main,
        &["aload 3", "invokestatic demo_bin/demo$counter/$static_init(Llibrary/integer;)V"]
    ));

    let type_unit = unit(&units, ty);
    assert_eq!(type_unit.super_path, "java/lang/Object");
    let count_field = type_unit.fields.iter().find(|f| f.name == "count").unwrap();
    assert!(count_field.flags.contains(AccessFlags::STATIC));
    let static_init = code(&units, ty, "$static_init");
    assert_eq!(
        static_init,
        [
            "aload 0",
            "putstatic demo_bin/demo$counter/count Llibrary/integer;",
            "return",
        ]
    );

    let ctor = code(&units, ty, "<init>");
    assert!(has_run(
        &ctor,
        &[
            "aload 0",
            "new library/integer",
            "dup",
            "invokespecial library/integer/<init>()V",
            "putfield demo_bin/demo$counter/value Llibrary/integer;",
        ]
    ));
    assert!(has_run(
        &ctor,
        &[
            "aload 0",
            "new demo_bin/demo$counter$bump",
            "dup",
            "aload 0",
            "getstatic demo_bin/demo$counter/count Llibrary/integer;",
            "invokespecial demo_bin/demo$counter$bump/<init>(Ldemo_bin/demo$counter;Llibrary/integer;)V",
            "putfield demo_bin/demo$counter/bump Ldemo_bin/routine;",
        ]
    ));

    let body = code(&units, routine, "operator_parenthesis");
    assert!(has_run(
        &body,
        &[
            "aload 0",
            "getfield demo_bin/demo$counter$bump/this$type Ldemo_bin/demo$counter;",
            "getfield demo_bin/demo$counter/value Llibrary/integer;",
        ]
    ));
    assert!(has_run(
        &body,
        &[
            "aload 0",
            "getfield demo_bin/demo$counter$bump/count Llibrary/integer;",
            "invokevirtual library/integer/operator_plus(Llibrary/integer;)Llibrary/integer;",
            "invokevirtual library/integer/operator_assignment(Llibrary/integer;)V",
        ]
    ));
}

#[test]
fn members_are_reached_through_fields() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let twice = b.routine(
        "twice",
        &[(b.named("integer"), "n")],
        Some(b.named("integer")),
        &[],
        Some(b.binary(b.var("n"), BinaryOp::Add, b.var("n"))),
    );
    let make = b.routine("make", &[], Some(b.named("integer")), &[], Some(b.var("seed")));
    let math = b.type_def(
        "math",
        &[],
        &[b.static_field(b.named("integer"), &["seed"], b.int(7))],
        &[twice],
        &[make],
    );
    let instance_call = b.chain_expr(&[b.link_call("math", &[]), b.link_call("twice", &[b.int(2)])]);
    let static_call = b.chain_expr(&[b.link("math"), b.link_call("make", &[])]);
    let program = b.program(&[
        b.type_stmt(math),
        b.assign_new(b.named("integer"), &["a"], instance_call),
        b.assign_new(b.named("integer"), &["c"], static_call),
    ]);

    let units = generate(&program);
    let ty = "demo_bin/demo$math";

    let main = code(&units, "demo", "main");
    assert!(has_run(
        &main,
        &[
            "new demo_bin/demo$math",
            "dup",
            "invokespecial demo_bin/demo$math/<init>()V",
            "getfield demo_bin/demo$math/twice Ldemo_bin/routine;",
        ]
    ));
    assert!(has_run(
        &main,
        &[
            "getstatic demo_bin/demo$math/make Ldemo_bin/routine;",
            "invokevirtual demo_bin/routine/operator_parenthesis()Llibrary/integer;",
        ]
    ));

    let static_init = code(&units, ty, "$static_init");
    assert!(has_run(
        &static_init,
        &[
            "new demo_bin/demo$math$make",
            "dup",
            "invokespecial demo_bin/demo$math$make/<init>()V",
            "putstatic demo_bin/demo$math/make Ldemo_bin/routine;",
        ]
    ));
    assert!(has_run(
        &static_init,
        &[
            "new library/integer",
            "dup",
            "invokespecial library/integer/<init>()V",
            "putstatic demo_bin/demo$math/seed Llibrary/integer;",
            "getstatic demo_bin/demo$math/seed Llibrary/integer;",
        ]
    ));
    assert_eq!(
        count(&static_init, "putstatic demo_bin/demo$math/seed Llibrary/integer;"),
        1
    );
    assert_eq!(
        code(&units, "demo_bin/demo$math$make", "operator_parenthesis"),
        ["getstatic demo_bin/demo$math/seed Llibrary/integer;", "areturn"]
    );

    // the base declares both signatures, in descriptor order
    let base = unit(&units, "demo_bin/routine");
    let signatures: Vec<String> = base
        .methods
        .iter()
        .filter(|m| m.name == "operator_parenthesis")
        .map(|m| m.descriptor.to_string())
        .collect();
    assert_eq!(
        signatures,
        ["()Llibrary/integer;", "(Llibrary/integer;)Llibrary/integer;"]
    );
}

#[test]
fn field_assignment_stores_reference_for_routine_values() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let hook = b.routine_type(&[], None);
    let noop = b.routine("noop", &[], None, &[], None);
    let holder = b.type_def("holder", &[b.var_decl(hook, &["callback"])], &[], &[], &[]);
    let target = b.chain(&[b.link("h"), b.link("callback")]);
    let program = b.program(&[
        b.type_stmt(holder),
        b.routine_stmt(noop),
        b.assign_new(b.named("holder"), &["h"], b.call("holder", &[])),
        b.assign(target, b.var("noop")),
        b.call_stmt(b.chain(&[b.link("h"), b.link_call("callback", &[])])),
    ]);

    let units = generate(&program);
    let main = code(&units, "demo", "main");

    assert!(has_run(
        &main,
        &[
            "aload 4",
            "aload 3",
            "putfield demo_bin/demo$holder/callback Ldemo_bin/routine;",
        ]
    ));
    assert!(has_run(
        &main,
        &[
            "aload 4",
            "getfield demo_bin/demo$holder/callback Ldemo_bin/routine;",
            "invokevirtual demo_bin/routine/operator_parenthesis()V",
        ]
    ));
    // routine-typed fields start out null and are not constructed
    let ctor = code(&units, "demo_bin/demo$holder", "<init>");
    assert_eq!(
        ctor,
        ["aload 0", "invokespecial java/lang/Object/<init>()V", "return"]
    );
}

#[test]
fn labels_are_unique_across_units() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let spin = b.routine(
        "spin",
        &[(b.named("bool"), "go")],
        None,
        &[b.loop_stmt(b.var("go"), &[])],
        None,
    );
    let program = b.program(&[b.routine_stmt(spin), b.loop_stmt(b.boolean(false), &[])]);

    let units = generate(&program);

    let routine = code(&units, "demo_bin/demo$spin", "operator_parenthesis");
    assert!(has_run(&routine, &["L001:", "aload 1"]));
    let main = code(&units, "demo", "main");
    assert!(main.contains(&"L003:".to_string()));
    assert!(main.contains(&"ifeq L004".to_string()));
}
