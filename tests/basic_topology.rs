// tests/basic_topology.rs
use glam::Vec3;
use lsystem_ribbon::{
    CommandString, GrammarStore, ProductionExpander, Ribbon, RibbonError, SymbolTable,
    TurtleConfig, TurtleInterpreter,
};

fn setup(commands: &str) -> (TurtleInterpreter, CommandString) {
    let mut interner = SymbolTable::new();
    let mut tokens = Vec::new();
    for c in commands.chars() {
        tokens.push(interner.intern(&c.to_string()).unwrap());
    }

    let mut interpreter = TurtleInterpreter::new(TurtleConfig {
        step: 1.0,
        angle: 90.0,
        ..Default::default()
    });
    interpreter.populate_standard_symbols(&interner);

    (interpreter, CommandString::new(tokens))
}

fn vertex(buffer: &[f32], i: usize) -> Vec3 {
    Vec3::from_slice(&buffer[i * 3..i * 3 + 3])
}

#[test]
fn test_branching_scenario() {
    // Grammar: A -> F[+F][-F], one generation.
    // Trunk runs from the origin to the branch point, each branch starts from it.
    let ribbon = Ribbon::from_json(
        r#"{
            "axiom": "A",
            "generations": 1,
            "rules": [{ "symbol": "A", "replacement": "F[+F][-F]" }],
            "turtle": { "step": 1.0, "angle": 90.0 }
        }"#,
    )
    .unwrap();

    assert_eq!(ribbon.command_string().unwrap(), "F[+F][-F]");

    let buffer = ribbon.evaluate().unwrap();
    assert_eq!(buffer.vertices_per_curve, vec![2, 2, 2]);
    assert_eq!(buffer.vertex_count(), 6);
    assert_eq!(buffer.normals.len(), buffer.positions.len());

    let branch_point = Vec3::new(0.0, 1.0, 0.0);
    assert!(vertex(&buffer.positions, 0).abs_diff_eq(Vec3::ZERO, 1e-5));
    assert!(vertex(&buffer.positions, 1).abs_diff_eq(branch_point, 1e-5));
    assert!(vertex(&buffer.positions, 2).abs_diff_eq(branch_point, 1e-5));
    assert!(vertex(&buffer.positions, 4).abs_diff_eq(branch_point, 1e-5));

    // Yaw of +90 degrees about Z turns +Y heading to -X.
    assert!(vertex(&buffer.positions, 3).abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
    assert!(vertex(&buffer.positions, 5).abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));

    // Yaw keeps the ribbon normal on +Z.
    for i in 0..buffer.vertex_count() {
        assert!(vertex(&buffer.normals, i).abs_diff_eq(Vec3::Z, 1e-5));
    }
}

#[test]
fn test_unmatched_branch_end_fails() {
    let (interpreter, commands) = setup("]");
    let err = interpreter.run(&commands).unwrap_err();
    assert!(matches!(
        err,
        RibbonError::UnbalancedBranch {
            position: 0,
            depth: 0
        }
    ));
}

#[test]
fn test_unclosed_branch_fails() {
    let (interpreter, commands) = setup("F[+F");
    let err = interpreter.run(&commands).unwrap_err();
    assert!(matches!(
        err,
        RibbonError::UnbalancedBranch {
            position: 4,
            depth: 1
        }
    ));
}

#[test]
fn test_single_forward_produces_no_curves() {
    let ribbon = Ribbon::from_json(r#"{ "axiom": "F" }"#).unwrap();
    let buffer = ribbon.evaluate().unwrap();
    assert_eq!(buffer.curve_count(), 0);
    assert_eq!(buffer.vertex_count(), 0);
    assert!(buffer.normals.is_empty());
}

#[test]
fn test_exponential_growth() {
    let grammar = GrammarStore::load(
        r#"{ "axiom": "X", "rules": [{ "symbol": "X", "replacement": "XX" }] }"#,
    )
    .unwrap();
    let commands = ProductionExpander::new(0)
        .expand(grammar.axiom(), &grammar, 10)
        .unwrap();
    assert_eq!(commands.len(), 1024);
}

#[test]
fn test_continuation_after_branch_end() {
    // F[+F]F: the trunk resumes from the restored branch point.
    let (interpreter, commands) = setup("F[+F]F");
    let trace = interpreter.run(&commands).unwrap();
    let buffer = lsystem_ribbon::CurveAssembler::default()
        .assemble(&trace)
        .unwrap();
    assert_eq!(buffer.vertices_per_curve, vec![2, 2, 2]);
    assert!(vertex(&buffer.positions, 4).abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    assert!(vertex(&buffer.positions, 5).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_pen_up_move_starts_new_strand() {
    let (interpreter, commands) = setup("FFfF");
    let trace = interpreter.run(&commands).unwrap();
    let buffer = lsystem_ribbon::CurveAssembler::default()
        .assemble(&trace)
        .unwrap();
    // First strand: two forward points. Second: anchor at y=3, then y=4.
    assert_eq!(buffer.vertices_per_curve, vec![2, 2]);
    assert!(vertex(&buffer.positions, 2).abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-5));
    assert!(vertex(&buffer.positions, 3).abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), 1e-5));
}

#[test]
fn test_step_scale_is_restored_by_branch_end() {
    let (interpreter, commands) = setup("F[\"F]F");
    let trace = interpreter.run(&commands).unwrap();
    let buffer = lsystem_ribbon::CurveAssembler::default()
        .assemble(&trace)
        .unwrap();
    assert_eq!(buffer.vertices_per_curve, vec![2, 2, 2]);
    // Scaled branch step: 0.9.
    assert!(vertex(&buffer.positions, 3).abs_diff_eq(Vec3::new(0.0, 1.9, 0.0), 1e-5));
    // Continuation uses the restored full step.
    assert!(vertex(&buffer.positions, 5).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_non_positive_step_emits_nothing() {
    let ribbon = Ribbon::from_json(
        r#"{ "axiom": "FFF[+F]", "turtle": { "step": 0.0 } }"#,
    )
    .unwrap();
    let buffer = ribbon.evaluate().unwrap();
    assert_eq!(buffer.curve_count(), 0);
    assert!(buffer.positions.is_empty());
}

#[test]
fn test_empty_branch_leaves_no_strand() {
    let (interpreter, commands) = setup("FF[][+]F");
    let trace = interpreter.run(&commands).unwrap();
    let buffer = lsystem_ribbon::CurveAssembler::default()
        .assemble(&trace)
        .unwrap();
    // Trunk from the origin to the first branch point, continuation from the last restore.
    assert_eq!(buffer.vertices_per_curve, vec![3, 2]);
}

#[test]
fn test_branching_trunk_has_no_repeated_vertex() {
    let (interpreter, commands) = setup("FF[+F]");
    let trace = interpreter.run(&commands).unwrap();
    let buffer = lsystem_ribbon::CurveAssembler::default()
        .assemble(&trace)
        .unwrap();
    assert_eq!(buffer.vertices_per_curve, vec![3, 2]);
    assert!(vertex(&buffer.positions, 0).abs_diff_eq(Vec3::ZERO, 1e-5));
    assert!(vertex(&buffer.positions, 1).abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    assert!(vertex(&buffer.positions, 2).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
    for i in 0..2 {
        assert!(!vertex(&buffer.positions, i).abs_diff_eq(vertex(&buffer.positions, i + 1), 1e-5));
    }
}

#[test]
fn test_unbranched_trace_is_not_anchored_at_origin() {
    let (interpreter, commands) = setup("FF");
    let trace = interpreter.run(&commands).unwrap();
    assert_eq!(trace.point_count(), 2);
}

#[test]
fn test_unknown_symbols_are_ignored_by_interpreter() {
    let (interpreter, commands) = setup("AFBF");
    let trace = interpreter.run(&commands).unwrap();
    assert_eq!(trace.point_count(), 2);
}
