use rdf_sage_model::{
    GraphName, Literal, NamedNode, Quad, SolutionMapping, Term, TriplePattern, Variable,
};
use rdf_sage_physical::expression::{BinaryOperator, Expression};
use rdf_sage_physical::operator::{
    BagUnionOperator, BindJoinOperator, FilterOperator, NestedLoopJoinOperator,
    ProjectionOperator, ScanOperator, UnionMode,
};
use rdf_sage_physical::snapshot::load_operator;
use rdf_sage_physical::{ExecutionContext, PreemptableOperator, Step};
use rdf_sage_storage::MemPatternSource;
use std::sync::Arc;

#[test]
fn test_scan_produces_all_matches() {
    let context = example_context();
    let scan = scan(&context, "?s", "<http://ex.org/value>", "?v");

    let solutions = drain(scan, &context);

    assert_eq!(solutions.len(), 10);
    assert!(solutions.iter().all(|s| s.len() == 2));
}

#[test]
fn test_scan_skips_inconsistent_repeated_variables() {
    let context = example_context();
    let scan = scan(&context, "?x", "<http://ex.org/self>", "?x");

    let solutions = drain(scan, &context);

    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions[0].get(&Variable::new_unchecked("x")),
        Some(&Term::from(NamedNode::new_unchecked("http://ex.org/a")))
    );
}

#[test]
fn test_scan_resumes_from_snapshot() {
    let context = example_context();
    let operator = scan(&context, "?s", "<http://ex.org/value>", "?v");

    let solutions = drain_with_suspensions(operator, &context, 3);

    let expected = drain(scan(&context, "?s", "<http://ex.org/value>", "?v"), &context);
    assert_eq!(sorted(solutions), sorted(expected));
}

#[test]
fn test_nested_loop_join() {
    let context = example_context();

    let solutions = drain(knows_value_join(&context), &context);

    assert_eq!(solutions.len(), 10);
    for solution in &solutions {
        assert_eq!(solution.len(), 3);
    }
}

#[test]
fn test_nested_loop_join_returns_not_yet_between_outer_solutions() {
    let context = example_context();
    let mut join = knows_value_join(&context);

    let steps = (0..4)
        .map(|_| join.next(&context).unwrap())
        .collect::<Vec<_>>();

    assert!(matches!(steps[0], Step::Solution(_)));
    assert_eq!(steps[1], Step::NotYet);
    assert!(matches!(steps[2], Step::Solution(_)));
    assert_eq!(steps[3], Step::NotYet);
}

#[test]
fn test_nested_loop_join_resumes_mid_inner_scan() {
    let context = example_context();
    let expected = sorted(drain(knows_value_join(&context), &context));

    for steps_per_quantum in 1..5 {
        let solutions =
            drain_with_suspensions(knows_value_join(&context), &context, steps_per_quantum);
        assert_eq!(sorted(solutions), expected, "{steps_per_quantum} steps per quantum");
    }
}

#[test]
fn test_bind_join_matches_nested_loop_join() {
    let context = example_context();
    let outer = drain(scan(&context, "?s", "<http://ex.org/knows>", "?o"), &context);
    let join = BindJoinOperator::new(outer, pattern("?o", "<http://ex.org/value>", "?v"));

    let solutions = drain_with_suspensions(join.into(), &context, 2);

    assert_eq!(sorted(solutions), sorted(drain(knows_value_join(&context), &context)));
}

#[test]
fn test_bag_union_keeps_duplicates() {
    let context = example_context();
    for mode in [UnionMode::Ordered, UnionMode::Randomized] {
        let union = BagUnionOperator::new(
            scan(&context, "?s", "<http://ex.org/value>", "?v"),
            scan(&context, "?s", "<http://ex.org/value>", "?v"),
            mode,
        );

        let solutions = drain(union.into(), &context);

        assert_eq!(solutions.len(), 20, "{mode}");
    }
}

#[test]
fn test_bag_union_ordered_drains_left_first() {
    let context = example_context();
    let union = BagUnionOperator::new(
        scan(&context, "?s", "<http://ex.org/knows>", "?o"),
        scan(&context, "?s", "<http://ex.org/value>", "?v"),
        UnionMode::Ordered,
    );

    let solutions = drain(union.into(), &context);

    let o = Variable::new_unchecked("o");
    assert!(solutions[..10].iter().all(|s| s.contains(&o)));
    assert!(solutions[10..].iter().all(|s| !s.contains(&o)));
}

#[test]
fn test_randomized_union_resumes() {
    let context = example_context();
    let union = BagUnionOperator::new(
        knows_value_join(&context),
        scan(&context, "?s", "<http://ex.org/value>", "?v"),
        UnionMode::Randomized,
    );

    let solutions = drain_with_suspensions(union.into(), &context, 3);

    assert_eq!(solutions.len(), 20);
}

#[test]
fn test_filter_selectivity() {
    let context = example_context();
    let filter = FilterOperator::new(
        scan(&context, "?s", "<http://ex.org/value>", "?v"),
        Expression::binary(
            BinaryOperator::GreaterOrEqual,
            Expression::variable(Variable::new_unchecked("v")),
            Expression::constant(Literal::from(7)),
        ),
    );

    let solutions = drain(filter.into(), &context);

    let mut values = solutions
        .iter()
        .map(|s| s.get(&Variable::new_unchecked("v")).unwrap().to_string())
        .collect::<Vec<_>>();
    values.sort();
    insta::assert_debug_snapshot!(values, @r#"
    [
        "\"7\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        "\"8\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        "\"9\"^^<http://www.w3.org/2001/XMLSchema#integer>",
    ]
    "#);
}

#[test]
fn test_projection_ignores_unbound_variables() {
    let context = example_context();
    let projection = ProjectionOperator::new(
        scan(&context, "?s", "<http://ex.org/value>", "?v"),
        Some(vec![
            Variable::new_unchecked("v"),
            Variable::new_unchecked("missing"),
        ]),
    );

    let solutions = drain(projection.into(), &context);

    assert_eq!(solutions.len(), 10);
    assert!(solutions.iter().all(|s| s.len() == 1));
}

#[test]
fn test_empty_operator() {
    let context = example_context();
    let mut empty = PreemptableOperator::Empty;

    assert!(!empty.has_next());
    assert_eq!(empty.next(&context).unwrap(), Step::Exhausted);
}

#[test]
fn test_explain_plan() {
    let context = example_context();
    let plan = ProjectionOperator::new(
        FilterOperator::new(
            knows_value_join(&context),
            Expression::Bound(Variable::new_unchecked("v")),
        )
        .into(),
        Some(vec![Variable::new_unchecked("s")]),
    );

    insta::assert_snapshot!(PreemptableOperator::from(plan), @r"
    Projection (?s)
      Filter BOUND(?v)
        NestedLoopJoin (inner: ?o <http://ex.org/value> ?v)
          Scan ?s <http://ex.org/knows> ?o (cardinality: 10, offset: 0)
    ");
}

fn knows_value_join(context: &ExecutionContext) -> PreemptableOperator {
    NestedLoopJoinOperator::new(
        scan(context, "?s", "<http://ex.org/knows>", "?o"),
        pattern("?o", "<http://ex.org/value>", "?v"),
    )
    .into()
}

fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
    TriplePattern::parse(subject, predicate, object).unwrap()
}

fn scan(
    context: &ExecutionContext,
    subject: &str,
    predicate: &str,
    object: &str,
) -> PreemptableOperator {
    ScanOperator::open(context, pattern(subject, predicate, object), 0)
        .unwrap()
        .into()
}

fn drain(mut operator: PreemptableOperator, context: &ExecutionContext) -> Vec<SolutionMapping> {
    let mut solutions = Vec::new();
    while operator.has_next() {
        match operator.next(context).unwrap() {
            Step::Solution(solution) => solutions.push(solution),
            Step::NotYet => {}
            Step::Exhausted => break,
        }
    }
    solutions
}

/// Runs `steps_per_quantum` steps at a time and round-trips the operator through a continuation
/// token between the quanta.
fn drain_with_suspensions(
    mut operator: PreemptableOperator,
    context: &ExecutionContext,
    steps_per_quantum: usize,
) -> Vec<SolutionMapping> {
    let mut solutions = Vec::new();
    'outer: loop {
        for _ in 0..steps_per_quantum {
            if !operator.has_next() {
                break 'outer;
            }
            match operator.next(context).unwrap() {
                Step::Solution(solution) => solutions.push(solution),
                Step::NotYet => {}
                Step::Exhausted => break 'outer,
            }
        }

        let token = rdf_sage_physical::ContinuationToken::from_snapshot(&operator.save()).unwrap();
        operator = load_operator(token.to_snapshot().unwrap(), context).unwrap();
    }
    solutions
}

fn sorted(solutions: Vec<SolutionMapping>) -> Vec<String> {
    let mut solutions = solutions
        .into_iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    solutions.sort();
    solutions
}

fn example_context() -> ExecutionContext {
    let source = MemPatternSource::new();
    let ex = |name: String| NamedNode::new_unchecked(format!("http://ex.org/{name}"));

    let mut quads = Vec::new();
    for i in 0..10 {
        quads.push(Quad::new(
            ex(format!("s{i}")),
            ex("value".to_owned()),
            Literal::from(i),
            GraphName::DefaultGraph,
        ));
        quads.push(Quad::new(
            ex(format!("s{i}")),
            ex("knows".to_owned()),
            ex(format!("s{}", (i + 1) % 10)),
            GraphName::DefaultGraph,
        ));
    }
    quads.push(Quad::new(
        ex("a".to_owned()),
        ex("self".to_owned()),
        ex("a".to_owned()),
        GraphName::DefaultGraph,
    ));
    quads.push(Quad::new(
        ex("a".to_owned()),
        ex("self".to_owned()),
        ex("b".to_owned()),
        GraphName::DefaultGraph,
    ));
    source.extend(quads).unwrap();

    ExecutionContext::new(Arc::new(source))
}
