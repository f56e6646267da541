use oxrdfio::RdfFormat;
use rdf_sage_model::{GraphName, Literal, NamedNode, Quad, TermTriple, TriplePattern};
use rdf_sage_storage::{MemPatternSource, PatternScan, PatternSource};

#[test]
fn test_insert_quad() {
    let source = MemPatternSource::new();

    assert!(source.insert(&example_quad(0)).unwrap());
    assert!(!source.insert(&example_quad(0)).unwrap()); // duplicate

    assert_eq!(source.len().unwrap(), 1);
}

#[test]
fn test_search_bound_predicate() {
    let source = example_source();

    let pattern = TriplePattern::parse("?s", "<http://example.com/p>", "?o").unwrap();
    let scan = source.search(&pattern, 0).unwrap();

    assert_eq!(scan.cardinality, 5);
    assert_eq!(collect(scan).len(), 5);
}

#[test]
fn test_search_with_offset_resumes_in_same_order() {
    let source = example_source();
    let pattern = TriplePattern::parse("?s", "<http://example.com/p>", "?o").unwrap();

    let all = collect(source.search(&pattern, 0).unwrap());
    let resumed = source.search(&pattern, 2).unwrap();

    assert_eq!(resumed.cardinality, 5);
    assert_eq!(collect(resumed), all[2..].to_vec());
}

#[test]
fn test_search_offset_past_end() {
    let source = example_source();
    let pattern = TriplePattern::parse("?s", "?p", "?o").unwrap();

    let scan = source.search(&pattern, 100).unwrap();

    assert_eq!(scan.cardinality, 5);
    assert!(!scan.cursor.has_next());
}

#[test]
fn test_search_unknown_term_is_empty() {
    let source = example_source();
    let pattern = TriplePattern::parse("?s", "<http://example.com/unknown>", "?o").unwrap();

    let scan = source.search(&pattern, 0).unwrap();

    assert_eq!(scan.cardinality, 0);
    assert!(collect(scan).is_empty());
}

#[test]
fn test_search_unknown_graph_is_empty() {
    let source = example_source();
    let pattern = TriplePattern::parse("?s", "?p", "?o")
        .unwrap()
        .in_graph(NamedNode::new_unchecked("http://example.com/missing").into());

    let scan = source.search(&pattern, 0).unwrap();

    assert_eq!(scan.cardinality, 0);
    assert!(!source
        .contains_graph(&NamedNode::new_unchecked("http://example.com/missing").into())
        .unwrap());
}

#[test]
fn test_named_graphs_are_separate() {
    let source = example_source();
    let graph = GraphName::from(NamedNode::new_unchecked("http://example.com/g"));
    source
        .insert(&Quad::new(
            NamedNode::new_unchecked("http://example.com/s0"),
            NamedNode::new_unchecked("http://example.com/q"),
            Literal::new_simple_literal("in graph"),
            graph.clone(),
        ))
        .unwrap();

    let default_graph = TriplePattern::parse("?s", "<http://example.com/q>", "?o").unwrap();
    let named_graph = default_graph.clone().in_graph(graph.clone());

    assert_eq!(source.search(&default_graph, 0).unwrap().cardinality, 0);
    assert_eq!(source.search(&named_graph, 0).unwrap().cardinality, 1);
    assert_eq!(source.named_graphs().unwrap(), vec![graph]);
}

#[test]
fn test_load_ntriples() {
    let source = MemPatternSource::new();
    let data = r#"
<http://example.com/a> <http://example.com/name> "A" .
<http://example.com/b> <http://example.com/name> "B" .
"#;

    let inserted = source
        .load(RdfFormat::NTriples, data.as_bytes(), false)
        .unwrap();

    assert_eq!(inserted, 2);
    let pattern = TriplePattern::parse("?s", "<http://example.com/name>", "\"B\"").unwrap();
    let triples = collect(source.search(&pattern, 0).unwrap());
    insta::assert_snapshot!(triples[0].subject, @"<http://example.com/b>");
}

#[test]
fn test_load_lenient_skips_invalid_statements() {
    let data = r#"
<http://example.com/a> <http://example.com/name> "A" .
<http://example.com/c> "not a predicate" "C" .
<http://example.com/b> <http://example.com/name> "B" .
"#;

    let strict = MemPatternSource::new();
    assert!(strict
        .load(RdfFormat::NTriples, data.as_bytes(), false)
        .is_err());
    assert_eq!(strict.len().unwrap(), 0);

    let lenient = MemPatternSource::new();
    let inserted = lenient
        .load(RdfFormat::NTriples, data.as_bytes(), true)
        .unwrap();
    assert!(inserted >= 1);
    let pattern = TriplePattern::parse("<http://example.com/a>", "?p", "?o").unwrap();
    assert_eq!(lenient.search(&pattern, 0).unwrap().cardinality, 1);
}

fn collect(mut scan: PatternScan) -> Vec<TermTriple> {
    let mut triples = Vec::new();
    while let Some(triple) = scan.cursor.next_triple().unwrap() {
        triples.push(triple);
    }
    triples
}

fn example_quad(i: usize) -> Quad {
    Quad::new(
        NamedNode::new_unchecked(format!("http://example.com/s{i}")),
        NamedNode::new_unchecked("http://example.com/p"),
        Literal::new_simple_literal(format!("value {i}")),
        GraphName::DefaultGraph,
    )
}

fn example_source() -> MemPatternSource {
    let source = MemPatternSource::new();
    source.extend((0..5).map(example_quad)).unwrap();
    source
}
