use rdf_sage_engine::{QueryEvaluationError, SageQuery};

#[test]
fn test_parse_bgp_with_projection() {
    let query = SageQuery::parse(
        "PREFIX ex: <http://ex.org/> SELECT ?name WHERE { ?s ex:name ?name . ?s ex:age ?age }",
        None,
    )
    .unwrap();

    insta::assert_snapshot!(query, @"SELECT ?name WHERE { { ?s <http://ex.org/name> ?name . ?s <http://ex.org/age> ?age . } }");
}

#[test]
fn test_parse_blank_nodes_as_variables() {
    let query = SageQuery::parse(
        "SELECT ?o WHERE { _:b <http://ex.org/p> ?o . _:b <http://ex.org/q> [] }",
        None,
    )
    .unwrap();

    let branch = &query.branches()[0];
    let subjects = branch
        .patterns
        .patterns
        .iter()
        .map(|pattern| pattern.subject.to_string())
        .collect::<Vec<_>>();
    assert_eq!(subjects[0], subjects[1]);
    assert_eq!(branch.patterns.variables().len(), 3);
    assert_eq!(query.projection().map(<[_]>::len), Some(1));
}

#[test]
fn test_blank_node_variables_avoid_query_variables() {
    let query = SageQuery::parse(
        "SELECT * WHERE { \
            _:b <http://ex.org/p> ?_bnode0 . ?s <http://ex.org/q> ?_bnode1 \
            FILTER(!BOUND(?_bnode2)) }",
        None,
    )
    .unwrap();

    let branch = &query.branches()[0];
    insta::assert_snapshot!(branch.patterns.patterns[0], @"?_bnode3 <http://ex.org/p> ?_bnode0");
    assert_eq!(branch.patterns.variables().len(), 4);
}

#[test]
fn test_parse_filter_distributes_over_union() {
    let query = SageQuery::parse(
        "SELECT * WHERE { { ?s <http://ex.org/a> ?x } UNION { ?s <http://ex.org/b> ?x } FILTER(?x > 2 && isLiteral(?x)) }",
        None,
    )
    .unwrap();

    assert_eq!(query.branches().len(), 2);
    for branch in query.branches() {
        let filter = branch.filter.as_ref().map(ToString::to_string);
        insta::allow_duplicates! {
            insta::assert_snapshot!(filter.unwrap_or_default(), @r#"((?x > "2"^^<http://www.w3.org/2001/XMLSchema#integer>) && isLiteral(?x))"#);
        }
    }
}

#[test]
fn test_parse_graph_clause() {
    let query = SageQuery::parse(
        "SELECT * WHERE { GRAPH <http://ex.org/g> { ?s ?p ?o } }",
        None,
    )
    .unwrap();

    let patterns = &query.branches()[0].patterns.patterns;
    insta::assert_snapshot!(patterns[0], @"?s ?p ?o GRAPH <http://ex.org/g>");
}

#[test]
fn test_parse_join_of_unions() {
    let query = SageQuery::parse(
        "SELECT * WHERE { { ?s <http://ex.org/a> ?x } UNION { ?s <http://ex.org/b> ?x } ?s <http://ex.org/c> ?y }",
        None,
    )
    .unwrap();

    assert_eq!(query.branches().len(), 2);
    assert!(query.branches().iter().all(|branch| branch.patterns.len() == 2));
}

#[test]
fn test_unsupported_query_shapes() {
    for query in [
        "SELECT * WHERE { ?s ?p ?o OPTIONAL { ?o ?q ?r } }",
        "SELECT * WHERE { GRAPH ?g { ?s ?p ?o } }",
        "SELECT DISTINCT * WHERE { ?s ?p ?o }",
        "SELECT * WHERE { ?s ?p ?o } LIMIT 10",
        "SELECT * WHERE { ?s <http://ex.org/p>+ ?o }",
        "SELECT * WHERE { ?s ?p ?o FILTER(REGEX(?o, \"a\")) }",
        "SELECT * WHERE { ?s ?p ?o FILTER EXISTS { ?o ?q ?r } }",
        "ASK { ?s ?p ?o }",
        "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
        "SELECT * FROM <http://ex.org/g> WHERE { ?s ?p ?o }",
    ] {
        let result = SageQuery::parse(query, None);
        assert!(
            matches!(result, Err(QueryEvaluationError::UnsupportedQueryShape(_))),
            "{query} should be unsupported but was {result:?}"
        );
    }
}

#[test]
fn test_nested_filter_over_outer_variables_is_unsupported() {
    let result = SageQuery::parse(
        "SELECT * WHERE { ?s <http://ex.org/a> ?x { ?s <http://ex.org/b> ?y FILTER(?x = ?y) } }",
        None,
    );

    assert!(matches!(
        result,
        Err(QueryEvaluationError::UnsupportedQueryShape(_))
    ));
}

#[test]
fn test_syntax_error() {
    let result = SageQuery::parse("SELECT * WHERE { ?s ?p }", None);

    assert!(matches!(result, Err(QueryEvaluationError::Parsing(_))));
}
