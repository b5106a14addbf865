// tests/query_tests.rs
use arangorm::{BindValue, BindVars, DocumentId, Error, FilterOption, Query};

fn clean(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn flights_query() -> Query {
    let mut q = Query::new("flights");
    q.inbound(DocumentId::new("airports", "BIS")).limit(100);
    q.name_vertex("airport");
    q.name_edge("flight");

    let flight = q.edge.clone();
    q.filter(FilterOption::new("Month", 1).target(&flight))
        .or(FilterOption::new("Day", 5).target(&flight).operation(">="))
        .and(FilterOption::new("Day", 7).target(&flight).operation("<="));

    let airport = q.vertex.clone();
    q.returns(format!("city: {}.city", airport));
    q.returns(format!("time: {}.ArrTimeUTC", flight));
    q.returns(airport.name());

    q
}

#[test]
fn test_traversal_query() {
    let expected = clean(
        "
         FOR airport, flight IN INBOUND 'airports/BIS' flights
            FILTER flight.Month == @Month1
                OR flight.Day >= @Day2
                AND flight.Day <= @Day3
            LIMIT @_limit
         RETURN {
            city: airport.city,
            time: flight.ArrTimeUTC,
            airport
         }",
    );

    let mut expected_vars = BindVars::new();
    expected_vars
        .insert("Month1".to_string(), BindValue::Int(1))
        .unwrap();
    expected_vars
        .insert("Day2".to_string(), BindValue::Int(5))
        .unwrap();
    expected_vars
        .insert("Day3".to_string(), BindValue::Int(7))
        .unwrap();
    expected_vars
        .insert("_limit".to_string(), BindValue::Int(100))
        .unwrap();

    let q = flights_query();
    let compiled = q.compile().unwrap();

    assert_eq!(clean(&compiled.text), expected);
    assert_eq!(compiled.bind_vars, expected_vars);
}

#[test]
fn test_filter_lines_match_grammar() {
    let q = flights_query();
    let compiled = q.compile().unwrap();

    let mut seen = 0;
    for line in compiled.text.lines() {
        let trimmed = line.trim_start_matches('\t');
        let connector = trimmed.split('\t').next().unwrap_or_default();
        if !matches!(connector, "FILTER" | "AND" | "OR") {
            continue;
        }
        seen += 1;

        // <connector>\t<element>.<property>\t<operator>\t@<key>
        let tokens: Vec<&str> = trimmed.split('\t').collect();
        assert_eq!(tokens.len(), 4, "unexpected filter line: {:?}", line);
        assert!(tokens[1].contains('.'), "missing element prefix: {:?}", line);
        let key = tokens[3].strip_prefix('@').unwrap();
        assert!(compiled.bind_vars.contains_key(key));
    }
    assert_eq!(seen, 3);

    // One entry per filter node plus _limit.
    assert_eq!(compiled.bind_vars.len(), 4);
}

#[test]
fn test_document_scan_defaults() {
    let q = Query::new("users");
    let compiled = q.compile().unwrap();

    assert_eq!(clean(&compiled.text), "FORdocumentINusersRETURNdocument");
    assert!(compiled.bind_vars.is_empty());
}

#[test]
fn test_default_operator_and_target() {
    let mut q = Query::new("users");
    q.filter(FilterOption::new("name", "bob"));

    let compiled = q.compile().unwrap();
    assert!(compiled.text.contains("document.name\t==\t@name1"));
    assert_eq!(
        compiled.bind_vars.get("name1"),
        Some(&BindValue::String("bob".to_string()))
    );
}

// Pins the current fallback: an omitted target resolves to the document
// alias even on an edge traversal, where the document alias never appears
// in the FOR clause.
#[test]
fn test_edge_query_default_target_is_document_alias() {
    let mut q = Query::new("flights");
    q.inbound(DocumentId::new("airports", "BIS"));
    q.filter(FilterOption::new("Month", 1));

    let compiled = q.compile().unwrap();
    assert!(compiled.text.contains("document.Month\t==\t@Month1"));
}

#[test]
fn test_missing_start_vertex_fails() {
    let mut q = Query::new("flights");
    q.outbound("");

    match q.compile() {
        Err(Error::MissingDirective) => {}
        other => panic!("expected MissingDirective, got {:?}", other.map(|c| c.text)),
    }
}

#[test]
fn test_repeated_property_gets_unique_keys() {
    let mut q = Query::new("flights");
    q.filter(FilterOption::new("Day", 5).operation(">="));
    q.filter(FilterOption::new("Day", 7).operation("<="));

    let compiled = q.compile().unwrap();
    assert_eq!(compiled.bind_vars.get("Day1"), Some(&BindValue::Int(5)));
    assert_eq!(compiled.bind_vars.get("Day2"), Some(&BindValue::Int(7)));
    assert_eq!(compiled.bind_vars.len(), 2);
}

#[test]
fn test_keys_number_in_render_order_across_groups() {
    let mut q = Query::new("events");
    q.filter(FilterOption::new("kind", "signup"))
        .or(FilterOption::new("kind", "login"));
    q.filter(FilterOption::new("year", 2026));

    let compiled = q.compile().unwrap();
    assert_eq!(
        compiled.bind_vars.get("kind1"),
        Some(&BindValue::String("signup".to_string()))
    );
    assert_eq!(
        compiled.bind_vars.get("kind2"),
        Some(&BindValue::String("login".to_string()))
    );
    assert_eq!(compiled.bind_vars.get("year3"), Some(&BindValue::Int(2026)));

    // Groups compile as successive blocks in call order.
    let first = compiled.text.find("@kind1").unwrap();
    let second = compiled.text.find("@kind2").unwrap();
    let third = compiled.text.find("@year3").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_flat_chaining_keeps_call_order() {
    let mut q = Query::new("flights");
    q.inbound(DocumentId::new("airports", "BIS"));
    q.name_edge("flight");

    let flight = q.edge.clone();
    q.filter(FilterOption::new("Month", 1).target(&flight))
        .or(FilterOption::new("Day", 5).target(&flight).operation(">="))
        .and(FilterOption::new("Day", 7).target(&flight).operation("<="));

    let compiled = q.compile().unwrap();

    // or/and return the group, not the appended child — the clause stays a
    // flat sequence in call order.
    let filter = compiled.text.find("FILTER\tflight.Month").unwrap();
    let or = compiled.text.find("\tOR\tflight.Day\t>=").unwrap();
    let and = compiled.text.find("\tAND\tflight.Day\t<=").unwrap();
    assert!(filter < or && or < and);
}

#[test]
fn test_limit_zero_emits_no_limit_clause() {
    let q = Query::new("users");
    let compiled = q.compile().unwrap();

    assert!(!compiled.text.contains("LIMIT"));
    assert!(compiled.bind_vars.get("_limit").is_none());
}

#[test]
fn test_limit_binds_value() {
    let mut q = Query::new("users");
    q.limit(25);

    let compiled = q.compile().unwrap();
    assert!(compiled.text.contains("LIMIT @_limit"));
    assert_eq!(compiled.bind_vars.get("_limit"), Some(&BindValue::Int(25)));
}

#[test]
fn test_edge_default_return_pairs_aliases() {
    let mut q = Query::new("flights");
    q.any(DocumentId::new("airports", "BIS"));
    q.name_vertex("airport").name_edge("flight");

    let compiled = q.compile().unwrap();
    assert!(compiled.text.contains("ANY"));
    assert!(clean(&compiled.text).ends_with("RETURN{airport,flight}"));
}

#[test]
fn test_depth_segment_emitted_verbatim() {
    let mut q = Query::new("flights");
    q.outbound(DocumentId::new("airports", "BIS")).depth("1..3");

    let compiled = q.compile().unwrap();
    assert!(
        clean(&compiled.text).contains("OUTBOUND1..3'airports/BIS'flights"),
        "text was: {}",
        compiled.text
    );
}

#[test]
fn test_compile_is_deterministic() {
    let q = flights_query();

    let first = q.compile().unwrap();
    let second = q.compile().unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.bind_vars, second.bind_vars);
}

#[test]
fn test_bind_vars_reject_duplicate_key() {
    let mut vars = BindVars::new();
    vars.insert("Day1".to_string(), BindValue::Int(5)).unwrap();

    match vars.insert("Day1".to_string(), BindValue::Int(7)) {
        Err(Error::ParameterCollision(key)) => assert_eq!(key, "Day1"),
        other => panic!("expected ParameterCollision, got {:?}", other),
    }
    // The original entry is untouched.
    assert_eq!(vars.get("Day1"), Some(&BindValue::Int(5)));
}

#[test]
fn test_bind_vars_merge_rejects_collision() {
    let mut base = BindVars::new();
    base.insert("Month1".to_string(), BindValue::Int(1)).unwrap();

    let mut other = BindVars::new();
    other
        .insert("Month1".to_string(), BindValue::Int(2))
        .unwrap();

    assert!(matches!(
        base.merge(other),
        Err(Error::ParameterCollision(_))
    ));
}

#[test]
fn test_document_id_formatting() {
    let id = DocumentId::new("airports", "BIS");
    assert_eq!(id.as_str(), "airports/BIS");
    assert!(!id.is_empty());
    assert!(DocumentId::from("").is_empty());
}
