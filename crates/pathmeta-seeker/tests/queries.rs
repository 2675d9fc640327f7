//! Query scenarios over fetched records.

use pathmeta_seeker::{
    MetadataRecord, Op, Operand, OrderBy, Predicate, QueryError, ResultSet, FILE_PATH_KEY,
};

fn person(name: &str, age: Option<&str>) -> MetadataRecord {
    let mut record = MetadataRecord::new()
        .with(FILE_PATH_KEY, format!("people/{name}.json"))
        .with("name", name);
    if let Some(age) = age {
        record.insert("age", age);
    }
    record
}

fn people() -> ResultSet {
    ResultSet::fetched(
        "people",
        vec![
            person("ann", Some("7")),
            person("bob", Some("10")),
            person("cid", Some("3")),
            person("dee", None),
        ],
        "",
    )
}

fn names(set: &ResultSet) -> Vec<String> {
    set.iter()
        .filter_map(|r| r.get("name").map(str::to_string))
        .collect()
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn ordering_predicates_use_numeric_runs() {
    let set = people().apply_predicates(&["age >= 7"]).unwrap();
    assert_eq!(names(&set), vec!["ann", "bob"]);

    let set = people().apply_predicates(&["age < 10"]).unwrap();
    assert_eq!(names(&set), vec!["ann", "cid"]);
}

#[test]
fn presence_predicates() {
    let absent = people().apply_predicates(&["age is None"]).unwrap();
    assert_eq!(names(&absent), vec!["dee"]);

    let present = people().apply_predicates(&["age is not None"]).unwrap();
    assert_eq!(names(&present), vec!["ann", "bob", "cid"]);
}

#[test]
fn not_equal_skips_records_without_the_key() {
    let set = people().apply_predicates(&["age != 7"]).unwrap();
    assert_eq!(names(&set), vec!["bob", "cid"]);
}

#[test]
fn list_membership() {
    let set = people()
        .apply_predicates(&["name in ['ann', \"cid\", eve]"])
        .unwrap();
    assert_eq!(names(&set), vec!["ann", "cid"]);

    let set = people().apply_predicates(&["name not in [ann, cid]"]).unwrap();
    assert_eq!(names(&set), vec!["bob", "dee"]);
}

#[test]
fn unknown_operator_is_a_syntax_error() {
    let err = people().apply_predicates(&["key ~= value"]).unwrap_err();
    assert!(matches!(err, QueryError::Syntax { .. }));
    assert_eq!(err.predicate(), "key ~= value");
    assert_eq!(
        err.to_string(),
        "invalid predicate 'key ~= value': unknown operator '~='"
    );
}

#[test]
fn presence_with_other_operand_is_invalid() {
    let err = people().apply_predicates(&["age is 7"]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperand { .. }));
}

#[test]
fn typed_predicates_skip_parsing() {
    let older = Predicate::new("age", Op::Gt, Operand::Value("5".into())).unwrap();
    let set = people().where_all(&[older, Predicate::present("name")]);
    assert_eq!(names(&set), vec!["ann", "bob"]);
}

// ============================================================================
// Conditions and sorting
// ============================================================================

#[test]
fn conditions_include_file_paths() {
    let set = people().apply_condition_set("people/bob.json,dee");
    assert_eq!(names(&set), vec!["bob", "dee"]);
}

#[test]
fn sort_by_multiple_keys() {
    let set = ResultSet::new(vec![
        MetadataRecord::new().with("g", "b").with("n", "2"),
        MetadataRecord::new().with("g", "a").with("n", "10"),
        MetadataRecord::new().with("g", "a").with("n", "9"),
        MetadataRecord::new().with("n", "1"),
    ]);
    let sorted = set.sort_by(&[OrderBy::asc("g"), OrderBy::desc("n")]);
    let ns: Vec<_> = sorted.iter().filter_map(|r| r.get("n")).collect();
    assert_eq!(ns, vec!["10", "9", "2", "1"]);
}

#[test]
fn sorting_missing_values_last() {
    let sorted = people().sort_by(&[OrderBy::desc("age")]);
    assert_eq!(names(&sorted), vec!["bob", "ann", "cid", "dee"]);
}

// ============================================================================
// Combination
// ============================================================================

#[test]
fn concat_and_union() {
    let young = people().apply_predicates(&["age <= 7"]).unwrap();
    let named = people().apply_condition_set("ann,bob");

    let both = &young + &named;
    assert_eq!(names(&both), vec!["ann", "cid", "ann", "bob"]);

    let either = &young | &named;
    assert_eq!(names(&either), vec!["ann", "cid", "bob"]);
}

#[test]
fn combined_description_lists_every_operand() {
    let a = people().apply_condition_set("ann");
    let b = people().apply_predicates(&["age >= 7"]).unwrap();
    let c = people().sort_by(&[OrderBy::asc("age")]);

    let combined = &a | &(&b + &c);
    assert_eq!(combined.operand_count(), 3);
    assert_eq!(
        combined.describe(),
        "======ResultSets======\n\
         ResultSet1(source='people', conditions='ann', predicates=[], sort_keys=[], records=1)\n\
         ResultSet2(source='people', conditions=None, predicates=['age >= 7'], sort_keys=[], records=2)\n\
         ResultSet3(source='people', conditions=None, predicates=[], sort_keys=['age asc'], records=4)\n\
         ===Expressions===\n\
         ResultSet1 or (ResultSet2 + ResultSet3)"
    );
}

#[test]
fn file_entries() {
    let files = people().apply_predicates(&["age > 5"]).unwrap().files();
    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["people/ann.json", "people/bob.json"]);
    assert!(!files[0].metadata.contains_key(FILE_PATH_KEY));
}

#[test]
fn records_serialize_as_plain_maps() {
    let record = MetadataRecord::new().with("a", "1");
    assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"a":"1"}"#);
    let back: MetadataRecord = serde_json::from_str(r#"{"a":"1"}"#).unwrap();
    assert_eq!(back, record);
}
