//! Result sets: ordered records plus the provenance that produced them.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, BitOr, Index};
use std::sync::Arc;

use crate::error::Result;
use crate::ordering::{compare_records, OrderBy};
use crate::predicate::Predicate;
use crate::provenance::{Expr, Snapshot, Step};
use crate::record::{FileEntry, MetadataRecord, FILE_PATH_KEY};

/// An immutable, ordered collection of metadata records.
///
/// Every transform returns a new set; records are shared behind an [`Arc`]
/// until a transform actually changes them.
///
/// # Example
///
/// ```
/// use pathmeta_seeker::{MetadataRecord, OrderBy, ResultSet};
///
/// let records = vec![
///     MetadataRecord::new().with("name", "a").with("age", "7"),
///     MetadataRecord::new().with("name", "b").with("age", "10"),
///     MetadataRecord::new().with("name", "c").with("age", "3"),
/// ];
/// let set = ResultSet::fetched("people", records, "");
///
/// let adults = set
///     .apply_predicates(&["age >= 7"])
///     .unwrap()
///     .sort_by(&[OrderBy::desc("age")]);
///
/// let names: Vec<_> = adults.iter().filter_map(|r| r.get("name")).collect();
/// assert_eq!(names, vec!["b", "a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: Arc<Vec<MetadataRecord>>,
    source: Option<String>,
    conditions: Vec<String>,
    predicates: Vec<Predicate>,
    sort_keys: Vec<OrderBy>,
    expr: Option<Arc<Expr>>,
}

impl ResultSet {
    /// Wraps records with no provenance.
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        ResultSet {
            records: Arc::new(records),
            ..Default::default()
        }
    }

    /// Wraps records returned by a store for `source` under the given
    /// comma-separated condition string.
    pub fn fetched(source: impl Into<String>, records: Vec<MetadataRecord>, conditions: &str) -> Self {
        ResultSet {
            records: Arc::new(records),
            source: Some(source.into()),
            conditions: split_conditions(conditions),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Keeps records matching every predicate string.
    ///
    /// All predicates are parsed before any is evaluated, so one malformed
    /// predicate rejects the whole list.
    pub fn apply_predicates<S: AsRef<str>>(&self, predicates: &[S]) -> Result<Self> {
        let parsed = Predicate::parse_all(predicates)?;
        Ok(self.where_all(&parsed))
    }

    /// Keeps records matching every predicate.
    pub fn where_all(&self, predicates: &[Predicate]) -> Self {
        let records = self
            .records
            .iter()
            .filter(|record| predicates.iter().all(|p| p.matches(record)))
            .cloned()
            .collect();

        let mut next = self.derive(records);
        union_into(&mut next.predicates, predicates);
        next.push_step(&[], predicates, &[]);
        next
    }

    /// Keeps records having at least one value (under any key, the file path
    /// included) equal to one of the comma-separated condition tokens.
    ///
    /// An empty condition string keeps every record.
    pub fn apply_condition_set(&self, conditions: &str) -> Self {
        let tokens = split_conditions(conditions);
        if tokens.is_empty() {
            return self.clone();
        }

        let records = self
            .records
            .iter()
            .filter(|record| record.values().any(|v| tokens.iter().any(|t| t == v)))
            .cloned()
            .collect();

        let mut next = self.derive(records);
        union_into(&mut next.conditions, &tokens);
        next.push_step(&tokens, &[], &[]);
        next
    }

    /// Stable multi-key sort; records missing a key sort last for it.
    pub fn sort_by(&self, keys: &[OrderBy]) -> Self {
        let mut records = self.records.to_vec();
        records.sort_by(|a, b| compare_records(a, b, keys));

        let mut next = self.derive(records);
        next.sort_keys = keys.to_vec();
        next.push_step(&[], &[], keys);
        next
    }

    /// Condition filter, then predicates, then sort, in one step.
    pub fn filter<S: AsRef<str>>(
        &self,
        conditions: &str,
        predicates: &[S],
        sort_keys: &[OrderBy],
    ) -> Result<Self> {
        let parsed = Predicate::parse_all(predicates)?;
        let tokens = split_conditions(conditions);

        let mut records: Vec<MetadataRecord> = self
            .records
            .iter()
            .filter(|record| {
                tokens.is_empty() || record.values().any(|v| tokens.iter().any(|t| t == v))
            })
            .filter(|record| parsed.iter().all(|p| p.matches(record)))
            .cloned()
            .collect();
        if !sort_keys.is_empty() {
            records.sort_by(|a, b| compare_records(a, b, sort_keys));
        }

        let mut next = self.derive(records);
        union_into(&mut next.conditions, &tokens);
        union_into(&mut next.predicates, &parsed);
        if !sort_keys.is_empty() {
            next.sort_keys = sort_keys.to_vec();
        }
        next.push_step(&tokens, &parsed, sort_keys);
        Ok(next)
    }

    /// Ordered concatenation; duplicates are kept.
    pub fn concat(&self, other: &ResultSet) -> Self {
        let records = self.iter().chain(other.iter()).cloned().collect();
        self.combine(other, records, Expr::Concat)
    }

    /// Concatenation without duplicate records; the first occurrence wins.
    pub fn union(&self, other: &ResultSet) -> Self {
        let mut seen = HashSet::new();
        let records = self
            .iter()
            .chain(other.iter())
            .filter(|record| seen.insert(*record))
            .cloned()
            .collect();
        self.combine(other, records, Expr::Union)
    }

    fn combine(
        &self,
        other: &ResultSet,
        records: Vec<MetadataRecord>,
        node: fn(Arc<Expr>, Arc<Expr>) -> Expr,
    ) -> Self {
        let mut conditions = self.conditions.clone();
        union_into(&mut conditions, &other.conditions);

        let mut predicates = self.predicates.clone();
        union_into(&mut predicates, &other.predicates);

        let source = match (&self.source, &other.source) {
            (Some(a), Some(b)) if a != b => Some(format!("{a},{b}")),
            (a, b) => a.clone().or_else(|| b.clone()),
        };

        ResultSet {
            records: Arc::new(records),
            source,
            conditions,
            predicates,
            sort_keys: Vec::new(),
            expr: Some(Arc::new(node(self.expression(), other.expression()))),
        }
    }

    /// A new set with the given records and this set's provenance.
    fn derive(&self, records: Vec<MetadataRecord>) -> Self {
        ResultSet {
            records: Arc::new(records),
            ..self.clone()
        }
    }

    /// Records a transform on a combined set in its expression tree.
    fn push_step(&mut self, conditions: &[String], predicates: &[Predicate], sort_keys: &[OrderBy]) {
        if let Some(inner) = self.expr.take() {
            let step = Step {
                conditions: conditions.to_vec(),
                predicates: predicates.iter().map(ToString::to_string).collect(),
                sort_keys: sort_keys.iter().map(ToString::to_string).collect(),
            };
            self.expr = Some(Arc::new(Expr::Filter(inner, step)));
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            source: self.source.clone(),
            conditions: self.conditions.clone(),
            predicates: self.predicates.iter().map(ToString::to_string).collect(),
            sort_keys: self.sort_keys.iter().map(ToString::to_string).collect(),
            record_count: self.len(),
        }
    }

    /// The expression that built this set; a leaf for uncombined sets.
    pub fn expression(&self) -> Arc<Expr> {
        match &self.expr {
            Some(expr) => Arc::clone(expr),
            None => Arc::new(Expr::Leaf(Arc::new(self.snapshot()))),
        }
    }

    /// Number of fetched sets this set was built from.
    pub fn operand_count(&self) -> usize {
        self.expr.as_ref().map_or(1, |expr| expr.operand_count())
    }

    /// Human-readable description of how this set was built.
    pub fn describe(&self) -> String {
        self.expression().render()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MetadataRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Records that carry a file path, as file entries.
    pub fn files(&self) -> Vec<FileEntry> {
        self.iter().filter_map(FileEntry::from_record).collect()
    }

    /// File paths of the records that have one.
    pub fn paths(&self) -> Vec<&str> {
        self.iter().filter_map(MetadataRecord::path).collect()
    }

    /// Record attributes without the file path.
    pub fn items(&self) -> Vec<MetadataRecord> {
        self.iter()
            .map(|record| {
                record
                    .iter()
                    .filter(|(k, _)| *k != FILE_PATH_KEY)
                    .collect()
            })
            .collect()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort_keys(&self) -> &[OrderBy] {
        &self.sort_keys
    }
}

fn split_conditions(conditions: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in conditions.split(',').filter(|t| !t.is_empty()) {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Appends the items of `extra` not already in `target`, keeping order.
fn union_into<T: PartialEq + Clone>(target: &mut Vec<T>, extra: &[T]) {
    for item in extra {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

impl Index<usize> for ResultSet {
    type Output = MetadataRecord;

    fn index(&self, index: usize) -> &MetadataRecord {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a MetadataRecord;
    type IntoIter = std::slice::Iter<'a, MetadataRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Add for &ResultSet {
    type Output = ResultSet;

    fn add(self, other: Self) -> ResultSet {
        self.concat(other)
    }
}

impl BitOr for &ResultSet {
    type Output = ResultSet;

    fn bitor(self, other: Self) -> ResultSet {
        self.union(other)
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Vec<MetadataRecord>> for ResultSet {
    fn from(records: Vec<MetadataRecord>) -> Self {
        ResultSet::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> MetadataRecord {
        pairs.iter().copied().collect()
    }

    fn ages() -> ResultSet {
        ResultSet::fetched(
            "people",
            vec![
                rec(&[("name", "a"), ("age", "7")]),
                rec(&[("name", "b"), ("age", "10")]),
                rec(&[("name", "c"), ("age", "3")]),
            ],
            "",
        )
    }

    fn names(set: &ResultSet) -> Vec<&str> {
        set.iter().filter_map(|r| r.get("name")).collect()
    }

    #[test]
    fn predicates_compose_as_and() {
        let set = ages().apply_predicates(&["age >= 7", "name != b"]).unwrap();
        assert_eq!(names(&set), vec!["a"]);
        assert_eq!(set.predicates().len(), 2);
    }

    #[test]
    fn one_bad_predicate_rejects_all() {
        assert!(ages().apply_predicates(&["age >= 7", "age ~= 3"]).is_err());
    }

    #[test]
    fn transforms_leave_the_source_untouched() {
        let original = ages();
        let filtered = original.apply_predicates(&["age > 5"]).unwrap();
        assert_eq!(original.len(), 3);
        assert_eq!(filtered.len(), 2);
        assert!(original.predicates().is_empty());
    }

    #[test]
    fn conditions_match_any_value() {
        let set = ResultSet::new(vec![
            rec(&[(FILE_PATH_KEY, "x/a.wav"), ("part", "E")]),
            rec(&[(FILE_PATH_KEY, "x/b.wav"), ("part", "F")]),
            rec(&[(FILE_PATH_KEY, "x/c.wav"), ("part", "G")]),
        ]);
        let kept = set.apply_condition_set("E,x/c.wav");
        assert_eq!(kept.paths(), vec!["x/a.wav", "x/c.wav"]);
        assert_eq!(kept.conditions(), &["E".to_string(), "x/c.wav".to_string()]);
    }

    #[test]
    fn empty_conditions_keep_everything() {
        assert_eq!(ages().apply_condition_set("").len(), 3);
    }

    #[test]
    fn sort_is_stable_and_natural() {
        let set = ResultSet::new(vec![
            rec(&[("name", "a"), ("n", "10")]),
            rec(&[("name", "b"), ("n", "9")]),
            rec(&[("name", "c")]),
            rec(&[("name", "d"), ("n", "9")]),
        ]);
        assert_eq!(names(&set.sort_by(&[OrderBy::asc("n")])), vec!["b", "d", "a", "c"]);
        assert_eq!(names(&set.sort_by(&[OrderBy::desc("n")])), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn filter_runs_all_steps() {
        let set = ages()
            .filter("", &["age >= 3"], &[OrderBy::asc("age")])
            .unwrap();
        assert_eq!(names(&set), vec!["c", "a", "b"]);
        assert_eq!(set.sort_keys(), &[OrderBy::asc("age")]);
    }

    #[test]
    fn concat_keeps_duplicates() {
        let a = ResultSet::new(vec![rec(&[("k", "1")]), rec(&[("k", "2")])]);
        let b = ResultSet::new(vec![rec(&[("k", "2")]), rec(&[("k", "3")])]);
        let both = &a + &b;
        let values: Vec<_> = both.iter().filter_map(|r| r.get("k")).collect();
        assert_eq!(values, vec!["1", "2", "2", "3"]);
    }

    #[test]
    fn union_dedups_first_seen() {
        let a = ResultSet::new(vec![rec(&[("k", "2")]), rec(&[("k", "1")])]);
        let b = ResultSet::new(vec![rec(&[("k", "3")]), rec(&[("k", "2")])]);
        let both = &a | &b;
        let values: Vec<_> = both.iter().filter_map(|r| r.get("k")).collect();
        assert_eq!(values, vec!["2", "1", "3"]);
    }

    #[test]
    fn combination_unions_provenance() {
        let a = ResultSet::fetched("p", vec![], "E,F")
            .apply_predicates(&["x == 1"])
            .unwrap();
        let b = ResultSet::fetched("p", vec![], "F,G")
            .apply_predicates(&["x == 1", "y == 2"])
            .unwrap();
        let both = a.union(&b);
        assert_eq!(both.conditions(), &["E", "F", "G"]);
        assert_eq!(both.predicates().len(), 2);
        assert_eq!(both.source(), Some("p"));
        assert_eq!(both.operand_count(), 2);
    }

    #[test]
    fn describe_single_set() {
        let set = ages().apply_predicates(&["age >= 7"]).unwrap();
        assert_eq!(
            set.describe(),
            "ResultSet(source='people', conditions=None, predicates=['age >= 7'], sort_keys=[], records=2)"
        );
    }

    #[test]
    fn describe_combined_set() {
        let a = ResultSet::fetched("p", vec![rec(&[("k", "1")])], "E");
        let b = ResultSet::fetched("p", vec![rec(&[("k", "2")])], "");
        let c = ResultSet::fetched("p", vec![], "");
        let combined = &(&a + &b) | &c;
        assert_eq!(
            combined.to_string(),
            "======ResultSets======\n\
             ResultSet1(source='p', conditions='E', predicates=[], sort_keys=[], records=1)\n\
             ResultSet2(source='p', conditions=None, predicates=[], sort_keys=[], records=1)\n\
             ResultSet3(source='p', conditions=None, predicates=[], sort_keys=[], records=0)\n\
             ===Expressions===\n\
             (ResultSet1 + ResultSet2) or ResultSet3"
        );
    }

    #[test]
    fn transforms_on_combined_sets_extend_the_expression() {
        let a = ResultSet::fetched("p", vec![rec(&[("k", "1")])], "");
        let b = ResultSet::fetched("p", vec![rec(&[("k", "2")])], "");
        let filtered = (&a | &b).apply_predicates(&["k > 1"]).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered
            .describe()
            .ends_with("(ResultSet1 or ResultSet2).filter(conditions=None, predicates=['k > 1'], sort_keys=[])"));
    }

    #[test]
    fn files_skip_records_without_path() {
        let set = ResultSet::new(vec![
            rec(&[(FILE_PATH_KEY, "a.csv"), ("n", "1")]),
            rec(&[("n", "2")]),
        ]);
        let files = set.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.csv");
        assert_eq!(set.items(), vec![rec(&[("n", "1")]), rec(&[("n", "2")])]);
        assert_eq!(set[1].get("n"), Some("2"));
    }
}
