//! Query predicates: `<key> <operator> <value>`.
//!
//! ```text
//! age >= 7
//! name == 'suzuki'
//! month in [01, "02", '03']
//! comment is None
//! comment is not None
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{QueryError, Result};
use crate::natural::natural_cmp;
use crate::op::Op;
use crate::record::MetadataRecord;

/// The absence marker accepted by `is` / `is not`.
pub const NONE_MARKER: &str = "None";

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'|([^,\s]+)"#).expect("list item pattern is valid")
});

/// The right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A single value for `==`, `!=` and ordering operators.
    Value(String),
    /// A list for `in` / `not in`.
    List(Vec<String>),
    /// The `None` marker for `is` / `is not`.
    Null,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value) => f.write_str(&quoted(value)),
            Operand::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&quoted(item))?;
                }
                f.write_str("]")
            }
            Operand::Null => f.write_str(NONE_MARKER),
        }
    }
}

/// A single typed comparison against one record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    key: String,
    op: Op,
    operand: Operand,
}

impl Predicate {
    /// Builds a predicate, checking that the operand suits the operator.
    pub fn new(key: impl Into<String>, op: Op, operand: Operand) -> Result<Self> {
        let predicate = Predicate {
            key: key.into(),
            op,
            operand,
        };
        let compatible = match &predicate.operand {
            Operand::Value(_) => !op.is_list_op() && !op.is_presence_op(),
            Operand::List(_) => op.is_list_op(),
            Operand::Null => op.is_presence_op(),
        };
        if compatible {
            Ok(predicate)
        } else {
            Err(QueryError::InvalidOperand {
                predicate: predicate.to_string(),
                operand: predicate.operand.to_string(),
            })
        }
    }

    /// `key is None`.
    pub fn absent(key: impl Into<String>) -> Self {
        Predicate {
            key: key.into(),
            op: Op::Is,
            operand: Operand::Null,
        }
    }

    /// `key is not None`.
    pub fn present(key: impl Into<String>) -> Self {
        Predicate {
            key: key.into(),
            op: Op::IsNot,
            operand: Operand::Null,
        }
    }

    /// Parses `<key> <operator> <value>`.
    pub fn parse(text: &str) -> Result<Self> {
        let (key, rest) = next_word(text);
        let (first, rest) = next_word(rest);
        if key.is_empty() || first.is_empty() || rest.trim().is_empty() {
            return Err(QueryError::syntax(
                text,
                "expected '<key> <operator> <value>'",
            ));
        }

        let (second, after) = next_word(rest);
        let two_words =
            Op::from_keyword(&format!("{first} {second}")).filter(|op| op.is_two_words());
        let (op, rest) = match (two_words, Op::from_keyword(first)) {
            (Some(op), _) => (op, after),
            (None, Some(op)) => (op, rest),
            (None, None) => {
                return Err(QueryError::syntax(
                    text,
                    format!("unknown operator '{first}'"),
                ))
            }
        };
        if rest.trim().is_empty() {
            return Err(QueryError::syntax(text, format!("missing value after '{op}'")));
        }

        let key = unquote(key).to_string();
        let value = rest.trim();

        let operand = if op.is_presence_op() {
            if unquote(value) != NONE_MARKER {
                return Err(QueryError::InvalidOperand {
                    predicate: text.to_string(),
                    operand: value.to_string(),
                });
            }
            Operand::Null
        } else if op.is_list_op() {
            Operand::List(parse_list(text, value)?)
        } else {
            Operand::Value(unquote(value).to_string())
        };

        Ok(Predicate { key, op, operand })
    }

    /// Parses every predicate, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Self>> {
        texts.iter().map(|t| Predicate::parse(t.as_ref())).collect()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Evaluates the predicate against a record.
    ///
    /// Apart from `is None`, a record lacking the key never matches.
    pub fn matches(&self, record: &MetadataRecord) -> bool {
        match self.op {
            Op::Is => return !record.contains_key(&self.key),
            Op::IsNot => return record.contains_key(&self.key),
            _ => {}
        }

        let Some(actual) = record.get(&self.key) else {
            return false;
        };

        match (&self.operand, self.op) {
            (Operand::Value(expected), Op::Eq) => actual == expected,
            (Operand::Value(expected), Op::Ne) => actual != expected,
            (Operand::Value(expected), op) if op.is_ordering_op() => {
                op.eval_ordering(natural_cmp(actual, expected))
            }
            (Operand::List(items), Op::In) => items.iter().any(|item| item == actual),
            (Operand::List(items), Op::NotIn) => !items.iter().any(|item| item == actual),
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", quoted(&self.key), self.op, self.operand)
    }
}

impl FromStr for Predicate {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Predicate::parse(s)
    }
}

/// Splits off the first word. A word opening with a quote runs to the
/// matching quote, so quoted keys may contain whitespace.
fn next_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    if let Some(quote) = text.chars().next().filter(|c| matches!(c, '"' | '\'')) {
        if let Some(close) = text[1..].find(quote) {
            return text.split_at(close + 2);
        }
    }
    match text.find(char::is_whitespace) {
        Some(end) => text.split_at(end),
        None => (text, ""),
    }
}

/// Strips one pair of matching single or double quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn quoted(text: &str) -> String {
    if text.is_empty() || text.contains(|c: char| c.is_whitespace() || c == ',') {
        format!("'{text}'")
    } else {
        text.to_string()
    }
}

fn parse_list(predicate: &str, value: &str) -> Result<Vec<String>> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| QueryError::syntax(predicate, format!("expected a list, found '{value}'")))?;

    Ok(LIST_ITEM
        .captures_iter(inner)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> MetadataRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parses_value_predicates() {
        let p = Predicate::parse("age >= 7").unwrap();
        assert_eq!(p.key(), "age");
        assert_eq!(p.op(), Op::Gte);
        assert_eq!(p.operand(), &Operand::Value("7".into()));
    }

    #[test]
    fn unquotes_key_and_value() {
        let p = Predicate::parse("'name' == \"suzuki taro\"").unwrap();
        assert_eq!(p.key(), "name");
        assert_eq!(p.operand(), &Operand::Value("suzuki taro".into()));
    }

    #[test]
    fn parses_two_word_operators() {
        assert_eq!(Predicate::parse("a not in [1]").unwrap().op(), Op::NotIn);
        assert_eq!(Predicate::parse("a is not None").unwrap().op(), Op::IsNot);
        assert_eq!(Predicate::parse("a is None").unwrap().op(), Op::Is);
        assert_eq!(Predicate::parse("a in [1]").unwrap().op(), Op::In);
    }

    #[test]
    fn parses_lists() {
        let p = Predicate::parse("month in [01, \"02\" '0 3',04]").unwrap();
        assert_eq!(
            p.operand(),
            &Operand::List(vec!["01".into(), "02".into(), "0 3".into(), "04".into()])
        );
        let empty = Predicate::parse("month in []").unwrap();
        assert_eq!(empty.operand(), &Operand::List(vec![]));
    }

    #[test]
    fn rejects_short_predicates() {
        assert!(matches!(
            Predicate::parse("age >="),
            Err(QueryError::Syntax { .. })
        ));
        assert!(matches!(Predicate::parse(""), Err(QueryError::Syntax { .. })));
        assert!(matches!(
            Predicate::parse("a not in"),
            Err(QueryError::Syntax { .. })
        ));
    }

    #[test]
    fn rejects_unknown_operators() {
        let err = Predicate::parse("key ~= value").unwrap_err();
        assert_eq!(
            err,
            QueryError::Syntax {
                predicate: "key ~= value".into(),
                reason: "unknown operator '~='".into(),
            }
        );
        assert!(matches!(
            Predicate::parse("a not x b"),
            Err(QueryError::Syntax { .. })
        ));
    }

    #[test]
    fn rejects_unbracketed_lists() {
        assert!(matches!(
            Predicate::parse("a in 1, 2"),
            Err(QueryError::Syntax { .. })
        ));
    }

    #[test]
    fn presence_operators_require_none() {
        let err = Predicate::parse("a is 3").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidOperand {
                predicate: "a is 3".into(),
                operand: "3".into(),
            }
        );
        assert_eq!(err.predicate(), "a is 3");
        assert!(matches!(
            Predicate::parse("a is not null"),
            Err(QueryError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn new_checks_operand_kind() {
        assert!(Predicate::new("a", Op::Eq, Operand::Value("1".into())).is_ok());
        assert!(Predicate::new("a", Op::In, Operand::Value("1".into())).is_err());
        assert!(Predicate::new("a", Op::Is, Operand::List(vec![])).is_err());
        assert_eq!(
            Predicate::new("a", Op::Is, Operand::Null).unwrap(),
            Predicate::absent("a")
        );
    }

    #[test]
    fn equality_excludes_missing_keys() {
        let eq = Predicate::parse("a == 1").unwrap();
        let ne = Predicate::parse("a != 1").unwrap();
        let missing = record(&[("b", "1")]);
        assert!(!eq.matches(&missing));
        assert!(!ne.matches(&missing));
        assert!(ne.matches(&record(&[("a", "2")])));
        assert!(eq.matches(&record(&[("a", "1")])));
    }

    #[test]
    fn ordering_uses_natural_order() {
        let p = Predicate::parse("n > 9").unwrap();
        assert!(p.matches(&record(&[("n", "10")])));
        assert!(!p.matches(&record(&[("n", "8")])));
        assert!(!p.matches(&record(&[("m", "10")])));
    }

    #[test]
    fn membership() {
        let p = Predicate::parse("m not in [1, 2]").unwrap();
        assert!(p.matches(&record(&[("m", "3")])));
        assert!(!p.matches(&record(&[("m", "2")])));
        assert!(!p.matches(&record(&[])));
    }

    #[test]
    fn presence() {
        let with = record(&[("a", "x")]);
        let without = record(&[("b", "x")]);
        assert!(Predicate::absent("a").matches(&without));
        assert!(!Predicate::absent("a").matches(&with));
        assert!(Predicate::present("a").matches(&with));
        assert!(!Predicate::present("a").matches(&without));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(
            Predicate::parse("  age   >=   7 ").unwrap().to_string(),
            "age >= 7"
        );
        assert_eq!(
            Predicate::parse("m in ['a b', c]").unwrap().to_string(),
            "m in ['a b', c]"
        );
        assert_eq!(
            Predicate::parse("a is not None").unwrap().to_string(),
            "a is not None"
        );
    }

    #[test]
    fn display_parses_back() {
        for text in [
            "age >= 7",
            "m in ['a b', c]",
            "a is None",
            "n != 'x y'",
            "'patient id' == 055",
            "\"a b\" not in [x]",
        ] {
            let p: Predicate = text.parse().unwrap();
            assert_eq!(p.to_string().parse::<Predicate>().unwrap(), p);
        }
    }

    #[test]
    fn quoted_keys_may_contain_whitespace() {
        let p = Predicate::parse("'patient id' == 055").unwrap();
        assert_eq!(p.key(), "patient id");
        assert_eq!(p.op(), Op::Eq);
        assert_eq!(p.to_string(), "'patient id' == 055");
        assert!(p.matches(&record(&[("patient id", "055")])));

        let p = Predicate::new("a b", Op::Is, Operand::Null).unwrap();
        assert_eq!(p.to_string().parse::<Predicate>().unwrap(), p);
    }

    #[test]
    fn unterminated_quote_falls_back_to_whitespace() {
        let p = Predicate::parse("'a == b").unwrap();
        assert_eq!(p.key(), "'a");
        assert_eq!(p.operand(), &Operand::Value("b".into()));
    }
}
