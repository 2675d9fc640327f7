//! Provenance of a result set, rendered as a human-readable description.
//!
//! A set fetched from a store is a leaf. Combining sets builds an expression
//! tree over the leaves. Rendering is a pure function of that tree:
//!
//! ```text
//! ======ResultSets======
//! ResultSet1(source='voice', conditions='E', predicates=[], sort_keys=[], records=2)
//! ResultSet2(source='voice', conditions=None, predicates=['age >= 7'], sort_keys=[], records=3)
//! ===Expressions===
//! ResultSet1 or ResultSet2
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

const NAME: &str = "ResultSet";
const SETS_HEADER: &str = "======ResultSets======\n";
const EXPRESSIONS_HEADER: &str = "===Expressions===\n";

/// The state of one result set at the time it entered an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub source: Option<String>,
    pub conditions: Vec<String>,
    pub predicates: Vec<String>,
    pub sort_keys: Vec<String>,
    pub record_count: usize,
}

impl Snapshot {
    fn render_line(&self, label: &str) -> String {
        format!(
            "{label}(source={}, conditions={}, predicates={}, sort_keys={}, records={})",
            quote_opt(self.source.as_deref()),
            if self.conditions.is_empty() {
                "None".to_string()
            } else {
                quote(&self.conditions.join(","))
            },
            list(&self.predicates),
            list(&self.sort_keys),
            self.record_count,
        )
    }
}

/// A transform applied on top of a combined set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub conditions: Vec<String>,
    pub predicates: Vec<String>,
    pub sort_keys: Vec<String>,
}

/// How a result set was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Leaf(Arc<Snapshot>),
    Concat(Arc<Expr>, Arc<Expr>),
    Union(Arc<Expr>, Arc<Expr>),
    Filter(Arc<Expr>, Step),
}

impl Expr {
    /// Number of leaf sets in the expression.
    pub fn operand_count(&self) -> usize {
        match self {
            Expr::Leaf(_) => 1,
            Expr::Concat(a, b) | Expr::Union(a, b) => a.operand_count() + b.operand_count(),
            Expr::Filter(inner, _) => inner.operand_count(),
        }
    }

    fn leaves<'a>(&'a self, out: &mut Vec<&'a Snapshot>) {
        match self {
            Expr::Leaf(snapshot) => out.push(snapshot),
            Expr::Concat(a, b) | Expr::Union(a, b) => {
                a.leaves(out);
                b.leaves(out);
            }
            Expr::Filter(inner, _) => inner.leaves(out),
        }
    }

    fn write_expression(&self, next_label: &mut usize, out: &mut String) {
        match self {
            Expr::Leaf(_) => {
                *next_label += 1;
                let _ = write!(out, "{NAME}{next_label}");
            }
            Expr::Concat(a, b) => {
                a.write_expression(next_label, out);
                out.push_str(" + ");
                b.write_expression(next_label, out);
            }
            Expr::Union(a, b) => {
                a.write_operand(next_label, out);
                out.push_str(" or ");
                b.write_operand(next_label, out);
            }
            Expr::Filter(inner, step) => {
                inner.write_operand(next_label, out);
                let _ = write!(
                    out,
                    ".filter(conditions={}, predicates={}, sort_keys={})",
                    if step.conditions.is_empty() {
                        "None".to_string()
                    } else {
                        quote(&step.conditions.join(","))
                    },
                    list(&step.predicates),
                    list(&step.sort_keys),
                );
            }
        }
    }

    /// Writes a side of a binary expression, parenthesised when it has more
    /// than one operand.
    fn write_operand(&self, next_label: &mut usize, out: &mut String) {
        if self.operand_count() > 1 {
            out.push('(');
            self.write_expression(next_label, out);
            out.push(')');
        } else {
            self.write_expression(next_label, out);
        }
    }

    /// Renders the description of a set built by this expression.
    pub fn render(&self) -> String {
        if let Expr::Leaf(snapshot) = self {
            return snapshot.render_line(NAME);
        }

        let mut leaves = Vec::new();
        self.leaves(&mut leaves);

        let mut out = String::from(SETS_HEADER);
        for (i, leaf) in leaves.iter().enumerate() {
            out.push_str(&leaf.render_line(&format!("{NAME}{}", i + 1)));
            out.push('\n');
        }
        out.push_str(EXPRESSIONS_HEADER);
        self.write_expression(&mut 0, &mut out);
        out
    }
}

fn quote(text: &str) -> String {
    format!("'{text}'")
}

fn quote_opt(text: Option<&str>) -> String {
    text.map(quote).unwrap_or_else(|| "None".to_string())
}

fn list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}
