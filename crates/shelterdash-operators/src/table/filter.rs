//! Table filter expressions.
//!
//! Grammar: clauses joined by `&&`, each `{column} op value`.
//! Ops: `=`/`eq`, `!=`/`ne`, `<`/`lt`, `<=`/`le`, `>`/`gt`, `>=`/`ge`, `contains`.
//! Values may be quoted with `"` or `'`; unquoted values are inferred
//! (numbers compare numerically).

use std::cmp::Ordering;

use shelterdash_core::prelude::{AnimalRecord, Scalar};

use crate::traits::OpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    column: String,
    op: Op,
    value: Scalar,
}

/// A parsed filter; a row matches when every clause does.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFilter {
    clauses: Vec<Clause>,
}

impl TableFilter {
    pub fn parse(expr: &str) -> Result<Self, OpError> {
        let clauses = expr
            .split("&&")
            .map(parse_clause)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    pub fn matches(&self, row: &AnimalRecord) -> bool {
        self.clauses.iter().all(|c| eval_clause(c, row))
    }
}

fn parse_clause(raw: &str) -> Result<Clause, OpError> {
    let clause = raw.trim();
    let bad = |why: &str| OpError::Filter(format!("{why} in '{clause}'"));

    let rest = clause
        .strip_prefix('{')
        .ok_or_else(|| bad("expected '{column}'"))?;
    let close = rest.find('}').ok_or_else(|| bad("unclosed '{'"))?;
    let column = rest[..close].trim();
    if column.is_empty() {
        return Err(bad("empty column name"));
    }
    let rest = rest[close + 1..].trim_start();

    let (op, literal) = split_op(rest).ok_or_else(|| bad("missing operator"))?;
    let literal = literal.trim();
    if literal.is_empty() {
        return Err(bad("missing value"));
    }

    Ok(Clause {
        column: column.to_string(),
        op,
        value: parse_value(literal),
    })
}

fn split_op(rest: &str) -> Option<(Op, &str)> {
    const WORDS: [(&str, Op); 7] = [
        ("contains", Op::Contains),
        ("eq", Op::Eq),
        ("ne", Op::Ne),
        ("lt", Op::Lt),
        ("le", Op::Le),
        ("gt", Op::Gt),
        ("ge", Op::Ge),
    ];
    // Two-char symbols first so `<=` is not read as `<`.
    const SYMBOLS: [(&str, Op); 6] = [
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("!=", Op::Ne),
        ("=", Op::Eq),
        ("<", Op::Lt),
        (">", Op::Gt),
    ];

    for (word, op) in WORDS {
        if let Some(tail) = rest.strip_prefix(word) {
            if tail.starts_with(char::is_whitespace) {
                return Some((op, tail));
            }
        }
    }
    SYMBOLS
        .iter()
        .find_map(|(sym, op)| rest.strip_prefix(sym).map(|tail| (*op, tail)))
}

fn parse_value(literal: &str) -> Scalar {
    for quote in ['"', '\''] {
        if literal.len() >= 2 && literal.starts_with(quote) && literal.ends_with(quote) {
            return Scalar::Str(literal[1..literal.len() - 1].to_string());
        }
    }
    Scalar::infer(literal)
}

fn eval_clause(clause: &Clause, row: &AnimalRecord) -> bool {
    let Some(cell) = row.get(&clause.column).filter(|v| !v.is_null()) else {
        return false;
    };

    if clause.op == Op::Contains {
        return cell.to_string().contains(&clause.value.to_string());
    }

    let ord = match (cell.as_f64(), clause.value.as_f64()) {
        (Some(x), Some(y)) => match x.partial_cmp(&y) {
            Some(ord) => ord,
            None => return false,
        },
        _ => cell.to_string().cmp(&clause.value.to_string()),
    };

    match clause.op {
        Op::Eq => ord == Ordering::Equal,
        Op::Ne => ord != Ordering::Equal,
        Op::Lt => ord == Ordering::Less,
        Op::Le => ord != Ordering::Greater,
        Op::Gt => ord == Ordering::Greater,
        Op::Ge => ord != Ordering::Less,
        Op::Contains => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog() -> AnimalRecord {
        AnimalRecord {
            name: Some("Rex".into()),
            breed: Some("Labrador Retriever Mix".into()),
            sex_upon_outcome: Some("Intact Female".into()),
            age_upon_outcome_in_weeks: Some(52.0),
            ..Default::default()
        }
    }

    fn check(expr: &str) -> bool {
        TableFilter::parse(expr).unwrap().matches(&dog())
    }

    #[test]
    fn symbol_and_word_ops() {
        assert!(check("{name} = Rex"));
        assert!(check("{name} eq Rex"));
        assert!(check("{name} != Max"));
        assert!(check("{age_upon_outcome_in_weeks} >= 52"));
        assert!(check("{age_upon_outcome_in_weeks} lt 100"));
        assert!(!check("{age_upon_outcome_in_weeks} > 52"));
        assert!(check("{breed} contains Retriever"));
        assert!(!check("{breed} contains retriever"));
    }

    #[test]
    fn numbers_compare_numerically() {
        // "52" < "9" as text, but not as numbers
        assert!(check("{age_upon_outcome_in_weeks} > 9"));
    }

    #[test]
    fn quoted_values_and_conjunction() {
        assert!(check("{sex_upon_outcome} = \"Intact Female\" && {name} = 'Rex'"));
        assert!(!check("{sex_upon_outcome} = \"Intact Female\" && {name} = Max"));
    }

    #[test]
    fn missing_cell_never_matches() {
        assert!(!check("{location_lat} != 0"));
        assert!(!check("{nickname} = Rex"));
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        for bad in ["name = Rex", "{name Rex", "{} = Rex", "{name} ~ Rex", "{name} =", "{name} = Rex &&"] {
            assert!(
                matches!(TableFilter::parse(bad), Err(OpError::Filter(_))),
                "accepted {bad:?}"
            );
        }
    }
}
