//! One-line, human-readable rendering of a compiled query.

use shelterdash_core::prelude::{Predicate, Query, Scalar};

pub fn explain(query: &Query) -> String {
    if query.is_empty() {
        return "all records".to_string();
    }
    query
        .iter()
        .map(|(field, p)| match p {
            Predicate::Eq(Scalar::Str(s)) => format!("{field} = {s:?}"),
            Predicate::Eq(v) => format!("{field} = {v}"),
            Predicate::In(members) if members.is_empty() => format!("{field} in {{}} (matches nothing)"),
            Predicate::In(members) => {
                let list: Vec<&str> = members.iter().map(String::as_str).collect();
                format!("{field} in {{{}}}", list.join(", "))
            }
            Predicate::Range { lo, hi } => match (lo, hi) {
                (Some(lo), Some(hi)) => format!("{lo} <= {field} <= {hi}"),
                (Some(lo), None) => format!("{field} >= {lo}"),
                (None, Some(hi)) => format!("{field} <= {hi}"),
                (None, None) => format!("{field} is any number"),
            },
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}
