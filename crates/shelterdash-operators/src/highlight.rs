//! Column highlight styles for the selected table columns.

use serde::{Deserialize, Serialize};

use crate::traits::{Projection, ProjectionInput};

pub const HIGHLIGHT_COLOR: &str = "#D2F3FF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStyle {
    pub column_id: String,
    pub background_color: String,
}

#[derive(Debug, Clone)]
pub struct ColumnHighlight {
    pub color: String,
}

impl Default for ColumnHighlight {
    fn default() -> Self {
        Self {
            color: HIGHLIGHT_COLOR.to_string(),
        }
    }
}

impl Projection for ColumnHighlight {
    type Output = Vec<ColumnStyle>;

    fn name(&self) -> &'static str {
        "column_highlight"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> Vec<ColumnStyle> {
        input
            .selected_columns
            .iter()
            .map(|id| ColumnStyle {
                column_id: id.clone(),
                background_color: self.color.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn run(cols: &[&str]) -> Vec<ColumnStyle> {
        let selected: BTreeSet<String> = cols.iter().map(|c| c.to_string()).collect();
        ColumnHighlight::default().project(&ProjectionInput {
            visible_rows: &[],
            selected_row: None,
            selected_columns: &selected,
        })
    }

    #[test]
    fn exactly_the_selected_columns_are_styled() {
        let styles = run(&["name", "breed"]);
        assert_eq!(styles.len(), 2);
        let ids: BTreeSet<_> = styles.iter().map(|s| s.column_id.as_str()).collect();
        assert_eq!(ids, BTreeSet::from(["breed", "name"]));
        assert!(styles.iter().all(|s| s.background_color == HIGHLIGHT_COLOR));
    }

    #[test]
    fn no_selection_no_styles() {
        assert!(run(&[]).is_empty());
    }
}
