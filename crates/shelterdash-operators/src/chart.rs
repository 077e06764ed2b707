//! Breed distribution over the visible rows (rendered as a pie chart).

use serde::{Deserialize, Serialize};

use crate::traits::{Projection, ProjectionInput};

pub const CHART_TITLE: &str = "Rescue Dog Breed Distribution";
pub const NO_DATA: &str = "No data to display";
pub const NO_BREED_DATA: &str = "No breed data available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of the rows that carry a breed, in `[0, 1]`.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSummary {
    Pie { title: String, slices: Vec<Slice> },
    Placeholder { message: String },
}

impl ChartSummary {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ChartSummary::Placeholder { .. })
    }

    pub fn slices(&self) -> &[Slice] {
        match self {
            ChartSummary::Pie { slices, .. } => slices,
            ChartSummary::Placeholder { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BreedChart;

impl Projection for BreedChart {
    type Output = ChartSummary;

    fn name(&self) -> &'static str {
        "breed_chart"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> ChartSummary {
        let rows = input.visible_rows;
        if rows.is_empty() {
            return ChartSummary::Placeholder {
                message: NO_DATA.to_string(),
            };
        }

        // (label, count) in first-appearance order.
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for breed in rows.iter().filter_map(|r| r.breed.as_deref()) {
            match counts.iter_mut().find(|(label, _)| *label == breed) {
                Some((_, n)) => *n += 1,
                None => counts.push((breed, 1)),
            }
        }
        if counts.is_empty() {
            return ChartSummary::Placeholder {
                message: NO_BREED_DATA.to_string(),
            };
        }

        let total: usize = counts.iter().map(|(_, n)| n).sum();
        // Stable sort keeps first appearance as the tie-breaker.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let slices = counts
            .into_iter()
            .map(|(label, count)| Slice {
                label: label.to_string(),
                count,
                fraction: count as f64 / total as f64,
            })
            .collect();

        ChartSummary::Pie {
            title: CHART_TITLE.to_string(),
            slices,
        }
    }
}
