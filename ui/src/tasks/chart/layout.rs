//! Geometry for the two chart variants, independent of how they are drawn.

use api::ChartDataset;

use super::engine::ChartVariant;

#[derive(Debug, Clone, PartialEq)]
pub struct StackedSegment {
    pub topic: String,
    pub amount: f64,
    /// Sum of every segment below this one.
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    /// 1-based, largest amount first.
    pub rank: usize,
    pub topic: String,
    pub amount: f64,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartLayout {
    Stacked {
        segments: Vec<StackedSegment>,
        total: f64,
    },
    Ranked {
        bars: Vec<RankedBar>,
        max: f64,
    },
}

impl ChartLayout {
    pub fn build(variant: ChartVariant, dataset: &ChartDataset) -> Self {
        match variant {
            ChartVariant::Stacked => stacked(dataset),
            ChartVariant::Ranked => ranked(dataset),
        }
    }

    /// Upper bound of the value axis, never zero so it can be used as a divisor.
    pub fn scale(&self) -> f64 {
        let raw = match self {
            Self::Stacked { total, .. } => *total,
            Self::Ranked { max, .. } => *max,
        };
        if raw > 0.0 {
            raw
        } else {
            1.0
        }
    }
}

fn stacked(dataset: &ChartDataset) -> ChartLayout {
    let mut bottom = 0.0;
    let segments = dataset
        .rows()
        .iter()
        .map(|row| {
            let amount = row.amount.max(0.0);
            let segment = StackedSegment {
                topic: row.topic.clone(),
                amount,
                bottom,
            };
            bottom += amount;
            segment
        })
        .collect();

    ChartLayout::Stacked {
        segments,
        total: bottom,
    }
}

fn ranked(dataset: &ChartDataset) -> ChartLayout {
    let mut rows: Vec<_> = dataset.rows().iter().collect();
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let bars: Vec<RankedBar> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| RankedBar {
            rank: idx + 1,
            topic: row.topic.clone(),
            amount: row.amount.max(0.0),
            value_label: format!("{}", row.amount.trunc() as i64),
        })
        .collect();

    let max = bars.iter().map(|bar| bar.amount).fold(0.0, f64::max);
    ChartLayout::Ranked { bars, max }
}
