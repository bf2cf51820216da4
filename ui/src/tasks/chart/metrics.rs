//! Descriptive statistics over the response log, split by chart variant.

use api::ResponseRecord;
use serde::{Deserialize, Serialize};

use super::engine::ChartVariant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; undefined for a single response.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantSummary {
    NoData,
    Stats(VariantStats),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub total: usize,
    pub partitions: Vec<(ChartVariant, VariantSummary)>,
    /// Records whose category is not a known chart variant.
    pub unrecognized: usize,
}

impl ResponseSummary {
    /// `None` when there is nothing to summarise at all.
    pub fn from_records(records: &[ResponseRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let partitions = ChartVariant::ALL
            .into_iter()
            .map(|variant| {
                let times: Vec<f64> = records
                    .iter()
                    .filter(|record| record.subject_category == variant.id())
                    .map(|record| record.elapsed_seconds)
                    .collect();
                (variant, VariantSummary::from_times(times))
            })
            .collect();

        let unrecognized = records
            .iter()
            .filter(|record| ChartVariant::from_id(record.subject_category).is_none())
            .count();

        Some(Self {
            total: records.len(),
            partitions,
            unrecognized,
        })
    }

    pub fn for_variant(&self, variant: ChartVariant) -> Option<&VariantSummary> {
        self.partitions
            .iter()
            .find(|(candidate, _)| *candidate == variant)
            .map(|(_, summary)| summary)
    }
}

impl VariantSummary {
    fn from_times(mut times: Vec<f64>) -> Self {
        times.retain(|value| value.is_finite());
        if times.is_empty() {
            return Self::NoData;
        }
        times.sort_by(f64::total_cmp);

        let mean_value = mean(&times);
        let std_dev = std_dev(&times, mean_value).map(round2);

        Self::Stats(VariantStats {
            count: times.len(),
            mean: round2(mean_value),
            median: round2(percentile(&times, 0.5)),
            std_dev,
            min: round2(times[0]),
            max: round2(times[times.len() - 1]),
        })
    }
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data.iter().sum::<f64>() / data.len() as f64
    }
}

fn std_dev(data: &[f64], mean: f64) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n as f64 - 1.0);
    Some(variance.sqrt())
}

fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    if sorted.len() == 1 {
        return sorted[0];
    }

    let clamped_pct = pct.clamp(0.0, 1.0);
    let rank = clamped_pct * (sorted.len() as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * weight
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
