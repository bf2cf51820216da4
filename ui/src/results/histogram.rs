//! Response-time distribution per chart variant.

use api::ResponseRecord;
use dioxus::prelude::*;

use crate::t;
use crate::tasks::chart::ChartVariant;

pub const BIN_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub variant: ChartVariant,
    pub bins: Vec<Bin>,
}

/// One series per variant that has at least one finite response time.
pub fn build_series(records: &[ResponseRecord]) -> Vec<Series> {
    ChartVariant::ALL
        .into_iter()
        .filter_map(|variant| {
            let times: Vec<f64> = records
                .iter()
                .filter(|record| record.subject_category == variant.id())
                .map(|record| record.elapsed_seconds)
                .filter(|value| value.is_finite())
                .collect();
            if times.is_empty() {
                None
            } else {
                Some(Series {
                    variant,
                    bins: bin_values(&times, BIN_COUNT),
                })
            }
        })
        .collect()
}

/// Equal-width bins over the values' own range. The last bin is closed so the
/// maximum lands inside it. Equal values get a unit-wide range centred on them.
pub fn bin_values(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lower, upper) = if max > min {
        (min, max)
    } else {
        (min - 0.5, min + 0.5)
    };
    let width = (upper - lower) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|idx| Bin {
            lower: lower + width * idx as f64,
            upper: lower + width * (idx + 1) as f64,
            count: 0,
        })
        .collect();

    for value in values {
        let idx = (((value - lower) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 240.0;
const MARGIN: f64 = 30.0;

fn series_colour(variant: ChartVariant) -> &'static str {
    match variant {
        ChartVariant::Stacked => "#4c78a8",
        ChartVariant::Ranked => "#e45756",
    }
}

#[component]
pub fn ResponseHistogram(records: Vec<ResponseRecord>) -> Element {
    let series = build_series(&records);
    if series.is_empty() {
        return rsx! {
            section { class: "results-card results-histogram",
                h2 { {t!("results-histogram-title")} }
                p { class: "results-card__placeholder", {t!("results-no-data")} }
            }
        };
    }

    let all_bins = series.iter().flat_map(|s| s.bins.iter());
    let x_min = all_bins.clone().map(|b| b.lower).fold(f64::INFINITY, f64::min);
    let x_max = all_bins.clone().map(|b| b.upper).fold(f64::NEG_INFINITY, f64::max);
    let peak = all_bins.map(|b| b.count).max().unwrap_or(1).max(1) as f64;
    let span = (x_max - x_min).max(f64::EPSILON);
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let baseline = HEIGHT - MARGIN;
    let axis_end = WIDTH - MARGIN;
    let label_y = HEIGHT - 8.0;
    let x_min_label = format!("{x_min:.2} s");
    let x_max_label = format!("{x_max:.2} s");

    let legend: Vec<(u32, &'static str, &'static str)> = series
        .iter()
        .map(|s| (s.variant.id(), s.variant.label(), series_colour(s.variant)))
        .collect();

    let mut rects = Vec::new();
    for s in &series {
        for (idx, bin) in s.bins.iter().enumerate() {
            if bin.count == 0 {
                continue;
            }
            let x = MARGIN + (bin.lower - x_min) / span * plot_w;
            let w = ((bin.upper - bin.lower) / span * plot_w).max(1.0);
            let h = bin.count as f64 / peak * plot_h;
            rects.push((
                format!("{}-{idx}", s.variant.id()),
                x,
                baseline - h,
                w,
                h,
                series_colour(s.variant),
            ));
        }
    }

    rsx! {
        section { class: "results-card results-histogram",
            h2 { {t!("results-histogram-title")} }
            svg {
                class: "results-histogram__plot",
                view_box: "0 0 {WIDTH} {HEIGHT}",
                line { x1: "{MARGIN}", y1: "{baseline}", x2: "{axis_end}", y2: "{baseline}", stroke: "#888" }
                for (key, x, y, w, h, fill) in rects {
                    rect {
                        key: "{key}",
                        x: "{x:.2}",
                        y: "{y:.2}",
                        width: "{w:.2}",
                        height: "{h:.2}",
                        fill,
                        fill_opacity: "0.5",
                    }
                }
                text { x: "{MARGIN}", y: "{label_y}", class: "results-histogram__tick", "{x_min_label}" }
                text {
                    x: "{axis_end}",
                    y: "{label_y}",
                    text_anchor: "end",
                    class: "results-histogram__tick",
                    "{x_max_label}"
                }
            }
            ul { class: "results-histogram__legend",
                for (id, label, swatch) in legend {
                    li { key: "{id}",
                        span {
                            class: "results-histogram__swatch",
                            style: "background: {swatch}",
                        }
                        "{label}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(bins: &[Bin]) -> Vec<usize> {
        bins.iter().map(|b| b.count).collect()
    }

    #[test]
    fn every_value_lands_in_a_bin() {
        let values = [1.0, 1.5, 2.0, 2.5, 3.0, 11.0];
        let bins = bin_values(&values, BIN_COUNT);
        assert_eq!(bins.len(), BIN_COUNT);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[9].upper, 11.0);
        assert_eq!(counts(&bins), vec![2, 2, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn identical_values_get_a_unit_range() {
        let bins = bin_values(&[2.0, 2.0, 2.0], BIN_COUNT);
        assert_eq!(bins[0].lower, 1.5);
        assert!((bins[9].upper - 2.5).abs() < 1e-9);
        assert_eq!(bins.iter().filter(|b| b.count == 3).count(), 1);
    }

    #[test]
    fn series_skip_variants_without_data() {
        let records = [ResponseRecord::new(1, 3.0), ResponseRecord::new(5, 1.0)];
        let series = build_series(&records);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].variant, ChartVariant::Ranked);
    }

    #[test]
    fn each_variant_uses_its_own_range() {
        let records = [
            ResponseRecord::new(0, 1.0),
            ResponseRecord::new(0, 2.0),
            ResponseRecord::new(1, 10.0),
            ResponseRecord::new(1, 20.0),
        ];
        let series = build_series(&records);
        assert_eq!(series[0].bins[0].lower, 1.0);
        assert_eq!(series[1].bins[0].lower, 10.0);
        assert_eq!(series[1].bins[9].upper, 20.0);
    }
}
