use dioxus::prelude::*;

use super::layout::{ChartLayout, RankedBar, StackedSegment};

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 320.0;
const PALETTE: [&str; 8] = [
    "#4c78a8", "#f58518", "#54a24b", "#e45756", "#72b7b2", "#eeca3b", "#b279a2", "#9d755d",
];

fn colour(idx: usize) -> &'static str {
    PALETTE[idx % PALETTE.len()]
}

/// Inline SVG rendering of either chart layout.
#[component]
pub fn ChartFigure(layout: ChartLayout) -> Element {
    let scale = layout.scale();
    match layout {
        ChartLayout::Stacked { segments, .. } => rsx! { StackedColumn { segments, scale } },
        ChartLayout::Ranked { bars, .. } => rsx! { RankedBars { bars, scale } },
    }
}

/// Single column with a legend; no axis, so amounts have to be judged by area.
#[component]
fn StackedColumn(segments: Vec<StackedSegment>, scale: f64) -> Element {
    let column_x = 40.0;
    let column_w = 120.0;
    let legend_x = column_x + column_w + 40.0;
    let plot_h = HEIGHT - 20.0;

    rsx! {
        svg {
            class: "chart-figure chart-figure--stacked",
            view_box: "0 0 {WIDTH} {HEIGHT}",
            for (idx, segment) in segments.iter().enumerate() {
                {
                    let h = segment.amount / scale * plot_h;
                    let y = 10.0 + plot_h - (segment.bottom / scale * plot_h) - h;
                    rsx! {
                        rect {
                            key: "seg-{idx}",
                            x: "{column_x}",
                            y: "{y:.2}",
                            width: "{column_w}",
                            height: "{h:.2}",
                            fill: colour(idx),
                        }
                    }
                }
            }
            // Legend lists the top segment first, matching what the eye sees.
            for (row, (idx, segment)) in segments.iter().enumerate().rev().enumerate() {
                {
                    let y = 20.0 + row as f64 * 24.0;
                    let swatch_y = y - 10.0;
                    let text_x = legend_x + 20.0;
                    rsx! {
                        g { key: "legend-{idx}",
                            rect { x: "{legend_x}", y: "{swatch_y}", width: "12", height: "12", fill: colour(idx) }
                            text { x: "{text_x}", y: "{y}", class: "chart-figure__legend", "{segment.topic}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RankedBars(bars: Vec<RankedBar>, scale: f64) -> Element {
    let label_w = 190.0;
    let plot_w = WIDTH - label_w - 50.0;
    let row_h = if bars.is_empty() {
        HEIGHT
    } else {
        (HEIGHT - 10.0) / bars.len() as f64
    };
    let bar_h = row_h * 0.7;

    rsx! {
        svg {
            class: "chart-figure chart-figure--ranked",
            view_box: "0 0 {WIDTH} {HEIGHT}",
            for (idx, bar) in bars.iter().enumerate() {
                {
                    let y = 5.0 + idx as f64 * row_h;
                    let w = bar.amount / scale * plot_w;
                    let text_y = y + bar_h * 0.7;
                    let value_x = label_w + w + 6.0;
                    rsx! {
                        g { key: "bar-{bar.rank}",
                            text { x: "4", y: "{text_y:.2}", class: "chart-figure__rank", "#{bar.rank} {bar.topic}" }
                            rect {
                                x: "{label_w}",
                                y: "{y:.2}",
                                width: "{w:.2}",
                                height: "{bar_h:.2}",
                                fill: colour(idx),
                            }
                            text {
                                x: "{value_x:.2}",
                                y: "{text_y:.2}",
                                class: "chart-figure__value",
                                "{bar.value_label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
