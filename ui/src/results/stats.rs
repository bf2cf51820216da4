use dioxus::prelude::*;

use crate::core::format;
use crate::t;
use crate::tasks::chart::{ResponseSummary, VariantSummary};

/// Per-variant descriptive statistics of the response log.
#[component]
pub fn ResponseStatsTable(summary: Option<ResponseSummary>) -> Element {
    let Some(summary) = summary else {
        return rsx! {
            section { class: "results-card results-stats",
                h2 { {t!("results-stats-title")} }
                p { class: "results-card__placeholder", {t!("results-no-data")} }
            }
        };
    };

    let total = summary.total;
    let unrecognized = summary.unrecognized;

    rsx! {
        section { class: "results-card results-stats",
            div { class: "results-card__header",
                h2 { {t!("results-stats-title")} }
                span { class: "results-card__meta", {t!("results-total", count = total)} }
            }
            table { class: "results-stats__table",
                thead {
                    tr {
                        th { {t!("results-col-variant")} }
                        th { {t!("results-col-count")} }
                        th { {t!("results-col-mean")} }
                        th { {t!("results-col-median")} }
                        th { {t!("results-col-sd")} }
                        th { {t!("results-col-min")} }
                        th { {t!("results-col-max")} }
                    }
                }
                tbody {
                    for (variant, partition) in summary.partitions.into_iter() {
                        tr { key: "{variant.id()}",
                            th { scope: "row", "{variant.label()}" }
                            {match partition {
                                VariantSummary::Stats(stats) => rsx! {
                                    td { "{stats.count}" }
                                    td { {format::format_stat(Some(stats.mean))} }
                                    td { {format::format_stat(Some(stats.median))} }
                                    td { {format::format_stat(stats.std_dev)} }
                                    td { {format::format_stat(Some(stats.min))} }
                                    td { {format::format_stat(Some(stats.max))} }
                                },
                                VariantSummary::NoData => rsx! {
                                    td { colspan: "6", class: "results-stats__empty", {t!("results-variant-no-data")} }
                                },
                            }}
                        }
                    }
                }
            }
            if unrecognized > 0 {
                p { class: "results-card__meta", {t!("results-unrecognized", count = unrecognized)} }
            }
        }
    }
}
