use dioxus::prelude::*;

use crate::results::{ResponseHistogram, ResponseStatsTable, ResultsExportPanel};
use crate::tasks::chart::{DataUnavailablePanel, SharedSession};

#[component]
pub fn Results() -> Element {
    let records = match try_use_context::<SharedSession>() {
        Some(SharedSession::Ready(session)) => session.read().log().records().to_vec(),
        Some(SharedSession::Unavailable(message)) => {
            return rsx! {
                section { class: "page page-results",
                    h1 { {crate::t!("page-results-title")} }
                    DataUnavailablePanel { message }
                }
            };
        }
        None => Vec::new(),
    };
    let summary = crate::tasks::chart::ResponseSummary::from_records(&records);

    rsx! {
        section { class: "page page-results",
            h1 { {crate::t!("page-results-title")} }
            p { {crate::t!("page-results-intro")} }

            div { class: "results__panels",
                ResponseStatsTable { summary }
                ResponseHistogram { records: records.clone() }
            }

            ResultsExportPanel { records }
        }
    }
}
