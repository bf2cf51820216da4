use dioxus::prelude::*;

use crate::tasks::chart::ChartTaskView;

#[component]
pub fn Task() -> Element {
    // Hidden marker keeps a reactive dependency on the language signal.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        div { style: "display:none", "{lang_marker}" }
        section { class: "page page-task",
            h1 { {crate::t!("page-task-title")} }
            p { {crate::t!("page-task-intro")} }
            ChartTaskView {}
        }
    }
}
