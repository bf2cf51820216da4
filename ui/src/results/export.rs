use api::csv::render_csv;
use api::table::{ID_COLUMN, TIME_COLUMN};
use api::{ResponseRecord, Table};
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::platform;
use crate::t;
use crate::tasks::chart::ChartVariant;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[component]
pub fn ResultsExportPanel(records: Vec<ResponseRecord>) -> Element {
    let total = records.len();
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("results-card__meta".to_string(), t!("export-working"))),
        ExportStatus::Done(message) => Some((
            "results-card__meta results-card__meta--success".to_string(),
            message.clone(),
        )),
        ExportStatus::Error(err) => Some((
            "results-card__meta results-card__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let csv_handler = {
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working);
            let export_records = records.clone();

            #[cfg(target_arch = "wasm32")]
            {
                platform::spawn_future(async move {
                    match perform_csv_export(export_records).await {
                        Ok(message) => status_signal.set(ExportStatus::Done(message)),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    }
                    busy_signal.set(false);
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                match futures::executor::block_on(perform_csv_export(export_records)) {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
                busy_signal.set(false);
            }
        }
    };

    rsx! {
        section { class: "results-card results-export",
            div { class: "results-card__header",
                h2 { {t!("export-title")} }
            }

            if total == 0 {
                p { class: "results-card__placeholder", {t!("export-empty")} }
            } else {
                p { {t!("export-body", count = total)} }
                div { class: "results-export__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: csv_handler,
                        {t!("export-csv")}
                    }
                }
                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

async fn perform_csv_export(records: Vec<ResponseRecord>) -> Result<String, String> {
    let csv = build_csv(&records);
    let filename = format!("glance-responses-{}.csv", timestamp_slug());
    let delivery = download_bytes(&filename, "text/csv", csv.into_bytes()).await?;
    tracing::info!(rows = records.len(), file = %filename, "exported response log");
    Ok(match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-downloaded"),
    })
}

/// The `Reactions` columns plus a readable variant label.
pub(crate) fn build_csv(records: &[ResponseRecord]) -> String {
    let mut table = Table::new([ID_COLUMN, TIME_COLUMN, "Variant"]);
    table.rows = records
        .iter()
        .map(|record| {
            let label = ChartVariant::from_id(record.subject_category)
                .map(ChartVariant::label)
                .unwrap_or("Unknown");
            let mut row = record.to_row();
            row.push(label.to_string());
            row
        })
        .collect();
    render_csv(&table)
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let _ = mime;
        let dir = crate::core::storage::export_dir().ok_or("Unable to determine export directory")?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        fs::write(&path, &bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}
