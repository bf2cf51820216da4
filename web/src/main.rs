use api::Gateway;
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::config::AppConfig;
use ui::core::storage::{self, Backend};
use ui::tasks::chart::use_session_provider;
use ui::views::{Home, Results, Task};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/task")]
    Task {},
    #[route("/results")]
    Results {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_task(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Task {},
        "{label}"
    })
}
fn nav_results(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Results {},
        "{label}"
    })
}

fn main() {
    storage::install(prepare_backend(AppConfig::default()));
    dioxus::launch(App);
}

/// The browser has no data directory to drop a `Data` sheet into, so the
/// bundled sample is written to `localStorage` on first visit.
fn prepare_backend(config: AppConfig) -> Backend {
    let conn = match storage::open_connection(&config) {
        Ok(conn) => conn,
        Err(_) => return Backend::prepare(config),
    };
    if let Err(err) = storage::provision_sample_data(conn.as_ref()) {
        tracing::warn!(%err, "could not provision sample chart data");
    }
    Backend::from_gateway(config, Gateway::new(conn))
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        home: nav_home,
        task: nav_task,
        results: nav_results,
    });
    use_session_provider();

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
