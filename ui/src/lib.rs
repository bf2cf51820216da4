//! Shared UI crate for Glance: the chart-reading task, its results page and
//! everything both launchers have in common.

pub mod core;
pub mod i18n;
pub mod results;
pub mod tasks;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

#[cfg(test)]
mod tests {
    mod i18n_completeness;
}
