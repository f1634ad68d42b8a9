//! Portfolio Admin Frontend Entry Point

mod models;
mod error;
mod config;
mod validation;
mod navigation;
mod commands;
mod sync;
mod dom;
mod store;
mod components;
mod logger;
mod app;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info });
    mount_to_body(App);
}
