//! UI Components
//!
//! Leptos components mounted next to the server-rendered page.

mod flash_message;

pub use flash_message::FlashMessage;
