//! Core traits for site adapters.

mod adapter;

pub use adapter::SiteAdapter;
