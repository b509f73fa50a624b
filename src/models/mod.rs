//! Data model for quote search results.

pub mod quote;

pub use quote::{format_time, parse_query_result, Quote};
