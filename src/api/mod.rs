mod types;
mod client;
mod paging;

pub use types::*;
pub use client::CaseClient;
pub use paging::{clamp_page, page_bounds, page_count, parse_jump};
