//! The scraping engine: listing discovery and detail extraction.
//!
//! Discovery walks the paginated listing and yields product URLs;
//! extraction visits each URL and builds [`crate::table::Record`]s in the
//! site's extraction mode. Both stages degrade per item: a broken page is
//! logged and skipped so long runs survive the odd bad product.

pub mod detail;
pub mod discover;
pub mod vehicle;

pub use detail::extract_details;
pub use discover::discover_links;
