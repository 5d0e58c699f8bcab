//! Chrome session management.
//!
//! A [`Session`] owns one browser process and one page for the lifetime of
//! a scrape run. The catalog replaces large parts of the DOM from ajax
//! responses, so all element access goes through JavaScript evaluation on
//! the live page rather than cached node handles.

pub mod captcha;
pub mod locator;
pub mod session;

pub use locator::LocatorChain;
pub use session::Session;
