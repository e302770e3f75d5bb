//! Tsumami Events - delegated DOM event manager
//!
//! An [`EventManager`] attaches handlers to `tsumami-dom` elements and
//! tracks every registration it makes. Handlers can be bound directly with
//! [`EventManager::on`] or delegated to descendants matching a selector with
//! [`EventManager::delegate`], and removed in bulk by element, event name,
//! handler identity or selector.
//!
//! ```ignore
//! let unbind = events().delegate(&nav, "a.nav-item", "click", &handler, true)?;
//! // later
//! unbind.unbind();
//! ```

mod error;
mod global;
mod manager;
mod registry;

pub use error::EventError;
pub use global::events;
pub use manager::{DelegateMatch, EventManager, FORCE_CAPTURE_EVENTS};
pub use registry::{Registration, RegistrationId, Unbind};
