//! Event manager errors

use tsumami_css::SelectorError;

/// Errors raised while registering handlers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("invalid delegation selector `{selector}`")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },
}
