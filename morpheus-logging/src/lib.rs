// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Structured trace events: `morpheus_trace!("event.name", { "key": value })`
//! emits a `tracing::trace!` line carrying a JSON object.

#[doc(hidden)]
pub use serde_json as __serde_json;
#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! morpheus_trace {
    ($evt:expr, $params:tt) => {
        $crate::__tracing::trace!(
            "morpheus_trace:{}:{}",
            $evt,
            $crate::__serde_json::json!($params)
        );
    };
}
