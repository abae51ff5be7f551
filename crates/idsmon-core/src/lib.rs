//! # idsmon-core - Core Domain Types
//!
//! Foundation crate for IDS Monitor. Provides the domain types shared by the
//! session client and the dashboard, the bounded flow feed, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Backend Events (`events`)
//! - [`NetworkEvent`] - One classified flow reported by the backend
//! - [`ScanSummary`] - End-of-scan statistics, replaced wholesale
//! - [`ScanStatus`] - Lifecycle notification (`started`, `stopped`, ...)
//! - [`InterfaceInfo`] - Capture adapter advertised by the backend
//!
//! ### Domain Types (`types`)
//! - [`ModelKind`] - Selectable classifier model
//! - [`ScanMode`] - Flow source sent with `start_scan`
//! - [`NetworkMetrics`] - Latest live metrics snapshot
//! - [`FlowEntry`] - Display projection of a [`NetworkEvent`]
//!
//! ### Flow Feed (`feed`)
//! - [`FlowFeed`] - Bounded, most-recent-first, duplicate-free flow list
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum; backend launch failures are classed as fatal
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! ```rust
//! use idsmon_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod feed;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all IDS Monitor crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result};
pub use events::{
    HardwareUsage, InterfaceInfo, NetworkEvent, ScanComplete, ScanError, ScanState, ScanStatus,
    ScanSummary, ServiceStatus,
};
pub use feed::{FeedInsert, FlowFeed, DEFAULT_FEED_CAPACITY};
pub use types::{
    format_confidence, format_latency, is_benign, is_threat_label, FlowEntry, ModelKind,
    NetworkMetrics, ScanMode,
};
