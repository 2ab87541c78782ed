//! Result type for the command and orchestration layer.
//!
//! Built on `color-eyre` for readable operator-facing reports. The domain
//! modules (`exec`, `manifest`, `resolver`, `updater`) return the typed
//! [`crate::error::NightjarError`] instead; the `?` operator converts at
//! the boundary.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout the nightjar command layer.
pub type Result<T> = EyreResult<T>;
