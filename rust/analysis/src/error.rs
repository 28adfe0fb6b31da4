// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for analysis operations.
//!
//! An invalid building is never an error: that is the engine's primary
//! output, expressed as findings. The only hard failures are
//! programmer-contract violations — asking for a story that does not exist,
//! or running with a degenerate configuration.

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when invoking the analysis engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller requested a story name not present in the building.
    #[error("story not found: '{0}'")]
    StoryNotFound(String),

    /// A configuration value would make the analysis ill-defined
    /// (zero grid step, negative tolerance, non-finite constant).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
