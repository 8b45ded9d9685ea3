//! Viewer pipeline core
//!
//! This module separates the two concerns the viewer actually owns:
//! - Assembly: building the fixed element graph and its static links
//! - Control: playback lifecycle and the reactive Source→Depay link
//!
//! # Architecture
//!
//! [`PipelineBuilder`] produces a [`StreamPipeline`] whose statically known
//! edges are already linked; the source's output endpoint does not exist yet
//! at that point. [`PlaybackController`] then owns the pipeline's lifecycle:
//! it maps user operations onto runtime processing states and completes or
//! undoes the deferred link when the runtime reports the source's dynamic
//! pad. Everything underneath goes through the
//! [`StreamRuntime`](crate::runtime::StreamRuntime) seam.

pub mod builder;
pub mod controller;
pub mod session;
pub mod state;

pub use builder::{PipelineBuilder, StreamPipeline};
pub use controller::PlaybackController;
pub use session::{DisplaySurface, Session};
pub use state::PlaybackState;

use crate::runtime::{PadRef, RuntimeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("camera address must be a non-empty host name or IPv4 address")]
    InvalidAddress,
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
    #[error("cannot {op} while {from}")]
    InvalidStateTransition {
        from: PlaybackState,
        op: &'static str,
    },
    #[error("stream endpoint cannot be linked ({pad})")]
    EndpointUnavailable {
        pad: PadRef,
        #[source]
        source: RuntimeError,
    },
}
