//! Element runtime seam
//!
//! The viewer core never talks to the multimedia framework directly. It goes
//! through the [`StreamRuntime`] trait, which captures the eight operations
//! the core actually needs: construct an element by role, configure it, add it
//! to the container, link/unlink pads, drive the processing state, and
//! subscribe to pad lifecycle events.
//!
//! The production implementation lives in [`gst`](crate::runtime::gst) and is
//! backed by GStreamer. Tests substitute an in-memory double.

pub mod gst;
#[cfg(test)]
pub(crate) mod mock;

use thiserror::Error;

pub use self::gst::GstRuntime;

/// Role of a processing element in the viewer pipeline.
///
/// The pipeline has exactly one element per role, wired
/// Source → Depay → Decode → Sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Network source receiving the RTSP stream
    Source,
    /// Depayloader stripping RTP framing from the received packets
    Depay,
    /// Decoder turning encoded frames into raw video
    Decode,
    /// Video sink rendering onto the display surface
    Sink,
}

impl std::fmt::Display for ElementRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementRole::Source => write!(f, "source"),
            ElementRole::Depay => write!(f, "depayloader"),
            ElementRole::Decode => write!(f, "decoder"),
            ElementRole::Sink => write!(f, "video sink"),
        }
    }
}

/// Opaque handle to an element owned by a runtime instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

/// A named attachment point on an element.
///
/// Static pads (`src`/`sink`) exist from element creation. The source's
/// output pad is dynamic: it only exists once stream negotiation completes,
/// under whatever name the runtime assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PadRef {
    pub element: ElementId,
    pub name: String,
}

impl PadRef {
    pub fn new(element: ElementId, name: impl Into<String>) -> Self {
        Self {
            element,
            name: name.into(),
        }
    }

    /// The conventional static output pad of an element.
    pub fn src(element: ElementId) -> Self {
        Self::new(element, "src")
    }

    /// The conventional static input pad of an element.
    pub fn sink(element: ElementId) -> Self {
        Self::new(element, "sink")
    }
}

impl std::fmt::Display for PadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pad '{}' of element #{}", self.name, self.element.index())
    }
}

/// Property key carrying the sink's target display surface.
///
/// Backends route this to the platform's video-overlay interface instead of
/// storing it as a regular element property.
pub const WINDOW_HANDLE_PROPERTY: &str = "window-handle";

/// Configuration value accepted by [`StreamRuntime::set_property`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Unsigned integer property (e.g. the source's latency in milliseconds)
    UInt(u32),
    /// String property (e.g. the source's stream location)
    Str(String),
    /// Platform handle (the sink's target display surface)
    Handle(usize),
}

/// Aggregate processing state of the runtime's pipeline container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    /// Elements released, no resources held
    Null,
    /// Pipeline prerolled but not consuming the stream
    Paused,
    /// Pipeline actively processing media
    Playing,
}

impl std::fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingState::Null => write!(f, "Null"),
            ProcessingState::Paused => write!(f, "Paused"),
            ProcessingState::Playing => write!(f, "Playing"),
        }
    }
}

/// Notification that a dynamic pad appeared on or disappeared from an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadEvent {
    Created(PadRef),
    Removed(PadRef),
}

/// Callback invoked by the runtime on pad lifecycle changes.
///
/// May be invoked from the runtime's internal worker threads, never from the
/// thread that registered it.
pub type PadEventHandler = Box<dyn Fn(PadEvent) + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no factory could produce a {0} element")]
    ElementCreation(ElementRole),
    #[error("failed to link {src} to {sink}")]
    Link { src: PadRef, sink: PadRef },
    #[error("failed to unlink {src} from {sink}")]
    Unlink { src: PadRef, sink: PadRef },
    #[error("element #{} is not owned by this runtime", .0.index())]
    UnknownElement(ElementId),
    #[error("{0} does not exist")]
    PadUnavailable(PadRef),
    #[error("element #{} has no property '{key}'", .element.index())]
    Property { element: ElementId, key: String },
    #[error("failed to add element #{} to the pipeline", .0.index())]
    Container(ElementId),
    #[error("pipeline refused the {0} processing state")]
    StateChange(ProcessingState),
}

/// The element/property/event contract of the underlying media framework.
///
/// One runtime instance owns exactly one pipeline container; dropping the
/// runtime releases the container and every element in it.
pub trait StreamRuntime: Send + Sync {
    /// Construct a new element for `role` and take ownership of it.
    fn create_element(&self, role: ElementRole) -> Result<ElementId, RuntimeError>;

    /// Set a configuration property on an element.
    fn set_property(
        &self,
        element: ElementId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), RuntimeError>;

    /// Add an element to the pipeline container.
    fn add_to_pipeline(&self, element: ElementId) -> Result<(), RuntimeError>;

    /// Link a source pad to a sink pad. Both pads must currently exist.
    fn link(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError>;

    /// Unlink a source pad from a sink pad.
    fn unlink(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError>;

    /// Request a processing state for the whole container.
    ///
    /// Returns once the request is accepted; the runtime may complete the
    /// change asynchronously.
    fn set_processing_state(&self, state: ProcessingState) -> Result<(), RuntimeError>;

    /// Current processing state of the container.
    fn processing_state(&self) -> ProcessingState;

    /// Subscribe to pad created/removed notifications on one element.
    ///
    /// The handler may fire from the runtime's own threads at any time after
    /// this call returns.
    fn subscribe_pad_events(
        &self,
        element: ElementId,
        handler: PadEventHandler,
    ) -> Result<(), RuntimeError>;
}
