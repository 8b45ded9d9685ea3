//! Pipeline assembly
//!
//! Builds the fixed source → depay → decode → sink graph and establishes the
//! two statically linkable edges. The Source→Depay edge is deliberately left
//! open: the source's output pad is created by the runtime only once stream
//! negotiation completes, and linking it is the controller's job.

use crate::config;
use crate::pipeline::{Error, Session};
use crate::runtime::{
    ElementId, ElementRole, PadRef, PropertyValue, StreamRuntime, WINDOW_HANDLE_PROPERTY,
};
use std::sync::Arc;

/// The assembled element graph of one viewing session.
///
/// A value of this type only exists once all four elements were created and
/// both static links succeeded; failed construction leaves nothing behind
/// but the runtime, which releases its elements on drop.
pub struct StreamPipeline {
    runtime: Arc<dyn StreamRuntime>,
    session: Session,
    source: ElementId,
    depay: ElementId,
    decode: ElementId,
    sink: ElementId,
}

impl StreamPipeline {
    pub fn runtime(&self) -> &Arc<dyn StreamRuntime> {
        &self.runtime
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The element whose output endpoint appears dynamically.
    pub fn source(&self) -> ElementId {
        self.source
    }

    pub fn sink(&self) -> ElementId {
        self.sink
    }

    /// Fixed input endpoint the dynamic source pad gets linked to.
    pub fn depay_input(&self) -> PadRef {
        PadRef::sink(self.depay)
    }
}

/// Produces a fully configured, partially linked pipeline from a session.
pub struct PipelineBuilder {
    runtime: Arc<dyn StreamRuntime>,
}

impl PipelineBuilder {
    pub fn new(runtime: Arc<dyn StreamRuntime>) -> Self {
        Self { runtime }
    }

    pub fn build(self, session: Session) -> Result<StreamPipeline, Error> {
        let runtime = &self.runtime;

        let source = runtime.create_element(ElementRole::Source)?;
        let depay = runtime.create_element(ElementRole::Depay)?;
        let decode = runtime.create_element(ElementRole::Decode)?;
        let sink = runtime.create_element(ElementRole::Sink)?;

        // zero jitter buffering: the viewer trades resilience for latency
        runtime.set_property(
            source,
            "latency",
            PropertyValue::UInt(config::SOURCE_LATENCY_MS),
        )?;
        runtime.set_property(source, "location", PropertyValue::Str(session.stream_uri()))?;
        runtime.set_property(
            sink,
            WINDOW_HANDLE_PROPERTY,
            PropertyValue::Handle(session.surface().raw()),
        )?;

        for element in [source, depay, decode, sink] {
            runtime.add_to_pipeline(element)?;
        }

        runtime.link(&PadRef::src(depay), &PadRef::sink(decode))?;
        runtime.link(&PadRef::src(decode), &PadRef::sink(sink))?;

        log::info!(
            "PipelineBuilder: pipeline assembled for {}",
            session.stream_uri()
        );

        Ok(StreamPipeline {
            runtime: self.runtime,
            session,
            source,
            depay,
            decode,
            sink,
        })
    }
}
