//! GStreamer-backed implementation of the element runtime contract.

use crate::runtime::{
    ElementId, ElementRole, PadEvent, PadEventHandler, PadRef, ProcessingState, PropertyValue,
    RuntimeError, StreamRuntime, WINDOW_HANDLE_PROPERTY,
};
use gst::prelude::*;
use gst_video::prelude::*;
use std::sync::{Arc, Mutex};

/// One `GstRuntime` owns one `gst::Pipeline` and every element created
/// through it. Dropping the runtime drives the pipeline to Null, which
/// releases the elements and closes the network session.
pub struct GstRuntime {
    pipeline: gst::Pipeline,
    elements: Mutex<Vec<gst::Element>>,
}

impl GstRuntime {
    pub fn new() -> Result<Self, glib::Error> {
        gst::init()?;

        Ok(Self {
            pipeline: gst::Pipeline::default(),
            elements: Mutex::new(Vec::new()),
        })
    }

    /// Message bus of the underlying pipeline, for shell-side diagnostics.
    pub fn bus(&self) -> Option<gst::Bus> {
        self.pipeline.bus()
    }

    fn factory_name(role: ElementRole) -> &'static str {
        match role {
            ElementRole::Source => "rtspsrc",
            ElementRole::Depay => "rtpjpegdepay",
            ElementRole::Decode => "jpegdec",
            // xvimagesink rather than ximagesink so the video chip does the scaling
            ElementRole::Sink => "xvimagesink",
        }
    }

    fn element(&self, id: ElementId) -> Result<gst::Element, RuntimeError> {
        self.elements
            .lock()
            .unwrap()
            .get(id.index())
            .cloned()
            .ok_or(RuntimeError::UnknownElement(id))
    }

    fn pad(&self, pad: &PadRef) -> Result<gst::Pad, RuntimeError> {
        self.element(pad.element)?
            .static_pad(&pad.name)
            .ok_or_else(|| RuntimeError::PadUnavailable(pad.clone()))
    }
}

impl StreamRuntime for GstRuntime {
    fn create_element(&self, role: ElementRole) -> Result<ElementId, RuntimeError> {
        let element = gst::ElementFactory::make(Self::factory_name(role))
            .build()
            .map_err(|_| RuntimeError::ElementCreation(role))?;

        let mut elements = self.elements.lock().unwrap();
        elements.push(element);
        Ok(ElementId::new(elements.len() - 1))
    }

    fn set_property(
        &self,
        id: ElementId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), RuntimeError> {
        let element = self.element(id)?;

        if key == WINDOW_HANDLE_PROPERTY {
            let PropertyValue::Handle(handle) = value else {
                return Err(RuntimeError::Property {
                    element: id,
                    key: key.to_owned(),
                });
            };
            let Some(overlay) = element.dynamic_cast_ref::<gst_video::VideoOverlay>() else {
                return Err(RuntimeError::Property {
                    element: id,
                    key: key.to_owned(),
                });
            };
            unsafe { overlay.set_window_handle(handle) };
            return Ok(());
        }

        if element.find_property(key).is_none() {
            return Err(RuntimeError::Property {
                element: id,
                key: key.to_owned(),
            });
        }

        match value {
            PropertyValue::UInt(v) => element.set_property(key, v),
            PropertyValue::Str(v) => element.set_property(key, v),
            PropertyValue::Handle(v) => element.set_property(key, v as u64),
        }
        Ok(())
    }

    fn add_to_pipeline(&self, id: ElementId) -> Result<(), RuntimeError> {
        let element = self.element(id)?;
        self.pipeline
            .add(&element)
            .map_err(|_| RuntimeError::Container(id))
    }

    fn link(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError> {
        let src_pad = self.pad(src)?;
        let sink_pad = self.pad(sink)?;
        src_pad.link(&sink_pad).map_err(|_| RuntimeError::Link {
            src: src.clone(),
            sink: sink.clone(),
        })?;
        Ok(())
    }

    fn unlink(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError> {
        let src_pad = self.pad(src)?;
        let sink_pad = self.pad(sink)?;
        src_pad
            .unlink(&sink_pad)
            .map_err(|_| RuntimeError::Unlink {
                src: src.clone(),
                sink: sink.clone(),
            })
    }

    fn set_processing_state(&self, state: ProcessingState) -> Result<(), RuntimeError> {
        self.pipeline
            .set_state(to_gst_state(state))
            .map_err(|_| RuntimeError::StateChange(state))?;
        Ok(())
    }

    fn processing_state(&self) -> ProcessingState {
        // don't wait for in-flight transitions, report where the pipeline is now
        let (_, current, _) = self.pipeline.state(gst::ClockTime::ZERO);
        match current {
            gst::State::Playing => ProcessingState::Playing,
            gst::State::Paused => ProcessingState::Paused,
            _ => ProcessingState::Null,
        }
    }

    fn subscribe_pad_events(
        &self,
        id: ElementId,
        handler: PadEventHandler,
    ) -> Result<(), RuntimeError> {
        let element = self.element(id)?;
        let handler = Arc::new(handler);

        let added = Arc::clone(&handler);
        element.connect_pad_added(move |_, pad| {
            if pad.direction() == gst::PadDirection::Src {
                (*added)(PadEvent::Created(PadRef::new(id, pad.name().as_str())));
            }
        });

        let removed = handler;
        element.connect_pad_removed(move |_, pad| {
            if pad.direction() == gst::PadDirection::Src {
                (*removed)(PadEvent::Removed(PadRef::new(id, pad.name().as_str())));
            }
        });

        Ok(())
    }
}

impl Drop for GstRuntime {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}

fn to_gst_state(state: ProcessingState) -> gst::State {
    match state {
        ProcessingState::Null => gst::State::Null,
        ProcessingState::Paused => gst::State::Paused,
        ProcessingState::Playing => gst::State::Playing,
    }
}
