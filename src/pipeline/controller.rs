//! Playback control and dynamic stream linking
//!
//! The controller owns the pipeline lifecycle (uninitialized → paused ⇄
//! playing → stopped) and the single reactive edge of the graph: the link
//! between the source's dynamically created output endpoint and the
//! depayloader's fixed input.

use crate::pipeline::state::PlaybackState;
use crate::pipeline::{Error, StreamPipeline};
use crate::runtime::{PadEvent, PadRef, PropertyValue, StreamRuntime, WINDOW_HANDLE_PROPERTY};
use std::sync::{Arc, Mutex};

/// Drives playback of one assembled pipeline.
///
/// Cheap to clone; every clone shares the same pipeline and the same lock.
/// Endpoint notifications arrive from the runtime's worker threads, so the
/// playback state and the dynamic-link slot live under a single mutex and a
/// late notification can never race a user-initiated `stop()`.
#[derive(Clone)]
pub struct PlaybackController {
    shared: Arc<Shared>,
}

struct Shared {
    pipeline: StreamPipeline,
    guarded: Mutex<Guarded>,
}

struct Guarded {
    state: PlaybackState,
    stream_link: Option<PadRef>,
}

impl PlaybackController {
    /// Takes ownership of a freshly built pipeline and subscribes to the
    /// source's pad events.
    ///
    /// Subscribing happens here, after construction finished static linking,
    /// so a created-notification can never observe a half-linked graph.
    pub fn new(pipeline: StreamPipeline) -> Result<Self, Error> {
        let controller = Self {
            shared: Arc::new(Shared {
                guarded: Mutex::new(Guarded {
                    state: PlaybackState::Uninitialized,
                    stream_link: None,
                }),
                pipeline,
            }),
        };

        let weak = Arc::downgrade(&controller.shared);
        let source = controller.shared.pipeline.source();
        controller.shared.pipeline.runtime().subscribe_pad_events(
            source,
            Box::new(move |event| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                PlaybackController { shared }.handle_pad_event(event);
            }),
        )?;

        Ok(controller)
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.shared.guarded.lock().unwrap().state
    }

    /// Whether the dynamic Source→Depay link is currently established.
    pub fn stream_linked(&self) -> bool {
        self.shared.guarded.lock().unwrap().stream_link.is_some()
    }

    /// Begin or resume playback.
    pub fn start(&self) -> Result<(), Error> {
        let mut guarded = self.shared.guarded.lock().unwrap();
        if !guarded.state.can_start() {
            return Err(Error::InvalidStateTransition {
                from: guarded.state,
                op: "start",
            });
        }
        self.apply(&mut guarded, PlaybackState::Playing)
    }

    /// Toggle between playing and paused.
    pub fn toggle(&self) -> Result<(), Error> {
        let mut guarded = self.shared.guarded.lock().unwrap();
        let Some(next) = guarded.state.toggled() else {
            return Err(Error::InvalidStateTransition {
                from: guarded.state,
                op: "toggle",
            });
        };
        self.apply(&mut guarded, next)
    }

    /// Tear the pipeline down and release its elements.
    ///
    /// Permitted from any state and safe to call while an endpoint
    /// notification is in flight; terminal once it returns.
    pub fn stop(&self) -> Result<(), Error> {
        let mut guarded = self.shared.guarded.lock().unwrap();
        if guarded.state.is_stopped() {
            return Ok(());
        }
        if let Some(pad) = guarded.stream_link.take() {
            // the endpoint may already be gone together with its stream
            let _ = self
                .shared
                .pipeline
                .runtime()
                .unlink(&pad, &self.shared.pipeline.depay_input());
        }
        self.apply(&mut guarded, PlaybackState::Stopped)
    }

    fn apply(&self, guarded: &mut Guarded, next: PlaybackState) -> Result<(), Error> {
        if let Some(target) = next.processing_target() {
            self.shared.pipeline.runtime().set_processing_state(target)?;
        }
        log::info!("PlaybackController: {} -> {}", guarded.state, next);
        guarded.state = next;
        Ok(())
    }

    fn handle_pad_event(&self, event: PadEvent) {
        match event {
            PadEvent::Created(pad) => {
                if let Err(err) = self.on_endpoint_created(pad) {
                    log::warn!("PlaybackController: stream endpoint dropped: {err}");
                }
            }
            PadEvent::Removed(pad) => self.on_endpoint_removed(&pad),
        }
    }

    /// Complete the deferred Source→Depay edge.
    ///
    /// Invoked by the runtime once the network stream's format has been
    /// negotiated and the source's output endpoint exists. A second
    /// notification while a link is active replaces the old link rather than
    /// stacking a new one on top of it.
    pub fn on_endpoint_created(&self, pad: PadRef) -> Result<(), Error> {
        let mut guarded = self.shared.guarded.lock().unwrap();
        if guarded.state.is_stopped() {
            log::debug!("PlaybackController: endpoint {pad} appeared after stop, ignoring");
            return Ok(());
        }

        let runtime = self.shared.pipeline.runtime();
        let depay_input = self.shared.pipeline.depay_input();

        if let Some(old) = guarded.stream_link.take() {
            let _ = runtime.unlink(&old, &depay_input);
            log::debug!("PlaybackController: superseded stream endpoint {old}");
        }

        // a dropped stream may have cleared the sink's render target,
        // re-apply it before the link brings frames back
        runtime.set_property(
            self.shared.pipeline.sink(),
            WINDOW_HANDLE_PROPERTY,
            PropertyValue::Handle(self.shared.pipeline.session().surface().raw()),
        )?;

        match runtime.link(&pad, &depay_input) {
            Ok(()) => {
                log::info!("PlaybackController: stream endpoint {pad} linked");
                guarded.stream_link = Some(pad);
                Ok(())
            }
            Err(source) => Err(Error::EndpointUnavailable { pad, source }),
        }
    }

    /// Undo the dynamic link after the runtime tore the endpoint down.
    ///
    /// No-op when the removed endpoint is not the one currently linked.
    pub fn on_endpoint_removed(&self, pad: &PadRef) {
        let mut guarded = self.shared.guarded.lock().unwrap();
        if guarded.stream_link.as_ref() == Some(pad) {
            let _ = self
                .shared
                .pipeline
                .runtime()
                .unlink(pad, &self.shared.pipeline.depay_input());
            guarded.stream_link = None;
            log::info!("PlaybackController: stream endpoint {pad} unlinked");
        }
    }
}
