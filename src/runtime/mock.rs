//! In-memory runtime double used by the unit tests.

use crate::runtime::{
    ElementId, ElementRole, PadEvent, PadEventHandler, PadRef, ProcessingState, PropertyValue,
    RuntimeError, StreamRuntime,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Records every contract call so tests can assert on the resulting graph,
/// and can be told to refuse element creation or linking.
pub(crate) struct MockRuntime {
    inner: Mutex<Inner>,
}

struct Inner {
    roles: Vec<ElementRole>,
    in_pipeline: HashSet<usize>,
    properties: HashMap<(usize, String), PropertyValue>,
    links: HashSet<(PadRef, PadRef)>,
    state: ProcessingState,
    handlers: Vec<Arc<PadEventHandler>>,
    fail_creation: HashSet<ElementRole>,
    refuse_links: bool,
}

impl MockRuntime {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                roles: Vec::new(),
                in_pipeline: HashSet::new(),
                properties: HashMap::new(),
                links: HashSet::new(),
                state: ProcessingState::Null,
                handlers: Vec::new(),
                fail_creation: HashSet::new(),
                refuse_links: false,
            }),
        }
    }

    pub(crate) fn fail_element_creation(&self, role: ElementRole) {
        self.inner.lock().unwrap().fail_creation.insert(role);
    }

    pub(crate) fn refuse_links(&self, refuse: bool) {
        self.inner.lock().unwrap().refuse_links = refuse;
    }

    pub(crate) fn element_count(&self) -> usize {
        self.inner.lock().unwrap().roles.len()
    }

    pub(crate) fn elements_in_pipeline(&self) -> usize {
        self.inner.lock().unwrap().in_pipeline.len()
    }

    pub(crate) fn link_count(&self) -> usize {
        self.inner.lock().unwrap().links.len()
    }

    pub(crate) fn has_link(&self, src: &PadRef, sink: &PadRef) -> bool {
        self.inner
            .lock()
            .unwrap()
            .links
            .contains(&(src.clone(), sink.clone()))
    }

    pub(crate) fn property(&self, element: ElementId, key: &str) -> Option<PropertyValue> {
        self.inner
            .lock()
            .unwrap()
            .properties
            .get(&(element.index(), key.to_owned()))
            .cloned()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().handlers.len()
    }

    /// Fire a pad event at every subscribed handler, as the real runtime does
    /// from its worker threads.
    pub(crate) fn emit(&self, event: PadEvent) {
        let handlers: Vec<Arc<PadEventHandler>> = self
            .inner
            .lock()
            .unwrap()
            .handlers
            .iter()
            .map(Arc::clone)
            .collect();
        for handler in handlers {
            (*handler)(event.clone());
        }
    }

    fn check_element(inner: &Inner, id: ElementId) -> Result<(), RuntimeError> {
        if id.index() < inner.roles.len() {
            Ok(())
        } else {
            Err(RuntimeError::UnknownElement(id))
        }
    }
}

impl StreamRuntime for MockRuntime {
    fn create_element(&self, role: ElementRole) -> Result<ElementId, RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_creation.contains(&role) {
            return Err(RuntimeError::ElementCreation(role));
        }
        inner.roles.push(role);
        Ok(ElementId::new(inner.roles.len() - 1))
    }

    fn set_property(
        &self,
        element: ElementId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_element(&inner, element)?;
        inner
            .properties
            .insert((element.index(), key.to_owned()), value);
        Ok(())
    }

    fn add_to_pipeline(&self, element: ElementId) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_element(&inner, element)?;
        inner.in_pipeline.insert(element.index());
        Ok(())
    }

    fn link(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_element(&inner, src.element)?;
        Self::check_element(&inner, sink.element)?;
        if inner.refuse_links {
            return Err(RuntimeError::Link {
                src: src.clone(),
                sink: sink.clone(),
            });
        }
        inner.links.insert((src.clone(), sink.clone()));
        Ok(())
    }

    fn unlink(&self, src: &PadRef, sink: &PadRef) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.links.remove(&(src.clone(), sink.clone())) {
            Ok(())
        } else {
            Err(RuntimeError::Unlink {
                src: src.clone(),
                sink: sink.clone(),
            })
        }
    }

    fn set_processing_state(&self, state: ProcessingState) -> Result<(), RuntimeError> {
        self.inner.lock().unwrap().state = state;
        Ok(())
    }

    fn processing_state(&self) -> ProcessingState {
        self.inner.lock().unwrap().state
    }

    fn subscribe_pad_events(
        &self,
        element: ElementId,
        handler: PadEventHandler,
    ) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_element(&inner, element)?;
        inner.handlers.push(Arc::new(handler));
        Ok(())
    }
}
