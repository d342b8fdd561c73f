use trellis_core::{ListenKind, ListenTarget, ListenerId};

use crate::context::UiContext;
use crate::element::Element;

/// Load progress of a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Isolated content region of a window, loaded asynchronously exactly once.
///
/// [`load`](Self::load) registers a `Load` listener on the frame node; the host
/// reports completion through [`loaded`](Self::loaded).
#[derive(Debug)]
pub struct Frame {
    element: Element,
    content: Element,
    state: FrameState,
    listener: Option<ListenerId>,
}

impl Frame {
    pub fn new(ctx: &UiContext) -> Self {
        let element = Element::with_class(ctx.document().clone(), "iframe", "trellis-frame");
        let content = Element::with_class(ctx.document().clone(), "div", "trellis-frame-content");
        element.append(&content);
        Self {
            element,
            content,
            state: FrameState::Unloaded,
            listener: None,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Node window content is built into once loaded.
    pub fn content(&self) -> &Element {
        &self.content
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == FrameState::Loaded
    }

    /// Begin loading. Later calls are no-ops.
    pub fn load(&mut self) {
        if self.state != FrameState::Unloaded {
            return;
        }
        self.state = FrameState::Loading;
        let document = self.element.document().clone();
        self.listener = Some(document.listen(ListenTarget::Node(self.element.node()), ListenKind::Load));
    }

    /// Host reports that loading finished. Returns `true` only for the first completion.
    pub fn loaded(&mut self) -> bool {
        if self.state != FrameState::Loading {
            return false;
        }
        self.state = FrameState::Loaded;
        if let Some(listener) = self.listener.take() {
            self.element.document().unlisten(listener);
        }
        true
    }

    pub fn destroy(mut self) {
        if let Some(listener) = self.listener.take() {
            self.element.document().unlisten(listener);
        }
        self.element.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trellis_test_utils::MockDocument;

    #[test]
    fn test_loads_once() {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let mut frame = Frame::new(&ctx);

        assert!(!frame.loaded());
        frame.load();
        assert_eq!(frame.state(), FrameState::Loading);
        assert!(doc.has_listener(ListenTarget::Node(frame.element().node()), ListenKind::Load));

        assert!(frame.loaded());
        assert!(!frame.loaded());
        frame.load();
        assert!(frame.is_loaded());
        assert_eq!(doc.listener_count(), 0);
    }
}
