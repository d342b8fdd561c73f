//! Shared handle passed to every widget constructor.

use std::fmt;
use std::sync::Arc;

use trellis_core::{Config, Document};

use crate::element::Element;
use crate::msg::{DefaultMessages, MessageSource};

/// Everything a widget needs from its environment.
///
/// Cloning is cheap; all fields are reference counted.
#[derive(Clone)]
pub struct UiContext {
    document: Arc<dyn Document>,
    config: Arc<Config>,
    messages: Arc<dyn MessageSource>,
}

impl UiContext {
    /// Create a context with the default configuration and English messages.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            config: Arc::new(Config::default()),
            messages: Arc::new(DefaultMessages),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageSource>) -> Self {
        self.messages = messages;
        self
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a detached element owned by the caller.
    pub fn create(&self, tag: &str) -> Element {
        Element::new(self.document.clone(), tag)
    }

    /// Resolve a message key, substituting `$1..$n` with `params`.
    pub fn msg(&self, key: &str, params: &[&str]) -> String {
        crate::msg::resolve(self.messages.as_ref(), key, params)
    }
}

impl fmt::Debug for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
