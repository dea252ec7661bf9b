//! Explicit pairing of a listener with its optional release capability.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::{Closer, Listener};

/// One configured component: a run capability, an optional release
/// capability, and a display name used in logs and errors.
#[derive(Clone)]
pub struct ListenerEntry {
    name: Cow<'static, str>,
    listener: Arc<dyn Listener>,
    closer: Option<Arc<dyn Closer>>,
}

impl ListenerEntry {
    /// Entry for a listener that cannot be released externally.
    pub fn new<L>(listener: Arc<L>) -> Self
    where
        L: Listener + 'static,
    {
        Self {
            name: Cow::Borrowed(short_type_name::<L>()),
            listener,
            closer: None,
        }
    }

    /// Entry for a value that both runs and releases itself.
    pub fn closable<L>(listener: Arc<L>) -> Self
    where
        L: Listener + Closer + 'static,
    {
        let closer: Arc<dyn Closer> = listener.clone();
        Self {
            name: Cow::Borrowed(short_type_name::<L>()),
            listener,
            closer: Some(closer),
        }
    }

    /// Attach a separate release capability.
    pub fn with_closer(mut self, closer: Arc<dyn Closer>) -> Self {
        self.closer = Some(closer);
        self
    }

    /// Override the display name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listener(&self) -> &Arc<dyn Listener> {
        &self.listener
    }

    pub fn closer(&self) -> Option<&Arc<dyn Closer>> {
        self.closer.as_ref()
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("name", &self.name)
            .field("closable", &self.closer.is_some())
            .finish()
    }
}

/// `my_crate::net::Server<T>` → `Server<T>`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
