//! Notifications raised during a read
//!
//! Listeners are registered per [`EventName`] (or for every event) and are
//! called synchronously, in registration order, on the thread running the
//! dispatch loop. Payloads borrow from the reader; listeners that need data
//! after the call must copy it out.

use std::collections::HashMap;
use std::fmt;

use crate::error::StreamError;
use crate::hyperlinks::{HyperlinkReader, Relationship};
use crate::part::PartKind;
use crate::worksheet::{Row, WorksheetReader};

/// Name of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// `entry`
    Entry,
    /// `shared-string`
    SharedString,
    /// `worksheet`
    Worksheet,
    /// `hyperlinks`
    Hyperlinks,
    /// `hyperlink`
    Hyperlink,
    /// `row`
    Row,
    /// `error`
    Error,
    /// `finished`
    Finished,
}

impl EventName {
    /// Wire name of the notification
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Entry => "entry",
            EventName::SharedString => "shared-string",
            EventName::Worksheet => "worksheet",
            EventName::Hyperlinks => "hyperlinks",
            EventName::Hyperlink => "hyperlink",
            EventName::Row => "row",
            EventName::Error => "error",
            EventName::Finished => "finished",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification and its payload
#[derive(Debug)]
pub enum ReadEvent<'a> {
    /// An entry was classified and is about to be handled
    Entry { path: &'a str, kind: PartKind },
    /// One shared string item, under `sharedStrings: emit`
    SharedString { index: usize, text: &'a str },
    /// A worksheet reader was looked up for dispatch, under `worksheets: emit`
    Worksheet(&'a WorksheetReader),
    /// A hyperlink reader was created, under `hyperlinks: emit`
    Hyperlinks(&'a HyperlinkReader),
    /// One hyperlink relationship of a sheet, under `hyperlinks: emit`
    Hyperlink {
        sheet_number: u32,
        link: &'a Relationship,
    },
    /// A worksheet row was decoded
    Row(&'a Row),
    /// A part failed, or the byte source failed
    Error(&'a StreamError),
    /// The byte source is exhausted; raised exactly once
    Finished,
}

impl ReadEvent<'_> {
    /// Name of this notification
    pub fn name(&self) -> EventName {
        match self {
            ReadEvent::Entry { .. } => EventName::Entry,
            ReadEvent::SharedString { .. } => EventName::SharedString,
            ReadEvent::Worksheet(_) => EventName::Worksheet,
            ReadEvent::Hyperlinks(_) => EventName::Hyperlinks,
            ReadEvent::Hyperlink { .. } => EventName::Hyperlink,
            ReadEvent::Row(_) => EventName::Row,
            ReadEvent::Error(_) => EventName::Error,
            ReadEvent::Finished => EventName::Finished,
        }
    }
}

/// Callback invoked with each matching notification
pub type Listener = Box<dyn FnMut(&ReadEvent<'_>)>;

/// Observer list for one read operation
#[derive(Default)]
pub struct Emitter {
    named: HashMap<EventName, Vec<Listener>>,
    any: Vec<Listener>,
}

impl Emitter {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one notification name
    pub fn on<F>(&mut self, name: EventName, listener: F)
    where
        F: FnMut(&ReadEvent<'_>) + 'static,
    {
        self.named.entry(name).or_default().push(Box::new(listener));
    }

    /// Register a listener for every notification
    pub fn on_any<F>(&mut self, listener: F)
    where
        F: FnMut(&ReadEvent<'_>) + 'static,
    {
        self.any.push(Box::new(listener));
    }

    /// Whether anything would observe a notification with this name
    pub fn has_listeners(&self, name: EventName) -> bool {
        !self.any.is_empty() || self.named.get(&name).is_some_and(|l| !l.is_empty())
    }

    /// Deliver a notification: named listeners first, then catch-all ones
    pub fn emit(&mut self, event: &ReadEvent<'_>) {
        if let Some(listeners) = self.named.get_mut(&event.name()) {
            for listener in listeners.iter_mut() {
                listener(event);
            }
        }
        for listener in self.any.iter_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let named: usize = self.named.values().map(Vec::len).sum();
        f.debug_struct("Emitter")
            .field("named", &named)
            .field("any", &self.any.len())
            .finish()
    }
}
