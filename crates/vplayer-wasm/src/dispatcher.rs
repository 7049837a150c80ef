//! Event dispatcher - routes browser callbacks into the shared widget
//!
//! DOM listeners, timers and promise continuations all hold a clone of the
//! dispatcher. Events that arrive while the widget is already borrowed are
//! queued and handled by the borrower before it releases the widget.

use crate::dom_host::DomHost;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use vplayer_core::{VideoPlayerWidget, WidgetEvent};

/// The widget as shared between the JS-facing handle and the dispatcher
pub type SharedWidget = RefCell<VideoPlayerWidget<DomHost>>;

#[derive(Default)]
struct Inner {
    widget: RefCell<Weak<SharedWidget>>,
    queue: RefCell<VecDeque<WidgetEvent>>,
}

/// Cloneable handle delivering [`WidgetEvent`]s
#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Rc<Inner>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the dispatcher at the widget and deliver anything queued so far
    pub fn attach(&self, widget: &Rc<SharedWidget>) {
        *self.inner.widget.borrow_mut() = Rc::downgrade(widget);
        self.flush();
    }

    /// Queue an event and deliver it now unless the widget is busy
    pub fn dispatch(&self, event: WidgetEvent) {
        self.inner.queue.borrow_mut().push_back(event);
        self.flush();
    }

    /// Deliver queued events
    pub fn flush(&self) {
        let Some(cell) = self.inner.widget.borrow().upgrade() else {
            return;
        };
        let Ok(mut widget) = cell.try_borrow_mut() else {
            // The current borrower drains the queue before returning
            return;
        };
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            match next {
                Some(event) => widget.handle(event),
                None => break,
            }
        }
    }
}
