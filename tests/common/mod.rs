//! Common test utilities

use gantry::graph::Target;
use gantry::runner::{BuildContext, Verbosity};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared record of action execution order
pub type Trace = Rc<RefCell<Vec<String>>>;

pub fn new_trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

/// A target whose action appends its own name to the trace
pub fn recording_target(name: &str, trace: &Trace) -> Target {
    let trace = Rc::clone(trace);
    let id = name.to_string();
    Target::new(name).action(move |_| {
        trace.borrow_mut().push(id.clone());
        Ok(())
    })
}

/// A context that prints nothing
pub fn silent_context() -> BuildContext {
    BuildContext::new().with_verbosity(Verbosity::Silent)
}
