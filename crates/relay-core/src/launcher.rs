//! The process entry point.
//!
//! [`Launcher`] ties an [`ArgSource`], a [`Dispatcher`] and a [`Terminator`]
//! together:
//!
//! - [`Launcher::invoke`] resolves the argument vector (explicit, or from the
//!   source) and hands it to the dispatcher once, inside an interrupt shield.
//! - [`Launcher::entry`] calls `invoke(None)` inside a second, independent
//!   shield, so an interrupt landing before the inner shield is held still
//!   ends the process with status 0.
//!
//! Errors that are not interrupts come back to the caller unchanged.

use std::sync::Arc;

use crate::args::{ArgSource, ProcessArgs};
use crate::dispatch::Dispatcher;
use crate::interrupt::{shield, ProcessExit, Terminator};

/// Shield layer name used by [`Launcher::entry`].
pub const ENTRY_LAYER: &str = "entry";

/// Shield layer name used by [`Launcher::invoke`].
pub const INVOKE_LAYER: &str = "invoke";

/// Forwards an argument vector to a dispatcher, turning user interrupts into
/// a clean exit.
pub struct Launcher<S, D> {
    source: S,
    dispatcher: D,
    terminator: Arc<dyn Terminator>,
}

impl<D: Dispatcher> Launcher<ProcessArgs, D> {
    /// Launcher reading the live process arguments and exiting the real process.
    pub fn for_process(dispatcher: D) -> Self {
        Self::new(ProcessArgs, dispatcher, Arc::new(ProcessExit))
    }
}

impl<S, D> Launcher<S, D>
where
    S: ArgSource,
    D: Dispatcher,
{
    /// Create a launcher from its three collaborators.
    pub fn new(source: S, dispatcher: D, terminator: Arc<dyn Terminator>) -> Self {
        Self {
            source,
            dispatcher,
            terminator,
        }
    }

    /// The dispatcher commands are handed to.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run the dispatcher once.
    ///
    /// With `None`, the vector comes from the argument source. A user
    /// interrupt during dispatch terminates the process with status 0; any
    /// other error is returned as-is.
    pub fn invoke(&self, args: Option<Vec<String>>) -> Result<(), D::Error> {
        let args = args.unwrap_or_else(|| self.source.args());
        tracing::debug!(?args, "Invoking dispatcher");

        shield(INVOKE_LAYER, &self.terminator, || self.dispatcher.run(args))
    }

    /// Zero-argument entry point: `invoke(None)` under its own shield.
    pub fn entry(&self) -> Result<(), D::Error> {
        shield(ENTRY_LAYER, &self.terminator, || self.invoke(None))
    }
}
