//! The dispatcher seam.
//!
//! A [`Dispatcher`] interprets an argument vector and runs the requested
//! command. The launcher treats it as opaque: it hands over the vector once
//! and looks only at whether the returned error is an interrupt.

use crate::interrupt::Interrupt;

/// Runs a command described by an argument vector.
pub trait Dispatcher {
    /// Error type returned by [`Dispatcher::run`].
    ///
    /// Errors that report a user interrupt must answer `true` to
    /// [`Interrupt::is_interrupt`]; all others are passed back to the
    /// launcher's caller untouched.
    type Error: Interrupt;

    /// Run the command for `args`.
    fn run(&self, args: Vec<String>) -> Result<(), Self::Error>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &D {
    type Error = D::Error;

    fn run(&self, args: Vec<String>) -> Result<(), Self::Error> {
        (**self).run(args)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    type Error = D::Error;

    fn run(&self, args: Vec<String>) -> Result<(), Self::Error> {
        (**self).run(args)
    }
}
