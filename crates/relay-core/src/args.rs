//! Argument vector sources.
//!
//! The launcher never reads `std::env` directly; it asks an [`ArgSource`].
//! Production code uses [`ProcessArgs`], embedders and tests use [`FixedArgs`].

/// Supplies the argument vector for an invocation without explicit arguments.
pub trait ArgSource {
    /// Produce the argument vector. Element 0 is the program name by convention.
    fn args(&self) -> Vec<String>;
}

/// The live process argument vector.
///
/// Tokens that are not valid UTF-8 are converted lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessArgs;

impl ArgSource for ProcessArgs {
    fn args(&self) -> Vec<String> {
        std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

/// A fixed argument vector.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixedArgs(Vec<String>);

impl FixedArgs {
    /// Create a source that always yields `args`.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }
}

impl ArgSource for FixedArgs {
    fn args(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<A: ArgSource + ?Sized> ArgSource for &A {
    fn args(&self) -> Vec<String> {
        (**self).args()
    }
}
