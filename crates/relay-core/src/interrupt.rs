//! User-interrupt handling.
//!
//! A user interrupt (Ctrl-C / `SIGINT`) must end the process with status 0
//! instead of surfacing as an error. Two things can carry it:
//!
//! - the asynchronous signal itself, caught by a process-wide handler
//!   installed through `ctrlc`;
//! - an error value returned by a dispatcher whose [`Interrupt::is_interrupt`]
//!   is true (for example a child process that died of `SIGINT`).
//!
//! [`shield`] covers both for the duration of one call: while its guard is
//! held, a delivered signal terminates through the shield's [`Terminator`],
//! and an interrupt error returned by the call terminates the same way.
//! Shields nest; the launcher holds one at each layer.
//!
//! Outside a shield the handler only speaks for relay during the startup
//! window opened by [`arm`]: a Ctrl-C there stays pending until the first
//! shield is entered. At any other time it ends the process as an unhandled
//! `SIGINT` would, so a host embedding the launcher stays interruptible
//! between calls.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::constants::{INTERRUPT_EXIT_CODE, SIGINT_EXIT_CODE};

/// Classifies errors that represent a user interrupt.
pub trait Interrupt {
    /// Returns `true` if this error is the user-interrupt condition.
    fn is_interrupt(&self) -> bool;
}

/// Ends the process with a status code.
pub trait Terminator: Send + Sync {
    /// Terminate with `code`. Never returns.
    fn terminate(&self, code: i32) -> !;
}

/// Terminates the real process via [`std::process::exit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

// ============================================================================
// Process-wide state
// ============================================================================

struct Scope {
    id: u64,
    layer: &'static str,
    terminator: Arc<dyn Terminator>,
}

static SCOPES: Mutex<Vec<Scope>> = Mutex::new(Vec::new());
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);
static ARMED: AtomicBool = AtomicBool::new(false);
static REQUESTED: AtomicBool = AtomicBool::new(false);
static HANDLER_INSTALLED: OnceLock<bool> = OnceLock::new();

fn scopes() -> MutexGuard<'static, Vec<Scope>> {
    // A terminator that unwinds never holds this lock, but recover anyway.
    SCOPES.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Install the process-wide `SIGINT` handler.
///
/// Idempotent. Returns whether the handler is active; if another handler
/// already owns the signal, a warning is logged and interrupts are only
/// recognised through returned errors.
///
/// Once installed, a Ctrl-C that arrives while no shield is held and no
/// startup window is open ends the process with status 130, the status a
/// shell reports for the default `SIGINT` action.
pub fn install_handler() -> bool {
    *HANDLER_INSTALLED.get_or_init(|| match ctrlc::set_handler(|| deliver(&ProcessExit)) {
        Ok(()) => {
            tracing::debug!("Ctrl-C handler installed");
            true
        }
        Err(e) => {
            tracing::warn!("Could not install Ctrl-C handler: {}", e);
            false
        }
    })
}

/// Open the startup window.
///
/// Installs the handler. Until the next outermost shield is entered, a
/// Ctrl-C is kept pending instead of ending the process; that shield then
/// terminates with status 0 before running anything. Call this first thing
/// in `main`, before loading configuration.
pub fn arm() -> bool {
    let installed = install_handler();
    ARMED.store(true, Ordering::SeqCst);
    tracing::debug!("Startup window open");
    installed
}

/// Whether a Ctrl-C arrived during the startup window and is still pending.
pub fn requested() -> bool {
    REQUESTED.load(Ordering::SeqCst)
}

enum Delivery {
    Shield(&'static str, Arc<dyn Terminator>),
    Pending,
    Unshielded,
}

/// Signal handler body.
///
/// Terminates through the innermost held shield. During the startup window
/// the interrupt is recorded for the first shield; otherwise `fallback` ends
/// the process the way an unhandled `SIGINT` would.
pub(crate) fn deliver(fallback: &dyn Terminator) {
    let delivery = {
        let scopes = scopes();
        match scopes.last() {
            Some(scope) => Delivery::Shield(scope.layer, Arc::clone(&scope.terminator)),
            None if ARMED.load(Ordering::SeqCst) => {
                REQUESTED.store(true, Ordering::SeqCst);
                Delivery::Pending
            }
            None => Delivery::Unshielded,
        }
    };

    match delivery {
        Delivery::Shield(layer, terminator) => {
            tracing::debug!(layer, "Interrupt received, exiting");
            terminator.terminate(INTERRUPT_EXIT_CODE)
        }
        Delivery::Pending => tracing::debug!("Interrupt during startup, pending"),
        Delivery::Unshielded => fallback.terminate(SIGINT_EXIT_CODE),
    }
}

// ============================================================================
// Shield
// ============================================================================

/// Scoped registration of a terminator with the signal handler.
///
/// Dropping the guard unregisters it, including during unwinding.
pub struct ShieldGuard {
    id: u64,
    layer: &'static str,
}

impl ShieldGuard {
    /// Register `terminator` for the `SIGINT` handler until the guard drops.
    ///
    /// Entering the outermost shield closes the startup window; an interrupt
    /// kept pending during that window terminates immediately.
    pub fn enter(layer: &'static str, terminator: Arc<dyn Terminator>) -> Self {
        install_handler();

        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::SeqCst);
        let pending = {
            let mut scopes = scopes();
            let outermost = scopes.is_empty();
            scopes.push(Scope {
                id,
                layer,
                terminator: Arc::clone(&terminator),
            });
            if outermost {
                ARMED.store(false, Ordering::SeqCst);
                REQUESTED.swap(false, Ordering::SeqCst)
            } else {
                false
            }
        };
        let guard = Self { id, layer };
        tracing::debug!(layer, "Interrupt shield entered");

        if pending {
            tracing::debug!(layer, "Interrupt pending on entry, exiting");
            terminator.terminate(INTERRUPT_EXIT_CODE);
        }

        guard
    }

    /// Name of the layer that holds this guard.
    pub fn layer(&self) -> &'static str {
        self.layer
    }
}

impl Drop for ShieldGuard {
    fn drop(&mut self) {
        scopes().retain(|scope| scope.id != self.id);
        tracing::debug!(layer = self.layer, "Interrupt shield released");
    }
}

/// Run `f` under an interrupt shield.
///
/// A `SIGINT` delivered while `f` runs, or an interrupt error returned by
/// `f`, terminates through `terminator` with status 0. Every other result is
/// returned unchanged.
pub fn shield<T, E, F>(
    layer: &'static str,
    terminator: &Arc<dyn Terminator>,
    f: F,
) -> Result<T, E>
where
    E: Interrupt,
    F: FnOnce() -> Result<T, E>,
{
    let _guard = ShieldGuard::enter(layer, Arc::clone(terminator));

    match f() {
        Err(e) if e.is_interrupt() => {
            tracing::debug!(layer, "Dispatch interrupted, exiting");
            terminator.terminate(INTERRUPT_EXIT_CODE)
        }
        other => other,
    }
}

/// Number of shields currently held in this process.
pub fn active_shields() -> usize {
    scopes().len()
}
