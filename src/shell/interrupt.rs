//! Operator interrupt (Ctrl-C) tracking.
//!
//! The handler only raises a flag. Running commands are killed when it is
//! raised, and the item executor turns the rest of the run into `ABORTED`
//! items, so an interrupted run still ends with a complete report and a
//! failing exit code.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// The process-wide interrupt flag.
pub fn interrupt_flag() -> &'static AtomicBool {
    &INTERRUPTED
}

/// Install a SIGINT handler that raises [`interrupt_flag`].
///
/// Commands run in their own process group and don't see the terminal's
/// SIGINT. The shell module polls the flag and kills them instead.
pub fn install_interrupt_handler() {
    #[cfg(unix)]
    {
        // SAFETY: the handler only performs an atomic store, which is
        // async-signal-safe.
        unsafe {
            libc::signal(
                libc::SIGINT,
                handle_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t,
            );
        }
    }
}

#[cfg(unix)]
extern "C" fn handle_sigint(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}
