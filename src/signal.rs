//! Shutdown on SIGINT/SIGTERM.
//!
//! Ctrl+C reaches the UI as a key event while raw mode is on; these
//! handlers cover `kill` and signals delivered before the terminal is set up.

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Register termination handlers and return the flag they set.
///
/// The main loop checks the flag every tick and leaves through the normal
/// terminal-restore path. A second signal while the flag is already set
/// exits immediately with code 1.
pub fn setup_shutdown_handlers() -> Result<Arc<AtomicBool>, std::io::Error> {
    let shutdown = Arc::new(AtomicBool::new(false));

    for sig in TERM_SIGNALS {
        // Armed only once `shutdown` is true
        flag::register_conditional_shutdown(*sig, 1, Arc::clone(&shutdown))?;
        flag::register(*sig, Arc::clone(&shutdown))?;
    }

    Ok(shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_flag_starts_clear() {
        let shutdown = setup_shutdown_handlers().unwrap();
        assert!(!shutdown.load(Ordering::SeqCst));
    }
}
