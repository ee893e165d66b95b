//! Raw-mode stdin polling for the watch loop's exit key.

use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use std::io::IsTerminal;
use std::os::fd::AsFd;

/// Key code that terminates the watch loop (Escape).
pub const EXIT_KEY: u8 = 27;

/// Puts the controlling terminal into non-canonical, no-echo mode so key
/// presses arrive without a newline, and restores the saved settings on
/// drop. On a non-tty stdin (e.g. piped input) this is a no-op and
/// polling always reports no key.
pub struct KeyPoller {
    saved: Option<Termios>,
}

impl KeyPoller {
    pub fn new() -> Self {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            tracing::debug!("stdin is not a terminal, exit key disabled");
            return Self { saved: None };
        }

        let saved = match termios::tcgetattr(stdin.as_fd()) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read terminal attributes");
                return Self { saved: None };
            }
        };

        let mut raw = saved.clone();
        raw.local_flags &= !(LocalFlags::ICANON | LocalFlags::ECHO);
        if let Err(e) = termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &raw) {
            tracing::warn!(error = %e, "failed to enter raw mode");
            return Self { saved: None };
        }

        Self { saved: Some(saved) }
    }

    /// Non-blocking check for a pending key press; returns the byte if
    /// one is waiting.
    pub fn poll(&self) -> Option<u8> {
        self.saved.as_ref()?;

        let mut fds = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };

        // Safety: fds points to one valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&mut fds, 1, 0) };
        if ready <= 0 || fds.revents & libc::POLLIN == 0 {
            return None;
        }

        let mut byte = 0u8;
        // Safety: reading one byte into a valid local buffer.
        let n = unsafe { libc::read(libc::STDIN_FILENO, &mut byte as *mut u8 as *mut _, 1) };
        if n == 1 {
            Some(byte)
        } else {
            None
        }
    }

    /// True when the pending key press is the exit key.
    pub fn exit_requested(&self) -> bool {
        self.poll() == Some(EXIT_KEY)
    }
}

impl Default for KeyPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KeyPoller {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let stdin = std::io::stdin();
            if let Err(e) = termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &saved) {
                tracing::warn!(error = %e, "failed to restore terminal attributes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_key_is_escape() {
        assert_eq!(EXIT_KEY, 27);
    }

    #[test]
    fn test_inert_poller_reports_no_key() {
        let poller = KeyPoller { saved: None };
        assert_eq!(poller.poll(), None);
        assert!(!poller.exit_requested());
    }
}
