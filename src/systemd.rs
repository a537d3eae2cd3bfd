//! Thin wrapper around systemd sd_notify integration.
//!
//! Every method is a no-op when `enabled` is false or on non-Linux
//! platforms, so callers never need `#[cfg]` conditionals of their own.

/// Holds the runtime flag controlling whether sd-notify messages are sent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SystemdNotifier {
    enabled: bool,
}

impl SystemdNotifier {
    /// Create a new notifier. When `enabled` is false, all methods are no-ops.
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Send `READY=1` to systemd (service startup complete).
    pub(crate) fn notify_ready(&self) {
        if !self.enabled {
            return;
        }
        #[cfg(target_os = "linux")]
        if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
            tracing::debug!(error = %e, "sd_notify READY failed");
        }
    }

    /// Send `STOPPING=1` to systemd (service shutting down).
    pub(crate) fn notify_stopping(&self) {
        if !self.enabled {
            return;
        }
        #[cfg(target_os = "linux")]
        if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Stopping]) {
            tracing::debug!(error = %e, "sd_notify STOPPING failed");
        }
    }

    /// Send `STATUS=<msg>` to systemd (human-readable status).
    pub(crate) fn notify_status(&self, msg: &str) {
        if !self.enabled {
            return;
        }
        #[cfg(not(target_os = "linux"))]
        let _ = msg;
        #[cfg(target_os = "linux")]
        if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Status(msg)]) {
            tracing::debug!(error = %e, "sd_notify STATUS failed");
        }
    }

    /// Send `WATCHDOG=1` to systemd (keepalive ping).
    pub(crate) fn notify_watchdog(&self) {
        if !self.enabled {
            return;
        }
        #[cfg(target_os = "linux")]
        if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Watchdog]) {
            tracing::debug!(error = %e, "sd_notify WATCHDOG failed");
        }
    }
}
