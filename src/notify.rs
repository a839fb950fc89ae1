use crate::error::Result;
use crate::proximity::{AlertEvent, Notifier};

const APP_NAME: &str = "tipsy";

/// Delivers alerts through the desktop notification daemon.
#[derive(Default)]
pub struct DesktopNotifier {
    timeout_ms: Option<u32>,
}

impl DesktopNotifier {
    pub fn with_timeout_ms(timeout_ms: u32) -> Self {
        DesktopNotifier {
            timeout_ms: Some(timeout_ms),
        }
    }

    fn timeout(&self) -> notify_rust::Timeout {
        match self.timeout_ms {
            Some(ms) => notify_rust::Timeout::Milliseconds(ms),
            None => notify_rust::Timeout::Default,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn send(&self, alert: &AlertEvent) -> Result<()> {
        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(&alert.title)
            .body(&alert.body)
            .timeout(self.timeout())
            .show()?;

        log::info!("Notified about {}", alert.point.label());
        Ok(())
    }
}

/// Only writes alerts to the log.
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, alert: &AlertEvent) -> Result<()> {
        log::warn!(
            "{}: {} ({})",
            alert.title,
            alert.body,
            alert.point.label()
        );
        Ok(())
    }
}
