//! User-visible alert list.

use serde::Serialize;

/// Alert severity, used by the front-end for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Informational.
    Info,
    /// Something failed.
    Danger,
}

/// One alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Severity.
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// Message text.
    #[serde(rename = "msg")]
    pub message: String,
}

/// Ordered list of open alerts. Alerts stay until closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertLog {
    alerts: Vec<Alert>,
}

impl AlertLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert.
    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alerts.push(Alert {
            kind,
            message: message.into(),
        });
    }

    /// Append a failure alert.
    pub fn danger(&mut self, message: impl Into<String>) {
        self.push(AlertKind::Danger, message);
    }

    /// Record a failed load: `loading <what> from server failed with
    /// [status] statusText`.
    pub fn load_failed(&mut self, what: &str, cause: &impl std::fmt::Display) {
        self.danger(format!("loading {what} from server failed with {cause}"));
    }

    /// Close the alert at `index`; later alerts shift down.
    pub fn close(&mut self, index: usize) -> Option<Alert> {
        (index < self.alerts.len()).then(|| self.alerts.remove(index))
    }

    /// Open alerts, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Alert> {
        self.alerts.iter()
    }

    /// Number of open alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether no alert is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Close every alert.
    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

impl<'a> IntoIterator for &'a AlertLog {
    type Item = &'a Alert;
    type IntoIter = std::slice::Iter<'a, Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
