use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a toast notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Warning,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Success => write!(f, "success"),
            ToastKind::Error => write!(f, "error"),
            ToastKind::Warning => write!(f, "warning"),
        }
    }
}

/// Identifier assigned by the toast store; sequential within one store.
pub type ToastId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}
