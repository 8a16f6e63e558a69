use std::fmt::Write;

use tokio::sync::watch;

use pantry_common::alert::Alert;
use pantry_common::product::InventoryEntry;
use pantry_common::theme::{ThemeId, ThemeInfo};
use pantry_common::toast::{ToastId, ToastKind, ToastMessage};

pub fn inventory_table(entries: &[InventoryEntry]) -> String {
    if entries.is_empty() {
        return "Inventory is empty.\n".to_string();
    }
    let mut out = format!("{:<13}  {:>4}  {:<10}  {}\n", "EAN", "QTY", "EXPIRES", "NAME");
    for e in entries {
        let expires = e
            .expiry_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let low = if e.is_low_stock() { "  (low)" } else { "" };
        let _ = writeln!(
            out,
            "{:<13}  {:>4}  {:<10}  {}{}",
            e.product.ean, e.quantity, expires, e.product.name, low
        );
    }
    out
}

pub fn alert_list(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No active alerts.\n".to_string();
    }
    let mut out = String::new();
    for a in alerts {
        let _ = writeln!(
            out,
            "[{}] {} ({}): {}",
            a.kind, a.product_name, a.ean, a.detail
        );
    }
    out
}

pub fn theme_picker(themes: &[ThemeInfo], current: ThemeId) -> String {
    let mut out = String::new();
    for t in themes {
        let marker = if t.id == current { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<8} {:<13} {:<26} {}",
            t.id.as_str(),
            t.name,
            t.description,
            t.swatches.join(" ")
        );
    }
    out
}

fn toast_line(t: &ToastMessage) -> String {
    let tag = match t.kind {
        ToastKind::Success => "ok",
        ToastKind::Warning => "warn",
        ToastKind::Error => "error",
    };
    format!("[{tag}] {}", t.message)
}

/// Toasts in `queue` that have not been printed yet, oldest first.
fn unseen(queue: &[ToastMessage], printed: Option<ToastId>) -> Vec<&ToastMessage> {
    queue
        .iter()
        .filter(|t| printed.map_or(true, |last| t.id > last))
        .collect()
}

/// Print each toast to stderr once, as it appears. Returns when the store
/// is dropped.
pub async fn print_toasts(mut rx: watch::Receiver<Vec<ToastMessage>>) {
    let mut printed: Option<ToastId> = None;
    while rx.changed().await.is_ok() {
        let queue = rx.borrow_and_update().clone();
        for t in unseen(&queue, printed) {
            eprintln!("{}", toast_line(t));
            printed = Some(t.id);
        }
    }
}
