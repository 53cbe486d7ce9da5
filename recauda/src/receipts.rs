//! Receipt printing collaborator.

use crate::types::BuyerId;

/// Prints raffle receipts for buyers
pub trait ReceiptPrinter: Send + Sync {
    /// Queue receipts for `buyers`; returns how many were queued
    fn print(&self, buyers: &[BuyerId]) -> usize;
}

/// Printer that only logs what it would print
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReceiptPrinter;

impl ReceiptPrinter for LogReceiptPrinter {
    fn print(&self, buyers: &[BuyerId]) -> usize {
        for buyer in buyers {
            tracing::info!(%buyer, "Printing receipt");
        }
        buyers.len()
    }
}

/// Snackbar text after printing
#[must_use]
pub fn printing_message(count: usize) -> String {
    if count == 1 {
        "Imprimiendo 1 comprobante".to_string()
    } else {
        format!("Imprimiendo {count} comprobantes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_printer_counts_buyers() {
        let printed = LogReceiptPrinter.print(&[BuyerId::new("1"), BuyerId::new("2")]);
        assert_eq!(printed, 2);
        assert_eq!(printing_message(printed), "Imprimiendo 2 comprobantes");
        assert_eq!(printing_message(1), "Imprimiendo 1 comprobante");
    }
}
