use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the billing services. Delivery is fire-and-forget;
/// a lost event never fails the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Invoice events
    InvoiceCreated(Uuid),
    InvoiceUpdated(Uuid),
    InvoiceCancelled(Uuid),
    InvoiceDeleted(Uuid),

    // Payment events
    PaymentRecorded {
        payment_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
    },
    PaymentRefunded {
        payment_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
    },

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background consumer for the event channel. Today this logs each event;
/// downstream consumers (notifications, statements) hang off this loop.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::InvoiceCreated(id) => info!(invoice_id = %id, "event: invoice created"),
            Event::InvoiceUpdated(id) => info!(invoice_id = %id, "event: invoice updated"),
            Event::InvoiceCancelled(id) => info!(invoice_id = %id, "event: invoice cancelled"),
            Event::InvoiceDeleted(id) => info!(invoice_id = %id, "event: invoice deleted"),
            Event::PaymentRecorded {
                payment_id,
                invoice_id,
                amount,
            } => {
                info!(payment_id = %payment_id, invoice_id = %invoice_id, amount = %amount, "event: payment recorded")
            }
            Event::PaymentRefunded {
                payment_id,
                invoice_id,
                amount,
            } => {
                info!(payment_id = %payment_id, invoice_id = %invoice_id, amount = %amount, "event: payment refunded")
            }
            Event::Generic { message, .. } => warn!(message = %message, "event: generic"),
        }
    }
    info!("event channel closed; processor exiting");
}
