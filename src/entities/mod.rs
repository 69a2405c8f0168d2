pub mod financial_transaction;
pub mod invoice;
pub mod invoice_line_item;
pub mod invoice_sequence;
pub mod payment;
pub mod property;
