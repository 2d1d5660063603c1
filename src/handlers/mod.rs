//! HTTP handlers for companies, invoices and industries.

pub mod company;
pub mod industry;
pub mod invoice;
