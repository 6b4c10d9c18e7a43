//! Dashboard module
//!
//! Provides an overview page showing totals, recent transactions and charts,
//! plus the read-only JSON endpoint for the expense breakdown by category.

mod breakdown_endpoint;
mod charts;
mod page;

pub use breakdown_endpoint::get_category_breakdown;
pub use page::get_dashboard_page;
