//! Turns a user's raw transaction list into summary view models and
//! rule-based savings advice.
//!
//! The aggregation and advice functions are pure and side-effect free; the
//! only database access in this module is the query that produces the
//! [Entry](entry::Entry) snapshot they operate on.

pub(crate) mod advice;
pub(crate) mod aggregation;
mod entry;

pub(crate) use entry::{Entry, UNCATEGORIZED_LABEL, get_entries_for_user};
