//! Internal helpers for testing.

mod mock;

pub use mock::{MockHeadSupplier, MockTransaction, MockTransactionFactory};
