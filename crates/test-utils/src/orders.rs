//! Mock implementations of the order seams.
use core::convert::Infallible;
use oneinch_api::OrderSubmitter;
use oneinch_types::SignedLimitOrder;
use std::sync::{Arc, Mutex};

/// A mock [`OrderSubmitter`] that captures submitted orders.
#[derive(Debug, Clone, Default)]
pub struct MockOrderSubmitter {
    orders: Arc<Mutex<Vec<SignedLimitOrder>>>,
}

impl MockOrderSubmitter {
    /// Create a new mock order submitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all submitted orders.
    pub fn submitted_orders(&self) -> Vec<SignedLimitOrder> {
        self.orders.lock().unwrap().clone()
    }
}

impl OrderSubmitter for MockOrderSubmitter {
    type Error = Infallible;

    async fn submit_order(&self, order: SignedLimitOrder) -> Result<(), Self::Error> {
        self.orders.lock().unwrap().push(order);
        Ok(())
    }
}

/// A mock [`OrderSubmitter`] that rejects every order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingSubmitter;

/// The error returned by [`RejectingSubmitter`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("order rejected")]
pub struct Rejected;

impl OrderSubmitter for RejectingSubmitter {
    type Error = Rejected;

    async fn submit_order(&self, _order: SignedLimitOrder) -> Result<(), Self::Error> {
        Err(Rejected)
    }
}
