//! Shopping cart module.
//!
//! Contains the buyer-owned cart aggregate and its snapshotting line items.

mod cart;
mod snapshot;

pub use cart::{Cart, CartItem};
pub use snapshot::ItemSnapshot;
