//! Cart services.
//!
//! Four narrow services over the store and providers: the cart aggregate
//! service, the cart item service, availability reconciliation, and the
//! shipping fee service.

mod carts;
mod items;
mod reconcile;
mod shipping;

pub use carts::CartService;
pub use items::CartItemService;
pub use reconcile::AvailabilityReconciler;
pub use shipping::ShippingFeeService;
