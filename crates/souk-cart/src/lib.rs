//! Cart services for Souk.
//!
//! Async orchestration around the [`souk_commerce`] domain types:
//!
//! - **Providers**: batch lookup traits for live product state, shipping
//!   profiles, and shop shipping policies, with in-memory reference backends
//! - **Store**: cart persistence behind a trait, enforcing the single open
//!   cart per buyer, plus per-cart advisory locks
//! - **Services**: the cart aggregate service, the cart item service,
//!   availability reconciliation, and the shipping fee service
//!
//! The intended checkout sequence is: mutate the cart through
//! [`CartItemService`], call [`AvailabilityReconciler::reconcile`] to prune
//! stale items, quote shipping with [`ShippingFeeService::quote`], then mark
//! the cart done with [`CartService::set_checkout_done`].

pub mod config;
pub mod providers;
pub mod service;
pub mod store;

pub use config::CartConfig;
pub use service::{AvailabilityReconciler, CartItemService, CartService, ShippingFeeService};
pub use store::{CartLocks, CartStore, MemoryCartStore};
