//! Cart persistence.
//!
//! The store owns the "at most one open cart per buyer" invariant; services
//! treat carts as whole aggregates and save them back after mutation. A
//! relational backend maps `find_or_create_open` to an insert guarded by a
//! partial unique index on (buyer, open); [`MemoryCartStore`] keeps the same
//! contract over tokio-guarded maps.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use souk_commerce::cart::Cart;
use souk_commerce::ids::{BuyerId, CartId};
use souk_commerce::CommerceError;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Cart storage backend.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Return the buyer's open cart, creating an empty one if none exists.
    async fn find_or_create_open(&self, buyer_id: &BuyerId) -> Result<Cart, CommerceError>;

    /// Look up a cart by ID.
    async fn find(&self, cart_id: &CartId) -> Result<Option<Cart>, CommerceError>;

    /// Persist a cart aggregate, maintaining the open-cart index as carts
    /// transition to checked-out.
    async fn save(&self, cart: &Cart) -> Result<(), CommerceError>;
}

#[derive(Default)]
struct MemoryInner {
    carts: HashMap<CartId, Cart>,
    open_by_buyer: HashMap<BuyerId, CartId>,
}

/// In-memory cart store.
#[derive(Default)]
pub struct MemoryCartStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryCartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn find_or_create_open(&self, buyer_id: &BuyerId) -> Result<Cart, CommerceError> {
        let mut inner = self.inner.write().await;
        if let Some(cart_id) = inner.open_by_buyer.get(buyer_id) {
            let cart = inner.carts.get(cart_id).cloned().ok_or_else(|| {
                CommerceError::Storage(format!("open-cart index points at missing cart {cart_id}"))
            })?;
            return Ok(cart);
        }

        let cart = Cart::new(buyer_id.clone());
        inner.open_by_buyer.insert(buyer_id.clone(), cart.id.clone());
        inner.carts.insert(cart.id.clone(), cart.clone());
        Ok(cart)
    }

    async fn find(&self, cart_id: &CartId) -> Result<Option<Cart>, CommerceError> {
        Ok(self.inner.read().await.carts.get(cart_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        let mut inner = self.inner.write().await;

        if cart.is_open() {
            let existing = inner.open_by_buyer.get(&cart.buyer_id).cloned();
            if let Some(existing) = existing.filter(|existing| existing != &cart.id) {
                return Err(CommerceError::Storage(format!(
                    "buyer {} already has open cart {existing}",
                    cart.buyer_id
                )));
            }
            inner
                .open_by_buyer
                .insert(cart.buyer_id.clone(), cart.id.clone());
        } else if inner.open_by_buyer.get(&cart.buyer_id) == Some(&cart.id) {
            inner.open_by_buyer.remove(&cart.buyer_id);
        }

        inner.carts.insert(cart.id.clone(), cart.clone());
        Ok(())
    }
}

/// Per-cart advisory locks.
///
/// Item mutations are read-check-write sequences; holding the cart's lock
/// across the sequence serializes concurrent mutations so two adds cannot
/// both pass a stock check their combination violates, or create duplicate
/// lines for one product.
#[derive(Default)]
pub struct CartLocks {
    locks: Mutex<HashMap<CartId, Arc<Mutex<()>>>>,
}

impl CartLocks {
    /// Create an empty lock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a cart, waiting if another task holds it.
    pub async fn acquire(&self, cart_id: &CartId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(cart_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
