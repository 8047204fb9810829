//! Cart lifecycle, stock validation, and availability reconciliation,
//! driven through the public service API over the in-memory backends.

mod common;

use common::{Harness, USD};
use souk_commerce::ids::{BuyerId, CartItemId, OrderId, ProductId};
use souk_commerce::money::Money;
use souk_commerce::CommerceError;

fn buyer(id: &str) -> BuyerId {
    BuyerId::new(id)
}

#[tokio::test]
async fn open_cart_is_stable_between_mutations() {
    let h = Harness::new();
    let b = buyer("buyer-1");

    let first = h.carts.find_or_create_open(&b).await.unwrap();
    let second = h.carts.find_or_create_open(&b).await.unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.is_empty());
}

#[tokio::test]
async fn checkout_rotates_to_a_fresh_empty_cart() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 2)
        .await
        .unwrap();

    h.carts
        .set_checkout_done(&b, &cart.id, Some(OrderId::new("order-9")))
        .await
        .unwrap();

    let next = h.carts.find_or_create_open(&b).await.unwrap();
    assert_ne!(next.id, cart.id);
    assert!(next.is_empty());

    // The old cart is kept for history with its order recorded.
    let old = h.carts.find_owned(&b, &cart.id).await.unwrap();
    assert!(!old.is_open());
    assert_eq!(old.order_id, Some(OrderId::new("order-9")));
    assert_eq!(old.item_count(), 2);
}

#[tokio::test]
async fn checked_out_cart_is_frozen() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.carts.set_checkout_done(&b, &cart.id, None).await.unwrap();

    let err = h
        .carts
        .set_checkout_done(&b, &cart.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CartAlreadyCheckedOut(_)));

    let err = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CartAlreadyCheckedOut(_)));
}

#[tokio::test]
async fn add_up_to_stock_succeeds_and_one_past_fails() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 3).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();

    let err = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 4)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CommerceError::StockExceeded {
            requested: 4,
            available: 3,
            ..
        }
    ));
    assert!(err.is_validation());

    // The failed add left the cart unchanged.
    let cart = h.carts.find_owned(&b, &cart.id).await.unwrap();
    assert!(cart.is_empty());

    let cart = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 3)
        .await
        .unwrap();
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn merging_add_checks_stock_against_the_new_total() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 3).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 2)
        .await
        .unwrap();

    // 2 in cart + 2 more would exceed stock 3.
    let err = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 2)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CommerceError::StockExceeded {
            requested: 4,
            available: 3,
            ..
        }
    ));

    // 2 + 1 fits, and merges into the existing line.
    let cart = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap();
    assert_eq!(cart.unique_item_count(), 1);
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn update_quantity_checks_stock_and_keeps_snapshot() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 5).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    let cart = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap();
    let item_id = cart.items[0].id.clone();

    // Price drifts after the add; a quantity update must not re-snapshot.
    h.catalog
        .set_price(&ProductId::new("p1"), Money::new(1500, USD))
        .await;

    let err = h
        .items
        .update_quantity(&b, &cart.id, &item_id, &ProductId::new("p1"), 6)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::StockExceeded { .. }));

    let cart = h
        .items
        .update_quantity(&b, &cart.id, &item_id, &ProductId::new("p1"), 5)
        .await
        .unwrap();
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].snapshot.unit_price, Money::new(1000, USD));
}

#[tokio::test]
async fn quantity_ceiling_comes_from_config() {
    let h = Harness::with_config(
        souk_cart::CartConfig::new().with_max_quantity_per_item(4),
    );
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 100).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    let err = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::QuantityExceedsLimit(5, 4)));
}

#[tokio::test]
async fn ownership_is_enforced_on_every_operation() {
    let h = Harness::new();
    let owner = buyer("buyer-1");
    let intruder = buyer("buyer-2");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&owner).await.unwrap();
    let cart = h
        .items
        .add_item(&owner, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap();
    let item_id = cart.items[0].id.clone();

    let err = h.carts.find_owned(&intruder, &cart.id).await.unwrap_err();
    assert!(matches!(err, CommerceError::NotCartOwner { .. }));

    let err = h
        .items
        .add_item(&intruder, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::NotCartOwner { .. }));

    let err = h
        .items
        .remove_item(&intruder, &cart.id, &item_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::NotCartOwner { .. }));

    let err = h
        .carts
        .set_checkout_done(&intruder, &cart.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::NotCartOwner { .. }));

    let err = h
        .reconciler
        .reconcile(&intruder, &cart.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::NotCartOwner { .. }));
}

#[tokio::test]
async fn unknown_targets_are_not_found() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();

    let err = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("ghost"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::ProductNotFound(_)));

    let err = h
        .items
        .remove_item(&b, &cart.id, &CartItemId::new("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CartItemNotFound(_)));

    let err = h
        .carts
        .find_owned(&b, &souk_commerce::ids::CartId::new("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CartNotFound(_)));
}

#[tokio::test]
async fn removing_the_last_item_keeps_the_cart() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    let cart = h
        .items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap();
    let item_id = cart.items[0].id.clone();

    h.items.remove_item(&b, &cart.id, &item_id).await.unwrap();

    let same = h.carts.find_or_create_open(&b).await.unwrap();
    assert_eq!(same.id, cart.id);
    assert!(same.is_empty());
}

#[tokio::test]
async fn reconcile_prunes_exactly_the_unpurchasable_items() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("keep", "shop-1", 1000, 10).await;
    h.seed_product("off_shelf", "shop-1", 1000, 10).await;
    h.seed_product("unapproved", "shop-1", 1000, 10).await;
    h.seed_product("sold_out", "shop-1", 1000, 10).await;
    h.seed_product("vanishing", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    for id in ["keep", "off_shelf", "unapproved", "sold_out", "vanishing"] {
        h.items
            .add_item(&b, &cart.id, &ProductId::new(id), 2)
            .await
            .unwrap();
    }

    h.catalog.set_on_shelf(&ProductId::new("off_shelf"), false).await;
    h.catalog.set_approved(&ProductId::new("unapproved"), false).await;
    h.catalog.set_stock(&ProductId::new("sold_out"), 0).await;
    h.catalog.remove(&ProductId::new("vanishing")).await;

    let cart = h.reconciler.reconcile(&b, &cart.id).await.unwrap();

    assert_eq!(cart.unique_item_count(), 1);
    let survivor = cart.get_item_by_product(&ProductId::new("keep")).unwrap();
    assert_eq!(survivor.quantity, 2);
}

#[tokio::test]
async fn reconcile_refreshes_stale_snapshots() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 1)
        .await
        .unwrap();

    h.catalog
        .set_price(&ProductId::new("p1"), Money::new(1250, USD))
        .await;
    h.catalog.set_name(&ProductId::new("p1"), "p1 (2nd edition)").await;

    let cart = h.reconciler.reconcile(&b, &cart.id).await.unwrap();
    let item = cart.get_item_by_product(&ProductId::new("p1")).unwrap();
    assert_eq!(item.snapshot.unit_price, Money::new(1250, USD));
    assert_eq!(item.snapshot.product_name, "p1 (2nd edition)");
}

#[tokio::test]
async fn reconcile_retains_partial_stock_shortfall() {
    // Stock dropped below the cart quantity but stayed positive: the item
    // is retained at its stored quantity. Only zero stock removes.
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 5)
        .await
        .unwrap();

    h.catalog.set_stock(&ProductId::new("p1"), 2).await;

    let cart = h.reconciler.reconcile(&b, &cart.id).await.unwrap();
    let item = cart.get_item_by_product(&ProductId::new("p1")).unwrap();
    assert_eq!(item.quantity, 5);
}

#[tokio::test]
async fn reconcile_is_idempotent_without_product_changes() {
    let h = Harness::new();
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 10).await;
    h.seed_product("p2", "shop-2", 500, 10).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p1"), 2)
        .await
        .unwrap();
    h.items
        .add_item(&b, &cart.id, &ProductId::new("p2"), 1)
        .await
        .unwrap();
    h.catalog.set_price(&ProductId::new("p1"), Money::new(1100, USD)).await;

    let first = h.reconciler.reconcile(&b, &cart.id).await.unwrap();
    let second = h.reconciler.reconcile(&b, &cart.id).await.unwrap();

    assert_eq!(first.items, second.items);
}

#[tokio::test]
async fn concurrent_adds_cannot_oversell_or_duplicate_lines() {
    let h = std::sync::Arc::new(Harness::new());
    let b = buyer("buyer-1");
    h.seed_product("p1", "shop-1", 1000, 5).await;

    let cart = h.carts.find_or_create_open(&b).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let h = h.clone();
        let b = b.clone();
        let cart_id = cart.id.clone();
        handles.push(tokio::spawn(async move {
            h.items
                .add_item(&b, &cart_id, &ProductId::new("p1"), 1)
                .await
                .is_ok()
        }));
    }
    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            succeeded += 1;
        }
    }

    let cart = h.carts.find_owned(&b, &cart.id).await.unwrap();
    assert_eq!(succeeded, 5);
    assert_eq!(cart.unique_item_count(), 1);
    assert_eq!(cart.item_count(), 5);
}
