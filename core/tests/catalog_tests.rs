// tests/catalog_tests.rs
mod common;
use common::*;
use storefront::model::{NewProduct, ProductChanges};
use storefront::service::{cart, catalog, place_order};
use storefront::store::{CatalogStore, OrderStore};
use storefront::{Role, ShopError};

fn rename(name: &str) -> ProductChanges {
  ProductChanges {
    name: Some(name.to_string()),
    ..Default::default()
  }
}

#[tokio::test]
async fn test_seller_creates_and_lists_own_products() {
  setup_tracing();
  let shop = shop().await;
  let rival = add_user(&shop.store, "Rex", Role::Seller).await;
  add_product(&shop.store, &rival, "Rival Thing", 100).await;

  let created = catalog::create(
    &shop.store,
    &ctx(&shop.seller),
    NewProduct {
      name: "Chair".to_string(),
      description: Some("Oak".to_string()),
      price: price(4999),
      stock: 3,
    },
  )
  .await
  .unwrap();
  assert_eq!(created.seller_id, shop.seller.id);

  let own = catalog::list_own(&shop.store, &ctx(&shop.seller)).await.unwrap();
  assert_eq!(own.len(), 1);
  assert_eq!(own[0].name, "Chair");
  assert_eq!(catalog::list_all(&shop.store).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_rejects_negative_price() {
  setup_tracing();
  let shop = shop().await;
  let err = catalog::create(
    &shop.store,
    &ctx(&shop.seller),
    NewProduct {
      name: "Debt".to_string(),
      description: None,
      price: price(-1),
      stock: 1,
    },
  )
  .await
  .unwrap_err();
  assert!(matches!(err, ShopError::Validation(_)));
}

#[tokio::test]
async fn test_other_seller_cannot_edit_or_delete() {
  setup_tracing();
  let shop = shop().await;
  let rival = add_user(&shop.store, "Rex", Role::Seller).await;
  let chair = add_product(&shop.store, &shop.seller, "Chair", 4999).await;

  let err = catalog::update(&shop.store, &ctx(&rival), chair.id, rename("Stolen")).await.unwrap_err();
  assert!(matches!(err, ShopError::NotFound(ref m) if m == catalog::NOT_OWNED_EDIT));

  let err = catalog::delete(&shop.store, &ctx(&rival), chair.id).await.unwrap_err();
  assert!(matches!(err, ShopError::NotFound(ref m) if m == catalog::NOT_OWNED_DELETE));

  let unchanged = shop.store.find_product(chair.id).await.unwrap().unwrap();
  assert_eq!(unchanged, chair);
}

#[tokio::test]
async fn test_admin_may_edit_any_product() {
  setup_tracing();
  let shop = shop().await;
  let chair = add_product(&shop.store, &shop.seller, "Chair", 4999).await;

  let edited = catalog::update(&shop.store, &ctx(&shop.admin), chair.id, rename("Armchair"))
    .await
    .unwrap();
  assert_eq!(edited.name, "Armchair");
  assert_eq!(edited.price, chair.price);
  assert_eq!(edited.seller_id, shop.seller.id);
}

#[tokio::test]
async fn test_deleting_product_keeps_order_history() {
  setup_tracing();
  let shop = shop().await;
  let chair = add_product(&shop.store, &shop.seller, "Chair", 4999).await;
  let buyer = ctx(&shop.customer);

  cart::add_item(&shop.store, &buyer, chair.id, 1).await.unwrap();
  let receipt = place_order(&shop.store, &buyer).await.unwrap();

  let other_buyer = ctx(&add_user(&shop.store, "Olga", Role::Customer).await);
  cart::add_item(&shop.store, &other_buyer, chair.id, 2).await.unwrap();

  catalog::delete(&shop.store, &ctx(&shop.seller), chair.id).await.unwrap();

  assert!(shop.store.find_product(chair.id).await.unwrap().is_none());
  let order = shop.store.find_order(receipt.order_id).await.unwrap().unwrap();
  assert_eq!(order.items[0].product_id, None);
  assert_eq!(order.items[0].price, price(4999));

  let cart_after = storefront::service::CartAggregator::list(&shop.store, other_buyer.user_id)
    .await
    .unwrap();
  assert!(cart_after.is_empty());
}
