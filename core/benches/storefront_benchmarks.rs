use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use storefront::model::NewProduct;
use storefront::service::{cart, place_order};
use storefront::store::CatalogStore;
use storefront::{AuthContext, Capability, MemoryStore, Role, RoleGate, TokenCodec};
use tokio::runtime::Runtime; // To run async code within Criterion
use uuid::Uuid;

const SECRET: &str = "bench-secret";

fn bench_token_codec(c: &mut Criterion) {
  let mut group = c.benchmark_group("TokenCodec");
  let codec = TokenCodec::new(SECRET);
  let user_id = Uuid::new_v4();
  let token = codec.issue(user_id, Role::Seller).unwrap();

  group.bench_function("issue", |b| b.iter(|| codec.issue(user_id, Role::Seller).unwrap()));
  group.bench_function("verify", |b| b.iter(|| codec.verify(&token).unwrap()));
  group.bench_function("verify_tampered", |b| {
    let mut tampered = token.clone();
    tampered.push('x');
    b.iter(|| codec.verify(&tampered).is_err())
  });
  group.finish();
}

fn bench_role_gate(c: &mut Criterion) {
  let mut group = c.benchmark_group("RoleGate");
  let gate = RoleGate::new()
    .require(Capability::AnyAuthenticated)
    .require(Capability::AdminOrSeller)
    .require(Capability::SellerOnly);

  for role in [Role::Seller, Role::Admin, Role::Customer] {
    group.bench_with_input(BenchmarkId::from_parameter(role), &role, |b, role| {
      b.iter(|| gate.decide(*role))
    });
  }
  group.finish();
}

// Seeds `lines` products and checks out a fresh cart holding all of them on every iteration.
fn bench_memory_checkout(c: &mut Criterion) {
  let mut group = c.benchmark_group("MemoryCheckout");
  let rt = Runtime::new().unwrap();

  for lines in [1usize, 10, 50].iter() {
    let store = MemoryStore::new();
    let seller = Uuid::new_v4();
    let product_ids: Vec<Uuid> = rt.block_on(async {
      let mut ids = Vec::with_capacity(*lines);
      for i in 0..*lines {
        let product = store
          .insert_product(
            seller,
            NewProduct {
              name: format!("product_{}", i),
              description: None,
              price: Decimal::new(199 + i as i64, 2),
              stock: 1_000,
            },
          )
          .await
          .unwrap();
        ids.push(product.id);
      }
      ids
    });

    group.throughput(Throughput::Elements(*lines as u64));
    group.bench_with_input(BenchmarkId::new("lines", lines), lines, |b, _| {
      b.to_async(&rt).iter_batched(
        || AuthContext {
          user_id: Uuid::new_v4(),
          role: Role::Customer,
        },
        |buyer| {
          let store = store.clone();
          let product_ids = product_ids.clone();
          async move {
            for product_id in product_ids {
              cart::add_item(&store, &buyer, product_id, 2).await.unwrap();
            }
            place_order(&store, &buyer).await.unwrap()
          }
        },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

criterion_group!(benches, bench_token_codec, bench_role_gate, bench_memory_checkout);
criterion_main!(benches);
