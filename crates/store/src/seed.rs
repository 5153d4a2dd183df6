//! Default outdoor-gear catalog loaded into an empty product table.

use models::Product;
use tracing::info;

use crate::collection::ProductCollection;
use crate::entity_store::EntityStore;
use crate::errors::StoreError;

const CATALOG: [(&str, &str, f64, &str); 9] = [
    ("Solar Powered Flashlight", "A fantastic product for outdoor enthusiasts", 19.99, "product1.png"),
    ("Hiking Poles", "Ideal for camping and hiking trips", 24.99, "product2.png"),
    ("Outdoor Rain Jacket", "This product will keep you warm and dry in all weathers", 49.99, "product3.png"),
    ("Survival Kit", "A must-have for any outdoor adventurer", 99.99, "product4.png"),
    ("Outdoor Backpack", "This backpack is perfect for carrying all your outdoor essentials", 39.99, "product5.png"),
    ("Camping Cookware", "This cookware set is ideal for cooking outdoors", 29.99, "product6.png"),
    ("Camping Stove", "This stove is perfect for cooking outdoors", 49.99, "product7.png"),
    ("Camping Lantern", "This lantern is perfect for lighting up your campsite", 19.99, "product8.png"),
    ("Camping Tent", "This tent is perfect for camping trips", 99.99, "product9.png"),
];

pub fn default_catalog() -> Vec<Product> {
    CATALOG
        .iter()
        .map(|&(name, description, price, image_url)| Product::new(name, description, price, image_url))
        .collect()
}

/// Insert the default catalog when `products` is empty. Returns how many rows were added.
pub async fn seed_catalog(products: &dyn ProductCollection) -> Result<usize, StoreError> {
    if products.count().await? > 0 {
        return Ok(0);
    }
    let mut inserted = 0;
    for item in default_catalog() {
        products.insert(item).await?;
        inserted += 1;
    }
    info!(inserted, "product catalog seeded");
    Ok(inserted)
}

impl EntityStore {
    /// Seed the catalog inside one unit of work so a failure leaves the table empty.
    ///
    /// The table is locked before the emptiness check, so concurrent seeders on PostgreSQL
    /// insert the catalog once. On SQLite a losing concurrent seeder fails with a busy error.
    pub async fn seed(&self) -> Result<usize, StoreError> {
        self.in_unit_of_work(|uow| {
            Box::pin(async move {
                uow.lock_products().await?;
                seed_catalog(uow.products()).await
            })
        })
        .await
    }
}
