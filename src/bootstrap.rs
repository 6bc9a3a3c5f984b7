//! # Bootstrap
//!
//! Service wiring and the optional demo data set.

use crate::api::rest::AppState;
use crate::application::error::ApplicationResult;
use crate::application::services::{ExpirySweeper, NegotiationCoordinator};
use crate::config::AppConfig;
use crate::domain::entities::{Category, Product, User};
use crate::domain::value_objects::{Price, Role};
use crate::infrastructure::catalog::InMemoryCatalog;
use crate::infrastructure::identity::{InMemoryUserDirectory, JwtIdentityProvider};
use crate::infrastructure::persistence::InMemoryNegotiationStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Fully wired in-memory service.
#[derive(Debug, Clone)]
pub struct Services {
    /// Negotiation command surface.
    pub coordinator: NegotiationCoordinator,
    /// Token issuer and verifier.
    pub identity: Arc<JwtIdentityProvider>,
    /// Registered users.
    pub users: InMemoryUserDirectory,
    /// Products and categories.
    pub catalog: InMemoryCatalog,
    /// RFQs and quotes.
    pub store: InMemoryNegotiationStore,
}

impl Services {
    /// Wires the in-memory stores, identity provider and coordinator.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let users = InMemoryUserDirectory::new();
        let catalog = InMemoryCatalog::new();
        let store = InMemoryNegotiationStore::new();

        let identity = Arc::new(JwtIdentityProvider::new(
            config.auth.jwt_secret.as_bytes(),
            config.token_ttl(),
            Arc::new(users.clone()),
        ));
        let coordinator = NegotiationCoordinator::new(
            Arc::new(store.clone()),
            Arc::new(catalog.clone()),
            Arc::new(users.clone()),
            config.negotiation_config(),
        );

        Self {
            coordinator,
            identity,
            users,
            catalog,
            store,
        }
    }

    /// Shared state for the REST router.
    #[must_use]
    pub fn app_state(&self) -> Arc<AppState> {
        Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            identity: self.identity.clone(),
        })
    }

    /// Expiry sweeper over this service's coordinator.
    #[must_use]
    pub fn sweeper(&self, config: &AppConfig) -> ExpirySweeper {
        ExpirySweeper::new(self.coordinator.clone(), config.sweep_interval())
    }
}

/// A seeded user and a bearer token for it.
#[derive(Debug, Clone)]
pub struct SeededUser {
    /// The user.
    pub user: User,
    /// Token issued at seeding time.
    pub token: String,
}

const ADMIN_EMAIL: &str = "admin@b2bcommerce.com";

/// Seeds demo users, categories and products.
///
/// Does nothing if the demo admin already exists. Returns the seeded users
/// with a freshly issued token each.
///
/// # Errors
///
/// Returns an error if a demo record is rejected or a token cannot be
/// issued.
pub async fn seed_demo(services: &Services) -> ApplicationResult<Vec<SeededUser>> {
    if services.users.find_by_email(ADMIN_EMAIL).await.is_some() {
        info!("demo data already present, skipping seed");
        return Ok(Vec::new());
    }

    let admin = User::new(ADMIN_EMAIL, Role::Admin, "B2B Commerce Admin", "Admin User");
    let chemcorp = User::new(
        "supplier@chemcorp.com",
        Role::Supplier,
        "ChemCorp Industries",
        "John Smith",
    );
    let hardware = User::new(
        "supplier@hardwareplus.com",
        Role::Supplier,
        "Hardware Plus Ltd",
        "Sarah Johnson",
    );
    let manufacturing = User::new(
        "buyer@manufacturing.com",
        Role::Buyer,
        "ABC Manufacturing",
        "Mike Davis",
    );
    let construction = User::new(
        "buyer@construction.com",
        Role::Buyer,
        "XYZ Construction",
        "Lisa Brown",
    );
    let users = [admin, chemcorp, hardware, manufacturing, construction];
    for user in &users {
        services.users.insert(user.clone()).await;
    }

    let chemicals = Category::new("Chemicals", "Industrial and laboratory chemicals");
    let tools = Category::new("Hardware & Tools", "Industrial hardware and tools");
    let safety = Category::new(
        "Safety Equipment",
        "Personal protective equipment and safety gear",
    );
    for category in [&chemicals, &tools, &safety] {
        services.catalog.insert_category(category.clone()).await?;
    }

    let [_, chemcorp, hardware, _, _] = &users;
    let products = [
        (chemcorp, &chemicals, "Industrial Grade Sulfuric Acid", 12_550, 500, 10),
        (chemcorp, &chemicals, "Sodium Hydroxide (Caustic Soda)", 8_575, 750, 25),
        (hardware, &tools, "Industrial Ball Bearings Set", 4_599, 200, 1),
        (hardware, &safety, "Safety Helmet with Visor", 2_450, 1_000, 50),
    ];
    let product_count = products.len();
    for (supplier, category, name, cents, stock, min_order) in products {
        let product = Product::new(
            supplier.id(),
            category.id(),
            name,
            Price::new(Decimal::new(cents, 2))?,
            stock,
            min_order,
        )?;
        services.catalog.insert_product(product).await?;
    }

    let mut seeded = Vec::with_capacity(users.len());
    for user in users {
        let token = services.identity.issue(&user)?;
        seeded.push(SeededUser { user, token });
    }

    info!(
        users = seeded.len(),
        categories = 3,
        products = product_count,
        "demo data seeded"
    );
    Ok(seeded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::catalog::CatalogStore;
    use crate::infrastructure::identity::{Credential, IdentityProvider, UserDirectory};

    #[tokio::test]
    async fn seed_is_idempotent() {
        let services = Services::new(&AppConfig::default());

        let seeded = seed_demo(&services).await.unwrap();
        assert_eq!(seeded.len(), 5);
        assert_eq!(services.users.count().await.unwrap(), 5);
        assert_eq!(services.catalog.count_products().await.unwrap(), 4);

        assert!(seed_demo(&services).await.unwrap().is_empty());
        assert_eq!(services.users.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn seeded_tokens_authenticate() {
        let services = Services::new(&AppConfig::default());
        let seeded = seed_demo(&services).await.unwrap();

        for entry in &seeded {
            let principal = services
                .identity
                .authenticate(&Credential::bearer(entry.token.clone()))
                .await
                .unwrap();
            assert_eq!(principal.user_id, entry.user.id());
            assert_eq!(principal.role, entry.user.role());
        }
    }
}
