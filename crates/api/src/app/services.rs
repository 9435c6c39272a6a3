use std::sync::Arc;

use larder_accounts::{Registration, User};
use larder_auth::{LoginKey, PasswordHasher, TokenService};
use larder_catalog::{
    Category, CategoryPatch, NewCategory, NewProduct, NewRecipe, NewTag, Product, ProductPatch,
    Recipe, RecipePatch, Tag, TagPatch,
};
use larder_core::{
    BranchId, CategoryId, DomainResult, ItemId, OutletId, ProductId, SupplierId, TagId,
};
use larder_infra::stores::postgres;
use larder_infra::{
    AuditStore, InMemoryAuditStore, MemoryAccountStore, MemoryCatalogStore, MemoryInventoryStore,
    MemoryPartyStore, MemorySiteStore, PgAccountStore, PgCatalogStore, PgInventoryStore,
    PgPartyStore, PgSiteStore, PostgresAuditStore,
};
use larder_inventory::{
    InventoryItem, ItemPatch, NewItem, NewStockCount, StockCount, StockCountPatch,
};
use larder_parties::{NewSupplier, Supplier, SupplierPatch};
use larder_sites::{Branch, BranchPatch, NewBranch, NewOutlet, Outlet, OutletPatch};

use crate::config::AppConfig;

/// Everything the handlers need, behind one dispatch point.
///
/// The two variants carry the same logical services over different store
/// backends; each operation matches on the variant so handlers never know
/// which backend is live.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        sites: Arc<MemorySiteStore>,
        catalog: Arc<MemoryCatalogStore>,
        inventory: Arc<MemoryInventoryStore>,
        parties: Arc<MemoryPartyStore>,
        accounts: Arc<MemoryAccountStore>,
        tokens: Arc<TokenService>,
        passwords: Arc<PasswordHasher>,
        login_key: LoginKey,
        audit: AuditStore,
    },
    Persistent {
        sites: Arc<PgSiteStore>,
        catalog: Arc<PgCatalogStore>,
        inventory: Arc<PgInventoryStore>,
        parties: Arc<PgPartyStore>,
        accounts: Arc<PgAccountStore>,
        tokens: Arc<TokenService>,
        passwords: Arc<PasswordHasher>,
        login_key: LoginKey,
        audit: AuditStore,
    },
}

/// Build the service set from configuration: in-memory stores by default,
/// Postgres-backed when `USE_PERSISTENT_STORES=true`.
pub async fn build_services(config: &AppConfig) -> AppServices {
    if config.use_persistent_stores {
        return build_persistent_services(config).await;
    }
    build_in_memory_services(
        config,
        AuditStore::InMemory(Arc::new(InMemoryAuditStore::new())),
    )
}

/// In-memory wiring. The audit store is passed in so test harnesses can keep
/// a handle on it.
pub fn build_in_memory_services(config: &AppConfig, audit: AuditStore) -> AppServices {
    AppServices::InMemory {
        sites: Arc::new(MemorySiteStore::new()),
        catalog: Arc::new(MemoryCatalogStore::new()),
        inventory: Arc::new(MemoryInventoryStore::new()),
        parties: Arc::new(MemoryPartyStore::new()),
        accounts: Arc::new(MemoryAccountStore::new()),
        tokens: token_service(config),
        passwords: password_hasher(config),
        login_key: config.login_key,
        audit,
    }
}

async fn build_persistent_services(config: &AppConfig) -> AppServices {
    let url = config
        .database_url
        .as_deref()
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
    let pool = postgres::connect(url)
        .await
        .expect("Failed to connect to Postgres");
    postgres::init_schema(&pool)
        .await
        .expect("Failed to initialize relational schema");

    let audit_url = config.audit_database_url.as_deref().unwrap_or(url);
    let audit_pool = if audit_url == url {
        pool.clone()
    } else {
        postgres::connect(audit_url)
            .await
            .expect("Failed to connect to audit Postgres")
    };
    let audit_store = PostgresAuditStore::new(audit_pool, config.audit_table.clone());
    audit_store
        .init_schema()
        .await
        .expect("Failed to initialize audit schema");

    AppServices::Persistent {
        sites: Arc::new(PgSiteStore::new(pool.clone())),
        catalog: Arc::new(PgCatalogStore::new(pool.clone())),
        inventory: Arc::new(PgInventoryStore::new(pool.clone())),
        parties: Arc::new(PgPartyStore::new(pool.clone())),
        accounts: Arc::new(PgAccountStore::new(pool)),
        tokens: token_service(config),
        passwords: password_hasher(config),
        login_key: config.login_key,
        audit: AuditStore::Postgres(Arc::new(audit_store)),
    }
}

fn token_service(config: &AppConfig) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl_secs,
    ))
}

fn password_hasher(config: &AppConfig) -> Arc<PasswordHasher> {
    Arc::new(match config.bcrypt_cost {
        Some(cost) => PasswordHasher::new(cost),
        None => PasswordHasher::default(),
    })
}

impl AppServices {
    pub fn tokens(&self) -> Arc<TokenService> {
        match self {
            AppServices::InMemory { tokens, .. } => tokens.clone(),
            AppServices::Persistent { tokens, .. } => tokens.clone(),
        }
    }

    pub fn passwords(&self) -> Arc<PasswordHasher> {
        match self {
            AppServices::InMemory { passwords, .. } => passwords.clone(),
            AppServices::Persistent { passwords, .. } => passwords.clone(),
        }
    }

    pub fn login_key(&self) -> LoginKey {
        match self {
            AppServices::InMemory { login_key, .. } => *login_key,
            AppServices::Persistent { login_key, .. } => *login_key,
        }
    }

    pub fn audit(&self) -> AuditStore {
        match self {
            AppServices::InMemory { audit, .. } => audit.clone(),
            AppServices::Persistent { audit, .. } => audit.clone(),
        }
    }

    // ----- branches -----

    pub async fn create_branch(&self, input: NewBranch) -> DomainResult<Branch> {
        match self {
            AppServices::InMemory { sites, .. } => sites.create_branch(input),
            AppServices::Persistent { sites, .. } => sites.create_branch(input).await,
        }
    }

    pub async fn list_branches(&self) -> DomainResult<Vec<Branch>> {
        match self {
            AppServices::InMemory { sites, .. } => sites.list_branches(),
            AppServices::Persistent { sites, .. } => sites.list_branches().await,
        }
    }

    pub async fn get_branch(&self, id: BranchId) -> DomainResult<Branch> {
        match self {
            AppServices::InMemory { sites, .. } => sites.get_branch(id),
            AppServices::Persistent { sites, .. } => sites.get_branch(id).await,
        }
    }

    pub async fn update_branch(&self, id: BranchId, patch: BranchPatch) -> DomainResult<Branch> {
        match self {
            AppServices::InMemory { sites, .. } => sites.update_branch(id, patch),
            AppServices::Persistent { sites, .. } => sites.update_branch(id, patch).await,
        }
    }

    pub async fn delete_branch(&self, id: BranchId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { sites, .. } => sites.delete_branch(id),
            AppServices::Persistent { sites, .. } => sites.delete_branch(id).await,
        }
    }

    // ----- outlets -----

    pub async fn create_outlet(&self, input: NewOutlet) -> DomainResult<Outlet> {
        match self {
            AppServices::InMemory { sites, .. } => sites.create_outlet(input),
            AppServices::Persistent { sites, .. } => sites.create_outlet(input).await,
        }
    }

    pub async fn list_outlets(&self, product_id: Option<ProductId>) -> DomainResult<Vec<Outlet>> {
        match self {
            AppServices::InMemory { sites, .. } => sites.list_outlets(product_id),
            AppServices::Persistent { sites, .. } => sites.list_outlets(product_id).await,
        }
    }

    pub async fn get_outlet(&self, id: OutletId) -> DomainResult<Outlet> {
        match self {
            AppServices::InMemory { sites, .. } => sites.get_outlet(id),
            AppServices::Persistent { sites, .. } => sites.get_outlet(id).await,
        }
    }

    pub async fn update_outlet(&self, id: OutletId, patch: OutletPatch) -> DomainResult<Outlet> {
        match self {
            AppServices::InMemory { sites, .. } => sites.update_outlet(id, patch),
            AppServices::Persistent { sites, .. } => sites.update_outlet(id, patch).await,
        }
    }

    pub async fn delete_outlet(&self, id: OutletId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { sites, .. } => sites.delete_outlet(id),
            AppServices::Persistent { sites, .. } => sites.delete_outlet(id).await,
        }
    }

    // ----- products -----

    pub async fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.create_product(input),
            AppServices::Persistent { catalog, .. } => catalog.create_product(input).await,
        }
    }

    pub async fn list_products(&self) -> DomainResult<Vec<Product>> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_products(),
            AppServices::Persistent { catalog, .. } => catalog.list_products().await,
        }
    }

    pub async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.get_product(id),
            AppServices::Persistent { catalog, .. } => catalog.get_product(id).await,
        }
    }

    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.update_product(id, patch),
            AppServices::Persistent { catalog, .. } => catalog.update_product(id, patch).await,
        }
    }

    pub async fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.delete_product(id),
            AppServices::Persistent { catalog, .. } => catalog.delete_product(id).await,
        }
    }

    // ----- categories -----

    pub async fn create_category(&self, input: NewCategory) -> DomainResult<Category> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.create_category(input),
            AppServices::Persistent { catalog, .. } => catalog.create_category(input).await,
        }
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_categories(),
            AppServices::Persistent { catalog, .. } => catalog.list_categories().await,
        }
    }

    pub async fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.get_category(id),
            AppServices::Persistent { catalog, .. } => catalog.get_category(id).await,
        }
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> DomainResult<Category> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.update_category(id, patch),
            AppServices::Persistent { catalog, .. } => catalog.update_category(id, patch).await,
        }
    }

    pub async fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.delete_category(id),
            AppServices::Persistent { catalog, .. } => catalog.delete_category(id).await,
        }
    }

    // ----- tags -----

    pub async fn create_tag(&self, input: NewTag) -> DomainResult<Tag> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.create_tag(input),
            AppServices::Persistent { catalog, .. } => catalog.create_tag(input).await,
        }
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_tags(),
            AppServices::Persistent { catalog, .. } => catalog.list_tags().await,
        }
    }

    pub async fn get_tag(&self, id: TagId) -> DomainResult<Tag> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.get_tag(id),
            AppServices::Persistent { catalog, .. } => catalog.get_tag(id).await,
        }
    }

    pub async fn update_tag(&self, id: TagId, patch: TagPatch) -> DomainResult<Tag> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.update_tag(id, patch),
            AppServices::Persistent { catalog, .. } => catalog.update_tag(id, patch).await,
        }
    }

    pub async fn delete_tag(&self, id: TagId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.delete_tag(id),
            AppServices::Persistent { catalog, .. } => catalog.delete_tag(id).await,
        }
    }

    // ----- recipes -----

    pub async fn create_recipe(&self, input: NewRecipe) -> DomainResult<Recipe> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.create_recipe(input),
            AppServices::Persistent { catalog, .. } => catalog.create_recipe(input).await,
        }
    }

    pub async fn list_recipes(&self) -> DomainResult<Vec<Recipe>> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_recipes(),
            AppServices::Persistent { catalog, .. } => catalog.list_recipes().await,
        }
    }

    pub async fn get_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<Recipe> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.get_recipe(product_id, item_id),
            AppServices::Persistent { catalog, .. } => catalog.get_recipe(product_id, item_id).await,
        }
    }

    pub async fn update_recipe(
        &self,
        product_id: ProductId,
        item_id: ItemId,
        patch: RecipePatch,
    ) -> DomainResult<Recipe> {
        match self {
            AppServices::InMemory { catalog, .. } => {
                catalog.update_recipe(product_id, item_id, patch)
            }
            AppServices::Persistent { catalog, .. } => {
                catalog.update_recipe(product_id, item_id, patch).await
            }
        }
    }

    pub async fn delete_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.delete_recipe(product_id, item_id),
            AppServices::Persistent { catalog, .. } => {
                catalog.delete_recipe(product_id, item_id).await
            }
        }
    }

    // ----- product tags -----

    pub async fn attach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.attach_tag(product_id, tag_id),
            AppServices::Persistent { catalog, .. } => catalog.attach_tag(product_id, tag_id).await,
        }
    }

    pub async fn list_product_tags(&self, product_id: ProductId) -> DomainResult<Vec<Tag>> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_product_tags(product_id),
            AppServices::Persistent { catalog, .. } => catalog.list_product_tags(product_id).await,
        }
    }

    pub async fn detach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.detach_tag(product_id, tag_id),
            AppServices::Persistent { catalog, .. } => catalog.detach_tag(product_id, tag_id).await,
        }
    }

    // ----- inventory items -----

    pub async fn create_item(&self, input: NewItem) -> DomainResult<InventoryItem> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.create_item(input),
            AppServices::Persistent { inventory, .. } => inventory.create_item(input).await,
        }
    }

    pub async fn list_items(&self) -> DomainResult<Vec<InventoryItem>> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.list_items(),
            AppServices::Persistent { inventory, .. } => inventory.list_items().await,
        }
    }

    pub async fn get_item(&self, id: ItemId) -> DomainResult<InventoryItem> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.get_item(id),
            AppServices::Persistent { inventory, .. } => inventory.get_item(id).await,
        }
    }

    pub async fn update_item(&self, id: ItemId, patch: ItemPatch) -> DomainResult<InventoryItem> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.update_item(id, patch),
            AppServices::Persistent { inventory, .. } => inventory.update_item(id, patch).await,
        }
    }

    pub async fn delete_item(&self, id: ItemId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.delete_item(id),
            AppServices::Persistent { inventory, .. } => inventory.delete_item(id).await,
        }
    }

    // ----- branch stock counts -----

    pub async fn create_stock_count(&self, input: NewStockCount) -> DomainResult<StockCount> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.create_stock_count(input),
            AppServices::Persistent { inventory, .. } => inventory.create_stock_count(input).await,
        }
    }

    pub async fn list_stock_counts(&self) -> DomainResult<Vec<StockCount>> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.list_stock_counts(),
            AppServices::Persistent { inventory, .. } => inventory.list_stock_counts().await,
        }
    }

    pub async fn get_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
    ) -> DomainResult<StockCount> {
        match self {
            AppServices::InMemory { inventory, .. } => {
                inventory.get_stock_count(branch_id, item_id)
            }
            AppServices::Persistent { inventory, .. } => {
                inventory.get_stock_count(branch_id, item_id).await
            }
        }
    }

    pub async fn update_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
        patch: StockCountPatch,
    ) -> DomainResult<StockCount> {
        match self {
            AppServices::InMemory { inventory, .. } => {
                inventory.update_stock_count(branch_id, item_id, patch)
            }
            AppServices::Persistent { inventory, .. } => {
                inventory.update_stock_count(branch_id, item_id, patch).await
            }
        }
    }

    pub async fn delete_stock_count(
        &self,
        branch_id: BranchId,
        item_id: ItemId,
    ) -> DomainResult<()> {
        match self {
            AppServices::InMemory { inventory, .. } => {
                inventory.delete_stock_count(branch_id, item_id)
            }
            AppServices::Persistent { inventory, .. } => {
                inventory.delete_stock_count(branch_id, item_id).await
            }
        }
    }

    // ----- suppliers -----

    pub async fn create_supplier(&self, input: NewSupplier) -> DomainResult<Supplier> {
        match self {
            AppServices::InMemory { parties, .. } => parties.create_supplier(input),
            AppServices::Persistent { parties, .. } => parties.create_supplier(input).await,
        }
    }

    pub async fn list_suppliers(&self) -> DomainResult<Vec<Supplier>> {
        match self {
            AppServices::InMemory { parties, .. } => parties.list_suppliers(),
            AppServices::Persistent { parties, .. } => parties.list_suppliers().await,
        }
    }

    pub async fn get_supplier(&self, id: SupplierId) -> DomainResult<Supplier> {
        match self {
            AppServices::InMemory { parties, .. } => parties.get_supplier(id),
            AppServices::Persistent { parties, .. } => parties.get_supplier(id).await,
        }
    }

    pub async fn update_supplier(
        &self,
        id: SupplierId,
        patch: SupplierPatch,
    ) -> DomainResult<Supplier> {
        match self {
            AppServices::InMemory { parties, .. } => parties.update_supplier(id, patch),
            AppServices::Persistent { parties, .. } => parties.update_supplier(id, patch).await,
        }
    }

    pub async fn delete_supplier(&self, id: SupplierId) -> DomainResult<()> {
        match self {
            AppServices::InMemory { parties, .. } => parties.delete_supplier(id),
            AppServices::Persistent { parties, .. } => parties.delete_supplier(id).await,
        }
    }

    // ----- users -----

    pub async fn register_user(
        &self,
        input: Registration,
        password_hash: String,
    ) -> DomainResult<User> {
        match self {
            AppServices::InMemory { accounts, .. } => accounts.register_user(input, password_hash),
            AppServices::Persistent { accounts, .. } => {
                accounts.register_user(input, password_hash).await
            }
        }
    }

    /// Look up a user by the configured login key. Absence is `Ok(None)` so
    /// the login handler can treat it exactly like a failed password check.
    pub async fn find_user(&self, key: LoginKey, identity: &str) -> DomainResult<Option<User>> {
        match (self, key) {
            (AppServices::InMemory { accounts, .. }, LoginKey::Username) => {
                accounts.find_by_username(identity)
            }
            (AppServices::InMemory { accounts, .. }, LoginKey::Email) => {
                accounts.find_by_email(identity)
            }
            (AppServices::Persistent { accounts, .. }, LoginKey::Username) => {
                accounts.find_by_username(identity).await
            }
            (AppServices::Persistent { accounts, .. }, LoginKey::Email) => {
                accounts.find_by_email(identity).await
            }
        }
    }
}
