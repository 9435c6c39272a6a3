use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use chrono::Utc;

use larder_catalog::{
    Category, CategoryPatch, NewCategory, NewProduct, NewRecipe, NewTag, Product, ProductPatch,
    ProductTag, Recipe, RecipePatch, Tag, TagPatch,
};
use larder_core::{CategoryId, DomainError, DomainResult, ItemId, ProductId, TagId};

use super::{read, write, Sequence};

/// In-memory products, categories, tags, recipes, and product-tag links.
///
/// Lives as one store because the association operations cut across the
/// product and tag maps.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    tags: RwLock<HashMap<TagId, Tag>>,
    recipes: RwLock<HashMap<(ProductId, ItemId), Recipe>>,
    product_tags: RwLock<BTreeSet<ProductTag>>,
    product_seq: Sequence,
    category_seq: Sequence,
    tag_seq: Sequence,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        let mut products = write(&self.products)?;
        if products.values().any(|p| p.sku == input.sku) {
            return Err(DomainError::conflict("Product with this SKU already exists"));
        }
        let product = Product::new(
            ProductId::from_i64(self.product_seq.next()),
            input,
            Utc::now(),
        );
        products.insert(product.product_id, product.clone());
        Ok(product)
    }

    pub fn list_products(&self) -> DomainResult<Vec<Product>> {
        let products = read(&self.products)?;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by_key(|p| p.product_id);
        Ok(all)
    }

    pub fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        read(&self.products)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Product not found"))
    }

    pub fn update_product(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        let mut products = write(&self.products)?;
        if !products.contains_key(&id) {
            return Err(DomainError::not_found("Product not found"));
        }
        if let Some(sku) = &patch.sku {
            if products.values().any(|p| p.product_id != id && p.sku == *sku) {
                return Err(DomainError::conflict("Product with this SKU already exists"));
            }
        }
        match products.get_mut(&id) {
            Some(product) => {
                patch.apply(product, Utc::now());
                Ok(product.clone())
            }
            None => Err(DomainError::not_found("Product not found")),
        }
    }

    /// Deleting a product also drops its tag links; recipe lines that
    /// reference it are left behind, like every other untyped reference.
    pub fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let mut products = write(&self.products)?;
        if products.remove(&id).is_none() {
            return Err(DomainError::not_found("Product not found"));
        }
        drop(products);
        let mut links = write(&self.product_tags)?;
        links.retain(|link| link.product_id != id);
        Ok(())
    }

    pub fn create_category(&self, input: NewCategory) -> DomainResult<Category> {
        let mut categories = write(&self.categories)?;
        if categories.values().any(|c| c.name == input.name) {
            return Err(DomainError::conflict(
                "Category with this name already exists",
            ));
        }
        let category = Category::new(
            CategoryId::from_i64(self.category_seq.next()),
            input,
            Utc::now(),
        );
        categories.insert(category.category_id, category.clone());
        Ok(category)
    }

    pub fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let categories = read(&self.categories)?;
        let mut all: Vec<Category> = categories.values().cloned().collect();
        all.sort_by_key(|c| c.category_id);
        Ok(all)
    }

    pub fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        read(&self.categories)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Category not found"))
    }

    pub fn update_category(&self, id: CategoryId, patch: CategoryPatch) -> DomainResult<Category> {
        let mut categories = write(&self.categories)?;
        if !categories.contains_key(&id) {
            return Err(DomainError::not_found("Category not found"));
        }
        if let Some(name) = &patch.name {
            if categories
                .values()
                .any(|c| c.category_id != id && c.name == *name)
            {
                return Err(DomainError::conflict(
                    "Category with this name already exists",
                ));
            }
        }
        match categories.get_mut(&id) {
            Some(category) => {
                patch.apply(category, Utc::now());
                Ok(category.clone())
            }
            None => Err(DomainError::not_found("Category not found")),
        }
    }

    pub fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        write(&self.categories)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Category not found"))
    }

    pub fn create_tag(&self, input: NewTag) -> DomainResult<Tag> {
        let mut tags = write(&self.tags)?;
        if tags.values().any(|t| t.name == input.name) {
            return Err(DomainError::conflict("Tag with this name already exists"));
        }
        let tag = Tag::new(TagId::from_i64(self.tag_seq.next()), input, Utc::now());
        tags.insert(tag.tag_id, tag.clone());
        Ok(tag)
    }

    pub fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        let tags = read(&self.tags)?;
        let mut all: Vec<Tag> = tags.values().cloned().collect();
        all.sort_by_key(|t| t.tag_id);
        Ok(all)
    }

    pub fn get_tag(&self, id: TagId) -> DomainResult<Tag> {
        read(&self.tags)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Tag not found"))
    }

    pub fn update_tag(&self, id: TagId, patch: TagPatch) -> DomainResult<Tag> {
        let mut tags = write(&self.tags)?;
        if !tags.contains_key(&id) {
            return Err(DomainError::not_found("Tag not found"));
        }
        if let Some(name) = &patch.name {
            if tags.values().any(|t| t.tag_id != id && t.name == *name) {
                return Err(DomainError::conflict("Tag with this name already exists"));
            }
        }
        match tags.get_mut(&id) {
            Some(tag) => {
                patch.apply(tag, Utc::now());
                Ok(tag.clone())
            }
            None => Err(DomainError::not_found("Tag not found")),
        }
    }

    pub fn delete_tag(&self, id: TagId) -> DomainResult<()> {
        let mut tags = write(&self.tags)?;
        if tags.remove(&id).is_none() {
            return Err(DomainError::not_found("Tag not found"));
        }
        drop(tags);
        let mut links = write(&self.product_tags)?;
        links.retain(|link| link.tag_id != id);
        Ok(())
    }

    pub fn create_recipe(&self, input: NewRecipe) -> DomainResult<Recipe> {
        let mut recipes = write(&self.recipes)?;
        let key = (input.product_id, input.item_id);
        if recipes.contains_key(&key) {
            return Err(DomainError::conflict(
                "Recipe with this product_id and item_id already exists",
            ));
        }
        let recipe = Recipe::new(input, Utc::now());
        recipes.insert(key, recipe.clone());
        Ok(recipe)
    }

    pub fn list_recipes(&self) -> DomainResult<Vec<Recipe>> {
        let recipes = read(&self.recipes)?;
        let mut all: Vec<Recipe> = recipes.values().cloned().collect();
        all.sort_by_key(|r| (r.product_id, r.item_id));
        Ok(all)
    }

    pub fn get_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<Recipe> {
        read(&self.recipes)?
            .get(&(product_id, item_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found("Recipe not found"))
    }

    pub fn update_recipe(
        &self,
        product_id: ProductId,
        item_id: ItemId,
        patch: RecipePatch,
    ) -> DomainResult<Recipe> {
        let mut recipes = write(&self.recipes)?;
        match recipes.get_mut(&(product_id, item_id)) {
            Some(recipe) => {
                patch.apply(recipe, Utc::now());
                Ok(recipe.clone())
            }
            None => Err(DomainError::not_found("Recipe not found")),
        }
    }

    pub fn delete_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<()> {
        write(&self.recipes)?
            .remove(&(product_id, item_id))
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Recipe not found"))
    }

    /// Link a tag to a product. The product must exist; the tag id is taken
    /// as-is like every other untyped reference.
    pub fn attach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        let products = read(&self.products)?;
        if !products.contains_key(&product_id) {
            return Err(DomainError::not_found("Product not found"));
        }
        drop(products);
        let mut links = write(&self.product_tags)?;
        if !links.insert(ProductTag { product_id, tag_id }) {
            return Err(DomainError::conflict(
                "Product tag with this product_id and tag_id already exists",
            ));
        }
        Ok(())
    }

    /// Tags linked to a product, resolved to full tags.
    pub fn list_product_tags(&self, product_id: ProductId) -> DomainResult<Vec<Tag>> {
        let products = read(&self.products)?;
        if !products.contains_key(&product_id) {
            return Err(DomainError::not_found("Product not found"));
        }
        drop(products);
        let links = read(&self.product_tags)?;
        let tags = read(&self.tags)?;
        Ok(links
            .iter()
            .filter(|link| link.product_id == product_id)
            .filter_map(|link| tags.get(&link.tag_id).cloned())
            .collect())
    }

    pub fn detach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        let mut links = write(&self.product_tags)?;
        if !links.remove(&ProductTag { product_id, tag_id }) {
            return Err(DomainError::not_found("Product tag not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, sku: &str) -> NewProduct {
        NewProduct {
            name: name.into(),
            variant_group_id: "mains".into(),
            sku: sku.into(),
            category_id: CategoryId::from_i64(1),
        }
    }

    fn recipe(product: i64, item: i64) -> NewRecipe {
        NewRecipe {
            product_id: ProductId::from_i64(product),
            item_id: ItemId::from_i64(item),
            quantity: 0.25,
            is_takeout: false,
        }
    }

    #[test]
    fn duplicate_sku_conflicts() {
        let store = MemoryCatalogStore::new();
        store.create_product(product("Chicken Adobo", "ADB-001")).unwrap();
        let err = store
            .create_product(product("Other Adobo", "ADB-001"))
            .unwrap_err();
        assert_eq!(err.message(), "Product with this SKU already exists");
    }

    #[test]
    fn category_and_tag_names_are_unique() {
        let store = MemoryCatalogStore::new();
        store.create_category(NewCategory { name: "Mains".into() }).unwrap();
        let err = store
            .create_category(NewCategory { name: "Mains".into() })
            .unwrap_err();
        assert_eq!(err.message(), "Category with this name already exists");

        store.create_tag(NewTag { name: "spicy".into() }).unwrap();
        let err = store.create_tag(NewTag { name: "spicy".into() }).unwrap_err();
        assert_eq!(err.message(), "Tag with this name already exists");
    }

    #[test]
    fn recipe_key_pair_is_unique() {
        let store = MemoryCatalogStore::new();
        store.create_recipe(recipe(1, 2)).unwrap();
        // Same product, different item is fine.
        store.create_recipe(recipe(1, 3)).unwrap();

        let err = store.create_recipe(recipe(1, 2)).unwrap_err();
        assert_eq!(
            err.message(),
            "Recipe with this product_id and item_id already exists"
        );
    }

    #[test]
    fn recipe_lookup_uses_both_key_components() {
        let store = MemoryCatalogStore::new();
        store.create_recipe(recipe(1, 2)).unwrap();
        assert!(store.get_recipe(ProductId::from_i64(1), ItemId::from_i64(2)).is_ok());
        assert_eq!(
            store
                .get_recipe(ProductId::from_i64(2), ItemId::from_i64(1))
                .unwrap_err()
                .message(),
            "Recipe not found"
        );
    }

    #[test]
    fn attach_requires_an_existing_product() {
        let store = MemoryCatalogStore::new();
        let err = store
            .attach_tag(ProductId::from_i64(1), TagId::from_i64(1))
            .unwrap_err();
        assert_eq!(err.message(), "Product not found");
    }

    #[test]
    fn attach_list_detach_round_trip() {
        let store = MemoryCatalogStore::new();
        let p = store.create_product(product("Chicken Adobo", "ADB-001")).unwrap();
        let spicy = store.create_tag(NewTag { name: "spicy".into() }).unwrap();
        let classic = store.create_tag(NewTag { name: "classic".into() }).unwrap();

        store.attach_tag(p.product_id, spicy.tag_id).unwrap();
        store.attach_tag(p.product_id, classic.tag_id).unwrap();

        let err = store.attach_tag(p.product_id, spicy.tag_id).unwrap_err();
        assert_eq!(
            err.message(),
            "Product tag with this product_id and tag_id already exists"
        );

        let listed = store.list_product_tags(p.product_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "spicy");
        assert_eq!(listed[1].name, "classic");

        store.detach_tag(p.product_id, spicy.tag_id).unwrap();
        assert_eq!(store.list_product_tags(p.product_id).unwrap().len(), 1);

        let err = store.detach_tag(p.product_id, spicy.tag_id).unwrap_err();
        assert_eq!(err.message(), "Product tag not found");
    }

    #[test]
    fn deleting_a_product_drops_its_links() {
        let store = MemoryCatalogStore::new();
        let p = store.create_product(product("Chicken Adobo", "ADB-001")).unwrap();
        let t = store.create_tag(NewTag { name: "spicy".into() }).unwrap();
        store.attach_tag(p.product_id, t.tag_id).unwrap();

        store.delete_product(p.product_id).unwrap();
        assert_eq!(
            store
                .detach_tag(p.product_id, t.tag_id)
                .unwrap_err()
                .message(),
            "Product tag not found"
        );
    }

    #[test]
    fn deleted_tags_vanish_from_product_listings() {
        let store = MemoryCatalogStore::new();
        let p = store.create_product(product("Chicken Adobo", "ADB-001")).unwrap();
        let t = store.create_tag(NewTag { name: "spicy".into() }).unwrap();
        store.attach_tag(p.product_id, t.tag_id).unwrap();

        store.delete_tag(t.tag_id).unwrap();
        assert!(store.list_product_tags(p.product_id).unwrap().is_empty());
    }
}
