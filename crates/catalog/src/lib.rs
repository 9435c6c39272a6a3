//! Catalog domain module: products, categories, tags, recipes, and the
//! product-to-tag association.

pub mod category;
pub mod product;
pub mod product_tag;
pub mod recipe;
pub mod tag;

pub use category::{Category, CategoryPatch, CategoryView, NewCategory};
pub use product::{NewProduct, Product, ProductPatch, ProductView};
pub use product_tag::{NewProductTag, ProductTag};
pub use recipe::{NewRecipe, Recipe, RecipePatch, RecipeView};
pub use tag::{NewTag, Tag, TagPatch, TagView};
