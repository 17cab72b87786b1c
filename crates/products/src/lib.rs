//! Product catalog: inventory artifact descriptors and the category tree.
//!
//! Items are value-like descriptors identified by [`medstock_core::ItemId`].
//! The category tree presents inner categories and single-product leaves
//! behind one interface.

pub mod category;
pub mod item;

pub use category::{Category, CategoryComponent, ProductCategory, ProductLeaf};
pub use item::{Consumable, ConsumableKind, Item, ItemDetails};
