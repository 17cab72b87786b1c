//! Product taxonomy as a composite tree.
//!
//! A node is either an inner [`ProductCategory`] or a [`ProductLeaf`] wrapping a
//! single item. Both honour [`CategoryComponent`]; mutations on a leaf fail with
//! `DomainError::UnsupportedOperation` instead of being type-checked away.
//!
//! Traversal is pre-order, left to right, in child insertion order. Cycles
//! cannot be expressed because children are owned values.

use serde::{Deserialize, Serialize};

use medstock_core::{DomainError, DomainResult};
use medstock_events::AlertSink;

use crate::item::Item;

/// Uniform interface over inner categories and product leaves.
pub trait CategoryComponent {
    /// Category name, or the wrapped item's name for a leaf.
    fn name(&self) -> &str;

    /// Append a child. Leaves reject this.
    fn add(&mut self, child: Category) -> DomainResult<()>;

    /// Remove the first child equal to `child`; no-op if absent. Leaves reject this.
    fn remove(&mut self, child: &Category) -> DomainResult<()>;

    /// Snapshot copy of the direct children (empty for a leaf).
    fn children(&self) -> Vec<Category>;

    /// Items under this node, pre-order, with multiplicity.
    fn all_items(&self) -> Vec<&Item>;

    /// Append this node's display lines to `out`.
    fn render(&self, indent: &str, out: &mut Vec<String>);

    /// Write the subtree to `sink`, one line per node.
    fn display(&self, indent: &str, sink: &dyn AlertSink) {
        let mut lines = Vec::new();
        self.render(indent, &mut lines);
        for line in &lines {
            sink.emit(line);
        }
    }
}

/// Inner node: a named, ordered group of subcategories and products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    name: String,
    children: Vec<Category>,
}

impl ProductCategory {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(Self {
            name,
            children: Vec::new(),
        })
    }

    /// Builder-style `add`, for assembling trees inline.
    pub fn with(mut self, child: impl Into<Category>) -> Self {
        self.children.push(child.into());
        self
    }

    /// First inner node (pre-order, self included) whose name matches
    /// case-insensitively.
    pub fn find(&self, name: &str) -> Option<&ProductCategory> {
        if names_match(&self.name, name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Category::Group(group) => group.find(name),
            Category::Product(_) => None,
        })
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut ProductCategory> {
        if names_match(&self.name, name) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Category::Group(group) => group.find_mut(name),
            Category::Product(_) => None,
        })
    }
}

impl CategoryComponent for ProductCategory {
    fn name(&self) -> &str {
        &self.name
    }

    fn add(&mut self, child: Category) -> DomainResult<()> {
        self.children.push(child);
        Ok(())
    }

    fn remove(&mut self, child: &Category) -> DomainResult<()> {
        if let Some(pos) = self.children.iter().position(|c| c == child) {
            self.children.remove(pos);
        }
        Ok(())
    }

    fn children(&self) -> Vec<Category> {
        self.children.clone()
    }

    fn all_items(&self) -> Vec<&Item> {
        self.children.iter().flat_map(|c| c.all_items()).collect()
    }

    fn render(&self, indent: &str, out: &mut Vec<String>) {
        out.push(format!("{indent}Category: {}", self.name));
        let nested = format!("{indent}  ");
        for child in &self.children {
            child.render(&nested, out);
        }
    }
}

/// Leaf node wrapping exactly one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLeaf {
    item: Item,
}

impl ProductLeaf {
    pub fn new(item: impl Into<Item>) -> Self {
        Self { item: item.into() }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }
}

impl CategoryComponent for ProductLeaf {
    fn name(&self) -> &str {
        self.item.name()
    }

    fn add(&mut self, _child: Category) -> DomainResult<()> {
        Err(DomainError::unsupported(format!(
            "cannot add a child to product leaf '{}'",
            self.item.name()
        )))
    }

    fn remove(&mut self, _child: &Category) -> DomainResult<()> {
        Err(DomainError::unsupported(format!(
            "cannot remove a child from product leaf '{}'",
            self.item.name()
        )))
    }

    fn children(&self) -> Vec<Category> {
        Vec::new()
    }

    fn all_items(&self) -> Vec<&Item> {
        vec![&self.item]
    }

    fn render(&self, indent: &str, out: &mut Vec<String>) {
        out.push(format!(
            "{indent}Product: {} ({})",
            self.item.name(),
            self.item.variant()
        ));
    }
}

/// A node of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Category {
    Group(ProductCategory),
    Product(ProductLeaf),
}

impl Category {
    pub fn group(name: impl Into<String>) -> DomainResult<Self> {
        Ok(Category::Group(ProductCategory::new(name)?))
    }

    pub fn product(item: impl Into<Item>) -> Self {
        Category::Product(ProductLeaf::new(item))
    }

    pub fn as_group(&self) -> Option<&ProductCategory> {
        match self {
            Category::Group(group) => Some(group),
            Category::Product(_) => None,
        }
    }

    fn component(&self) -> &dyn CategoryComponent {
        match self {
            Category::Group(group) => group,
            Category::Product(leaf) => leaf,
        }
    }

    fn component_mut(&mut self) -> &mut dyn CategoryComponent {
        match self {
            Category::Group(group) => group,
            Category::Product(leaf) => leaf,
        }
    }
}

impl CategoryComponent for Category {
    fn name(&self) -> &str {
        self.component().name()
    }

    fn add(&mut self, child: Category) -> DomainResult<()> {
        self.component_mut().add(child)
    }

    fn remove(&mut self, child: &Category) -> DomainResult<()> {
        self.component_mut().remove(child)
    }

    fn children(&self) -> Vec<Category> {
        self.component().children()
    }

    fn all_items(&self) -> Vec<&Item> {
        self.component().all_items()
    }

    fn render(&self, indent: &str, out: &mut Vec<String>) {
        self.component().render(indent, out)
    }
}

impl From<ProductCategory> for Category {
    fn from(value: ProductCategory) -> Self {
        Category::Group(value)
    }
}

impl From<ProductLeaf> for Category {
    fn from(value: ProductLeaf) -> Self {
        Category::Product(value)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut lines = Vec::new();
        self.render("", &mut lines);
        f.write_str(&lines.join("\n"))
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
