//! Pure catalog data transformations.
//!
//! Everything in this module is synchronous and side-effect free: the
//! functions take already-fetched shop data by reference and return owned
//! results. The UI layer reads the outputs; nothing here mutates shared
//! state.
//!
//! - [`attributes`] - fold a variation list into a stock-availability index
//!   and de-duplicated attribute groups
//! - [`variations`] - resolve a (partial) attribute selection to a concrete
//!   variation and recompute which values remain selectable
//! - [`categories`] - slug and id lookup over the nested category tree,
//!   resilient to URL-encoding variants

pub mod attributes;
pub mod categories;
pub mod variations;

pub use attributes::{
    AttributeKey, GroupedAttribute, GroupedAttributeValue, StockMap, group_attributes,
    process_variation_attributes, stock_map,
};
pub use categories::{SlugVariants, find_by_id, find_by_slug};
pub use variations::{AttributeSelection, in_stock_slugs, resolve, selectable_slugs};
