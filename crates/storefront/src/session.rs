//! Per-product-page session state.
//!
//! One [`ProductSession`] owns everything a product page derives from a
//! fetched product: the stock map, the grouped attributes, the gallery, the
//! current selection, and the cart-ready record. It is rebuilt from scratch
//! for each product fetch and discarded on navigation away; the UI layer
//! reads its accessors rather than subscribing to shared mutable cells.

use std::collections::BTreeSet;

use caspian_core::{AttributeTypeId, ProductKind, VariationId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::attributes::{GroupedAttribute, StockMap, process_variation_attributes};
use crate::catalog::variations::{
    AttributeSelection, in_stock_slugs, resolve, selectable_slugs,
};
use crate::html::{extract_link, strip_tags};
use crate::shop::types::{Product, ProductAttribute, Variation};

const META_DESCRIPTION_MAX_LEN: usize = 160;

// =============================================================================
// Derived Records
// =============================================================================

/// One image of the product gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    /// The variation this image belongs to; `None` for the main image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    /// Image URL path.
    pub src: String,
    /// Alt text.
    pub alt: String,
}

/// The minimal snapshot needed to add a specific variation and quantity to
/// the cart.
///
/// Ephemeral: superseded whenever the selection changes or the quantity
/// changes for a different variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartReadyProduct {
    /// Product name.
    pub name: String,
    /// Thumbnail path; the variation's first image, else the main image,
    /// else empty.
    pub thumbnail: String,
    /// The resolved variation.
    pub variation_id: VariationId,
    /// The variation's attribute values.
    pub attributes: Vec<ProductAttribute>,
    /// Unit price.
    pub price: Decimal,
    /// Whether the variation is available.
    pub in_stock: bool,
    /// Requested quantity.
    pub quantity: u32,
    /// Units on hand.
    pub stock_quantity: i64,
    /// Sale price, if discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
}

/// What the price display should show for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceState {
    /// Nothing purchasable at the current state; renders as zero.
    OutOfStock,
    /// A concrete price: a fixed product, or the selected in-stock
    /// variation.
    Amount(Decimal),
    /// Variable product with stock but no variation pinned yet
    /// ("starting from ...").
    Unselected,
}

// =============================================================================
// ProductSession
// =============================================================================

/// Owned state of one product-page visit.
#[derive(Debug, Clone)]
pub struct ProductSession {
    product: Product,
    color_type_id: AttributeTypeId,
    stock_map: StockMap,
    grouped_attributes: Vec<GroupedAttribute>,
    images: Vec<GalleryImage>,
    main_image: Option<GalleryImage>,
    in_stock_slugs: BTreeSet<String>,
    selected: Option<VariationId>,
    cart_ready: Option<CartReadyProduct>,
}

impl ProductSession {
    /// Build the session for a freshly fetched product.
    ///
    /// For variable products this aggregates the attributes and builds the
    /// gallery up front; fixed products get an empty aggregation.
    #[must_use]
    pub fn new(product: Product, color_type_id: AttributeTypeId) -> Self {
        let mut session = Self {
            product,
            color_type_id,
            stock_map: StockMap::new(),
            grouped_attributes: Vec::new(),
            images: Vec::new(),
            main_image: None,
            in_stock_slugs: BTreeSet::new(),
            selected: None,
            cart_ready: None,
        };

        if session.is_variable() {
            session.process_attributes();
            session.build_gallery();
        }

        session
    }

    /// The product this session was built from.
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Whether the product is defined by variations.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.product.kind.is_variable() && !self.product.variations.is_empty()
    }

    /// Aggregate availability index over attribute values.
    #[must_use]
    pub fn stock_map(&self) -> &StockMap {
        &self.stock_map
    }

    /// Attribute values grouped per facet, de-duplicated.
    #[must_use]
    pub fn grouped_attributes(&self) -> &[GroupedAttribute] {
        &self.grouped_attributes
    }

    /// The gallery: main image first, then one image per variation that has
    /// any.
    #[must_use]
    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    /// The main image, when the product has one.
    #[must_use]
    pub fn main_image(&self) -> Option<&GalleryImage> {
        self.main_image.as_ref()
    }

    /// Slugs currently presented as available.
    #[must_use]
    pub fn in_stock_slugs(&self) -> &BTreeSet<String> {
        &self.in_stock_slugs
    }

    /// The currently selected variation, if the selection pins one.
    #[must_use]
    pub fn selected_variation(&self) -> Option<&Variation> {
        let id = self.selected?;
        self.product.variations.iter().find(|v| v.id == id)
    }

    /// Id of the currently selected variation.
    #[must_use]
    pub fn selected_variation_id(&self) -> Option<VariationId> {
        self.selected
    }

    /// The pending cart-ready record.
    #[must_use]
    pub fn cart_ready(&self) -> Option<&CartReadyProduct> {
        self.cart_ready.as_ref()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Clear the selection and any pending cart-ready record.
    pub fn reset_selections(&mut self) {
        self.cart_ready = None;
        self.selected = None;
    }

    /// Resolve a selection against the variation list.
    ///
    /// On a match the variation becomes selected and a cart-ready record is
    /// built for quantity 1. On no match the selection state is cleared and
    /// `None` is returned; this is the expected state while a partial
    /// selection does not yet pin a variation.
    pub fn select(&mut self, selection: &AttributeSelection) -> Option<VariationId> {
        let resolved = resolve(selection, &self.product.variations).map(|variation| variation.id);
        match resolved {
            Some(id) => {
                self.selected = Some(id);
                self.build_cart_ready(1);
                Some(id)
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    /// Rebuild the cart-ready record for the selected variation with an
    /// explicit quantity.
    ///
    /// Returns `None` when no variation is selected.
    pub fn prepare_cart(&mut self, quantity: u32) -> Option<&CartReadyProduct> {
        self.selected?;
        self.build_cart_ready(quantity);
        self.cart_ready.as_ref()
    }

    /// Narrow the available value set after the user chose one value.
    ///
    /// Replaces the session's in-stock slug set with the reachability
    /// heuristic of [`selectable_slugs`].
    pub fn restrict_to(&mut self, chosen_slug: &str) -> &BTreeSet<String> {
        self.in_stock_slugs = selectable_slugs(&self.product.variations, chosen_slug);
        &self.in_stock_slugs
    }

    // =========================================================================
    // Derived Display State
    // =========================================================================

    /// What the price display should show right now.
    #[must_use]
    pub fn price(&self) -> PriceState {
        match self.product.kind {
            ProductKind::Fixed => {
                if self.product.in_stock {
                    PriceState::Amount(self.product.price)
                } else {
                    PriceState::OutOfStock
                }
            }
            ProductKind::Variable => {
                let any_in_stock = self.product.variations.iter().any(|v| v.in_stock);
                if !any_in_stock {
                    return PriceState::OutOfStock;
                }
                match self.selected_variation() {
                    Some(variation) if variation.in_stock => PriceState::Amount(variation.price),
                    Some(_) => PriceState::OutOfStock,
                    None => PriceState::Unselected,
                }
            }
            _ => PriceState::OutOfStock,
        }
    }

    /// The sale price to display, honoring the same selection rules as
    /// [`Self::price`].
    #[must_use]
    pub fn sale_price(&self) -> Option<Decimal> {
        match self.product.kind {
            ProductKind::Fixed => {
                if self.product.in_stock {
                    self.product.sale_price
                } else {
                    None
                }
            }
            ProductKind::Variable => self
                .selected_variation()
                .filter(|variation| variation.in_stock)
                .and_then(|variation| variation.sale_price),
            _ => None,
        }
    }

    /// Whether the add-to-cart action must be disabled.
    #[must_use]
    pub fn add_to_cart_disabled(&self) -> bool {
        match self.product.kind {
            ProductKind::Fixed => !self.product.in_stock,
            ProductKind::Variable => {
                let any_in_stock = self.product.variations.iter().any(|v| v.in_stock);
                if !any_in_stock {
                    return true;
                }
                self.selected_variation()
                    .is_none_or(|variation| !variation.in_stock)
            }
            _ => true,
        }
    }

    /// Tag-stripped description for meta tags, truncated to 160 characters.
    ///
    /// Falls back to the excerpt when the product has no description.
    #[must_use]
    pub fn meta_description(&self) -> String {
        let source = self
            .product
            .description
            .as_deref()
            .or(self.product.excerpt.as_deref())
            .unwrap_or_default();

        strip_tags(source)
            .chars()
            .take(META_DESCRIPTION_MAX_LEN)
            .collect()
    }

    /// Size-guide link embedded in the excerpt, if any.
    #[must_use]
    pub fn size_guide(&self) -> Option<String> {
        extract_link(self.product.excerpt.as_deref()?).link
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn process_attributes(&mut self) {
        let (stock, grouped) =
            process_variation_attributes(&self.product.variations, self.color_type_id);
        self.stock_map = stock;
        self.grouped_attributes = grouped;
        self.in_stock_slugs = in_stock_slugs(&self.product.variations);
    }

    fn build_gallery(&mut self) {
        let product_name = &self.product.name;

        let mut images: Vec<GalleryImage> = self
            .product
            .variations
            .iter()
            .filter_map(|variation| {
                let image = variation.images.first()?;
                Some(GalleryImage {
                    variation_id: Some(variation.id),
                    src: image.path.clone(),
                    alt: if image.name.is_empty() {
                        format!("{product_name} - variation {}", variation.id)
                    } else {
                        image.name.clone()
                    },
                })
            })
            .collect();

        let main_src = self
            .product
            .thumbnail_path()
            .map(str::to_string)
            .or_else(|| images.first().map(|image| image.src.clone()));

        self.main_image = main_src.map(|src| GalleryImage {
            variation_id: None,
            src,
            alt: format!("{product_name} - product photo"),
        });

        // prepend the main image unless it duplicates the first gallery entry
        if let Some(main) = &self.main_image
            && images.first().is_none_or(|first| first.src != main.src)
        {
            images.insert(0, main.clone());
        }

        self.images = images;
    }

    fn build_cart_ready(&mut self, quantity: u32) {
        let Some(variation) = self.selected_variation().cloned() else {
            return;
        };

        // a different variation invalidates any pending record
        if self
            .cart_ready
            .as_ref()
            .is_some_and(|ready| ready.variation_id != variation.id)
        {
            self.cart_ready = None;
        }

        let thumbnail = variation
            .images
            .first()
            .map(|image| image.path.as_str())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .or_else(|| self.main_image.as_ref().map(|main| main.src.clone()))
            .unwrap_or_default();

        self.cart_ready = Some(CartReadyProduct {
            name: self.product.name.clone(),
            thumbnail,
            variation_id: variation.id,
            attributes: variation.attributes.clone(),
            price: variation.price,
            in_stock: variation.in_stock,
            quantity,
            stock_quantity: variation.stock_quantity,
            sale_price: variation.sale_price,
        });
    }
}
