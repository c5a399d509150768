//! Domain types for the upstream shop REST API.
//!
//! These types provide a clean, ergonomic API separate from the raw JSON
//! payloads the shop backend returns.

use std::collections::BTreeMap;

use caspian_core::{AttributeTypeId, CategoryId, ProductId, ProductKind, VariationId};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Image Types
// =============================================================================

/// Product, variation, or category image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Backend image ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name, doubles as alt text.
    #[serde(default)]
    pub name: String,
    /// Image URL path.
    pub path: String,
    /// MIME type (e.g. "image/webp").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Product thumbnail, which the backend sends either as a bare path string
/// or as a full image object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Thumbnail {
    /// Bare URL path.
    Path(String),
    /// Full image object.
    Image(ProductImage),
}

impl Thumbnail {
    /// The URL path regardless of wire shape.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Image(image) => &image.path,
        }
    }
}

// =============================================================================
// Attribute Types
// =============================================================================

/// Swatch imagery for a color attribute value.
///
/// Resolved by the attribute aggregator from the first variation carrying
/// the value that has images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSwatch {
    /// Image URL path.
    pub path: String,
    /// Alt text (the image's display name).
    pub alt: Option<String>,
}

/// Free-form attribute metadata.
///
/// The backend models this as an open string-keyed map; the keys it is known
/// to use (`image_path`, `image_alt`, `attribute_color`) are lifted into
/// typed fields, everything else lands in `extra`. Any malformed or
/// non-object wire value deserializes as the empty default rather than
/// failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    /// Swatch imagery (`image_path`/`image_alt` on the wire).
    pub swatch: Option<ColorSwatch>,
    /// CSS color of the swatch chip (`attribute_color` on the wire).
    pub color: Option<String>,
    /// Unrecognized keys, passed through untouched.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AttributeOptions {
    /// Whether no metadata is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swatch.is_none() && self.color.is_none() && self.extra.is_empty()
    }

    fn from_value(value: serde_json::Value) -> Self {
        let serde_json::Value::Object(mut map) = value else {
            return Self::default();
        };

        let swatch = take_string(&mut map, "image_path").map(|path| ColorSwatch {
            path,
            alt: take_string(&mut map, "image_alt"),
        });
        let color = take_string(&mut map, "attribute_color");
        let extra = map.into_iter().collect();

        Self {
            swatch,
            color,
            extra,
        }
    }
}

fn take_string(
    map: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    match map.remove(key) {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for AttributeOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl Serialize for AttributeOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(swatch) = &self.swatch {
            map.serialize_entry("image_path", &swatch.path)?;
            if let Some(alt) = &swatch.alt {
                map.serialize_entry("image_alt", alt)?;
            }
        }
        if let Some(color) = &self.color {
            map.serialize_entry("attribute_color", color)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One attribute value carried by a variation.
///
/// `(type_id, slug)` uniquely identifies an attribute value across all
/// variations of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Display name of the value (e.g. "Navy Blue").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display name of the facet this value belongs to (e.g. "Color").
    #[serde(rename = "type")]
    pub kind: String,
    /// Stable identifier of the facet grouping.
    pub type_id: AttributeTypeId,
    /// Unique value identifier within its facet.
    pub slug: String,
    /// Raw value payload, if the backend sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Input widget hint from the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Free-form metadata (swatch imagery for color values).
    #[serde(default, skip_serializing_if = "AttributeOptions::is_empty")]
    pub options: AttributeOptions,
    /// Aggregate stock flag. Derived by the aggregator, not authoritative
    /// from the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

// =============================================================================
// Variation Types
// =============================================================================

/// One concrete, purchasable combination of attribute values.
///
/// The attribute list carries exactly one value per facet present on the
/// product; no two attributes share a `type_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Variation ID.
    pub id: VariationId,
    /// One attribute value per facet.
    pub attributes: Vec<ProductAttribute>,
    /// Whether this variation is available for sale.
    pub in_stock: bool,
    /// Units on hand.
    pub stock_quantity: i64,
    /// Variation images, first one is the display image.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Current price.
    pub price: Decimal,
    /// Sale price, if discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    /// SKU code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Product name.
    pub name: String,
    /// URL slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Purchase model.
    #[serde(rename = "type")]
    pub kind: ProductKind,
    /// SKU code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Base price (variable products: the "starting from" price).
    pub price: Decimal,
    /// Sale price, if discounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    /// Whether the product (or any variation) is available.
    pub in_stock: bool,
    /// HTML description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// HTML excerpt (short description; may embed a size-guide link).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Featured flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Average review rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Number of reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<i64>,
    /// View counter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<i64>,
    /// Brand name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Main image (string or object on the wire).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    /// Alt text for the main image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_alt: Option<String>,
    /// Product-level attributes (non-variable products).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ProductAttribute>,
    /// Variations (variable products).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Variation>,
    /// Breadcrumb trail, passed through to the UI untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumb: Vec<serde_json::Value>,
}

impl Product {
    /// The main image path, regardless of the thumbnail's wire shape.
    #[must_use]
    pub fn thumbnail_path(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(Thumbnail::path)
    }
}

// =============================================================================
// Category Types
// =============================================================================

/// A node of the category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug. May be stored encoded or decoded; the resolver matches both.
    pub slug: String,
    /// Subcategories, recursive.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
    /// Category description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of products under this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<i64>,
    /// Category image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ProductImage>,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination metadata on listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page, 1-based.
    pub current_page: u32,
    /// Last available page.
    pub last_page: u32,
    /// Total item count across all pages.
    pub total: u64,
}

/// A page of products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    /// Products on this page.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Pagination metadata, when the backend provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Pagination>,
}

// =============================================================================
// Response Framing
// =============================================================================

/// The `{ "data": ... }` wrapper every shop API response uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped payload.
    pub data: T,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_options_known_keys() {
        let options: AttributeOptions = serde_json::from_str(
            r##"{"image_path": "/img/navy.webp", "image_alt": "Navy", "attribute_color": "#001f4d"}"##,
        )
        .unwrap();

        let swatch = options.swatch.unwrap();
        assert_eq!(swatch.path, "/img/navy.webp");
        assert_eq!(swatch.alt.as_deref(), Some("Navy"));
        assert_eq!(options.color.as_deref(), Some("#001f4d"));
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_attribute_options_unknown_keys_pass_through() {
        let options: AttributeOptions =
            serde_json::from_str(r#"{"badge": "new", "priority": 3}"#).unwrap();

        assert!(options.swatch.is_none());
        assert_eq!(options.extra.len(), 2);
        assert_eq!(options.extra["badge"], serde_json::json!("new"));
    }

    #[test]
    fn test_attribute_options_malformed_is_empty() {
        for payload in ["null", "\"oops\"", "42", "[1,2]"] {
            let options: AttributeOptions = serde_json::from_str(payload).unwrap();
            assert!(options.is_empty(), "payload {payload} should yield empty");
        }
    }

    #[test]
    fn test_attribute_options_orphan_alt_stays_in_extra() {
        // image_alt without image_path is not a swatch; keep it untouched
        let options: AttributeOptions =
            serde_json::from_str(r#"{"image_alt": "Navy"}"#).unwrap();
        assert!(options.swatch.is_none());
        assert_eq!(options.extra["image_alt"], serde_json::json!("Navy"));
    }

    #[test]
    fn test_attribute_options_round_trip() {
        let json = r#"{"image_path":"/img/red.webp","image_alt":"Red","badge":"new"}"#;
        let options: AttributeOptions = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&options).unwrap();
        assert_eq!(
            back,
            serde_json::json!({
                "image_path": "/img/red.webp",
                "image_alt": "Red",
                "badge": "new"
            })
        );
    }

    #[test]
    fn test_thumbnail_both_wire_shapes() {
        let bare: Thumbnail = serde_json::from_str("\"/img/cap.webp\"").unwrap();
        assert_eq!(bare.path(), "/img/cap.webp");

        let object: Thumbnail =
            serde_json::from_str(r#"{"name": "Cap", "path": "/img/cap.webp"}"#).unwrap();
        assert_eq!(object.path(), "/img/cap.webp");
    }

    #[test]
    fn test_variation_deserializes_from_payload() {
        let variation: Variation = serde_json::from_str(
            r#"{
                "id": 11,
                "attributes": [
                    {"type": "Color", "type_id": "2", "slug": "red"},
                    {"type": "Size", "type_id": 3, "slug": "large"}
                ],
                "in_stock": true,
                "stock_quantity": 4,
                "images": [{"name": "Red cap", "path": "/img/red.webp"}],
                "price": 2500000,
                "sale_price": null
            }"#,
        )
        .unwrap();

        assert_eq!(variation.id, VariationId::new(11));
        assert_eq!(variation.attributes.len(), 2);
        assert_eq!(
            variation.attributes[0].type_id,
            AttributeTypeId::new(2),
            "string type_id accepted"
        );
        assert_eq!(variation.price, Decimal::from(2_500_000));
        assert!(variation.sale_price.is_none());
    }

    #[test]
    fn test_product_envelope() {
        let envelope: Envelope<Product> = serde_json::from_str(
            r#"{"data": {
                "id": 5,
                "name": "Silicone Swim Cap",
                "slug": "silicone-swim-cap",
                "type": "variable",
                "price": 1800000,
                "in_stock": true,
                "thumbnail": "/img/cap.webp"
            }}"#,
        )
        .unwrap();

        let product = envelope.data;
        assert_eq!(product.id, Some(ProductId::new(5)));
        assert!(product.kind.is_variable());
        assert!(product.variations.is_empty());
        assert_eq!(product.thumbnail_path(), Some("/img/cap.webp"));
    }

    #[test]
    fn test_category_tree_deserializes_recursively() {
        let categories: Vec<Category> = serde_json::from_str(
            r#"[{
                "id": 1,
                "name": "Swimming",
                "slug": "swimming",
                "children": [
                    {"id": 2, "name": "Swim Caps", "slug": "swim caps", "children": []}
                ]
            }]"#,
        )
        .unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].children[0].id, CategoryId::new(2));
        assert_eq!(categories[0].children[0].slug, "swim caps");
    }

    #[test]
    fn test_listing_meta() {
        let listing: ProductListing = serde_json::from_str(
            r#"{"products": [], "meta": {"current_page": 2, "last_page": 9, "total": 212}}"#,
        )
        .unwrap();
        let meta = listing.meta.unwrap();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total, 212);
    }
}
