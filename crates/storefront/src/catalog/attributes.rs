//! Attribute aggregation over a product's variation list.
//!
//! A variable product arrives as a flat list of variations, each carrying
//! its own attribute set. The functions here fold that list into the two
//! structures the selection UI works from: a stock-availability index keyed
//! by attribute identity, and attribute values grouped per facet with
//! duplicates removed and color swatches resolved.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use caspian_core::AttributeTypeId;
use serde::Serialize;

use crate::shop::types::{AttributeOptions, ColorSwatch, ProductImage, Variation};

// =============================================================================
// Stock Map
// =============================================================================

/// Identity of one attribute value: the facet it belongs to plus its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    /// Facet the value belongs to.
    pub type_id: AttributeTypeId,
    /// Value identifier within the facet.
    pub slug: String,
}

impl AttributeKey {
    /// Create a key from a facet id and value slug.
    pub fn new(type_id: AttributeTypeId, slug: impl Into<String>) -> Self {
        Self {
            type_id,
            slug: slug.into(),
        }
    }
}

impl std::fmt::Display for AttributeKey {
    /// Renders the canonical `{type_id}-{slug}` form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.type_id, self.slug)
    }
}

/// Aggregate availability index: an attribute value maps to `true` iff at
/// least one variation carrying it is in stock.
pub type StockMap = HashMap<AttributeKey, bool>;

/// Build the stock map for a variation list.
///
/// Writes are upgrade-only: once any variation marks a value in stock, a
/// later out-of-stock variation for the same value never clears it. An
/// empty variation list yields an empty map.
#[must_use]
pub fn stock_map(variations: &[Variation]) -> StockMap {
    let mut map = StockMap::new();

    for variation in variations {
        for attr in &variation.attributes {
            let key = AttributeKey::new(attr.type_id, attr.slug.clone());
            match map.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(variation.in_stock);
                }
                Entry::Occupied(mut entry) => {
                    if variation.in_stock {
                        entry.insert(true);
                    }
                }
            }
        }
    }

    map
}

// =============================================================================
// Grouped Attributes
// =============================================================================

/// One attribute value inside a group, with the facet-level fields stripped
/// (they are promoted to the group).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAttributeValue {
    /// Display name of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Value identifier within the facet.
    pub slug: String,
    /// Raw value payload, if the backend sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Metadata, with the swatch resolved for color values.
    #[serde(skip_serializing_if = "AttributeOptions::is_empty")]
    pub options: AttributeOptions,
    /// Aggregate stock flag from the stock map.
    pub in_stock: bool,
}

/// One facet with its de-duplicated list of distinct values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAttribute {
    /// Display name of the facet (e.g. "Color").
    #[serde(rename = "type")]
    pub kind: String,
    /// Facet identifier.
    pub type_id: AttributeTypeId,
    /// Distinct values, first occurrence order.
    pub attributes: Vec<GroupedAttributeValue>,
}

/// Find the image shown for an attribute value (used for color swatches).
///
/// Scans variations in source order and returns the first image of the
/// first variation that carries the value (matched by slug) and has a
/// non-empty image list.
#[must_use]
pub fn find_swatch_image<'a>(
    variations: &'a [Variation],
    attr_slug: &str,
) -> Option<&'a ProductImage> {
    variations
        .iter()
        .find(|variation| {
            variation.attributes.iter().any(|attr| attr.slug == attr_slug)
                && !variation.images.is_empty()
        })
        .and_then(|variation| variation.images.first())
}

/// Group attribute values by facet, annotated with aggregate stock status.
///
/// Within each group the first-occurring record per distinct slug wins,
/// consistent with the swatch precedence by source order. Values of the
/// `color_type_id` facet get a [`ColorSwatch`] attached when any variation
/// carrying them has imagery; otherwise their options stay untouched.
/// Groups come out in ascending facet order.
#[must_use]
pub fn group_attributes(
    variations: &[Variation],
    stock: &StockMap,
    color_type_id: AttributeTypeId,
) -> Vec<GroupedAttribute> {
    let mut groups: BTreeMap<AttributeTypeId, GroupedAttribute> = BTreeMap::new();

    for variation in variations {
        for attr in &variation.attributes {
            let group = groups.entry(attr.type_id).or_insert_with(|| GroupedAttribute {
                kind: attr.kind.clone(),
                type_id: attr.type_id,
                attributes: Vec::new(),
            });

            // First occurrence wins
            if group.attributes.iter().any(|existing| existing.slug == attr.slug) {
                continue;
            }

            let key = AttributeKey::new(attr.type_id, attr.slug.clone());
            let in_stock = stock.get(&key).copied().unwrap_or(false);

            let mut options = attr.options.clone();
            if attr.type_id == color_type_id
                && let Some(image) = find_swatch_image(variations, &attr.slug)
            {
                options.swatch = Some(ColorSwatch {
                    path: image.path.clone(),
                    alt: Some(image.name.clone()),
                });
            }

            group.attributes.push(GroupedAttributeValue {
                name: attr.name.clone(),
                slug: attr.slug.clone(),
                value: attr.value.clone(),
                options,
                in_stock,
            });
        }
    }

    groups.into_values().collect()
}

/// Build both aggregation outputs in one pass over the variation list.
#[must_use]
pub fn process_variation_attributes(
    variations: &[Variation],
    color_type_id: AttributeTypeId,
) -> (StockMap, Vec<GroupedAttribute>) {
    let stock = stock_map(variations);
    let grouped = group_attributes(variations, &stock, color_type_id);
    (stock, grouped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use caspian_core::VariationId;
    use rust_decimal::Decimal;

    const COLOR: i64 = 2;
    const SIZE: i64 = 3;

    fn attr(type_id: i64, kind: &str, slug: &str) -> crate::shop::types::ProductAttribute {
        crate::shop::types::ProductAttribute {
            name: None,
            kind: kind.to_string(),
            type_id: AttributeTypeId::new(type_id),
            slug: slug.to_string(),
            value: None,
            input: None,
            options: AttributeOptions::default(),
            in_stock: None,
        }
    }

    fn image(name: &str, path: &str) -> ProductImage {
        ProductImage {
            id: None,
            name: name.to_string(),
            path: path.to_string(),
            mime_type: None,
        }
    }

    fn variation(
        id: i64,
        attrs: Vec<crate::shop::types::ProductAttribute>,
        in_stock: bool,
        images: Vec<ProductImage>,
    ) -> Variation {
        Variation {
            id: VariationId::new(id),
            attributes: attrs,
            in_stock,
            stock_quantity: i64::from(in_stock),
            images,
            price: Decimal::from(1_000_000),
            sale_price: None,
            sku: None,
        }
    }

    fn key(type_id: i64, slug: &str) -> AttributeKey {
        AttributeKey::new(AttributeTypeId::new(type_id), slug)
    }

    #[test]
    fn test_attribute_key_display() {
        assert_eq!(key(1, "red").to_string(), "1-red");
    }

    #[test]
    fn test_stock_map_basic() {
        let variations = vec![
            variation(1, vec![attr(1, "Color", "red")], true, vec![]),
            variation(2, vec![attr(1, "Color", "blue")], false, vec![]),
        ];

        let stock = stock_map(&variations);
        assert_eq!(stock.len(), 2);
        assert_eq!(stock[&key(1, "red")], true);
        assert_eq!(stock[&key(1, "blue")], false);
    }

    #[test]
    fn test_stock_map_is_upgrade_only() {
        // an out-of-stock variation after an in-stock one must not clear the flag
        let variations = vec![
            variation(1, vec![attr(COLOR, "Color", "red"), attr(SIZE, "Size", "l")], true, vec![]),
            variation(2, vec![attr(COLOR, "Color", "red"), attr(SIZE, "Size", "xl")], false, vec![]),
        ];

        let stock = stock_map(&variations);
        assert_eq!(stock[&key(COLOR, "red")], true);
        assert_eq!(stock[&key(SIZE, "l")], true);
        assert_eq!(stock[&key(SIZE, "xl")], false);
    }

    #[test]
    fn test_stock_map_upgrades_from_false() {
        let variations = vec![
            variation(1, vec![attr(COLOR, "Color", "red")], false, vec![]),
            variation(2, vec![attr(COLOR, "Color", "red")], true, vec![]),
        ];

        let stock = stock_map(&variations);
        assert_eq!(stock[&key(COLOR, "red")], true);
    }

    #[test]
    fn test_empty_variations_yield_empty_outputs() {
        let (stock, grouped) = process_variation_attributes(&[], AttributeTypeId::new(COLOR));
        assert!(stock.is_empty());
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_grouping_dedups_by_slug_first_occurrence_wins() {
        let mut first = attr(COLOR, "Color", "red");
        first.name = Some("Red".to_string());
        let mut dup = attr(COLOR, "Color", "red");
        dup.name = Some("Crimson".to_string());

        let variations = vec![
            variation(1, vec![first, attr(SIZE, "Size", "l")], true, vec![]),
            variation(2, vec![dup, attr(SIZE, "Size", "xl")], true, vec![]),
        ];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));

        let color_group = grouped
            .iter()
            .find(|g| g.type_id == AttributeTypeId::new(COLOR))
            .unwrap();
        assert_eq!(color_group.attributes.len(), 1);
        assert_eq!(color_group.attributes[0].name.as_deref(), Some("Red"));
    }

    #[test]
    fn test_groups_ordered_by_facet_and_carry_stock() {
        let variations = vec![
            variation(
                1,
                vec![attr(SIZE, "Size", "l"), attr(COLOR, "Color", "red")],
                true,
                vec![],
            ),
            variation(
                2,
                vec![attr(SIZE, "Size", "xl"), attr(COLOR, "Color", "blue")],
                false,
                vec![],
            ),
        ];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));

        assert_eq!(grouped.len(), 2);
        // ascending facet order
        assert_eq!(grouped[0].type_id, AttributeTypeId::new(COLOR));
        assert_eq!(grouped[0].kind, "Color");
        assert_eq!(grouped[1].type_id, AttributeTypeId::new(SIZE));

        let blue = grouped[0]
            .attributes
            .iter()
            .find(|a| a.slug == "blue")
            .unwrap();
        assert!(!blue.in_stock);
        let red = grouped[0].attributes.iter().find(|a| a.slug == "red").unwrap();
        assert!(red.in_stock);
    }

    #[test]
    fn test_no_duplicate_slugs_within_any_group() {
        let variations = vec![
            variation(1, vec![attr(COLOR, "Color", "red"), attr(SIZE, "Size", "l")], true, vec![]),
            variation(2, vec![attr(COLOR, "Color", "red"), attr(SIZE, "Size", "xl")], true, vec![]),
            variation(3, vec![attr(COLOR, "Color", "blue"), attr(SIZE, "Size", "l")], false, vec![]),
        ];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));

        for group in &grouped {
            let mut slugs: Vec<_> = group.attributes.iter().map(|a| &a.slug).collect();
            slugs.sort();
            slugs.dedup();
            assert_eq!(slugs.len(), group.attributes.len());
        }
    }

    #[test]
    fn test_color_swatch_resolved_from_first_variation_with_images() {
        let variations = vec![
            // carries red but has no imagery
            variation(1, vec![attr(COLOR, "Color", "red")], true, vec![]),
            variation(
                2,
                vec![attr(COLOR, "Color", "red")],
                true,
                vec![image("Red cap", "/img/red.webp"), image("Back", "/img/red-2.webp")],
            ),
            variation(
                3,
                vec![attr(COLOR, "Color", "red")],
                true,
                vec![image("Other", "/img/other.webp")],
            ),
        ];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));

        let swatch = grouped[0].attributes[0].options.swatch.as_ref().unwrap();
        assert_eq!(swatch.path, "/img/red.webp");
        assert_eq!(swatch.alt.as_deref(), Some("Red cap"));
    }

    #[test]
    fn test_color_without_imagery_leaves_options_untouched() {
        let mut colored = attr(COLOR, "Color", "green");
        colored.options.color = Some("#0a0".to_string());

        let variations = vec![variation(1, vec![colored], true, vec![])];
        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));

        let options = &grouped[0].attributes[0].options;
        assert!(options.swatch.is_none());
        assert_eq!(options.color.as_deref(), Some("#0a0"));
    }

    #[test]
    fn test_non_color_facet_gets_no_swatch() {
        let variations = vec![variation(
            1,
            vec![attr(SIZE, "Size", "l")],
            true,
            vec![image("L", "/img/l.webp")],
        )];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(COLOR));
        assert!(grouped[0].attributes[0].options.swatch.is_none());
    }

    #[test]
    fn test_configurable_color_facet() {
        // same data, color facet moved to type_id 9
        let variations = vec![variation(
            1,
            vec![attr(9, "Shade", "rose")],
            true,
            vec![image("Rose", "/img/rose.webp")],
        )];

        let (_, grouped) = process_variation_attributes(&variations, AttributeTypeId::new(9));
        assert!(grouped[0].attributes[0].options.swatch.is_some());
    }
}
