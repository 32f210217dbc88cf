//! Product and variant domain types.
//!
//! A [`Product`] exclusively owns its [`Variant`]s: they are written as a
//! full batch on create and replaced wholesale on every update.
//!
//! Incoming payloads arrive as [`ProductInput`] and become a
//! [`ProductDraft`] only after [`ProductInput::validate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use store_manager_core::{PhotoSlots, Price, PriceError, ProductId, VariantId};

/// A catalog product with its variants loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-text label.
    pub category: String,
    pub cost_price: Price,
    pub sale_price: Price,
    #[serde(flatten)]
    pub photos: PhotoSlots,
    pub variants: Vec<Variant>,
}

/// A size/color stock-keeping unit under one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub stock: i32,
}

/// Product payload accepted by create and replace.
///
/// Prices arrive as raw decimals so range errors surface as validation
/// failures rather than body-parsing failures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Only consulted by replace, where it must match the path id.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    #[serde(flatten)]
    pub photos: PhotoSlots,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

/// Variant payload. Any `id` sent by the client is ignored: variants are
/// always inserted as new rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[serde(default)]
    pub id: Option<VariantId>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub stock: i32,
}

/// A validated product ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub cost_price: Price,
    pub sale_price: Price,
    pub photos: PhotoSlots,
    pub variants: Vec<VariantDraft>,
}

/// A validated variant without identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDraft {
    pub size: String,
    pub color: String,
    pub stock: i32,
}

/// Reasons a product payload is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidProduct {
    #[error("product name cannot be empty")]
    EmptyName,

    #[error("invalid {field}: {source}")]
    Price {
        field: &'static str,
        #[source]
        source: PriceError,
    },

    #[error("variant {index} has negative stock ({stock})")]
    NegativeStock { index: usize, stock: i32 },
}

impl ProductInput {
    /// Check invariants and normalise the payload.
    ///
    /// Names and labels are trimmed, prices are normalised to two decimal
    /// places and variant ids are discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProduct` for an empty name, a negative or sub-cent
    /// price, or a variant with negative stock.
    pub fn validate(self) -> Result<ProductDraft, InvalidProduct> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(InvalidProduct::EmptyName);
        }

        let cost_price = Price::new(self.cost_price).map_err(|source| InvalidProduct::Price {
            field: "costPrice",
            source,
        })?;
        let sale_price = Price::new(self.sale_price).map_err(|source| InvalidProduct::Price {
            field: "salePrice",
            source,
        })?;

        let variants = self
            .variants
            .into_iter()
            .enumerate()
            .map(|(index, v)| {
                if v.stock < 0 {
                    return Err(InvalidProduct::NegativeStock {
                        index,
                        stock: v.stock,
                    });
                }
                Ok(VariantDraft {
                    size: v.size.trim().to_owned(),
                    color: v.color.trim().to_owned(),
                    stock: v.stock,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductDraft {
            name,
            category: self.category.trim().to_owned(),
            cost_price,
            sale_price,
            photos: self.photos,
            variants,
        })
    }
}
