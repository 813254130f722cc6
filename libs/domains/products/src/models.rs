use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{CatalogError, CatalogResult};

/// Store-assigned product identifier
pub type ProductId = u64;

/// Prices must be finite and above zero. `NaN` and infinities decode from
/// form bodies but cannot be written back as JSON numbers.
fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::new("invalid_price"));
    }
    Ok(())
}

/// Product entity as held by a [`ProductStore`](crate::store::ProductStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned on creation and never reused
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// External SKU-like code; not required to be unique
    pub code: String,
}

/// A product that passed creation validation and is waiting for an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub code: String,
}

/// Create request body. Every field is optional at the wire level so that a
/// missing field is reported as a validation failure instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, custom(function = "validate_price"))]
    pub price: Option<f64>,
    #[validate(required, length(min = 1))]
    pub code: Option<String>,
}

/// Partial update body; absent fields keep their stored value.
/// No `id` field: an id sent in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<f64>,
    pub code: Option<String>,
}

/// Query string of the list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Return only the first `limit` products; ignored unless within `1..=total`
    pub limit: Option<String>,
}

/// `{ "success": true, "products": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

/// `{ "success": true, "product": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// `{ "success": true, "deleted": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedProductResponse {
    pub success: bool,
    pub deleted: Product,
}

impl Product {
    pub fn new(id: ProductId, input: NewProduct) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            price: input.price,
            code: input.code,
        }
    }

    /// Merge present fields of `update` over this record. `id` is untouched.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(code) = update.code {
            self.code = code;
        }
    }
}

impl TryFrom<CreateProduct> for NewProduct {
    type Error = CatalogError;

    fn try_from(input: CreateProduct) -> CatalogResult<Self> {
        input.validate()?;

        let CreateProduct {
            title: Some(title),
            description: Some(description),
            price: Some(price),
            code: Some(code),
        } = input
        else {
            return Err(CatalogError::Validation(
                "Missing or invalid required fields".to_string(),
            ));
        };

        Ok(NewProduct {
            title,
            description,
            price,
            code,
        })
    }
}

impl ProductListResponse {
    pub fn ok(products: Vec<Product>) -> Self {
        Self {
            success: true,
            products,
        }
    }
}

impl ProductResponse {
    pub fn ok(product: Product) -> Self {
        Self {
            success: true,
            product,
        }
    }
}

impl DeletedProductResponse {
    pub fn ok(deleted: Product) -> Self {
        Self {
            success: true,
            deleted,
        }
    }
}
