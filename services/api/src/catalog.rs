//! Product catalog: public listings and ownership-scoped inventory changes

use common::validation::{ValidationError, ValidationResult, required_text};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{Category, NewProduct, Product, ProductChanges, ProductForm, ProductQuery},
    repositories::{CategoryStore, ProductStore},
    revalidation::RevalidationBus,
};

const NAME_MAX_LEN: usize = 200;
const DESCRIPTION_MAX_LEN: usize = 5000;
const IMAGE_URL_MAX_LEN: usize = 2048;

/// Upper bound of a NUMERIC(10, 2) column
const PRICE_LIMIT: i64 = 100_000_000;

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parse a price from a JSON number or numeric string
pub fn parse_price(value: Option<&Value>) -> ValidationResult<Decimal> {
    let invalid = || ValidationError::new("price", "Price must be a number");

    let price = match value {
        None => return Err(ValidationError::new("price", "Price is required")),
        Some(v) if is_blank(v) => return Err(ValidationError::new("price", "Price is required")),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
        Some(Value::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
    };

    if price <= Decimal::ZERO {
        return Err(ValidationError::new("price", "Price must be greater than 0"));
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::new(
            "price",
            "Price can have at most 2 decimal places",
        ));
    }

    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(ValidationError::new(
            "price",
            format!("Price must be less than {}", PRICE_LIMIT),
        ));
    }

    Ok(price)
}

/// Parse a whole number from a JSON number or numeric string
pub fn parse_integer(field: &'static str, label: &str, value: Option<&Value>) -> ValidationResult<i64> {
    let invalid = || ValidationError::new(field, format!("{} must be a whole number", label));

    match value {
        None => Err(ValidationError::new(field, format!("{} is required", label))),
        Some(v) if is_blank(v) => Err(ValidationError::new(field, format!("{} is required", label))),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

pub fn parse_stock(value: Option<&Value>) -> ValidationResult<i32> {
    let stock = parse_integer("stock_quantity", "Stock quantity", value)?;

    if stock < 0 {
        return Err(ValidationError::new(
            "stock_quantity",
            "Stock quantity cannot be negative",
        ));
    }

    i32::try_from(stock)
        .map_err(|_| ValidationError::new("stock_quantity", "Stock quantity is too large"))
}

/// Product operations scoped by the acting seller
#[derive(Clone)]
pub struct ProductCatalog {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    revalidation: RevalidationBus,
}

impl ProductCatalog {
    pub fn new(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        revalidation: RevalidationBus,
    ) -> Self {
        Self {
            products,
            categories,
            revalidation,
        }
    }

    async fn category(&self, value: Option<&Value>) -> ApiResult<i64> {
        let category_id = parse_integer("category_id", "Category", value)?;

        if !self.categories.exists(category_id).await? {
            return Err(ValidationError::new("category_id", "Please select a valid category").into());
        }

        Ok(category_id)
    }

    fn announce(&self, product_id: Option<i64>) {
        self.revalidation.publish("/products");
        self.revalidation.publish("/dashboard/products");
        if let Some(id) = product_id {
            self.revalidation.publish(format!("/products/{}", id));
        }
    }

    /// Create a product owned by `seller_id`
    pub async fn create(&self, seller_id: i64, form: ProductForm) -> ApiResult<Product> {
        let name = required_text("name", "Name", form.name.as_deref(), NAME_MAX_LEN)?;
        let description = required_text(
            "description",
            "Description",
            form.description.as_deref(),
            DESCRIPTION_MAX_LEN,
        )?;
        let price = parse_price(form.price.as_ref())?;
        let stock_quantity = parse_stock(form.stock_quantity.as_ref())?;
        let image_url = required_text(
            "image_url",
            "Image URL",
            form.image_url.as_deref(),
            IMAGE_URL_MAX_LEN,
        )?;
        let category_id = self.category(form.category_id.as_ref()).await?;

        let product = self
            .products
            .create(
                seller_id,
                &NewProduct {
                    category_id,
                    name,
                    description,
                    price,
                    stock_quantity,
                    image_url,
                },
            )
            .await?;

        info!(
            "Seller {} created product {}",
            seller_id, product.product_id
        );
        self.announce(None);

        Ok(product)
    }

    /// Public product lookup
    pub async fn get(&self, product_id: i64) -> ApiResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(ApiError::NotFound("Product"))
    }

    /// Public listing of active products, optionally filtered
    pub async fn list(&self, query: &ProductQuery) -> ApiResult<Vec<Product>> {
        let products = match (query.seller_id, query.category_id) {
            (Some(seller_id), category_id) => {
                let mut products = self.products.find_active_by_seller(seller_id).await?;
                if let Some(category_id) = category_id {
                    products.retain(|p| p.category_id == category_id);
                }
                products
            }
            (None, Some(category_id)) => self.products.find_active_by_category(category_id).await?,
            (None, None) => self.products.find_all_active().await?,
        };

        Ok(products)
    }

    /// A seller's own inventory, inactive products included
    pub async fn for_seller(&self, seller_id: i64) -> ApiResult<Vec<Product>> {
        Ok(self.products.find_by_seller(seller_id).await?)
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.categories.find_all().await?)
    }

    /// Apply the supplied fields to a product owned by `seller_id`
    ///
    /// A product that does not exist and one owned by someone else are
    /// indistinguishable: both are `NotAuthorized`.
    pub async fn update(
        &self,
        product_id: i64,
        seller_id: i64,
        form: ProductForm,
    ) -> ApiResult<Product> {
        let changes = ProductChanges {
            name: form
                .name
                .as_deref()
                .map(|v| required_text("name", "Name", Some(v), NAME_MAX_LEN))
                .transpose()?,
            description: form
                .description
                .as_deref()
                .map(|v| required_text("description", "Description", Some(v), DESCRIPTION_MAX_LEN))
                .transpose()?,
            price: form
                .price
                .as_ref()
                .map(|v| parse_price(Some(v)))
                .transpose()?,
            stock_quantity: form
                .stock_quantity
                .as_ref()
                .map(|v| parse_stock(Some(v)))
                .transpose()?,
            image_url: form
                .image_url
                .as_deref()
                .map(|v| required_text("image_url", "Image URL", Some(v), IMAGE_URL_MAX_LEN))
                .transpose()?,
            category_id: match form.category_id.as_ref() {
                Some(v) => Some(self.category(Some(v)).await?),
                None => None,
            },
            is_active: form.is_active,
        };

        let Some(product) = self.products.update(product_id, seller_id, &changes).await? else {
            warn!(
                "Seller {} may not update product {}",
                seller_id, product_id
            );
            return Err(ApiError::NotAuthorized);
        };

        info!("Seller {} updated product {}", seller_id, product_id);
        self.announce(Some(product_id));

        Ok(product)
    }

    /// Delete a product owned by `seller_id`
    pub async fn delete(&self, product_id: i64, seller_id: i64) -> ApiResult<()> {
        if !self.products.delete(product_id, seller_id).await? {
            warn!(
                "Seller {} may not delete product {}",
                seller_id, product_id
            );
            return Err(ApiError::NotAuthorized);
        }

        info!("Seller {} deleted product {}", seller_id, product_id);
        self.announce(Some(product_id));

        Ok(())
    }
}
