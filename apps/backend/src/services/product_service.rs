//! # Product Service
//!
//! Catalog use cases and cursor pagination.
//!
//! ## Listing
//! ```text
//!   list(limit, cursor, direction)
//!     │
//!     ├── direction ""    → cursor ignored, id 0
//!     ├── direction next  → decrypt cursor ──► id      (bad cursor → 400)
//!     ├── direction prev  → decrypt cursor ──► id
//!     │
//!     ├── gateway.list(limit, id, direction)   always ascending
//!     │        │
//!     │        └── empty ──► Ok(None)
//!     │
//!     └── PageCursors::compute ──► ProductPage { products, cursors }
//! ```
//!
//! Row ids never leave this service; callers only see uids and sealed
//! cursors.

use std::sync::Arc;

use tracing::{debug, info};

use pasar_core::cursor::resolve_cursor;
use pasar_core::metadata::Metadata;
use pasar_core::{
    CursorCipher, NewProduct, PageCursors, PageDirection, PageLimit, ProductPage, ProductView,
};
use pasar_db::{ProductGateway, ProductRecord};

use crate::error::ApiResult;

/// Catalog use cases over any [`ProductGateway`].
pub struct ProductService<G> {
    gateway: G,
    cipher: Arc<dyn CursorCipher>,
    default_limit: PageLimit,
}

impl<G: ProductGateway> ProductService<G> {
    pub fn new(gateway: G, cipher: Arc<dyn CursorCipher>, default_limit: PageLimit) -> Self {
        ProductService {
            gateway,
            cipher,
            default_limit,
        }
    }

    /// Derives prices, weight and slug, then stores the product.
    /// Returns its uid.
    pub async fn create(&self, product: &NewProduct) -> ApiResult<String> {
        let record = ProductRecord::derive(product)?;
        let uid = self.gateway.create(&Metadata::generate(), &record).await?;

        info!(%uid, slug = %record.slug, offer = %record.offer_price, "Product created");
        Ok(uid)
    }

    /// One page of the catalog.
    ///
    /// `limit` falls back to the configured default. `direction` is the
    /// wire form (`""`, `"next"`, `"prev"`). `Ok(None)` when the page is
    /// empty.
    pub async fn list(
        &self,
        limit: Option<i64>,
        cursor: &str,
        direction: &str,
    ) -> ApiResult<Option<ProductPage>> {
        let limit = match limit {
            Some(limit) => PageLimit::new(limit)?,
            None => self.default_limit,
        };
        let direction = PageDirection::parse(direction)?;
        let cursor_id = resolve_cursor(self.cipher.as_ref(), direction, cursor)?;

        let products = self.gateway.list(limit, cursor_id, direction).await?;

        let (Some(first), Some(last)) = (products.first(), products.last()) else {
            debug!(direction = direction.as_str(), "Empty product page");
            return Ok(None);
        };

        let cursors = PageCursors::compute(
            self.cipher.as_ref(),
            direction,
            cursor_id,
            cursor,
            first.id,
            last.id,
        )?;

        debug!(
            direction = direction.as_str(),
            rows = products.len(),
            is_first_page = cursors.is_first_page,
            "Product page"
        );

        Ok(Some(ProductPage {
            products: products.iter().map(ProductView::from).collect(),
            is_first_page: cursors.is_first_page,
            limit: limit.get(),
            prev_cursor: cursors.prev_cursor,
            next_cursor: cursors.next_cursor,
        }))
    }

    pub async fn get_by_uid(&self, uid: &str) -> ApiResult<Option<ProductView>> {
        let product = self.gateway.get_by_uid(uid).await?;
        Ok(product.as_ref().map(ProductView::from))
    }

    /// Replaces a product. Existing cart lines keep their snapshot.
    pub async fn update_by_uid(
        &self,
        uid: &str,
        product: &NewProduct,
    ) -> ApiResult<Option<ProductView>> {
        let record = ProductRecord::derive(product)?;
        let updated = self
            .gateway
            .update_by_uid(uid, &record, chrono::Utc::now())
            .await?;

        if updated.is_some() {
            info!(%uid, "Product updated");
        }
        Ok(updated.as_ref().map(ProductView::from))
    }

    /// `false` when no product had `uid`.
    pub async fn delete_by_uid(&self, uid: &str) -> ApiResult<bool> {
        let deleted = self.gateway.delete_by_uid(uid).await?;
        if deleted {
            info!(%uid, "Product deleted");
        }
        Ok(deleted)
    }
}
