//! Catalog read operations.
//!
//! Product pages and single products are cached for 5 minutes. Search
//! queries bypass the cache so a manager's edits show up as soon as the
//! customer actually looks for something.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use aims_core::{Product, ProductId};

use super::{BackendClient, BackendError};

/// Catalog cache entry.
#[derive(Clone)]
pub enum CatalogCacheValue {
    Product(Box<Product>),
    Page(ProductPage),
}

/// A page of products plus the total match count.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub total: i64,
}

/// Catalog search parameters, mirroring the backend's `/products/search`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
}

impl ProductSearch {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(media_type) = &self.media_type {
            pairs.push(("mediaType", media_type.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(dir) = &self.sort_direction {
            pairs.push(("sortDirection", dir.clone()));
        }
        pairs
    }
}

impl BackendClient {
    /// Get a random page of products for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn random_products(&self, page: u32, limit: u32) -> Result<ProductPage, BackendError> {
        let cache_key = format!("random:{page}:{limit}");

        if let Some(CatalogCacheValue::Page(cached)) = self.catalog_cache().get(&cache_key).await {
            debug!("Cache hit for random products");
            return Ok(cached);
        }

        let result: ProductPage = self
            .get_json(
                "/products/random",
                None,
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        self.catalog_cache()
            .insert(cache_key, CatalogCacheValue::Page(result.clone()))
            .await;

        Ok(result)
    }

    /// Search the catalog.
    ///
    /// Not cached: search results must reflect live stock and pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<ProductPage, BackendError> {
        self.get_json("/products/search", None, &search.query_pairs())
            .await
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, BackendError> {
        let cache_key = format!("product:{id}");

        if let Some(CatalogCacheValue::Product(cached)) =
            self.catalog_cache().get(&cache_key).await
        {
            debug!("Cache hit for product");
            return Ok(*cached);
        }

        let product: Product = self.get_json(&format!("/products/{id}"), None, &[]).await?;

        self.catalog_cache()
            .insert(
                cache_key,
                CatalogCacheValue::Product(Box::new(product.clone())),
            )
            .await;

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_pairs() {
        let search = ProductSearch {
            page: Some(2),
            size: Some(20),
            search: Some("miles".to_owned()),
            media_type: Some("LP".to_owned()),
            min_price: Some(100_000),
            ..ProductSearch::default()
        };

        let pairs = search.query_pairs();
        assert!(pairs.contains(&("page", "2".to_owned())));
        assert!(pairs.contains(&("mediaType", "LP".to_owned())));
        assert!(pairs.contains(&("minPrice", "100000".to_owned())));
        // Unset filters don't leak into the query string
        assert!(!pairs.iter().any(|(k, _)| *k == "maxPrice"));
    }

    #[test]
    fn test_empty_search_has_no_pairs() {
        assert!(ProductSearch::default().query_pairs().is_empty());
    }
}
