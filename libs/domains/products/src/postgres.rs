//! PostgreSQL implementation of ProductRepository

use async_trait::async_trait;
use axum_helpers::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use tracing::instrument;

use crate::entity;
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// PostgreSQL implementation of the ProductRepository
///
/// Batch mutations run inside a single transaction so a duplicate or
/// missing sku rolls back the whole batch.
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Build a SeaORM condition from the list filters.
    ///
    /// Empty or whitespace-only values are ignored, matching the query
    /// semantics of the HTTP layer where `?sku=` means "no filter".
    fn build_condition(filter: &ProductFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(ref sku) = filter.sku {
            if !sku.trim().is_empty() {
                condition = condition.add(entity::Column::Sku.eq(sku.clone()));
            }
        }

        if let Some(ref category_code) = filter.category_code {
            if !category_code.trim().is_empty() {
                condition = condition.add(entity::Column::CategoryCode.eq(category_code.clone()));
            }
        }

        condition
    }

    async fn insert_batch(
        txn: &DatabaseTransaction,
        products: &[Product],
    ) -> ProductResult<Vec<Product>> {
        let mut created = Vec::with_capacity(products.len());

        for product in products {
            let active = entity::to_active_model(product)?;
            let model = active.insert(txn).await.map_err(|e| match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ProductError::DuplicateSku(product.sku.clone())
                    }
                    _ => ProductError::Database(format!(
                        "Failed to create product '{}': {}",
                        product.sku, e
                    )),
                })?;
            created.push(model.into());
        }

        Ok(created)
    }

    async fn replace_batch(
        txn: &DatabaseTransaction,
        products: &[Product],
    ) -> ProductResult<Vec<Product>> {
        let mut updated = Vec::with_capacity(products.len());

        for product in products {
            let existing = entity::Entity::find_by_id(product.sku.clone())
                .one(txn)
                .await?;
            if existing.is_none() {
                return Err(ProductError::not_found(product.sku.clone()));
            }

            let active = entity::to_active_model(product)?;
            let model = active.update(txn).await.map_err(|e| {
                    ProductError::Database(format!(
                        "Failed to update product '{}': {}",
                        product.sku, e
                    ))
                })?;
            updated.push(model.into());
        }

        Ok(updated)
    }

    async fn patch_batch(
        txn: &DatabaseTransaction,
        updates: &[UpdateProduct],
    ) -> ProductResult<Vec<Product>> {
        let mut updated = Vec::with_capacity(updates.len());

        for update in updates {
            let existing = entity::Entity::find_by_id(update.sku.clone())
                .one(txn)
                .await?
                .ok_or_else(|| ProductError::not_found(update.sku.clone()))?;

            let mut product: Product = existing.into();
            product.apply_update(update.clone());

            let active = entity::to_active_model(&product)?;
            let model = active.update(txn).await.map_err(|e| {
                    ProductError::Database(format!(
                        "Failed to update product '{}': {}",
                        update.sku, e
                    ))
                })?;
            updated.push(model.into());
        }

        Ok(updated)
    }

    async fn delete_batch(
        txn: &DatabaseTransaction,
        skus: &[String],
    ) -> ProductResult<Vec<Product>> {
        let mut deleted = Vec::with_capacity(skus.len());

        for sku in skus {
            let result = entity::Entity::delete_by_id(sku.clone()).exec(txn).await?;
            if result.rows_affected == 0 {
                return Err(ProductError::not_found(sku.clone()));
            }
            deleted.push(Product::from_sku(sku.clone()));
        }

        Ok(deleted)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self, products), fields(batch = products.len()))]
    async fn create(&self, products: Vec<Product>) -> ProductResult<Vec<Product>> {
        let txn = self.db.begin().await?;

        match Self::insert_batch(&txn, &products).await {
            Ok(created) => {
                txn.commit().await?;
                tracing::info!(created = created.len(), "Products created successfully");
                Ok(created)
            }
            Err(err) => {
                txn.rollback().await.ok();
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_all(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(Self::build_condition(&filter))
            .order_by_asc(entity::Column::Sku)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_sku(&self, sku: &str) -> ProductResult<Vec<Product>> {
        let model = entity::Entity::find_by_id(sku.to_string())
            .one(&self.db)
            .await?;

        Ok(model.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, products), fields(batch = products.len()))]
    async fn update_full(&self, products: Vec<Product>) -> ProductResult<Vec<Product>> {
        let txn = self.db.begin().await?;

        match Self::replace_batch(&txn, &products).await {
            Ok(updated) => {
                txn.commit().await?;
                tracing::info!(updated = updated.len(), "Products updated successfully");
                Ok(updated)
            }
            Err(err) => {
                txn.rollback().await.ok();
                Err(err)
            }
        }
    }

    #[instrument(skip(self, updates), fields(batch = updates.len()))]
    async fn update_partial(&self, updates: Vec<UpdateProduct>) -> ProductResult<Vec<Product>> {
        let txn = self.db.begin().await?;

        match Self::patch_batch(&txn, &updates).await {
            Ok(updated) => {
                txn.commit().await?;
                tracing::info!(updated = updated.len(), "Products patched successfully");
                Ok(updated)
            }
            Err(err) => {
                txn.rollback().await.ok();
                Err(err)
            }
        }
    }

    #[instrument(skip(self, skus), fields(batch = skus.len()))]
    async fn delete(&self, skus: Vec<String>) -> ProductResult<Vec<Product>> {
        let txn = self.db.begin().await?;

        match Self::delete_batch(&txn, &skus).await {
            Ok(deleted) => {
                txn.commit().await?;
                tracing::info!(deleted = deleted.len(), "Products deleted successfully");
                Ok(deleted)
            }
            Err(err) => {
                txn.rollback().await.ok();
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = entity::Entity::find()
            .filter(Self::build_condition(&filter))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn exists_by_sku(&self, sku: &str) -> ProductResult<bool> {
        let model = entity::Entity::find_by_id(sku.to_string())
            .one(&self.db)
            .await?;

        Ok(model.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn build_sql(filter: &ProductFilter) -> String {
        entity::Entity::find()
            .filter(PgProductRepository::build_condition(filter))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_build_condition_empty() {
        let sql = build_sql(&ProductFilter::default());
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_build_condition_with_sku() {
        let filter = ProductFilter {
            sku: Some("SKU-1".to_string()),
            ..Default::default()
        };
        let sql = build_sql(&filter);
        assert!(sql.contains(r#""sku""#));
        assert!(sql.contains("SKU-1"));
    }

    #[test]
    fn test_build_condition_ignores_blank_values() {
        let filter = ProductFilter {
            sku: Some("   ".to_string()),
            category_code: Some("".to_string()),
        };
        let sql = build_sql(&filter);
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_build_condition_with_both_filters() {
        let filter = ProductFilter {
            sku: Some("SKU-1".to_string()),
            category_code: Some("apparel".to_string()),
        };
        let sql = build_sql(&filter);
        assert!(sql.contains(r#""category_code""#));
        assert!(sql.contains("AND"));
    }
}
