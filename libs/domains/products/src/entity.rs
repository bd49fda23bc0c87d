use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::error::{ProductError, ProductResult};
use crate::models::{Attribute, Product};

/// Sea-ORM entity for the products table.
///
/// Attributes are persisted as a JSONB column rather than a join table;
/// the column holds the serialized `Vec<Attribute>`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sku: String,
    pub parent_sku: Option<String>,
    pub title: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub short_description: Option<String>,
    pub is_published: Option<bool>,
    pub attributes: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Product
impl From<Model> for Product {
    fn from(model: Model) -> Self {
        let attributes: Option<Vec<Attribute>> = model
            .attributes
            .and_then(|json| serde_json::from_value(json).ok());

        Self {
            sku: model.sku,
            parent_sku: model.parent_sku,
            title: model.title,
            category_code: model.category_code,
            category_name: model.category_name,
            description: model.description,
            short_description: model.short_description,
            is_published: model.is_published,
            attributes,
        }
    }
}

/// Build a full ActiveModel from a domain Product.
///
/// Every column is written, so absent optional fields become NULL;
/// partial semantics are resolved before this point by
/// `Product::apply_update`.
pub fn to_active_model(product: &Product) -> ProductResult<ActiveModel> {
    let attributes = product
        .attributes
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| ProductError::Internal(format!("Failed to serialize attributes: {}", e)))?;

    Ok(ActiveModel {
        sku: Set(product.sku.clone()),
        parent_sku: Set(product.parent_sku.clone()),
        title: Set(product.title.clone()),
        category_code: Set(product.category_code.clone()),
        category_name: Set(product.category_name.clone()),
        description: Set(product.description.clone()),
        short_description: Set(product.short_description.clone()),
        is_published: Set(product.is_published),
        attributes: Set(attributes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_into_product_parses_attributes() {
        let model = Model {
            sku: "SKU-1".to_string(),
            parent_sku: None,
            title: Some("Shirt".to_string()),
            category_code: Some("apparel".to_string()),
            category_name: None,
            description: None,
            short_description: None,
            is_published: Some(true),
            attributes: Some(json!([
                { "name_code": "color", "value_code": "red" }
            ])),
        };

        let product: Product = model.into();
        let attributes = product.attributes.unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].name_code, "color");
    }

    #[test]
    fn test_round_trip_through_active_model() {
        let product = Product {
            sku: "SKU-2".to_string(),
            parent_sku: Some("SKU-1".to_string()),
            title: Some("Shirt".to_string()),
            category_code: Some("apparel".to_string()),
            category_name: Some("Apparel".to_string()),
            description: Some("desc".to_string()),
            short_description: None,
            is_published: Some(false),
            attributes: Some(vec![Attribute {
                name_code: "size".to_string(),
                name: None,
                value_code: "m".to_string(),
                value: None,
            }]),
        };

        let active = to_active_model(&product).unwrap();
        assert_eq!(active.sku.clone().unwrap(), "SKU-2");
        assert!(matches!(active.attributes, Set(Some(_))));
    }
}
