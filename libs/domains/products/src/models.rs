use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product attribute value object.
///
/// Defined by its `name_code`/`value_code` pair; the display `name` and
/// `value` are denormalized lookups carried along for responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Attribute {
    #[validate(length(min = 1, max = 64))]
    pub name_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub value_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Product entity, identified by its externally assigned sku.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_sku: Option<String>,
    pub title: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
}

impl Product {
    /// Product carrying only its identity, used for deletion echoes.
    pub fn from_sku(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            parent_sku: None,
            title: None,
            category_code: None,
            category_name: None,
            description: None,
            short_description: None,
            is_published: None,
            attributes: None,
        }
    }

    /// Apply a partial update: only provided fields change; provided
    /// attributes replace same-name-code entries and append new ones.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(parent_sku) = update.parent_sku {
            self.parent_sku = Some(parent_sku);
        }
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(category_code) = update.category_code {
            self.category_code = Some(category_code);
        }
        if let Some(category_name) = update.category_name {
            self.category_name = Some(category_name);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(short_description) = update.short_description {
            self.short_description = Some(short_description);
        }
        if let Some(is_published) = update.is_published {
            self.is_published = Some(is_published);
        }
        if let Some(attributes) = update.attributes {
            self.merge_attributes(attributes);
        }
    }

    /// Upsert attributes by `name_code`.
    fn merge_attributes(&mut self, incoming: Vec<Attribute>) {
        let mut merged = self.attributes.take().unwrap_or_default();
        for attribute in incoming {
            match merged
                .iter_mut()
                .find(|existing| existing.name_code == attribute.name_code)
            {
                Some(existing) => *existing = attribute,
                None => merged.push(attribute),
            }
        }
        self.attributes = Some(merged);
    }
}

/// DTO for creating a product (also the full-update shape).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(max = 64))]
    pub parent_sku: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 64))]
    pub category_code: String,
    pub category_name: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    pub short_description: Option<String>,
    pub is_published: bool,
    #[validate(nested)]
    pub attributes: Option<Vec<Attribute>>,
}

/// DTO for partially updating a product; only `sku` is required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(max = 64))]
    pub parent_sku: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub is_published: Option<bool>,
    #[validate(nested)]
    pub attributes: Option<Vec<Attribute>>,
}

/// DTO for deleting a product by sku.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteProduct {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
}

/// Query filters for listing products.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Filter by exact sku
    pub sku: Option<String>,
    /// Filter by category code
    pub category_code: Option<String>,
}

impl From<CreateProduct> for Product {
    fn from(input: CreateProduct) -> Self {
        Self {
            sku: input.sku,
            parent_sku: input.parent_sku,
            title: Some(input.title),
            category_code: Some(input.category_code),
            category_name: input.category_name,
            description: Some(input.description),
            short_description: input.short_description,
            is_published: Some(input.is_published),
            attributes: input.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(name_code: &str, value_code: &str) -> Attribute {
        Attribute {
            name_code: name_code.to_string(),
            name: None,
            value_code: value_code.to_string(),
            value: None,
        }
    }

    fn product() -> Product {
        Product {
            sku: "SKU-1".to_string(),
            parent_sku: None,
            title: Some("Shirt".to_string()),
            category_code: Some("apparel".to_string()),
            category_name: None,
            description: Some("A shirt".to_string()),
            short_description: None,
            is_published: Some(false),
            attributes: Some(vec![attribute("color", "red")]),
        }
    }

    fn empty_update(sku: &str) -> UpdateProduct {
        UpdateProduct {
            sku: sku.to_string(),
            parent_sku: None,
            title: None,
            category_code: None,
            category_name: None,
            description: None,
            short_description: None,
            is_published: None,
            attributes: None,
        }
    }

    #[test]
    fn test_apply_update_only_touches_provided_fields() {
        let mut product = product();
        let update = UpdateProduct {
            is_published: Some(true),
            ..empty_update("SKU-1")
        };

        product.apply_update(update);

        assert_eq!(product.is_published, Some(true));
        assert_eq!(product.title, Some("Shirt".to_string()));
        assert_eq!(product.attributes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_apply_update_merges_attributes_by_name_code() {
        let mut product = product();
        let update = UpdateProduct {
            attributes: Some(vec![attribute("color", "blue"), attribute("size", "m")]),
            ..empty_update("SKU-1")
        };

        product.apply_update(update);

        let attributes = product.attributes.unwrap();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].value_code, "blue");
        assert_eq!(attributes[1].name_code, "size");
    }

    #[test]
    fn test_create_dto_into_entity() {
        let input = CreateProduct {
            sku: "SKU-9".to_string(),
            parent_sku: None,
            title: "Socks".to_string(),
            category_code: "apparel".to_string(),
            category_name: None,
            description: "Warm socks".to_string(),
            short_description: None,
            is_published: true,
            attributes: None,
        };

        let product: Product = input.into();
        assert_eq!(product.sku, "SKU-9");
        assert_eq!(product.title, Some("Socks".to_string()));
        assert_eq!(product.is_published, Some(true));
    }

    #[test]
    fn test_create_dto_validation() {
        use validator::Validate;

        let input = CreateProduct {
            sku: "".to_string(),
            parent_sku: None,
            title: "Socks".to_string(),
            category_code: "apparel".to_string(),
            category_name: None,
            description: "Warm socks".to_string(),
            short_description: None,
            is_published: true,
            attributes: None,
        };

        assert!(input.validate().is_err());
    }
}
