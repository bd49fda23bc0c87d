use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Supported price currencies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    Clp,
    Pe,
    Usd,
    Eur,
}

/// Price classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PriceType {
    Original,
    Discount,
    Promotion,
}

/// Price value object.
///
/// Values are truncated (not rounded) to two decimals at the request
/// boundary; the wire field for the classification is `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Price {
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: PriceType,
    #[validate(range(min = 0.0))]
    pub value: f64,
}

impl Price {
    /// Truncate the value to two decimals, mirroring the boundary rule.
    pub fn truncated(mut self) -> Self {
        self.value = (self.value * 100.0).trunc() / 100.0;
        self
    }
}

/// Offer entity, identified by sku plus a server-generated offer id.
///
/// The `offer_id` is absent until the repository allocates one from the
/// shared counter during creation. This struct doubles as the MongoDB
/// document shape: absent optional fields are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Offer {
    /// Server-generated, monotonically increasing id (decimal string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    /// Product sku this offer belongs to
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
}

impl Offer {
    /// Offer carrying only its sku, used for deletion requests.
    pub fn from_sku(sku: impl Into<String>) -> Self {
        Self {
            offer_id: None,
            sku: sku.into(),
            is_published: None,
            prices: None,
        }
    }
}

/// DTO for creating an offer (also the full-update shape).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOffer {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub is_published: bool,
    #[validate(nested)]
    pub prices: Option<Vec<Price>>,
}

/// DTO for partially updating an offer; only `sku` is required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOffer {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub is_published: Option<bool>,
    #[validate(nested)]
    pub prices: Option<Vec<Price>>,
}

/// DTO for deleting an offer by sku.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteOffer {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
}

/// Query filters for listing offers.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct OfferFilter {
    /// Filter by exact sku
    pub sku: Option<String>,
    /// Filter by offer id
    pub offer_id: Option<String>,
}

impl From<CreateOffer> for Offer {
    fn from(input: CreateOffer) -> Self {
        Self {
            offer_id: None,
            sku: input.sku,
            is_published: Some(input.is_published),
            prices: input
                .prices
                .map(|prices| prices.into_iter().map(Price::truncated).collect()),
        }
    }
}

impl From<UpdateOffer> for Offer {
    fn from(input: UpdateOffer) -> Self {
        Self {
            offer_id: None,
            sku: input.sku,
            is_published: input.is_published,
            prices: input
                .prices
                .map(|prices| prices.into_iter().map(Price::truncated).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_price_truncates_to_two_decimals() {
        let price = Price {
            currency: Currency::Clp,
            kind: PriceType::Original,
            value: 10.999,
        }
        .truncated();

        assert_eq!(price.value, 10.99);
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let price = Price {
            currency: Currency::Usd,
            kind: PriceType::Discount,
            value: -1.0,
        };

        assert!(price.validate().is_err());
    }

    #[test]
    fn test_price_type_serializes_as_type_field() {
        let price = Price {
            currency: Currency::Eur,
            kind: PriceType::Promotion,
            value: 7.5,
        };

        let value = serde_json::to_value(&price).unwrap();
        assert_eq!(value["type"], "PROMOTION");
        assert_eq!(value["currency"], "EUR");
    }

    #[test]
    fn test_offer_serialization_skips_absent_fields() {
        let offer = Offer::from_sku("SKU-1");
        let value = serde_json::to_value(&offer).unwrap();

        assert!(value.get("offer_id").is_none());
        assert!(value.get("prices").is_none());
        assert_eq!(value["sku"], "SKU-1");
    }

    #[test]
    fn test_create_offer_into_entity_truncates_prices() {
        let input = CreateOffer {
            sku: "SKU-1".to_string(),
            is_published: true,
            prices: Some(vec![Price {
                currency: Currency::Clp,
                kind: PriceType::Original,
                value: 10000.555,
            }]),
        };

        let offer: Offer = input.into();
        assert_eq!(offer.is_published, Some(true));
        assert_eq!(offer.prices.unwrap()[0].value, 10000.55);
        assert!(offer.offer_id.is_none());
    }
}
