//! MongoDB implementation of OfferRepository

use async_trait::async_trait;
use axum_helpers::PageRequest;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc, to_bson},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{OfferError, OfferResult};
use crate::models::{Offer, OfferFilter, Price};
use crate::repository::OfferRepository;

/// Key of the single counter document backing offer-id allocation.
const COUNTER_ID: &str = "offer_id";

/// Server error code for unique-constraint violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// The persisted counter record: `{id: "offer_id", sequence_value: N}`.
#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    id: String,
    sequence_value: i64,
}

/// One per-operation write failure, normalized from the driver.
///
/// The driver reports failures differently depending on the operation
/// shape (a list for insert-many, a single object for one-document
/// writes); [`normalize_write_errors`] folds both into this form.
#[derive(Debug, Clone)]
struct WriteFailureDetail {
    index: usize,
    code: i32,
    message: String,
}

/// MongoDB implementation of the OfferRepository
pub struct MongoOfferRepository {
    offers: Collection<Offer>,
    counters: Collection<Counter>,
}

impl MongoOfferRepository {
    /// Create a new MongoOfferRepository
    pub fn new(db: &Database) -> Self {
        Self {
            offers: db.collection::<Offer>("offers"),
            counters: db.collection::<Counter>("counters"),
        }
    }

    /// Initialize the unique indexes on sku and offer_id.
    pub async fn init_indexes(&self) -> OfferResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "sku": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_sku_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "offer_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_offer_id_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        self.offers.create_indexes(indexes).await?;
        tracing::info!("Offer indexes created successfully");
        Ok(())
    }

    /// Create the counter document if it does not exist yet.
    ///
    /// Provisioning step, run once at startup; the request path only
    /// ever increments.
    pub async fn init_counter(&self) -> OfferResult<()> {
        // The id comes from the equality filter on upsert; $setOnInsert
        // may only touch the remaining fields.
        self.counters
            .update_one(
                doc! { "id": COUNTER_ID },
                doc! { "$setOnInsert": { "sequence_value": 0_i64 } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    /// Allocate the next offer id.
    ///
    /// A single atomic increment-and-fetch against the counter
    /// document; concurrent callers can never observe the same value,
    /// and the counter advances even if the subsequent insert fails.
    async fn next_offer_id(&self) -> OfferResult<String> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "id": COUNTER_ID },
                doc! { "$inc": { "sequence_value": 1_i64 } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(OfferError::CounterNotInitialized)?;

        Ok(counter.sequence_value.to_string())
    }

    /// Build a MongoDB filter document from OfferFilter.
    ///
    /// Empty or whitespace-only values are dropped, so `?sku=` means
    /// "no filter".
    fn build_filter(filter: &OfferFilter) -> Document {
        let mut document = doc! {};

        if let Some(ref sku) = filter.sku {
            if !sku.trim().is_empty() {
                document.insert("sku", sku.clone());
            }
        }

        if let Some(ref offer_id) = filter.offer_id {
            if !offer_id.trim().is_empty() {
                document.insert("offer_id", offer_id.clone());
            }
        }

        document
    }

    /// Re-query which of the submitted skus currently exist, then raise
    /// the partitioned not-found error.
    async fn not_all_matched(&self, offers: &[Offer]) -> OfferError {
        let submitted: Vec<String> = offers.iter().map(|o| o.sku.clone()).collect();

        let existing: Vec<String> = match self
            .offers
            .find(doc! { "sku": { "$in": submitted.clone() } })
            .projection(doc! { "sku": 1, "_id": 0 })
            .await
        {
            Ok(cursor) => match cursor.try_collect::<Vec<Offer>>().await {
                Ok(found) => found.into_iter().map(|o| o.sku).collect(),
                Err(e) => return OfferError::Database(e.to_string()),
            },
            Err(e) => return OfferError::Database(e.to_string()),
        };

        let (skus_found, skus_not_found) = split_found_missing(&submitted, &existing);
        OfferError::NotFound {
            skus_not_found,
            skus_found,
        }
    }

    /// Run one update per submitted offer and enforce the
    /// all-matched/partitioned-error contract shared by full and
    /// partial updates. Duplicate-key detection takes precedence since
    /// it is raised from the write error itself.
    async fn update_batch(
        &self,
        offers: Vec<Offer>,
        build_update: fn(&Offer) -> Document,
    ) -> OfferResult<Vec<Offer>> {
        let mut matched: u64 = 0;

        for (index, offer) in offers.iter().enumerate() {
            let result = self
                .offers
                .update_one(doc! { "sku": offer.sku.clone() }, build_update(offer))
                .await
                .map_err(|e| classify_write_error(e, &offers, index))?;

            matched += result.matched_count;
        }

        if matched as usize != offers.len() {
            return Err(self.not_all_matched(&offers).await);
        }

        tracing::info!(matched, "Offers updated successfully");
        Ok(offers)
    }
}

#[async_trait]
impl OfferRepository for MongoOfferRepository {
    #[instrument(skip(self, offers), fields(batch = offers.len()))]
    async fn create(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>> {
        let mut offers = offers;

        // Allocate ids sequentially, in input order, before the batch
        // insert; a batch of N offers consumes N consecutive values.
        for offer in &mut offers {
            offer.offer_id = Some(self.next_offer_id().await?);
        }

        let result = self
            .offers
            .insert_many(&offers)
            .ordered(false)
            .await
            .map_err(|e| classify_insert_error(e, &offers))?;

        if result.inserted_ids.len() != offers.len() {
            return Err(OfferError::Database(format!(
                "Expected {} offers to be created but {} were",
                offers.len(),
                result.inserted_ids.len()
            )));
        }

        tracing::info!(created = offers.len(), "Offers created successfully");
        Ok(offers)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, filter: OfferFilter, page: PageRequest) -> OfferResult<Vec<Offer>> {
        let cursor = self
            .offers
            .find(Self::build_filter(&filter))
            .limit(page.limit as i64)
            .skip(page.offset)
            .await?;

        let offers: Vec<Offer> = cursor.try_collect().await?;
        Ok(offers)
    }

    #[instrument(skip(self, offers), fields(batch = offers.len()))]
    async fn update_full(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>> {
        self.update_batch(offers, full_update_document).await
    }

    #[instrument(skip(self, offers), fields(batch = offers.len()))]
    async fn update_partial(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>> {
        self.update_batch(offers, partial_update_document).await
    }

    #[instrument(skip(self, skus), fields(batch = skus.len()))]
    async fn delete(&self, skus: Vec<String>) -> OfferResult<u64> {
        let result = self
            .offers
            .delete_many(doc! { "sku": { "$in": skus.clone() } })
            .await?;

        tracing::info!(deleted = result.deleted_count, "Offers deleted");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: OfferFilter) -> OfferResult<u64> {
        let count = self
            .offers
            .count_documents(Self::build_filter(&filter))
            .await?;

        Ok(count)
    }
}

fn prices_to_bson(prices: &[Price]) -> Bson {
    to_bson(prices).unwrap_or_else(|_| Bson::Array(Vec::new()))
}

/// Full replacement: `is_published` and `prices` are written; an absent
/// price list is unset rather than left stale.
fn full_update_document(offer: &Offer) -> Document {
    match offer.prices {
        Some(ref prices) => doc! {
            "$set": {
                "is_published": offer.is_published.unwrap_or(false),
                "prices": prices_to_bson(prices),
            }
        },
        None => doc! {
            "$set": { "is_published": offer.is_published.unwrap_or(false) },
            "$unset": { "prices": "" },
        },
    }
}

/// Partial update: only provided fields are written.
fn partial_update_document(offer: &Offer) -> Document {
    let mut set = Document::new();

    if let Some(is_published) = offer.is_published {
        set.insert("is_published", is_published);
    }
    if let Some(ref prices) = offer.prices {
        set.insert("prices", prices_to_bson(prices));
    }
    if set.is_empty() {
        // The server rejects an empty $set; writing the sku to itself
        // keeps the matched count intact for a fields-less update.
        set.insert("sku", offer.sku.clone());
    }

    doc! { "$set": set }
}

/// Split the submitted skus into (found, not found) against the set the
/// store reported as existing. Every submitted sku lands in exactly one
/// of the two lists.
fn split_found_missing(submitted: &[String], existing: &[String]) -> (Vec<String>, Vec<String>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for sku in submitted {
        if existing.contains(sku) {
            found.push(sku.clone());
        } else {
            missing.push(sku.clone());
        }
    }

    (found, missing)
}

/// Normalize the driver's write-error shapes into a flat list.
///
/// Insert-many failures carry a list of per-operation errors; a
/// one-document write carries a single failure object with no index, so
/// `single_index` pins it to the operation that was running.
fn normalize_write_errors(
    error: &mongodb::error::Error,
    single_index: usize,
) -> Vec<WriteFailureDetail> {
    match *error.kind {
        ErrorKind::InsertMany(ref failure) => failure
            .write_errors
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|write_error| WriteFailureDetail {
                index: write_error.index,
                code: write_error.code,
                message: write_error.message,
            })
            .collect(),
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => vec![WriteFailureDetail {
            index: single_index,
            code: write_error.code,
            message: write_error.message.clone(),
        }],
        _ => Vec::new(),
    }
}

/// Partition duplicate-key failures by the violated field, attributing
/// each failure back to the submitted document by operation index.
fn partition_duplicate_keys(
    failures: &[WriteFailureDetail],
    offers: &[Offer],
) -> (Vec<String>, Vec<String>) {
    let mut skus = Vec::new();
    let mut offer_ids = Vec::new();

    for failure in failures {
        if failure.code != DUPLICATE_KEY_CODE {
            continue;
        }
        let Some(offer) = offers.get(failure.index) else {
            continue;
        };

        if failure.message.contains("offer_id") {
            if let Some(ref offer_id) = offer.offer_id {
                offer_ids.push(offer_id.clone());
            }
        } else if failure.message.contains("sku") {
            skus.push(offer.sku.clone());
        }
    }

    (skus, offer_ids)
}

/// Translate an insert-many error, raising the partitioned conflict
/// when any duplicate keys are present.
fn classify_insert_error(error: mongodb::error::Error, offers: &[Offer]) -> OfferError {
    let failures = normalize_write_errors(&error, 0);
    let (skus, offer_ids) = partition_duplicate_keys(&failures, offers);

    if !skus.is_empty() || !offer_ids.is_empty() {
        return OfferError::AlreadyExists { skus, offer_ids };
    }

    OfferError::Database(format!("Failed to create offers: {}", error))
}

/// Translate a single update error within a batch, keeping duplicate
/// keys distinguishable from generic failures.
fn classify_write_error(
    error: mongodb::error::Error,
    offers: &[Offer],
    index: usize,
) -> OfferError {
    let failures = normalize_write_errors(&error, index);
    let (skus, offer_ids) = partition_duplicate_keys(&failures, offers);

    if !skus.is_empty() || !offer_ids.is_empty() {
        return OfferError::AlreadyExists { skus, offer_ids };
    }

    OfferError::Database(format!("Failed to update offers: {}", error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, PriceType};

    fn offer(sku: &str, offer_id: Option<&str>) -> Offer {
        Offer {
            offer_id: offer_id.map(String::from),
            sku: sku.to_string(),
            is_published: Some(true),
            prices: None,
        }
    }

    fn dup_failure(index: usize, message: &str) -> WriteFailureDetail {
        WriteFailureDetail {
            index,
            code: DUPLICATE_KEY_CODE,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_build_filter_empty() {
        let document = MongoOfferRepository::build_filter(&OfferFilter::default());
        assert!(document.is_empty());
    }

    #[test]
    fn test_build_filter_drops_blank_values() {
        let filter = OfferFilter {
            sku: Some("  ".to_string()),
            offer_id: Some("".to_string()),
        };
        let document = MongoOfferRepository::build_filter(&filter);
        assert!(document.is_empty());
    }

    #[test]
    fn test_build_filter_with_values() {
        let filter = OfferFilter {
            sku: Some("SKU-1".to_string()),
            offer_id: Some("7".to_string()),
        };
        let document = MongoOfferRepository::build_filter(&filter);
        assert_eq!(document.get_str("sku").unwrap(), "SKU-1");
        assert_eq!(document.get_str("offer_id").unwrap(), "7");
    }

    #[test]
    fn test_split_found_missing_partitions_every_sku() {
        let submitted = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let existing = vec!["A".to_string(), "B".to_string()];

        let (found, missing) = split_found_missing(&submitted, &existing);

        assert_eq!(found, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(missing, vec!["C".to_string()]);
        assert_eq!(found.len() + missing.len(), submitted.len());
    }

    #[test]
    fn test_split_found_missing_total_failure() {
        let submitted = vec!["A".to_string()];
        let (found, missing) = split_found_missing(&submitted, &[]);

        assert!(found.is_empty());
        assert_eq!(missing, submitted);
    }

    #[test]
    fn test_partition_duplicate_keys_by_violated_field() {
        let offers = vec![offer("A", Some("6")), offer("B", Some("7"))];
        let failures = vec![
            dup_failure(0, "E11000 duplicate key error collection: catalog.offers index: idx_sku_unique dup key: { sku: \"A\" }"),
            dup_failure(1, "E11000 duplicate key error collection: catalog.offers index: idx_offer_id_unique dup key: { offer_id: \"7\" }"),
        ];

        let (skus, offer_ids) = partition_duplicate_keys(&failures, &offers);

        assert_eq!(skus, vec!["A".to_string()]);
        assert_eq!(offer_ids, vec!["7".to_string()]);
    }

    #[test]
    fn test_partition_duplicate_keys_ignores_other_codes() {
        let offers = vec![offer("A", None)];
        let failures = vec![WriteFailureDetail {
            index: 0,
            code: 2,
            message: "bad value for sku".to_string(),
        }];

        let (skus, offer_ids) = partition_duplicate_keys(&failures, &offers);
        assert!(skus.is_empty());
        assert!(offer_ids.is_empty());
    }

    #[test]
    fn test_partition_duplicate_keys_single_failure_object() {
        // The single-object shape is normalized to a one-element list
        // with the caller-supplied index.
        let offers = vec![offer("A", Some("6")), offer("B", Some("7"))];
        let failures = vec![dup_failure(1, "index: idx_sku_unique dup key")];

        let (skus, offer_ids) = partition_duplicate_keys(&failures, &offers);
        assert_eq!(skus, vec!["B".to_string()]);
        assert!(offer_ids.is_empty());
    }

    #[test]
    fn test_full_update_document_unsets_absent_prices() {
        let document = full_update_document(&offer("A", None));
        assert!(document.contains_key("$unset"));
        assert!(
            document
                .get_document("$set")
                .unwrap()
                .contains_key("is_published")
        );
    }

    #[test]
    fn test_full_update_document_replaces_prices() {
        let mut subject = offer("A", None);
        subject.prices = Some(vec![Price {
            currency: Currency::Clp,
            kind: PriceType::Original,
            value: 100.0,
        }]);

        let document = full_update_document(&subject);
        assert!(!document.contains_key("$unset"));
        assert!(document.get_document("$set").unwrap().contains_key("prices"));
    }

    #[test]
    fn test_partial_update_document_only_sets_provided() {
        let mut subject = offer("A", None);
        subject.is_published = Some(false);
        subject.prices = None;

        let set = partial_update_document(&subject);
        let set = set.get_document("$set").unwrap();
        assert!(set.contains_key("is_published"));
        assert!(!set.contains_key("prices"));
    }

    #[test]
    fn test_partial_update_document_never_empty() {
        let subject = Offer::from_sku("A");
        let document = partial_update_document(&subject);
        assert!(!document.get_document("$set").unwrap().is_empty());
    }
}
