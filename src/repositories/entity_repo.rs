//! Generic list/get/add/update/delete accessors for one table.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::backend::{Backend, BackendResponse, Query};
use crate::cache::{QueryCache, QueryKey};
use crate::error::{AppError, AppResult};
use crate::models::{Record, Table};

/// Accessors for the table behind `R`.
///
/// Holds the shared backend handle and query cache; cloning is cheap.
pub struct EntityRepository<R: Record> {
    backend: Arc<dyn Backend>,
    cache: QueryCache,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for EntityRepository<R> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: self.cache.clone(),
            _record: PhantomData,
        }
    }
}

/// Collapse a `{data, error}` response into the payload or the backend's
/// message. The payload is passed through untouched.
pub fn from_backend(response: BackendResponse) -> AppResult<Value> {
    match response.error {
        Some(failure) => Err(AppError::Backend {
            message: failure.message,
        }),
        None => Ok(response.data.unwrap_or(Value::Null)),
    }
}

impl<R: Record> EntityRepository<R> {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        Self {
            backend,
            cache,
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> Table {
        R::TABLE
    }

    async fn run(&self, query: Query) -> AppResult<Value> {
        let operation = query.operation.name();
        tracing::debug!(table = %R::TABLE, operation, backend = self.backend.name(), "executing query");

        let result = from_backend(self.backend.execute(query).await);
        if let Err(ref e) = result {
            tracing::warn!(table = %R::TABLE, operation, error = %e, "backend operation failed");
        }
        result
    }

    fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
        serde_json::from_value(value).map_err(|e| AppError::Payload {
            table: R::TABLE.to_string(),
            message: e.to_string(),
        })
    }

    fn encode<T: Serialize>(payload: &T) -> AppResult<Value> {
        serde_json::to_value(payload).map_err(|e| AppError::Payload {
            table: R::TABLE.to_string(),
            message: e.to_string(),
        })
    }

    /// All rows, in the order the server returns them.
    pub async fn list(&self) -> AppResult<Vec<R>> {
        let key = QueryKey::List(R::TABLE);
        if let Some(cached) = self.cache.get(&key) {
            return Self::decode(cached);
        }

        let data = self.run(Query::select(R::TABLE)).await?;
        let rows = Self::decode(data.clone())?;
        self.cache.put(key, data);
        Ok(rows)
    }

    /// The single row with `id`. Zero or several matches is an error
    /// reported by the store.
    pub async fn get(&self, id: i64) -> AppResult<R> {
        if let Some(cached) = self.cache.get(&QueryKey::Row(R::TABLE, id)) {
            return Self::decode(cached);
        }
        self.refresh(id).await
    }

    /// Re-read the row with `id` from the store, replacing its cache entry.
    pub async fn refresh(&self, id: i64) -> AppResult<R> {
        let data = self
            .run(Query::select(R::TABLE).eq("id", id).single())
            .await?;
        let row = Self::decode(data.clone())?;
        self.cache.put(QueryKey::Row(R::TABLE, id), data);
        Ok(row)
    }

    /// Insert one row and return it as stored, with its server-assigned id.
    pub async fn add(&self, new: R::New) -> AppResult<R> {
        new.validate()?;
        let body = Self::encode(&new)?;

        let data = self.run(Query::insert(R::TABLE, vec![body])).await?;
        self.cache.invalidate(R::TABLE);

        let rows: Vec<R> = Self::decode(data)?;
        rows.into_iter().next().ok_or_else(|| AppError::Payload {
            table: R::TABLE.to_string(),
            message: "insert returned no rows".to_string(),
        })
    }

    /// Write exactly the keys `changes` serializes to the row with `id`.
    ///
    /// Returns the rows the store reports as updated; an unknown id yields
    /// an empty list, not an error. A payload that writes no column is
    /// rejected without a request.
    pub async fn update(&self, id: i64, changes: R::Changes) -> AppResult<Vec<R>> {
        changes.validate()?;
        let body = Self::encode(&changes)?;
        if body.as_object().is_some_and(|columns| columns.is_empty()) {
            return Err(AppError::validation(
                "payload",
                "Update payload has no columns to write",
            ));
        }

        let data = self
            .run(Query::update(R::TABLE, body).eq("id", id))
            .await?;
        self.cache.invalidate(R::TABLE);

        Self::decode(data)
    }

    /// Delete the row with `id`, returning the deleted rows.
    pub async fn delete(&self, id: i64) -> AppResult<Vec<R>> {
        let data = self.run(Query::delete(R::TABLE).eq("id", id)).await?;
        self.cache.invalidate(R::TABLE);

        Self::decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, Operation, SINGLE_ROW_VIOLATION};
    use crate::config::settings::CacheConfig;
    use crate::models::{
        Customer, Estimate, EstimateFields, JsonColumn, LineItem, NewCustomer,
        NewPreConfiguredFloorJob, NewPreConfiguredJob, NewPreConfiguredRoofJob, NewUser,
        PartAmounts, PreConfiguredFloorJob, PreConfiguredJob, PreConfiguredRoofJob, Role,
        UpdateCustomer, UpdatePreConfiguredJob, User,
    };
    use serde_json::json;
    use std::fmt::Debug;

    fn setup<R: Record>() -> (Arc<InMemoryBackend>, QueryCache, EntityRepository<R>) {
        let backend = Arc::new(InMemoryBackend::new());
        let cache = QueryCache::new(CacheConfig::default());
        let repo = EntityRepository::new(backend.clone(), cache.clone());
        (backend, cache, repo)
    }

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            address: "12 Dock Rd".to_string(),
            phone: "555-0100".to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
        }
    }

    /// Add `new`, read it back by id and through `list`, and return the row.
    async fn assert_round_trip<R>(new: R::New) -> R
    where
        R: Record + PartialEq + Debug,
    {
        let (_, _, repo) = setup::<R>();
        let created = repo.add(new).await.unwrap();
        assert!(created.id() > 0);

        let fetched = repo.get(created.id()).await.unwrap();
        assert_eq!(fetched, created);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        created
    }

    fn part_amounts(entries: &[(&str, f64)]) -> PartAmounts {
        entries.iter().map(|(name, amount)| (name.to_string(), *amount)).collect()
    }

    #[tokio::test]
    async fn test_pre_configured_job_round_trips() {
        let job = assert_round_trip::<PreConfiguredJob>(NewPreConfiguredJob {
            job_code: "RF-100".into(),
            job_type: "roof".into(),
            parts: Some(part_amounts(&[("membrane", 2.0), ("vent", 1.0)])),
            prices: Some(part_amounts(&[("membrane", 150.0), ("vent", 35.5)])),
            labor_hour_rates: Some(100.0),
            labor_hours: Some(3.0),
            sublet_costs: Some(20.0),
            shop_supplies: Some(12.0),
            taxes: Some(8.5),
            job_totals: Some(676.0),
        })
        .await;

        assert_eq!(job.job_type, "roof");
        assert_eq!(job.parts, Some(JsonColumn::Typed(part_amounts(&[("membrane", 2.0), ("vent", 1.0)]))));
        assert_eq!(job.labor_hour_rates, Some(100.0));
        assert_eq!(job.job_totals, Some(676.0));
        assert_eq!(job.computed_total(), 676.0);
    }

    #[tokio::test]
    async fn test_floor_job_round_trips() {
        let job = assert_round_trip::<PreConfiguredFloorJob>(NewPreConfiguredFloorJob {
            job_code: "FL-7".into(),
            parts: Some(part_amounts(&[("plywood", 4.0)])),
            prices: Some(part_amounts(&[("plywood", 42.0)])),
            labor_hours: Some(6.0),
            sublet_costs: None,
            shop_supplies: Some(15.0),
            taxes: Some(9.0),
            job_totals: None,
        })
        .await;

        assert_eq!(job.job_code, "FL-7");
        assert_eq!(job.labor_hours, Some(6.0));
        assert!(job.sublet_costs.is_none());
        assert_eq!(job.computed_total(), 192.0);
    }

    #[tokio::test]
    async fn test_roof_job_round_trips() {
        let job = assert_round_trip::<PreConfiguredRoofJob>(NewPreConfiguredRoofJob {
            job_code: "RF-9".into(),
            parts: None,
            prices: Some(part_amounts(&[("sealant", 18.25)])),
            labor_hours: None,
            sublet_costs: Some(250.0),
            shop_supplies: None,
            taxes: None,
            job_totals: Some(250.0),
        })
        .await;

        assert!(job.parts.is_none());
        assert_eq!(job.prices, Some(JsonColumn::Typed(part_amounts(&[("sealant", 18.25)]))));
        assert_eq!(job.computed_total(), 250.0);
    }

    #[tokio::test]
    async fn test_user_round_trips() {
        let user = assert_round_trip::<User>(NewUser {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            role: Role::Advisor,
            dealership: "North Lot".into(),
        })
        .await;

        assert_eq!(user.role, Role::Advisor);
        assert_eq!(user.dealership, "North Lot");
    }

    #[tokio::test]
    async fn test_add_then_get_round_trips() {
        let (_, _, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Ann");
        assert_eq!(fetched.address, "12 Dock Rd");
        assert_eq!(fetched.email.as_deref(), Some("ann@example.com"));
    }

    #[tokio::test]
    async fn test_estimate_round_trips_line_items() {
        let (_, _, repo) = setup::<Estimate>();
        let fields = EstimateFields {
            customer_id: Some(Some(999)),
            job_code: Some(Some("RF-100".into())),
            roof_kit: Some(Some(vec![LineItem::new("membrane", 2.0, 150.0)])),
            labor: Some(Some(vec![LineItem::new("install", 4.0, 95.0)])),
            estimate_date: Some(Some("2024-05-01T10:00:00Z".parse().unwrap())),
            ..Default::default()
        };
        let created = repo.add(fields.clone()).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();

        assert_eq!(fetched.customer_id, Some(999));
        assert_eq!(
            fetched.roof_kit,
            Some(JsonColumn::Typed(vec![LineItem::new("membrane", 2.0, 150.0)]))
        );
        assert_eq!(fetched.estimate_date, fields.estimate_date.flatten());
        assert_eq!(fetched.line_items_total(), 680.0);
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache_until_mutation() {
        let (backend, _, repo) = setup::<Customer>();
        backend.seed(Table::Customers, [json!({"name": "A", "address": "x", "phone": "1"})]);

        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert_eq!(backend.call_count(Table::Customers, "select"), 1);

        repo.add(new_customer("Bo")).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(backend.call_count(Table::Customers, "select"), 2);
    }

    #[tokio::test]
    async fn test_update_refreshes_list_but_row_read_stays_stale() {
        let (backend, cache, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        repo.get(created.id).await.unwrap();
        repo.list().await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateCustomer {
                    phone: Some("555-0199".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].phone, "555-0199");

        assert!(!cache.contains(&QueryKey::List(Table::Customers)));
        assert!(cache.contains(&QueryKey::Row(Table::Customers, created.id)));

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].phone, "555-0199");

        // Row key was not invalidated: the old value is still served
        let stale = repo.get(created.id).await.unwrap();
        assert_eq!(stale.phone, "555-0100");

        let fresh = repo.refresh(created.id).await.unwrap();
        assert_eq!(fresh.phone, "555-0199");
        assert_eq!(repo.get(created.id).await.unwrap().phone, "555-0199");
        assert_eq!(backend.rows(Table::Customers)[0]["phone"], "555-0199");
    }

    #[tokio::test]
    async fn test_update_forwards_only_given_keys() {
        let (backend, _, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        repo.update(
            created.id,
            UpdateCustomer {
                name: Some("Annie".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let calls = backend.calls();
        let update = calls.last().unwrap();
        assert_eq!(update.operation, Operation::Update { values: json!({"name": "Annie"}) });
        assert_eq!(update.filters, vec![crate::backend::Filter::Eq { column: "id".into(), value: json!(created.id) }]);
    }

    #[tokio::test]
    async fn test_delete_then_get_fails_with_single_row_error() {
        let (_, cache, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted.len(), 1);

        // Nothing cached for this row yet, so the read reaches the store
        let err = repo.get(created.id).await.unwrap_err();
        assert!(err.is_backend());
        assert_eq!(err.to_string(), SINGLE_ROW_VIOLATION);
        assert!(!cache.contains(&QueryKey::Row(Table::Customers, created.id)));
    }

    #[tokio::test]
    async fn test_backend_error_on_mutation_keeps_list_cached() {
        let (backend, cache, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        repo.list().await.unwrap();
        let list_key = QueryKey::List(Table::Customers);

        backend.fail_next("permission denied for table customers");
        let err = repo.add(new_customer("Bo")).await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table customers");
        assert!(cache.contains(&list_key));

        backend.fail_next("row is locked");
        let err = repo
            .update(
                created.id,
                UpdateCustomer {
                    name: Some("Annie".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "row is locked");
        assert!(cache.contains(&list_key));

        backend.fail_next("connection reset");
        repo.delete(created.id).await.unwrap_err();
        assert!(cache.contains(&list_key));
        assert_eq!(backend.rows(Table::Customers).len(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_on_read_is_not_cached() {
        let (backend, cache, repo) = setup::<Customer>();
        backend.fail_next("JWT expired");
        let err = repo.list().await.unwrap_err();
        assert_eq!(err.to_string(), "JWT expired");
        assert!(!cache.contains(&QueryKey::List(Table::Customers)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_backend() {
        let (backend, _, repo) = setup::<PreConfiguredRoofJob>();
        let err = repo
            .add(NewPreConfiguredRoofJob {
                job_code: "".into(),
                parts: None,
                prices: None,
                labor_hours: None,
                sublet_costs: None,
                shop_supplies: None,
                taxes: None,
                job_totals: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationErrors { .. }));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_job_code_surfaces_backend_message() {
        let (_, _, repo) = setup::<PreConfiguredJob>();
        let job = NewPreConfiguredJob {
            job_code: "RF-1".into(),
            job_type: "roof".into(),
            parts: Some(PartAmounts::from([("membrane".to_string(), 1.0)])),
            prices: None,
            labor_hour_rates: None,
            labor_hours: None,
            sublet_costs: None,
            shop_supplies: None,
            taxes: None,
            job_totals: None,
        };
        let created = repo.add(job.clone()).await.unwrap();
        assert_eq!(created.job_type, "roof");

        let err = repo.add(job).await.unwrap_err();
        assert!(err.is_backend());
        assert!(err.to_string().contains("duplicate key value"));

        let updated = repo
            .update(
                created.id,
                UpdatePreConfiguredJob {
                    labor_hours: Some(Some(2.5)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated[0].labor_hours, Some(2.5));
        assert_eq!(updated[0].job_code, "RF-1");
    }

    #[tokio::test]
    async fn test_update_can_clear_nullable_column() {
        let (backend, _, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        assert!(created.email.is_some());

        let updated = repo
            .update(
                created.id,
                UpdateCustomer {
                    email: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated[0].email.is_none());
        assert_eq!(backend.rows(Table::Customers)[0]["email"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_with_no_columns_is_rejected_before_any_request() {
        let (backend, _, repo) = setup::<Customer>();
        let created = repo.add(new_customer("Ann")).await.unwrap();
        let calls_before = backend.calls().len();

        let err = repo
            .update(created.id, UpdateCustomer::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "payload"));
        assert_eq!(backend.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_no_rows() {
        let (_, _, repo) = setup::<Customer>();
        let updated = repo
            .update(77, UpdateCustomer { name: Some("Ghost".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(updated.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_refetches() {
        let backend = Arc::new(InMemoryBackend::new());
        let repo: EntityRepository<Customer> =
            EntityRepository::new(backend.clone(), QueryCache::disabled());
        repo.list().await.unwrap();
        repo.list().await.unwrap();
        assert_eq!(backend.call_count(Table::Customers, "select"), 2);
    }

    #[test]
    fn test_from_backend_discards_data_on_error() {
        let response = BackendResponse {
            data: Some(json!([{"id": 1}])),
            error: Some(crate::backend::BackendFailure::new("nope")),
        };
        let err = from_backend(response).unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
