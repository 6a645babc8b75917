//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! All reads are served from in-memory stores; when a database pool is
//! configured, writes go through to Postgres and the stores are hydrated
//! from it on startup. The stores are therefore read-side projections of
//! the durable tables — in particular the banked balance is **never**
//! stored anywhere: it is recomputed by summing ledger entries on every
//! read, so a cached figure can never diverge from the append-only log.
//!
//! ## Locking
//!
//! Stores use `parking_lot::RwLock` and never hold a lock across an
//! `.await` point. The two banking write paths ([`AppState::record_deposit`]
//! and [`AppState::record_withdrawal`]) run validate-and-append under a
//! single write lock on the ledger store, closing the lost-update race
//! between reading the banked sum and appending the entry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fueleu_core::{Route, RouteId, ShipId, ValidationError};
use fueleu_engine::banking::{self, BankingError, CbSnapshot};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (`parking_lot`, not `tokio::sync`) —
/// locks are never held across `.await` points. `parking_lot::RwLock` is
/// non-poisonable, so a panicking writer does not permanently corrupt the
/// store.
#[derive(Debug)]
pub struct Store<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Store<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Retrieve a record by key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<V> {
        self.data.read().values().cloned().collect()
    }

    /// Check if a record exists.
    pub fn contains(&self, key: &K) -> bool {
        self.data.read().contains_key(key)
    }

    /// Run a closure under the store's write lock.
    ///
    /// This is the atomic read-validate-append primitive: the closure may
    /// inspect the full map, validate preconditions against it, and mutate
    /// it, all without another writer interleaving.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        f(&mut self.data.write())
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types -------------------------------------------------------------

/// Route catalog record (API-layer representation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRecord {
    /// Catalog identifier.
    pub route_id: String,
    /// Vessel type (e.g., "Container").
    pub vessel_type: String,
    /// Fuel type (e.g., "HFO").
    pub fuel_type: String,
    /// Reporting year.
    pub year: i32,
    /// Measured greenhouse-gas intensity, gCO₂e/MJ.
    pub ghg_intensity: f64,
    /// Fuel consumed, tonnes.
    pub fuel_consumption_t: f64,
    /// Route distance, km.
    pub distance_km: f64,
    /// Total emissions, tonnes CO₂e.
    pub total_emissions_t: f64,
    /// Whether this route is the designated baseline. At most one record
    /// in the catalog carries this flag.
    pub is_baseline: bool,
}

impl TryFrom<&RouteRecord> for Route {
    type Error = ValidationError;

    fn try_from(record: &RouteRecord) -> Result<Self, Self::Error> {
        Ok(Route {
            route_id: RouteId::new(record.route_id.clone())?,
            vessel_type: record.vessel_type.clone(),
            fuel_type: record.fuel_type.clone(),
            year: record.year,
            ghg_intensity: record.ghg_intensity,
            fuel_consumption_t: record.fuel_consumption_t,
            distance_km: record.distance_km,
            total_emissions_t: record.total_emissions_t,
            is_baseline: record.is_baseline,
        })
    }
}

/// A stored compliance snapshot: the computed CB/energy state of a ship's
/// reporting period. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotRecord {
    /// Snapshot identifier.
    pub id: Uuid,
    /// Ship the snapshot belongs to.
    pub ship_id: String,
    /// Route the snapshot was computed from, when known.
    pub route_id: Option<String>,
    /// Compliance year.
    pub year: i32,
    /// Signed carbon balance, gCO₂e.
    pub cb_gco2eq: f64,
    /// Energy of the period, MJ.
    pub energy_mj: f64,
    /// Target intensity used, gCO₂e/MJ.
    pub target_gco2eq_per_mj: f64,
    /// Actual intensity used, gCO₂e/MJ.
    pub actual_gco2eq_per_mj: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A banking ledger entry. Positive = deposit, negative = withdrawal.
/// Append-only: entries are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BankEntryRecord {
    /// Entry identifier.
    pub id: Uuid,
    /// Ship the entry belongs to.
    pub ship_id: String,
    /// Compliance year.
    pub year: i32,
    /// Signed CB amount, gCO₂e.
    pub amount_gco2eq: f64,
    /// Optional annotation.
    pub note: Option<String>,
    /// Creation time (also the entry's ordering within the log).
    pub created_at: DateTime<Utc>,
}

/// A member of a stored pool, with pre- and post-allocation balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PoolMemberRecord {
    /// The member ship.
    pub ship_id: String,
    /// Pre-pool carbon balance, gCO₂e.
    pub cb_before: f64,
    /// Post-pool carbon balance, gCO₂e.
    pub cb_after: f64,
}

/// A stored pool: one allocation run over a group of ships.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PoolRecord {
    /// Pool identifier.
    pub id: Uuid,
    /// Allocation year shared by all members.
    pub year: i32,
    /// Members with allocated balances.
    pub members: Vec<PoolMemberRecord>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

// -- Configuration ------------------------------------------------------------

/// Application configuration, read from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server binds to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: AppConfig,
    /// Route catalog, keyed by route id.
    pub routes: Store<String, RouteRecord>,
    /// Compliance snapshots.
    pub snapshots: Store<Uuid, SnapshotRecord>,
    /// Banking ledger entries (the append-only log).
    pub bank_entries: Store<Uuid, BankEntryRecord>,
    /// Stored pools.
    pub pools: Store<Uuid, PoolRecord>,
    /// Optional database pool. Absent = in-memory only.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Create application state with the given configuration and optional
    /// database pool.
    pub fn new(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            config,
            routes: Store::new(),
            snapshots: Store::new(),
            bank_entries: Store::new(),
            pools: Store::new(),
            db_pool,
        }
    }

    /// Create in-memory-only state with default configuration. Used by
    /// tests and development mode.
    pub fn in_memory() -> Self {
        Self::new(AppConfig::default(), None)
    }

    // -- route catalog --------------------------------------------------------

    /// The current baseline route, if one is designated.
    pub fn find_baseline(&self) -> Option<RouteRecord> {
        self.routes.list().into_iter().find(|r| r.is_baseline)
    }

    /// Designate `route_id` as the single baseline route.
    ///
    /// Clears any previously flagged route and sets the new one under one
    /// write lock, so at most one route ever carries the flag. Returns
    /// `false` if the route does not exist (and changes nothing).
    pub fn set_baseline(&self, route_id: &str) -> bool {
        self.routes.with_write(|map| {
            if !map.contains_key(route_id) {
                return false;
            }
            for record in map.values_mut() {
                record.is_baseline = false;
            }
            if let Some(record) = map.get_mut(route_id) {
                record.is_baseline = true;
            }
            true
        })
    }

    // -- compliance snapshots -------------------------------------------------

    /// The most recent snapshot for a `(ship, year)` pair.
    pub fn latest_snapshot(&self, ship_id: &str, year: i32) -> Option<SnapshotRecord> {
        self.snapshots
            .list()
            .into_iter()
            .filter(|s| s.ship_id == ship_id && s.year == year)
            .max_by_key(|s| s.created_at)
    }

    /// All snapshots for a `(ship, year)` pair, newest first.
    pub fn snapshots_for(&self, ship_id: &str, year: i32) -> Vec<SnapshotRecord> {
        let mut out: Vec<SnapshotRecord> = self
            .snapshots
            .list()
            .into_iter()
            .filter(|s| s.ship_id == ship_id && s.year == year)
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    // -- banking ledger -------------------------------------------------------

    /// The banked balance for a `(ship, year)` pair, recomputed from the
    /// append-only log. There is no cached sum to go stale.
    pub fn banked_sum(&self, ship_id: &str, year: i32) -> f64 {
        self.bank_entries
            .list()
            .iter()
            .filter(|e| e.ship_id == ship_id && e.year == year)
            .map(|e| e.amount_gco2eq)
            .sum()
    }

    /// All ledger entries for a `(ship, year)` pair, newest first.
    pub fn bank_entries_for(&self, ship_id: &str, year: i32) -> Vec<BankEntryRecord> {
        let mut out: Vec<BankEntryRecord> = self
            .bank_entries
            .list()
            .into_iter()
            .filter(|e| e.ship_id == ship_id && e.year == year)
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Validate and append a surplus deposit against the latest snapshot.
    ///
    /// The snapshot lookup happens first; the engine validation and the
    /// append run under the ledger store's write lock.
    pub fn record_deposit(
        &self,
        ship_id: &ShipId,
        year: i32,
        amount: f64,
    ) -> Result<BankEntryRecord, BankingError> {
        let snapshot = self.latest_snapshot(ship_id.as_str(), year).map(|s| CbSnapshot {
            cb_gco2eq: s.cb_gco2eq,
            energy_mj: s.energy_mj,
        });

        self.bank_entries.with_write(|map| {
            let entry = banking::bank_surplus(ship_id, year, amount, snapshot.as_ref())?;
            let record = BankEntryRecord {
                id: Uuid::new_v4(),
                ship_id: entry.ship_id.as_str().to_string(),
                year: entry.year,
                amount_gco2eq: entry.amount_gco2eq,
                note: entry.note,
                created_at: Utc::now(),
            };
            map.insert(record.id, record.clone());
            Ok(record)
        })
    }

    /// Validate and append a withdrawal of banked CB.
    ///
    /// The banked sum is computed and the entry appended under a single
    /// write lock, so concurrent withdrawals cannot both observe the same
    /// pre-withdrawal balance. Returns the appended record and the new
    /// banked sum.
    pub fn record_withdrawal(
        &self,
        ship_id: &ShipId,
        year: i32,
        amount: f64,
    ) -> Result<(BankEntryRecord, f64), BankingError> {
        self.bank_entries.with_write(|map| {
            let current_sum: f64 = map
                .values()
                .filter(|e| e.ship_id == ship_id.as_str() && e.year == year)
                .map(|e| e.amount_gco2eq)
                .sum();

            let withdrawal = banking::apply_banked(ship_id, year, amount, current_sum)?;
            let record = BankEntryRecord {
                id: Uuid::new_v4(),
                ship_id: withdrawal.entry.ship_id.as_str().to_string(),
                year: withdrawal.entry.year,
                amount_gco2eq: withdrawal.entry.amount_gco2eq,
                note: withdrawal.entry.note,
                created_at: Utc::now(),
            };
            map.insert(record.id, record.clone());
            Ok((record, withdrawal.new_banked_sum))
        })
    }

    // -- hydration ------------------------------------------------------------

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let routes = crate::db::routes::load_all(pool)
            .await
            .map_err(|e| format!("failed to load routes: {e}"))?;
        let route_count = routes.len();
        for record in routes {
            self.routes.insert(record.route_id.clone(), record);
        }

        let snapshots = crate::db::snapshots::load_all(pool)
            .await
            .map_err(|e| format!("failed to load snapshots: {e}"))?;
        let snapshot_count = snapshots.len();
        for record in snapshots {
            self.snapshots.insert(record.id, record);
        }

        let entries = crate::db::bank_entries::load_all(pool)
            .await
            .map_err(|e| format!("failed to load bank entries: {e}"))?;
        let entry_count = entries.len();
        for record in entries {
            self.bank_entries.insert(record.id, record);
        }

        let pools = crate::db::pools::load_all(pool)
            .await
            .map_err(|e| format!("failed to load pools: {e}"))?;
        let pool_count = pools.len();
        for record in pools {
            self.pools.insert(record.id, record);
        }

        tracing::info!(
            routes = route_count,
            snapshots = snapshot_count,
            bank_entries = entry_count,
            pools = pool_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_route(id: &str) -> RouteRecord {
        RouteRecord {
            route_id: id.to_string(),
            vessel_type: "Container".to_string(),
            fuel_type: "HFO".to_string(),
            year: 2024,
            ghg_intensity: 91.0,
            fuel_consumption_t: 5000.0,
            distance_km: 12_000.0,
            total_emissions_t: 18_500.0,
            is_baseline: false,
        }
    }

    fn sample_snapshot(ship: &str, cb: f64, at: DateTime<Utc>) -> SnapshotRecord {
        SnapshotRecord {
            id: Uuid::new_v4(),
            ship_id: ship.to_string(),
            route_id: Some(ship.to_string()),
            year: 2024,
            cb_gco2eq: cb,
            energy_mj: 205_000_000.0,
            target_gco2eq_per_mj: 89.3368,
            actual_gco2eq_per_mj: 91.0,
            created_at: at,
        }
    }

    // -- Store ----------------------------------------------------------------

    #[test]
    fn store_insert_get_list() {
        let store: Store<String, RouteRecord> = Store::new();
        assert!(store.is_empty());
        store.insert("R001".to_string(), sample_route("R001"));
        assert!(store.contains(&"R001".to_string()));
        assert_eq!(store.get(&"R001".to_string()).unwrap().route_id, "R001");
        assert_eq!(store.len(), 1);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn store_clone_shares_data() {
        let store: Store<String, RouteRecord> = Store::new();
        let clone = store.clone();
        store.insert("R001".to_string(), sample_route("R001"));
        assert!(clone.contains(&"R001".to_string()));
    }

    // -- baseline exclusivity -------------------------------------------------

    #[test]
    fn set_baseline_is_exclusive() {
        let state = AppState::in_memory();
        state.routes.insert("R001".to_string(), sample_route("R001"));
        state.routes.insert("R002".to_string(), sample_route("R002"));

        assert!(state.set_baseline("R001"));
        assert_eq!(state.find_baseline().unwrap().route_id, "R001");

        assert!(state.set_baseline("R002"));
        let flagged: Vec<RouteRecord> = state
            .routes
            .list()
            .into_iter()
            .filter(|r| r.is_baseline)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].route_id, "R002");
    }

    #[test]
    fn set_baseline_unknown_route_changes_nothing() {
        let state = AppState::in_memory();
        state.routes.insert("R001".to_string(), sample_route("R001"));
        state.set_baseline("R001");

        assert!(!state.set_baseline("R999"));
        assert_eq!(state.find_baseline().unwrap().route_id, "R001");
    }

    // -- snapshots ------------------------------------------------------------

    #[test]
    fn latest_snapshot_picks_newest() {
        let state = AppState::in_memory();
        let older = sample_snapshot("R001", 100.0, Utc::now() - chrono::Duration::hours(1));
        let newer = sample_snapshot("R001", 200.0, Utc::now());
        state.snapshots.insert(older.id, older);
        state.snapshots.insert(newer.id, newer.clone());

        let latest = state.latest_snapshot("R001", 2024).unwrap();
        assert_eq!(latest.id, newer.id);
        assert_eq!(latest.cb_gco2eq, 200.0);
        assert!(state.latest_snapshot("R001", 2025).is_none());
        assert!(state.latest_snapshot("R999", 2024).is_none());
    }

    // -- banking --------------------------------------------------------------

    #[test]
    fn banked_sum_recomputes_from_log() {
        let state = AppState::in_memory();
        let ship = ShipId::new("R001").unwrap();
        let snap = sample_snapshot("R001", 500_000.0, Utc::now());
        state.snapshots.insert(snap.id, snap);

        state.record_deposit(&ship, 2024, 300_000.0).unwrap();
        assert_eq!(state.banked_sum("R001", 2024), 300_000.0);

        let (entry, new_sum) = state.record_withdrawal(&ship, 2024, 120_000.0).unwrap();
        assert_eq!(entry.amount_gco2eq, -120_000.0);
        assert_eq!(new_sum, 180_000.0);
        // The advisory sum matches the re-derived one exactly.
        assert_eq!(state.banked_sum("R001", 2024), 180_000.0);
    }

    #[test]
    fn withdrawal_drains_to_exactly_zero() {
        let state = AppState::in_memory();
        let ship = ShipId::new("R001").unwrap();
        let snap = sample_snapshot("R001", 500_000.0, Utc::now());
        state.snapshots.insert(snap.id, snap);

        state.record_deposit(&ship, 2024, 250_000.0).unwrap();
        let (_, new_sum) = state.record_withdrawal(&ship, 2024, 250_000.0).unwrap();
        assert_eq!(new_sum, 0.0);

        // Nothing left to withdraw.
        assert!(matches!(
            state.record_withdrawal(&ship, 2024, 1.0),
            Err(BankingError::NoBankedBalance { .. })
        ));
    }

    #[test]
    fn deposit_without_snapshot_is_rejected_and_writes_nothing() {
        let state = AppState::in_memory();
        let ship = ShipId::new("R007").unwrap();
        assert!(matches!(
            state.record_deposit(&ship, 2024, 1.0),
            Err(BankingError::NoSnapshot { .. })
        ));
        assert!(state.bank_entries.is_empty());
    }

    #[test]
    fn ledger_is_scoped_per_ship_and_year() {
        let state = AppState::in_memory();
        let a = ShipId::new("A").unwrap();
        let b = ShipId::new("B").unwrap();
        let snap_a = sample_snapshot("A", 500_000.0, Utc::now());
        let snap_b = sample_snapshot("B", 500_000.0, Utc::now());
        state.snapshots.insert(snap_a.id, snap_a);
        state.snapshots.insert(snap_b.id, snap_b);

        state.record_deposit(&a, 2024, 100_000.0).unwrap();
        state.record_deposit(&b, 2024, 50_000.0).unwrap();

        assert_eq!(state.banked_sum("A", 2024), 100_000.0);
        assert_eq!(state.banked_sum("B", 2024), 50_000.0);
        assert_eq!(state.banked_sum("A", 2025), 0.0);
    }

    #[test]
    fn route_record_converts_to_domain_route() {
        let record = sample_route("R001");
        let route = Route::try_from(&record).unwrap();
        assert_eq!(route.route_id.as_str(), "R001");
        assert_eq!(route.ghg_intensity, 91.0);

        let mut bad = sample_route("R001");
        bad.route_id = String::new();
        assert!(Route::try_from(&bad).is_err());
    }
}
