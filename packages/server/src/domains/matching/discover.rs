//! Candidate discovery: demographic + spatial + popularity filtering.

use chrono::Utc;

use crate::common::CoreError;
use crate::domains::matching::filter::CandidateFilter;
use crate::domains::users::User;
use crate::kernel::{GeoIndex, ServerDeps};

pub struct DiscoveryEngine {
    pool: sqlx::PgPool,
    geo: GeoIndex,
    default_min_age: u16,
    default_max_age: u16,
    page_size: i64,
}

impl DiscoveryEngine {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            pool: deps.db_pool.clone(),
            geo: deps.geo,
            default_min_age: deps.config.discovery_min_age,
            default_max_age: deps.config.discovery_max_age,
            page_size: i64::from(deps.config.discovery_page_size),
        }
    }

    /// Fetch a page of candidates for `requester_id`.
    ///
    /// The requester is always excluded. Age criteria resolve to an
    /// inclusive date-of-birth window (one-sided filters are completed with
    /// the configured bounds). A supplied gender filters to exactly that
    /// gender; no default-opposite heuristic is applied here. A positive
    /// radius restricts candidates to the cells within the matching ring
    /// count of the requester's cell. Everything is one compound query,
    /// ordered by likes received (descending) and capped at the page size.
    /// No matching candidates is an empty list, not an error.
    pub async fn fetch_candidates(
        &self,
        requester_id: i64,
        filter: &CandidateFilter,
    ) -> Result<Vec<User>, CoreError> {
        filter.validate()?;

        let requester = User::find_by_id(requester_id, &self.pool)
            .await?
            .ok_or(CoreError::UserNotFound)?;

        let dob_range = filter.dob_window(
            Utc::now().date_naive(),
            self.default_min_age,
            self.default_max_age,
        );

        let cells = match filter.positive_radius_km() {
            Some(radius_km) => {
                let rings = self.geo.ring_count(radius_km);
                let cells = self.geo.cells_within_rings(requester.h3_cell, rings)?;
                tracing::debug!(
                    requester_id,
                    radius_km,
                    rings,
                    cell_count = cells.len(),
                    "resolved spatial filter"
                );
                Some(cells)
            }
            None => None,
        };

        let candidates = User::find_candidates(
            requester.id,
            dob_range,
            filter.gender,
            cells,
            self.page_size,
            &self.pool,
        )
        .await
        .map_err(|e| CoreError::wrap("fetch candidates failed", e))?;

        tracing::info!(
            requester_id,
            count = candidates.len(),
            "discovery page fetched"
        );
        Ok(candidates)
    }
}
