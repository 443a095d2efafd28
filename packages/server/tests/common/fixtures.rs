//! Test fixtures: users with stable ages and known coordinates.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::{Days, Months, Utc};

use ember_core::domains::users::{Gender, NewUser, User};

use super::TestHarness;

static EMAIL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Coordinates reused by the radius tests: a requester in Kent and three
/// users within 100 km, plus one in Lagos, far outside any ring.
pub const KENT: (f64, f64) = (51.2725887, 0.5026768);
pub const SUSSEX: (f64, f64) = (50.96284649, -0.12981616);
pub const EAST_SUSSEX: (f64, f64) = (51.03052403, 0.18169958);
pub const MEDWAY: (f64, f64) = (51.31488722, 0.62093072);
pub const LAGOS: (f64, f64) = (6.524379, 3.379206);

impl TestHarness {
    /// Insert a user whose age is exactly `age` years today (with a month of
    /// slack so the assertion cannot drift mid-run).
    pub async fn create_user(
        &self,
        gender: Gender,
        age: u16,
        (latitude, longitude): (f64, f64),
    ) -> Result<User> {
        let n = EMAIL_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dob = Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(u32::from(age) * 12))
            .unwrap()
            .checked_sub_days(Days::new(30))
            .unwrap();

        let new_user = NewUser {
            email: format!("user{n}@ember.test"),
            password_hash: "not-a-real-hash".to_string(),
            name: format!("Test User {n}"),
            gender,
            dob,
            latitude,
            longitude,
        };

        let user = User::insert(&new_user, self.geo(), &self.db_pool).await?;
        Ok(user)
    }
}
