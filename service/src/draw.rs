//! Winner selection over a directory snapshot.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;

pub use raffle_draw::DrawError;

use crate::directory::CanonicalMember;

/// The ordered result of one draw. The first winner is the headline winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSet {
    pub winners: Vec<CanonicalMember>,
    /// Number of distinct members drawn from
    pub total: usize,
    /// Count asked for by the caller, before clamping
    pub requested: i64,
    pub drawn_at: DateTime<Utc>,
}

impl WinnerSet {
    /// Draw up to `requested` members from `members` using `rng`.
    ///
    /// Repeated ids count once; the first occurrence is the one drawn.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::EmptyPool`] if `members` is empty.
    pub fn draw<R: Rng + ?Sized>(
        members: &[CanonicalMember],
        requested: i64,
        rng: &mut R,
    ) -> Result<Self, DrawError> {
        let mut seen = HashSet::with_capacity(members.len());
        let pool: Vec<&CanonicalMember> = members
            .iter()
            .filter(|m| seen.insert(m.id.as_str()))
            .collect();
        if pool.len() < members.len() {
            tracing::debug!(
                dropped = members.len() - pool.len(),
                "dropping duplicate member ids before draw"
            );
        }

        let winners = raffle_draw::draw(&pool, requested, rng)?
            .into_iter()
            .cloned()
            .collect();
        Ok(Self {
            winners,
            total: pool.len(),
            requested,
            drawn_at: Utc::now(),
        })
    }

    /// Number of winners actually drawn.
    #[must_use]
    pub fn count(&self) -> usize {
        self.winners.len()
    }

    #[must_use]
    pub fn headline(&self) -> Option<&CanonicalMember> {
        self.winners.first()
    }
}
