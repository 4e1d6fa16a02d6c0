//! The pool of staff members records are attributed to.

use crate::sampling::fresh_id;
use crate::{GeneratorError, GeneratorResult};
use fhir::datatypes::StaffMember;
use rand::Rng;

/// A non-empty, ordered set of staff. Member `i` is named `Staff Member {i + 1}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffPool {
    members: Vec<StaffMember>,
}

impl StaffPool {
    /// Build a pool from known ids.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::EmptyStaffPool`] when `ids` is empty.
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> GeneratorResult<Self> {
        let members: Vec<StaffMember> = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| StaffMember {
                id,
                name: format!("Staff Member {}", i + 1),
            })
            .collect();

        if members.is_empty() {
            return Err(GeneratorError::EmptyStaffPool);
        }
        Ok(Self { members })
    }

    /// Generate `count` staff with fresh ids.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> GeneratorResult<Self> {
        Self::from_ids((0..count).map(|_| fresh_id(rng).to_string()))
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &StaffMember {
        &self.members[rng.gen_range(0..self.members.len())]
    }

    pub fn pick_id<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.pick(rng).id.clone()
    }
}
