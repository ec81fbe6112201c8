use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{DomainError, DomainResult, PlanarCoord};

/// Stable person identity. Ids are handed out in creation order and restart
/// from zero only after a full clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, index-addressed collection of person positions.
///
/// There is no partial removal, so the id of a person is also its index.
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    positions: Vec<PlanarCoord>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, position: PlanarCoord) -> PersonId {
        let id = PersonId(self.positions.len());
        self.positions.push(position);
        id
    }

    pub fn position_of(&self, id: PersonId) -> DomainResult<PlanarCoord> {
        self.positions
            .get(id.0)
            .copied()
            .ok_or(DomainError::UnknownPerson { id: id.0 })
    }

    pub fn set_position(&mut self, id: PersonId, position: PlanarCoord) -> DomainResult<()> {
        let slot = self
            .positions
            .get_mut(id.0)
            .ok_or(DomainError::UnknownPerson { id: id.0 })?;
        *slot = position;
        Ok(())
    }

    /// Every person in id order.
    pub fn all_positions(&self) -> impl Iterator<Item = (PersonId, PlanarCoord)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(index, position)| (PersonId(index), *position))
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
