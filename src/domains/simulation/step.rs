use serde::{Deserialize, Serialize};

use super::agents::{AgentStore, PersonId};
use super::alert::AlertMode;
use super::sampler::MoveSampler;
use super::state::SimulationState;
use crate::common::{DomainResult, PlanarCoord};
use crate::domains::logger::DynLogger;

pub const DEFAULT_PERSON_RADIUS: f64 = 1.0;
pub const DEFAULT_MAX_STEP_LENGTH: f64 = 1.0;
pub const DEFAULT_MAX_HALVINGS: u32 = 4;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Retry bounds for one person-step: how many times the step length may be
/// halved against a single neighbour, and how many fresh headings are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLimits {
    pub max_halvings: u32,
    pub max_attempts: u32,
}

impl Default for StepLimits {
    fn default() -> Self {
        Self {
            max_halvings: DEFAULT_MAX_HALVINGS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    Moved {
        to: PlanarCoord,
        attempt: u32,
        halvings: u32,
    },
    /// No collision-free position was found; the person stays put this tick.
    GaveUp { attempts: u32, halvings: u32 },
}

impl StepOutcome {
    pub fn halvings(&self) -> u32 {
        match self {
            StepOutcome::Moved { halvings, .. } | StepOutcome::GaveUp { halvings, .. } => *halvings,
        }
    }

    pub fn gave_up(&self) -> bool {
        matches!(self, StepOutcome::GaveUp { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub outcomes: Vec<(PersonId, StepOutcome)>,
}

impl TickReport {
    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| !o.gave_up()).count()
    }

    pub fn gave_up(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.gave_up()).count()
    }
}

enum Attempt {
    Clear(PlanarCoord),
    Blocked { by: PersonId },
}

/// Random-walk movement with collision avoidance.
///
/// People are processed in ascending id order and each new position is
/// committed before the next person moves, so person `i` sees the updated
/// positions of lower ids and the previous-tick positions of higher ids.
/// Conflicts therefore resolve in favour of whoever moves first.
pub struct StepEngine {
    person_radius: f64,
    max_step_length: f64,
    limits: StepLimits,
    logger: DynLogger,
}

impl StepEngine {
    pub fn new(person_radius: f64, max_step_length: f64, limits: StepLimits, logger: DynLogger) -> Self {
        Self {
            person_radius,
            max_step_length,
            limits,
            logger,
        }
    }

    /// Two people collide when closer than this.
    pub fn min_separation(&self) -> f64 {
        2.0 * self.person_radius
    }

    pub fn tick<S: MoveSampler + ?Sized>(
        &self,
        state: &mut SimulationState,
        sampler: &mut S,
    ) -> DomainResult<TickReport> {
        let alert = state.alert;
        let mut report = TickReport {
            outcomes: Vec::with_capacity(state.agents.len()),
        };
        for index in 0..state.agents.len() {
            let id = PersonId(index);
            let outcome = self.step_person(&mut state.agents, id, alert, sampler)?;
            report.outcomes.push((id, outcome));
        }
        Ok(report)
    }

    /// One person-step: up to `max_attempts` headings, each shortened by
    /// halving against colliding neighbours. Commits on success.
    pub fn step_person<S: MoveSampler + ?Sized>(
        &self,
        agents: &mut AgentStore,
        id: PersonId,
        alert: AlertMode,
        sampler: &mut S,
    ) -> DomainResult<StepOutcome> {
        let origin = agents.position_of(id)?;
        self.logger.debug(&format!("moving person {} from ({:.3}, {:.3})", id, origin.x, origin.y));

        let mut halvings = 0;
        for attempt in 1..=self.limits.max_attempts {
            let heading = sampler.heading(alert);
            let length = sampler.step_length() * self.max_step_length;

            match self.try_heading(agents, id, origin, heading, length, &mut halvings) {
                Attempt::Clear(candidate) => {
                    agents.set_position(id, candidate)?;
                    return Ok(StepOutcome::Moved {
                        to: candidate,
                        attempt,
                        halvings,
                    });
                }
                Attempt::Blocked { by } => {
                    self.logger.debug(&format!(
                        "person {} blocked by person {} on attempt {}, trying a different heading",
                        id, by, attempt
                    ));
                }
            }
        }

        self.logger.warn(&format!(
            "giving up on person {} after {} attempts",
            id, self.limits.max_attempts
        ));
        Ok(StepOutcome::GaveUp {
            attempts: self.limits.max_attempts,
            halvings,
        })
    }

    fn try_heading(
        &self,
        agents: &AgentStore,
        id: PersonId,
        origin: PlanarCoord,
        heading: f64,
        mut length: f64,
        halvings: &mut u32,
    ) -> Attempt {
        let min_separation = self.min_separation();
        let mut candidate = origin.moved_by(heading, length);

        for (other, position) in agents.all_positions() {
            if other == id {
                continue;
            }
            let mut against_other = 0;
            while candidate.distance(&position) < min_separation {
                if against_other >= self.limits.max_halvings {
                    return Attempt::Blocked { by: other };
                }
                length /= 2.0;
                candidate = origin.moved_by(heading, length);
                against_other += 1;
                *halvings += 1;
            }
            if against_other > 0 {
                self.logger.debug(&format!(
                    "person {} halved {} time(s) against person {}",
                    id, against_other, other
                ));
            }
        }

        // Shortening against a later neighbour can pull the candidate back
        // toward an earlier one.
        match self.first_collision(agents, id, candidate) {
            Some(other) => Attempt::Blocked { by: other },
            None => Attempt::Clear(candidate),
        }
    }

    fn first_collision(&self, agents: &AgentStore, id: PersonId, candidate: PlanarCoord) -> Option<PersonId> {
        let min_separation = self.min_separation();
        agents
            .all_positions()
            .find(|(other, position)| *other != id && candidate.distance(position) < min_separation)
            .map(|(other, _)| other)
    }
}
