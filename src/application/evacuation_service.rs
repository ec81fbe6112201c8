// Evacuation Service - the single owner of simulation state and building footprints
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::common::{ApplicationResult, DomainError, DomainResult, GeoCoord, PlanarCoord};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::map::{assign_exit_doors, extract_footprints, Building, MapDataSource, MapWay, NodeLookup};
use crate::domains::projection::{Proj4Projection, Projection};
use crate::domains::simulation::{AlertMode, PersonId, RngMoveSampler, SimulationState, StepEngine, TickReport};

pub const DEFAULT_MAX_SPAWN_PER_REQUEST: usize = 10_000;

/// A person as seen by callers: id plus geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonView {
    pub id: PersonId,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAllResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLoadStats {
    pub nodes: usize,
    pub rejected_nodes: usize,
    pub ways: usize,
    pub building_ways: usize,
    pub buildings: usize,
    pub malformed_buildings: usize,
    pub relations: usize,
    pub elapsed_secs: f64,
}

pub struct EvacuationService {
    projection: Arc<dyn Projection>,
    engine: StepEngine,
    state: SimulationState,
    buildings: Vec<Building>,
    sampler: RngMoveSampler<StdRng>,
    building_tag: String,
    max_spawn_per_request: usize,
    logger: DynLogger,
}

impl EvacuationService {
    pub fn new(
        projection: Arc<dyn Projection>,
        engine: StepEngine,
        rng: StdRng,
        building_tag: impl Into<String>,
        logger: DynLogger,
    ) -> Self {
        Self {
            projection,
            engine,
            state: SimulationState::new(),
            buildings: Vec::new(),
            sampler: RngMoveSampler::new(rng),
            building_tag: building_tag.into(),
            max_spawn_per_request: DEFAULT_MAX_SPAWN_PER_REQUEST,
            logger,
        }
    }

    pub fn with_max_spawn_per_request(mut self, limit: usize) -> Self {
        self.max_spawn_per_request = limit;
        self
    }

    pub fn from_config(config: &Config, logger: DynLogger) -> ApplicationResult<Self> {
        let projection = Proj4Projection::new(&config.projection.definition, config.projection.bounds)?;
        let sim = &config.simulation;
        let engine = StepEngine::new(sim.person_radius, sim.max_step_length, sim.step_limits(), logger.clone());
        let rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::new(
            Arc::new(projection),
            engine,
            rng,
            config.map.building_tag.clone(),
            logger,
        )
        .with_max_spawn_per_request(sim.max_spawn_per_request))
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn alert_mode(&self) -> AlertMode {
        self.state.alert
    }

    pub fn people_count(&self) -> usize {
        self.state.agents.len()
    }

    /// Decode the map and load its footprints. A decode failure is fatal;
    /// malformed building ways are only reported.
    pub fn load_map(&mut self, source: &dyn MapDataSource) -> ApplicationResult<MapLoadStats> {
        let start = Instant::now();
        self.logger.info(&format!("parsing {}", source.describe()));
        let extract = source.load_extract()?;

        let building_ways = extract
            .ways
            .iter()
            .filter(|w| w.has_tag(&self.building_tag))
            .count();
        let buildings = self.load_footprints(&extract.ways, &extract.nodes).len();

        let stats = MapLoadStats {
            nodes: extract.nodes.len(),
            rejected_nodes: extract.rejected_nodes,
            ways: extract.ways.len(),
            building_ways,
            buildings,
            malformed_buildings: building_ways - buildings,
            relations: extract.relation_count,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        self.logger.info(&format!("{} nodes ({} rejected)", stats.nodes, stats.rejected_nodes));
        self.logger.info(&format!(
            "{} ways of which {} are buildings ({} malformed)",
            stats.ways, stats.building_ways, stats.malformed_buildings
        ));
        self.logger.info(&format!("{} relations", stats.relations));
        self.logger.info(&format!(
            "finished reading {} in {:.3} seconds",
            source.describe(),
            stats.elapsed_secs
        ));
        Ok(stats)
    }

    /// Extract footprints and give each one an exit door. Replaces any
    /// previously loaded buildings.
    pub fn load_footprints(&mut self, ways: &[MapWay], nodes: &NodeLookup) -> &[Building] {
        let extraction = extract_footprints(ways, nodes, self.projection.as_ref(), &self.building_tag, &self.logger);
        let mut buildings = extraction.buildings;
        let doors = assign_exit_doors(&mut buildings, self.sampler.rng_mut());
        self.logger.debug(&format!("assigned {} exit doors", doors));
        self.buildings = buildings;
        &self.buildings
    }

    pub fn add_person(&mut self, geo: GeoCoord) -> DomainResult<PersonView> {
        let planar = self.projection.to_planar(geo)?;
        let geo = self.projection.to_geo(planar)?;
        Ok(self.commit_person(planar, geo))
    }

    /// Spawn `n` people, each at the exit door of a uniformly chosen building.
    /// Either all `n` are added or none are.
    pub fn add_people_at_random_exit_doors(&mut self, n: usize) -> DomainResult<Vec<PersonView>> {
        let doors = self
            .buildings
            .iter()
            .filter_map(Building::exit_door)
            .map(|door| self.projection.to_geo(door).map(|geo| (door, geo)))
            .collect::<DomainResult<Vec<(PlanarCoord, GeoCoord)>>>()?;
        if doors.is_empty() {
            return Err(DomainError::NoBuildingsAvailable);
        }
        if n > self.max_spawn_per_request {
            return Err(DomainError::SpawnLimitExceeded {
                requested: n,
                limit: self.max_spawn_per_request,
            });
        }
        self.logger.info(&format!("add {} people", n));

        let mut added = Vec::with_capacity(n);
        for _ in 0..n {
            let (planar, geo) = doors[self.sampler.rng_mut().gen_range(0..doors.len())];
            added.push(self.commit_person(planar, geo));
        }
        Ok(added)
    }

    pub fn remove_all_people(&mut self) -> RemoveAllResponse {
        let removed = self.state.agents.len();
        self.state.clear_people();
        self.logger.info(&format!("removed all {} people", removed));
        RemoveAllResponse { success: true }
    }

    /// Run one tick and return every person's new position in id order.
    pub fn step(&mut self) -> DomainResult<Vec<PersonView>> {
        let report = self.step_with_report()?;
        if report.gave_up() > 0 {
            self.logger.info(&format!(
                "tick finished: {} moved, {} stayed put",
                report.moved(),
                report.gave_up()
            ));
        }
        self.people()
    }

    pub fn step_with_report(&mut self) -> DomainResult<TickReport> {
        self.engine.tick(&mut self.state, &mut self.sampler)
    }

    pub fn toggle_alert(&mut self) -> AlertMode {
        let alert = self.state.toggle_alert();
        self.logger.info(&format!("tsunami alert is now {}", if alert.is_on() { "on" } else { "off" }));
        alert
    }

    pub fn people(&self) -> DomainResult<Vec<PersonView>> {
        self.state
            .agents
            .all_positions()
            .map(|(id, planar)| self.view(id, planar))
            .collect()
    }

    fn commit_person(&mut self, planar: PlanarCoord, geo: GeoCoord) -> PersonView {
        let id = self.state.agents.add_person(planar);
        self.logger.debug(&format!(
            "adding person with id {} and coordinates {},{}",
            id, planar.x, planar.y
        ));
        PersonView {
            id,
            lat: geo.lat,
            lon: geo.lon,
        }
    }

    fn view(&self, id: PersonId, planar: PlanarCoord) -> DomainResult<PersonView> {
        let geo = self.projection.to_geo(planar)?;
        Ok(PersonView {
            id,
            lat: geo.lat,
            lon: geo.lon,
        })
    }
}
