use crate::config::{BoundaryPolicy, Objective, SolveConfig};
use crate::constraints::{ConstraintBuilder, ConstraintStats, Constraints};
use crate::encode::Encoder;
use crate::formula::Formula;
use crate::optimize;
use crate::solution::{ObjectiveValues, Solution};
use crate::variables::Variables;
use log::{debug, info, warn};
use minisat::*;
use std::rc::Rc;
use topology::{EdgeId, Network, Path, Time, Train, TrainId};

#[derive(Debug, Fail, PartialEq)]
pub enum InstanceError {
    #[fail(display = "the planning horizon must be at least one time step")]
    ZeroHorizon,
    #[fail(display = "train {} has id {}, expected {}", _0, _1, _2)]
    NonDenseId(String, TrainId, TrainId),
    #[fail(display = "train {} has no stops", _0)]
    NoStops(String),
    #[fail(display = "train {} refers to unknown edge {}", _0, _1)]
    UnknownEdge(String, EdgeId),
    #[fail(display = "train {} has non-positive length", _0)]
    NonPositiveLength(String),
    #[fail(display = "train {} has non-positive speed", _0)]
    NonPositiveSpeed(String),
    #[fail(display = "train {} arrives at {}, outside the horizon {}", _0, _1, _2)]
    ArrivalOutsideHorizon(String, Time, Time),
    #[fail(display = "too many variables")]
    TooManyVariables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceStats {
    pub variables: usize,
    pub occupancy_variables: usize,
    pub paths: usize,
    pub constraints: ConstraintStats,
}

/// A planning problem with its variables and shared constraints.
///
/// Everything is held in immutable reference-counted snapshots, so cloning
/// is cheap. Each call to `solve` opens its own solver session.
#[derive(Debug, Clone)]
pub struct Instance {
    network: Rc<Network>,
    trains: Rc<Vec<Train>>,
    horizon: Time,
    vars: Rc<Variables>,
    paths: Rc<Vec<Vec<Path>>>,
    constraints: Rc<Constraints>,
}

impl Instance {
    pub fn new(network: Network, trains: Vec<Train>, horizon: Time) -> Result<Instance, InstanceError> {
        validate(&network, &trains, horizon)?;
        let vars = Variables::new(&network, &trains, horizon).ok_or(InstanceError::TooManyVariables)?;

        let mut paths = Vec::with_capacity(trains.len());
        for train in &trains {
            let destination = train.stops[train.stops.len() - 1];
            let train_paths = network.paths(train.start, destination);
            if train_paths.is_empty() {
                warn!(
                    "Train {} has no path from {} to {}",
                    train.name,
                    network.edge(train.start).name,
                    network.edge(destination).name
                );
            }
            debug!("Train {} has {} paths", train.name, train_paths.len());
            paths.push(train_paths);
        }

        let constraints = ConstraintBuilder::new(&network, &trains, &paths, &vars).build();
        let instance = Instance {
            network: Rc::new(network),
            trains: Rc::new(trains),
            horizon,
            vars: Rc::new(vars),
            paths: Rc::new(paths),
            constraints: Rc::new(constraints),
        };
        info!("Instance created: {:?}", instance.stats());
        Ok(instance)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn horizon(&self) -> Time {
        self.horizon
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn paths(&self, train: TrainId) -> &[Path] {
        &self.paths[train]
    }

    pub fn constraints(&self) -> &[Formula] {
        &self.constraints.formulas
    }

    pub fn stats(&self) -> InstanceStats {
        InstanceStats {
            variables: self.vars.count(),
            occupancy_variables: self.vars.occupancy_count(),
            paths: self.paths.iter().map(|p| p.len()).sum(),
            constraints: self.constraints.stats,
        }
    }

    fn occ(&self, train: TrainId, time: Time, edge: EdgeId) -> Formula {
        self.vars.occupies(train, time, edge).into()
    }

    /// Each train is on its start edge at arrival and visits every stop.
    pub fn stop_constraints(&self) -> Vec<Formula> {
        let mut out = Vec::new();
        for train in self.trains.iter() {
            out.push(self.occ(train.id, train.arrival, train.start));
            for stop in &train.stops {
                out.push(Formula::Or(
                    self.vars
                        .times(train.id)
                        .map(|t| self.occ(train.id, t, *stop))
                        .collect(),
                ));
            }
        }
        out
    }

    pub fn boundary_constraints(&self, policy: BoundaryPolicy) -> Vec<Formula> {
        let mut out = Vec::new();
        for v in 0..self.network.vertex_count() {
            let border = Formula::from(self.vars.border(v));
            if self.network.is_boundary(v) {
                out.push(border);
            } else if policy == BoundaryPolicy::PhysicalOnly {
                out.push(!border);
            }
        }
        out
    }

    /// Solves the instance under the given configuration. Returns `None` if
    /// it is infeasible within the horizon.
    pub fn solve(&self, config: &SolveConfig) -> Option<Solution> {
        let mut session = self.stop_constraints();
        session.extend(self.boundary_constraints(config.boundaries));

        let mut solver = Solver::new();
        let lits = (0..self.vars.count())
            .map(|_| solver.new_lit())
            .collect::<Vec<Bool>>();
        {
            let mut encoder = Encoder::new(&mut solver, &lits);
            for f in self.constraints.formulas.iter().chain(session.iter()) {
                encoder.assert(f);
            }
        }
        debug!(
            "Encoded {} shared and {} session constraints",
            self.constraints.formulas.len(),
            session.len()
        );

        let mut objectives = ObjectiveValues::default();
        if config.objective == Objective::ThroughputThenBoundaries {
            let unfinished = self.unfinished_literals(&mut solver, &lits);
            match optimize::minimize(&mut solver, &unfinished) {
                Some(cost) => {
                    info!("Throughput optimum: {} unfinished slots", cost);
                    objectives.unfinished = Some(cost);
                }
                None => {
                    info!("Infeasible with horizon {}", self.horizon);
                    return None;
                }
            }
        }
        if config.objective != Objective::Feasibility {
            let borders = self.vars.borders().map(|v| lits[v.0]).collect::<Vec<Bool>>();
            match optimize::minimize(&mut solver, &borders) {
                Some(cost) => {
                    info!("Border optimum: {} borders", cost);
                    objectives.boundaries = Some(cost);
                }
                None => {
                    info!("Infeasible with horizon {}", self.horizon);
                    return None;
                }
            }
        }

        let values = match solver.solve_under_assumptions(Vec::new()) {
            Ok(model) => lits.iter().map(|l| model.value(l)).collect::<Vec<bool>>(),
            Err(()) => {
                info!("Infeasible with horizon {}", self.horizon);
                return None;
            }
        };
        info!("Solved with {:?}", config);
        Some(Solution::new(self.clone(), session, values, objectives))
    }

    /// One literal per tracked (train, time) slot, true while the train
    /// occupies some edge.
    fn unfinished_literals(&self, solver: &mut Solver, lits: &[Bool]) -> Vec<Bool> {
        let edge_count = self.network.edges().len();
        let mut out = Vec::new();
        for train in self.trains.iter() {
            for time in self.vars.times(train.id) {
                let occupied = (0..edge_count)
                    .map(|e| lits[self.vars.occupies(train.id, time, e).0])
                    .collect::<Vec<Bool>>();
                out.push(solver.or_literal(occupied));
            }
        }
        out
    }
}

fn validate(network: &Network, trains: &[Train], horizon: Time) -> Result<(), InstanceError> {
    if horizon == 0 {
        return Err(InstanceError::ZeroHorizon);
    }
    let edge_count = network.edges().len();
    for (idx, train) in trains.iter().enumerate() {
        let name = || train.name.clone();
        if train.id != idx {
            return Err(InstanceError::NonDenseId(name(), train.id, idx));
        }
        if train.stops.is_empty() {
            return Err(InstanceError::NoStops(name()));
        }
        let mut edges = std::iter::once(train.start).chain(train.stops.iter().cloned());
        if let Some(e) = edges.find(|e| *e >= edge_count) {
            return Err(InstanceError::UnknownEdge(name(), e));
        }
        if !(train.length > 0.0) {
            return Err(InstanceError::NonPositiveLength(name()));
        }
        if !(train.speed > 0.0) {
            return Err(InstanceError::NonPositiveSpeed(name()));
        }
        if train.arrival >= horizon {
            return Err(InstanceError::ArrivalOutsideHorizon(name(), train.arrival, horizon));
        }
    }
    Ok(())
}
