#[macro_use]
extern crate failure_derive;

pub mod config;
pub mod constraints;
pub mod encode;
pub mod formula;
pub mod instance;
pub mod optimize;
pub mod solution;
pub mod variables;

#[cfg(test)]
mod tests;

pub use config::{BoundaryPolicy, Objective, SolveConfig, Variant};
pub use formula::{Formula, Var};
pub use instance::{Instance, InstanceError, InstanceStats};
pub use solution::{ObjectiveValues, RouteStep, Solution, TrainRoute, VssLayout};
pub use variables::{VarKind, Variables};

use std::path::Path;
use topology::{AppResult, Time};

/// Reads a network and a train file and builds the planning instance.
pub fn get_instance(network: &Path, trains: &Path, horizon: Time) -> AppResult<Instance> {
    let network = topology::get_network(network)?;
    let trains = topology::get_trains(trains, &network)?;
    Ok(Instance::new(network, trains, horizon)?)
}
