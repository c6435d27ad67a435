use crate::network::{Dist, EdgeId};

pub type TrainId = usize;
pub type Time = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    /// Dense index, `0..trains.len()`.
    pub id: TrainId,
    pub name: String,
    /// First time step at which the train is tracked.
    pub arrival: Time,
    pub start: EdgeId,
    /// Required stops in order; the last one is the destination.
    pub stops: Vec<EdgeId>,
    pub length: Dist,
    /// Distance covered per time step.
    pub speed: Dist,
}

impl Train {
    pub fn destination(&self) -> Option<EdgeId> {
        self.stops.last().cloned()
    }
}
