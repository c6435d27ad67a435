use crate::formula::Var;
use topology::{EdgeId, Network, Time, Train, TrainId, VertexId};

/// Variable allocation: one `occupies` variable per (train, time, edge) for
/// the time steps `arrival..horizon` of each train, followed by one `border`
/// variable per vertex. Trains are laid out one after another, so each train
/// has its own offset into the occupancy block.
#[derive(Debug, Clone)]
pub struct Variables {
    horizon: Time,
    edge_count: usize,
    vertex_count: usize,
    arrivals: Vec<Time>,
    offsets: Vec<usize>,
    border_base: usize,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Occupies(TrainId, Time, EdgeId),
    Border(VertexId),
}

impl Variables {
    /// Returns `None` if the variable ids would overflow.
    pub fn new(network: &Network, trains: &[Train], horizon: Time) -> Option<Variables> {
        let edge_count = network.edges().len();
        let mut offsets = Vec::with_capacity(trains.len());
        let mut next = 0usize;
        for train in trains {
            offsets.push(next);
            let steps = horizon.saturating_sub(train.arrival);
            next = next.checked_add(steps.checked_mul(edge_count)?)?;
        }
        let border_base = next;
        let count = border_base.checked_add(network.vertex_count())?;

        Some(Variables {
            horizon,
            edge_count,
            vertex_count: network.vertex_count(),
            arrivals: trains.iter().map(|t| t.arrival).collect(),
            offsets,
            border_base,
            count,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn occupancy_count(&self) -> usize {
        self.border_base
    }

    pub fn horizon(&self) -> Time {
        self.horizon
    }

    /// The time steps at which `train` is tracked.
    pub fn times(&self, train: TrainId) -> std::ops::Range<Time> {
        self.arrivals[train]..self.horizon
    }

    pub fn try_occupies(&self, train: TrainId, time: Time, edge: EdgeId) -> Option<Var> {
        let arrival = *self.arrivals.get(train)?;
        if time < arrival || time >= self.horizon || edge >= self.edge_count {
            return None;
        }
        Some(Var(
            self.offsets[train] + (time - arrival) * self.edge_count + edge,
        ))
    }

    /// Panics on a (train, time, edge) triple outside the allocated range;
    /// the constraint generator only asks for tracked time steps.
    pub fn occupies(&self, train: TrainId, time: Time, edge: EdgeId) -> Var {
        match self.try_occupies(train, time, edge) {
            Some(v) => v,
            None => panic!(
                "no occupancy variable for train {} at time {} on edge {}",
                train, time, edge
            ),
        }
    }

    pub fn border(&self, vertex: VertexId) -> Var {
        assert!(vertex < self.vertex_count, "no vertex {}", vertex);
        Var(self.border_base + vertex)
    }

    pub fn borders(&self) -> impl Iterator<Item = Var> {
        (self.border_base..self.count).map(Var)
    }

    pub fn kind(&self, var: Var) -> Option<VarKind> {
        if var.0 >= self.count {
            return None;
        }
        if var.0 >= self.border_base {
            return Some(VarKind::Border(var.0 - self.border_base));
        }
        let train = match self.offsets.binary_search(&var.0) {
            Ok(mut i) => {
                // Trains with an empty block share an offset with the next one.
                while i + 1 < self.offsets.len() && self.offsets[i + 1] == var.0 {
                    i += 1;
                }
                i
            }
            Err(i) => i - 1,
        };
        let local = var.0 - self.offsets[train];
        Some(VarKind::Occupies(
            train,
            self.arrivals[train] + local / self.edge_count,
            local % self.edge_count,
        ))
    }

    /// Debug name encoding the indices of the variable.
    pub fn name(&self, var: Var) -> String {
        match self.kind(var) {
            Some(VarKind::Occupies(train, time, edge)) => {
                format!("occupies_{}_{}_{}", train, time, edge)
            }
            Some(VarKind::Border(v)) => format!("border_{}", v),
            None => format!("unknown_{}", var.0),
        }
    }
}
