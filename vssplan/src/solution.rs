use crate::formula::Formula;
use crate::instance::Instance;
use std::fmt;
use topology::{EdgeId, SectionId, Time, TrainId, VertexId};

/// Optimal objective values, for the criteria that were optimized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveValues {
    /// Tracked (train, time) slots in which the train still occupies an edge.
    pub unfinished: Option<usize>,
    /// Number of chosen borders, physical boundaries included.
    pub boundaries: Option<usize>,
}

/// A satisfying assignment of an instance.
#[derive(Debug, Clone)]
pub struct Solution {
    instance: Instance,
    session: Vec<Formula>,
    values: Vec<bool>,
    objectives: ObjectiveValues,
}

impl Solution {
    pub(crate) fn new(
        instance: Instance,
        session: Vec<Formula>,
        values: Vec<bool>,
        objectives: ObjectiveValues,
    ) -> Solution {
        assert_eq!(values.len(), instance.variables().count());
        Solution {
            instance,
            session,
            values,
            objectives,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn objectives(&self) -> ObjectiveValues {
        self.objectives
    }

    /// False for time steps before the train's arrival.
    pub fn occupies(&self, train: TrainId, time: Time, edge: EdgeId) -> bool {
        self.instance
            .variables()
            .try_occupies(train, time, edge)
            .map(|v| self.values[v.0])
            .unwrap_or(false)
    }

    pub fn occupied_edges(&self, train: TrainId, time: Time) -> Vec<EdgeId> {
        (0..self.instance.network().edges().len())
            .filter(|e| self.occupies(train, time, *e))
            .collect()
    }

    pub fn is_border(&self, vertex: VertexId) -> bool {
        self.values[self.instance.variables().border(vertex).0]
    }

    pub fn borders(&self) -> Vec<VertexId> {
        (0..self.instance.network().vertex_count())
            .filter(|v| self.is_border(*v))
            .collect()
    }

    pub fn boundary_count(&self) -> usize {
        self.borders().len()
    }

    /// Tracked (train, time) slots in which the train occupies nothing.
    pub fn finished_count(&self) -> usize {
        let vars = self.instance.variables();
        self.instance
            .trains()
            .iter()
            .map(|train| {
                vars.times(train.id)
                    .filter(|t| self.occupied_edges(train.id, *t).is_empty())
                    .count()
            })
            .sum()
    }

    /// Splits the vertex sequence of a section at every chosen border.
    /// Consecutive subsections share their separating vertex.
    pub fn vss(&self, section: SectionId) -> Vec<Vec<VertexId>> {
        let vertices = self.instance.network().section_vertices(section);
        let mut out = Vec::new();
        let mut current = vec![vertices[0]];
        for (idx, v) in vertices.iter().enumerate().skip(1) {
            current.push(*v);
            if idx + 1 == vertices.len() {
                out.push(std::mem::replace(&mut current, Vec::new()));
            } else if self.is_border(*v) {
                out.push(std::mem::replace(&mut current, vec![*v]));
            }
        }
        out
    }

    pub fn vss_layout(&self) -> VssLayout {
        VssLayout {
            sections: self
                .instance
                .network()
                .sections()
                .iter()
                .map(|s| (s.name.clone(), self.vss(s.id)))
                .collect(),
        }
    }

    /// Occupied edges of each train from arrival until the destination is
    /// first reached.
    pub fn train_routes(&self) -> Vec<TrainRoute> {
        let network = self.instance.network();
        let vars = self.instance.variables();
        let mut routes = Vec::new();
        for train in self.instance.trains() {
            let mut steps = Vec::new();
            for time in vars.times(train.id) {
                let edges = self.occupied_edges(train.id, time);
                let arrived = train.destination().map(|d| edges.contains(&d)).unwrap_or(false);
                steps.push(RouteStep {
                    time,
                    endpoints: edges
                        .iter()
                        .map(|e| (network.edge(*e).from, network.edge(*e).to))
                        .collect(),
                    edges,
                });
                if arrived {
                    break;
                }
            }
            routes.push(TrainRoute {
                train: train.id,
                name: train.name.clone(),
                steps,
            });
        }
        routes
    }

    pub fn satisfies(&self, f: &Formula) -> bool {
        f.eval(&self.values)
    }

    /// Re-evaluates every constraint of the solve against the assignment.
    pub fn check(&self) -> bool {
        self.instance
            .constraints()
            .iter()
            .chain(self.session.iter())
            .all(|f| self.satisfies(f))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VssLayout {
    pub sections: Vec<(String, Vec<Vec<VertexId>>)>,
}

impl fmt::Display for VssLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, runs) in &self.sections {
            write!(f, "{}:", name)?;
            for run in runs {
                let run = run.iter().map(|v| v.to_string()).collect::<Vec<_>>();
                write!(f, " [{}]", run.join(" "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub time: Time,
    pub edges: Vec<EdgeId>,
    pub endpoints: Vec<(VertexId, VertexId)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainRoute {
    pub train: TrainId,
    pub name: String,
    pub steps: Vec<RouteStep>,
}

impl fmt::Display for TrainRoute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for step in &self.steps {
            write!(f, "  t={}:", step.time)?;
            for (from, to) in &step.endpoints {
                write!(f, " ({} {})", from, to)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
