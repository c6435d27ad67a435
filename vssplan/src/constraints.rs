use crate::formula::Formula;
use crate::variables::Variables;
use log::debug;
use std::collections::BTreeSet;
use topology::{EdgeId, Network, Path, Time, Train, TrainId};

/// Number of formulas contributed by each constraint family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintStats {
    pub reachability: usize,
    pub collision: usize,
    pub length: usize,
    pub vss: usize,
}

impl ConstraintStats {
    pub fn total(&self) -> usize {
        self.reachability + self.collision + self.length + self.vss
    }
}

/// The constraints that hold for every solve configuration.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub formulas: Vec<Formula>,
    pub stats: ConstraintStats,
}

pub struct ConstraintBuilder<'a> {
    network: &'a Network,
    trains: &'a [Train],
    paths: &'a [Vec<Path>],
    vars: &'a Variables,
    out: Constraints,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(
        network: &'a Network,
        trains: &'a [Train],
        paths: &'a [Vec<Path>],
        vars: &'a Variables,
    ) -> Self {
        ConstraintBuilder {
            network,
            trains,
            paths,
            vars,
            out: Constraints::default(),
        }
    }

    pub fn build(mut self) -> Constraints {
        for train in self.trains {
            self.reachability(train);
            self.collision(train);
            self.length(train);
        }
        for (i, train) in self.trains.iter().enumerate() {
            for other in &self.trains[i + 1..] {
                for pos in 0..self.network.edges().len() {
                    self.vss(train, other, pos);
                }
            }
        }
        debug!(
            "Generated {} constraints: {:?}",
            self.out.stats.total(),
            self.out.stats
        );
        self.out
    }

    fn occ(&self, train: TrainId, time: Time, edge: EdgeId) -> Formula {
        self.vars.occupies(train, time, edge).into()
    }

    fn horizon(&self) -> Time {
        self.vars.horizon()
    }

    /// Every time step except the last one needs a successor position.
    fn transitions(&self, train: &Train) -> std::ops::Range<Time> {
        train.arrival..self.horizon().saturating_sub(1)
    }

    /// A train on edge `e` at time `t` occupies an edge reachable from `e`
    /// within one time step at `t+1`. The destination edge is exempt, so
    /// the train may leave the network from there.
    pub fn reachability(&mut self, train: &Train) {
        let edge_count = self.network.edges().len();
        let mut reachable_from = vec![BTreeSet::new(); edge_count];
        for path in &self.paths[train.id] {
            for start in 0..path.len().saturating_sub(1) {
                let end = self.network.reachable_in_path(path, start, train.speed);
                reachable_from[path[start]].extend(path[start..=end].iter().cloned());
            }
        }

        let destination = train.destination();
        let mut added = 0;
        for (edge, reachable) in reachable_from.iter().enumerate() {
            if Some(edge) == destination {
                continue;
            }
            for time in self.transitions(train) {
                let next = reachable
                    .iter()
                    .map(|e| self.occ(train.id, time + 1, *e))
                    .collect::<Vec<_>>();
                self.out.formulas.push(Formula::implies(
                    self.occ(train.id, time, edge),
                    Formula::Or(next),
                ));
                added += 1;
            }
        }
        self.out.stats.reachability += added;
    }

    /// If a train moves from the start of a sub-run of its path at `t` to
    /// the end of it at `t+1`, no other tracked train may occupy any edge of
    /// the sub-run at `t` or `t+1`.
    pub fn collision(&mut self, train: &Train) {
        let mut sweeps: BTreeSet<Vec<EdgeId>> = BTreeSet::new();
        for path in &self.paths[train.id] {
            for start in 0..path.len() {
                let end = self.network.reachable_in_path(path, start, train.speed);
                for reach in start..=end {
                    sweeps.insert(path[start..=reach].to_vec());
                }
            }
        }

        let mut added = 0;
        for swept in &sweeps {
            let (from, to) = (swept[0], swept[swept.len() - 1]);
            for time in self.transitions(train) {
                let mut free = Vec::new();
                for other in self.trains {
                    if other.id == train.id || other.arrival > time {
                        continue;
                    }
                    for e in swept {
                        free.push(!self.occ(other.id, time, *e));
                        free.push(!self.occ(other.id, time + 1, *e));
                    }
                }
                if free.is_empty() {
                    continue;
                }
                let moves = Formula::and(vec![
                    self.occ(train.id, time, from),
                    self.occ(train.id, time + 1, to),
                ]);
                self.out.formulas.push(Formula::implies(moves, Formula::And(free)));
                added += 1;
            }
        }
        self.out.stats.collision += added;
    }

    /// Edge runs a train of the given length can cover: starting at every
    /// index of every admissible path, extend forward until the covered
    /// length reaches the train length or the path ends.
    pub fn length_runs(&self, train: &Train) -> BTreeSet<Vec<EdgeId>> {
        let mut runs = BTreeSet::new();
        for path in &self.paths[train.id] {
            for first in 0..path.len() {
                let mut last = first;
                let mut remaining = train.length - self.network.edge(path[first]).length;
                while remaining > 0.0 && last + 1 < path.len() {
                    last += 1;
                    remaining -= self.network.edge(path[last]).length;
                }
                let mut run = path[first..=last].to_vec();
                run.sort();
                run.dedup();
                runs.insert(run);
            }
        }
        runs
    }

    /// At every tracked time step the train occupies exactly one full-length
    /// run and nothing else, or nothing at all.
    pub fn length(&mut self, train: &Train) {
        let runs = self.length_runs(train);
        let edge_count = self.network.edges().len();

        let mut added = 0;
        for time in self.vars.times(train.id) {
            let mut options = Vec::with_capacity(runs.len() + 1);
            for run in &runs {
                options.push(Formula::And(
                    (0..edge_count)
                        .map(|e| {
                            let occ = self.occ(train.id, time, e);
                            if run.binary_search(&e).is_ok() {
                                occ
                            } else {
                                !occ
                            }
                        })
                        .collect(),
                ));
            }
            options.push(Formula::And(
                (0..edge_count).map(|e| !self.occ(train.id, time, e)).collect(),
            ));
            self.out.formulas.push(Formula::Or(options));
            added += 1;
        }
        self.out.stats.length += added;
    }

    /// Two trains in the same track-detection section need a chosen border
    /// somewhere between their positions, and never share an edge.
    /// The constraints are symmetric in the two trains, so each unordered
    /// pair is handled once.
    pub fn vss(&mut self, train: &Train, other: &Train, pos: EdgeId) {
        let network = self.network;
        let section = network.edge(pos).section;
        let edges = network.section_edges(section);
        let vertices = network.section_vertices(section);
        let pos_index = match edges.iter().position(|e| *e == pos) {
            Some(i) => i,
            None => return,
        };
        let times = train.arrival.max(other.arrival)..self.horizon();

        let mut added = 0;
        let mut potential = Vec::new();
        for idx in (0..pos_index).rev() {
            potential.push(Formula::from(self.vars.border(vertices[idx + 1])));
            for time in times.clone() {
                self.separate(train, other, time, pos, edges[idx], &potential);
                added += 1;
            }
        }

        potential.clear();
        for idx in pos_index + 1..edges.len() {
            potential.push(Formula::from(self.vars.border(vertices[idx])));
            for time in times.clone() {
                self.separate(train, other, time, pos, edges[idx], &potential);
                added += 1;
            }
        }

        for time in times {
            self.out.formulas.push(!Formula::and(vec![
                self.occ(train.id, time, pos),
                self.occ(other.id, time, pos),
            ]));
            added += 1;
        }
        self.out.stats.vss += added;
    }

    fn separate(
        &mut self,
        train: &Train,
        other: &Train,
        time: Time,
        pos: EdgeId,
        other_pos: EdgeId,
        borders: &[Formula],
    ) {
        let both = Formula::and(vec![
            self.occ(train.id, time, pos),
            self.occ(other.id, time, other_pos),
        ]);
        self.out
            .formulas
            .push(Formula::implies(both, Formula::Or(borders.to_vec())));
    }
}
