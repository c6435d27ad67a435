use smallvec::SmallVec;
use std::collections::HashSet;

pub type Dist = f64;

pub type VertexId = usize;
pub type EdgeId = usize;
pub type SectionId = usize;

/// An ordered sequence of edges from a train's start edge to its goal edge.
pub type Path = Vec<EdgeId>;

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub name: String,
    pub from: VertexId,
    pub to: VertexId,
    pub length: Dist,
    pub section: SectionId,
}

impl Edge {
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.from == v || self.to == v
    }

    /// The opposite endpoint of the edge, if `v` is one of its endpoints.
    pub fn other_vertex(&self, v: VertexId) -> Option<VertexId> {
        if self.from == v {
            Some(self.to)
        } else if self.to == v {
            Some(self.from)
        } else {
            None
        }
    }
}

/// A track-detection section: a contiguous run of edges.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub edges: Vec<EdgeId>,
    pub vertices: Vec<VertexId>,
}

#[derive(Debug, Fail, PartialEq)]
pub enum NetworkError {
    #[fail(display = "edge {} refers to vertex {}, but the network has {} vertices", _0, _1, _2)]
    UnknownVertex(String, VertexId, usize),
    #[fail(display = "edge {} has non-positive length {}", _0, _1)]
    NonPositiveLength(String, Dist),
    #[fail(display = "edge {} is a loop", _0)]
    Loop(String),
    #[fail(display = "section {} refers to unknown edge {}", _0, _1)]
    UnknownEdge(String, EdgeId),
    #[fail(display = "section {} has no edges", _0)]
    EmptySection(String),
    #[fail(display = "edge {} belongs to more than one section", _0)]
    EdgeInSeveralSections(String),
    #[fail(display = "edge {} belongs to no section", _0)]
    EdgeWithoutSection(String),
    #[fail(display = "section {} is not contiguous between edges {} and {}", _0, _1, _2)]
    NotContiguous(String, String, String),
}

#[derive(Debug, Clone)]
pub struct Network {
    vertex_count: usize,
    edges: Vec<Edge>,
    sections: Vec<Section>,
    incident: Vec<SmallVec<[EdgeId; 3]>>,
}

/// Edge description used when building a network: name, from, to, length.
pub type EdgeSpec = (String, VertexId, VertexId, Dist);

/// Section description used when building a network: name and ordered edge indices.
pub type SectionSpec = (String, Vec<EdgeId>);

impl Network {
    pub fn new(
        vertex_count: usize,
        edge_specs: Vec<EdgeSpec>,
        section_specs: Vec<SectionSpec>,
    ) -> Result<Network, NetworkError> {
        let mut incident: Vec<SmallVec<[EdgeId; 3]>> = vec![SmallVec::new(); vertex_count];
        let mut section_of: Vec<Option<SectionId>> = vec![None; edge_specs.len()];

        for (id, (name, from, to, length)) in edge_specs.iter().enumerate() {
            for v in &[*from, *to] {
                if *v >= vertex_count {
                    return Err(NetworkError::UnknownVertex(name.clone(), *v, vertex_count));
                }
            }
            if from == to {
                return Err(NetworkError::Loop(name.clone()));
            }
            if !(*length > 0.0) {
                return Err(NetworkError::NonPositiveLength(name.clone(), *length));
            }
            incident[*from].push(id);
            incident[*to].push(id);
        }

        let mut sections = Vec::with_capacity(section_specs.len());
        for (section_id, (name, edges)) in section_specs.into_iter().enumerate() {
            if edges.is_empty() {
                return Err(NetworkError::EmptySection(name));
            }
            for e in &edges {
                match section_of.get_mut(*e) {
                    None => return Err(NetworkError::UnknownEdge(name, *e)),
                    Some(Some(_)) => {
                        return Err(NetworkError::EdgeInSeveralSections(edge_specs[*e].0.clone()))
                    }
                    Some(s) => *s = Some(section_id),
                }
            }
            let vertices = walk_vertices(&edge_specs, &edges).map_err(|(a, b)| {
                NetworkError::NotContiguous(
                    name.clone(),
                    edge_specs[a].0.clone(),
                    edge_specs[b].0.clone(),
                )
            })?;
            sections.push(Section {
                id: section_id,
                name,
                edges,
                vertices,
            });
        }

        let mut edges = Vec::with_capacity(edge_specs.len());
        for (id, (name, from, to, length)) in edge_specs.into_iter().enumerate() {
            let section = match section_of[id] {
                Some(s) => s,
                None => return Err(NetworkError::EdgeWithoutSection(name)),
            };
            edges.push(Edge {
                id,
                name,
                from,
                to,
                length,
                section,
            });
        }

        Ok(Network {
            vertex_count,
            edges,
            sections,
            incident,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_edges(&self, id: SectionId) -> &[EdgeId] {
        &self.sections[id].edges
    }

    /// Vertices of the section in edge order; `vertices[i]` and
    /// `vertices[i+1]` are the endpoints of `edges[i]`.
    pub fn section_vertices(&self, id: SectionId) -> &[VertexId] {
        &self.sections[id].vertices
    }

    pub fn edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.edges.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// Line ends, junctions and detection-section limits are physical
    /// boundaries. Only a vertex joining exactly two edges of the same
    /// section is an interior vertex.
    pub fn is_boundary(&self, v: VertexId) -> bool {
        match self.incident[v].as_slice() {
            [a, b] => self.edges[*a].section != self.edges[*b].section,
            _ => true,
        }
    }

    pub fn shared_vertex(&self, a: EdgeId, b: EdgeId) -> Option<VertexId> {
        shared(&self.edges[a], &self.edges[b])
    }

    pub fn other_vertex(&self, e: EdgeId, v: VertexId) -> Option<VertexId> {
        self.edges[e].other_vertex(v)
    }

    /// All simple paths from `start` to `goal`. Edges may be traversed in
    /// either direction; no vertex is visited twice.
    pub fn paths(&self, start: EdgeId, goal: EdgeId) -> Vec<Path> {
        if start == goal {
            return vec![vec![start]];
        }

        let mut result = Vec::new();
        let first = &self.edges[start];
        for &(entry, exit) in &[(first.from, first.to), (first.to, first.from)] {
            let mut visited = HashSet::new();
            visited.insert(entry);
            visited.insert(exit);
            let mut path = vec![start];
            self.extend_paths(exit, goal, &mut visited, &mut path, &mut result);
        }
        result
    }

    fn extend_paths(
        &self,
        at: VertexId,
        goal: EdgeId,
        visited: &mut HashSet<VertexId>,
        path: &mut Path,
        result: &mut Vec<Path>,
    ) {
        for &next in self.incident[at].iter() {
            if path.contains(&next) {
                continue;
            }
            if next == goal {
                let mut found = path.clone();
                found.push(goal);
                result.push(found);
                continue;
            }
            let far = match self.edges[next].other_vertex(at) {
                Some(v) => v,
                None => continue,
            };
            if !visited.insert(far) {
                continue;
            }
            path.push(next);
            self.extend_paths(far, goal, visited, path, result);
            path.pop();
            visited.remove(&far);
        }
    }

    /// The farthest index along `path` that a train on `path[start]` can
    /// occupy one time step later. The front may always move into the next
    /// edge; every further edge requires the intermediate edges to be
    /// traversed completely, and the traversed length is bounded by `speed`.
    pub fn reachable_in_path(&self, path: &[EdgeId], start: usize, speed: Dist) -> usize {
        let mut end = start;
        let mut traversed = 0.0;
        while end + 1 < path.len() {
            if end > start {
                traversed += self.edges[path[end]].length;
                if traversed > speed {
                    break;
                }
            }
            end += 1;
        }
        end
    }
}

fn shared(a: &Edge, b: &Edge) -> Option<VertexId> {
    if b.has_vertex(a.from) {
        Some(a.from)
    } else if b.has_vertex(a.to) {
        Some(a.to)
    } else {
        None
    }
}

fn spec_shared(a: &EdgeSpec, b: &EdgeSpec) -> Option<VertexId> {
    let (_, af, at, _) = a;
    let (_, bf, bt, _) = b;
    if af == bf || af == bt {
        Some(*af)
    } else if at == bf || at == bt {
        Some(*at)
    } else {
        None
    }
}

fn spec_other(e: &EdgeSpec, v: VertexId) -> VertexId {
    if e.1 == v {
        e.2
    } else {
        e.1
    }
}

// Orders the vertices of a section along its edge list. Returns the
// offending pair of edges if two consecutive edges are not adjacent.
fn walk_vertices(specs: &[EdgeSpec], edges: &[EdgeId]) -> Result<Vec<VertexId>, (EdgeId, EdgeId)> {
    let first = &specs[edges[0]];
    if edges.len() == 1 {
        return Ok(vec![first.1, first.2]);
    }

    let joint = spec_shared(first, &specs[edges[1]]).ok_or((edges[0], edges[1]))?;
    let mut vertices = vec![spec_other(first, joint), joint];
    for pair in edges.windows(2).skip(1) {
        let (prev, next) = (pair[0], pair[1]);
        let far = spec_other(&specs[prev], vertices[vertices.len() - 1]);
        if specs[next].1 != far && specs[next].2 != far {
            return Err((prev, next));
        }
        vertices.push(far);
    }
    let last = &specs[edges[edges.len() - 1]];
    let far = spec_other(last, vertices[vertices.len() - 1]);
    vertices.push(far);
    Ok(vertices)
}
