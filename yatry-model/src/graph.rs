use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::location::LocationId;

/// An ordered sequence of distinct locations `[l0, l1, ..., lk]` such that
/// each consecutive pair is an edge of the owning [`MapGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stops: Vec<LocationId>,
}

impl Route {
    pub fn stops(&self) -> &[LocationId] {
        &self.stops
    }

    pub fn origin(&self) -> LocationId {
        self.stops[0]
    }

    pub fn destination(&self) -> LocationId {
        *self.stops.last().expect("route is never empty")
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The longest common prefix of `self` and `other`, read from their own
    /// (possibly different) origins. Per `spec.md` §3: both routes are
    /// reoriented to begin from a common source first; if they do not share
    /// one, the shared prefix is empty.
    pub fn shared_prefix(&self, other: &Route) -> Route {
        let a = self.reoriented_from_common_origin(other);
        let b = other.reoriented_from_common_origin(self);
        let mut prefix = Vec::new();
        for (x, y) in a.iter().zip(b.iter()) {
            if x == y {
                prefix.push(*x);
            } else {
                break;
            }
        }
        Route { stops: prefix }
    }

    /// Returns this route's stops, reversed if needed so it starts at a stop
    /// shared with `other`'s origin; falls back to the original orientation
    /// (which yields an empty shared prefix downstream) if no common origin
    /// exists on either end.
    fn reoriented_from_common_origin(&self, other: &Route) -> Vec<LocationId> {
        if self.origin() == other.origin() || self.origin() == other.destination() {
            self.stops.clone()
        } else if self.destination() == other.origin() || self.destination() == other.destination()
        {
            self.stops.iter().rev().copied().collect()
        } else {
            self.stops.clone()
        }
    }
}

/// A rooted tree of [`LocationId`]s with symmetric, strictly positive edge
/// fares. Implemented as a flat arena (per `SPEC_FULL.md` §3/§9): `route`
/// reads are pure lowest-common-ancestor walks over parent pointers, never a
/// transient reroot, so concurrent reads never observe one another.
#[derive(Debug, Clone)]
pub struct MapGraph {
    names: Vec<String>,
    name_to_id: HashMap<String, LocationId>,
    parent: Vec<Option<LocationId>>,
    parent_fare: Vec<Option<f64>>,
    children: Vec<Vec<LocationId>>,
    root: LocationId,
}

impl MapGraph {
    /// Creates a graph with a single registered location, the "primary hub",
    /// which becomes the tree's distinguished root.
    pub fn new(root_name: impl Into<String>) -> MapGraph {
        let mut graph = MapGraph {
            names: Vec::new(),
            name_to_id: HashMap::new(),
            parent: Vec::new(),
            parent_fare: Vec::new(),
            children: Vec::new(),
            root: LocationId(0),
        };
        graph.root = graph.register_location(root_name);
        graph
    }

    pub fn root(&self) -> LocationId {
        self.root
    }

    pub fn name(&self, location: LocationId) -> &str {
        &self.names[location.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Idempotent insertion: registering the same name twice returns the
    /// same [`LocationId`].
    pub fn register_location(&mut self, name: impl Into<String>) -> LocationId {
        let name = name.into();
        if let Some(&id) = self.name_to_id.get(&name) {
            return id;
        }
        let id = LocationId(self.names.len() as u32);
        self.names.push(name.clone());
        self.name_to_id.insert(name, id);
        self.parent.push(None);
        self.parent_fare.push(None);
        self.children.push(Vec::new());
        id
    }

    fn check_registered(&self, location: LocationId) -> Result<()> {
        if location.index() < self.names.len() {
            Ok(())
        } else {
            Err(Error::UnknownLocation(location))
        }
    }

    /// Adds an edge `parent -> child` with the given fare. Fails if the fare
    /// is not strictly positive, if either endpoint is unregistered, or if
    /// `child` already has a parent (which would create a cycle or a second
    /// path).
    pub fn add_edge(&mut self, parent: LocationId, child: LocationId, fare: f64) -> Result<()> {
        self.check_registered(parent)?;
        self.check_registered(child)?;
        if fare <= 0.0 {
            return Err(Error::NonPositiveFare(fare));
        }
        if self.parent[child.index()].is_some() || child == self.root {
            return Err(Error::WouldCreateCycle(child));
        }
        self.parent[child.index()] = Some(parent);
        self.parent_fare[child.index()] = Some(fare);
        self.children[parent.index()].push(child);
        Ok(())
    }

    /// Fare of the single edge between two adjacent locations, symmetric.
    fn edge_fare(&self, a: LocationId, b: LocationId) -> Result<f64> {
        if self.parent[b.index()] == Some(a) {
            return Ok(self.parent_fare[b.index()].unwrap());
        }
        if self.parent[a.index()] == Some(b) {
            return Ok(self.parent_fare[a.index()].unwrap());
        }
        Err(Error::BrokenAdjacency(a, b))
    }

    /// Root-to-node ancestor chain, `[location, parent(location), ..., root_of_component]`.
    fn ancestors(&self, location: LocationId) -> Vec<LocationId> {
        let mut chain = vec![location];
        let mut current = location;
        while let Some(p) = self.parent[current.index()] {
            chain.push(p);
            current = p;
        }
        chain
    }

    /// Returns the unique tree path from `a` to `b`. Computed as a pure
    /// lowest-common-ancestor walk: no parent pointer is mutated, so this is
    /// safe to call concurrently on a shared `&MapGraph`.
    pub fn route(&self, a: LocationId, b: LocationId) -> Result<Route> {
        self.check_registered(a)?;
        self.check_registered(b)?;
        if a == b {
            return Ok(Route { stops: vec![a] });
        }
        let anc_a = self.ancestors(a);
        let anc_b = self.ancestors(b);
        let b_index: HashMap<LocationId, usize> = anc_b
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let Some((a_idx, &lca)) = anc_a
            .iter()
            .enumerate()
            .find(|(_, id)| b_index.contains_key(id))
        else {
            return Err(Error::Disconnected(a, b));
        };
        let b_idx = b_index[&lca];

        let mut stops: Vec<LocationId> = anc_a[..=a_idx].to_vec();
        stops.extend(anc_b[..b_idx].iter().rev().copied());
        Ok(Route { stops })
    }

    /// Sums the edge fares along `route`.
    pub fn route_fare(&self, route: &Route) -> Result<f64> {
        if route.stops.is_empty() {
            return Err(Error::EmptyRoute);
        }
        let mut total = 0.0;
        for pair in route.stops.windows(2) {
            total += self.edge_fare(pair[0], pair[1])?;
        }
        Ok(total)
    }
}

#[allow(dead_code)]
fn unique<I: IntoIterator<Item = LocationId>>(iter: I) -> HashSet<LocationId> {
    iter.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> (MapGraph, LocationId, LocationId, LocationId, LocationId, LocationId) {
        let mut g = MapGraph::new("IISERB");
        let root = g.root();
        let dmart = g.register_location("DMART");
        let lal_ghati = g.register_location("LAL_GHATI");
        let shivhare = g.register_location("SHIVHARE");
        let green_bay = g.register_location("GREEN_BAY");
        g.add_edge(root, dmart, 150.0).unwrap();
        g.add_edge(dmart, lal_ghati, 50.0).unwrap();
        g.add_edge(root, shivhare, 80.0).unwrap();
        g.add_edge(root, green_bay, 120.0).unwrap();
        (g, root, dmart, lal_ghati, shivhare, green_bay)
    }

    #[test]
    fn route_reversal_is_symmetric() {
        let (g, root, _dmart, lal_ghati, _shivhare, _green_bay) = sample_graph();
        let forward = g.route(root, lal_ghati).unwrap();
        let backward = g.route(lal_ghati, root).unwrap();
        let reversed: Vec<_> = backward.stops().iter().rev().copied().collect();
        assert_eq!(forward.stops(), reversed.as_slice());
    }

    #[test]
    fn route_fare_is_symmetric() {
        let (g, root, _dmart, lal_ghati, _shivhare, _green_bay) = sample_graph();
        let forward = g.route(root, lal_ghati).unwrap();
        let backward = g.route(lal_ghati, root).unwrap();
        assert_eq!(
            g.route_fare(&forward).unwrap(),
            g.route_fare(&backward).unwrap()
        );
        assert_eq!(g.route_fare(&forward).unwrap(), 200.0);
    }

    #[test]
    fn disjoint_children_share_only_the_root() {
        let (g, root, _dmart, _lal_ghati, shivhare, green_bay) = sample_graph();
        let route = g.route(shivhare, green_bay).unwrap();
        assert_eq!(route.stops(), &[shivhare, root, green_bay]);
    }

    #[test]
    fn cycle_attempt_is_rejected() {
        let (mut g, root, dmart, _lal_ghati, _shivhare, _green_bay) = sample_graph();
        assert_eq!(
            g.add_edge(dmart, root, 10.0),
            Err(Error::WouldCreateCycle(root))
        );
    }

    #[test]
    fn non_positive_fare_is_rejected() {
        let mut g = MapGraph::new("IISERB");
        let root = g.root();
        let a = g.register_location("A");
        assert_eq!(g.add_edge(root, a, 0.0), Err(Error::NonPositiveFare(0.0)));
    }

    #[test]
    fn unregistered_location_is_rejected() {
        let g = MapGraph::new("IISERB");
        assert_eq!(
            g.route(g.root(), LocationId(99)),
            Err(Error::UnknownLocation(LocationId(99)))
        );
    }

    #[test]
    fn register_location_is_idempotent() {
        let mut g = MapGraph::new("IISERB");
        let a1 = g.register_location("A");
        let a2 = g.register_location("A");
        assert_eq!(a1, a2);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn shared_prefix_of_prefix_subsumed_route() {
        let (g, root, dmart, lal_ghati, _shivhare, _green_bay) = sample_graph();
        let route_a = g.route(root, dmart).unwrap();
        let route_b = g.route(root, lal_ghati).unwrap();
        let prefix = route_a.shared_prefix(&route_b);
        assert_eq!(prefix, route_a);
    }

    #[test]
    fn route_is_idempotent_and_does_not_mutate_root() {
        let (g, root, _dmart, lal_ghati, _shivhare, _green_bay) = sample_graph();
        let before = g.route(root, lal_ghati).unwrap();
        let _ = g.route(lal_ghati, root).unwrap();
        let after = g.route(root, lal_ghati).unwrap();
        assert_eq!(before, after);
        assert_eq!(g.root(), root);
    }
}
