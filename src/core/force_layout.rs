use petgraph::EdgeType;
use petgraph::graph::Graph;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::Point;

/// Pairwise distances below this are clipped to avoid exploding forces.
const MIN_DISTANCE: f64 = 0.01;
/// Step length used when a node's net displacement is shorter than `MIN_DISTANCE`.
const SHORT_DISPLACEMENT: f64 = 0.1;

/// Fruchterman-Reingold spring layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringLayoutConfig {
    pub iterations: usize,
    pub threshold: f64,
    pub seed: u64,
    pub scale: f64,
}

impl Default for SpringLayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            threshold: 1e-4,
            seed: 42,
            scale: 1.0,
        }
    }
}

/// Positions every node with a force-directed layout.
///
/// Returns one point per node in node-index order, centered on the origin
/// and scaled so the largest absolute coordinate equals `config.scale`.
#[must_use]
pub fn spring_layout<N, E, Ty: EdgeType>(
    graph: &Graph<N, E, Ty>,
    config: SpringLayoutConfig,
) -> Vec<Point> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![Point::new(0.0, 0.0)],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.r#gen::<f64>(), rng.r#gen::<f64>()))
        .collect();

    let neighbors = neighbor_lists(graph);

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = extent(&positions) * 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for iteration in 0..config.iterations {
        let displacement = displacements(&positions, &neighbors, k);
        let mut moved_sq = 0.0;
        for (position, force) in positions.iter_mut().zip(displacement) {
            let length = displacement_length(force);
            let step = Point::new(
                force.x * temperature / length,
                force.y * temperature / length,
            );
            position.x += step.x;
            position.y += step.y;
            moved_sq += step.x * step.x + step.y * step.y;
        }
        temperature -= cooling;

        let error = moved_sq.sqrt() / n as f64;
        trace!(iteration, error, "spring layout step");
        if error < config.threshold {
            break;
        }
    }

    rescale(&mut positions, config.scale);
    positions
}

fn displacement_length(force: Point) -> f64 {
    let length = force.x.hypot(force.y);
    if length < MIN_DISTANCE { SHORT_DISPLACEMENT } else { length }
}

/// Distinct neighbors of every node, self-loops excluded.
///
/// Parallel edges count once, so the attraction matches an unweighted
/// adjacency.
fn neighbor_lists<N, E, Ty: EdgeType>(graph: &Graph<N, E, Ty>) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); graph.node_count()];
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a != b {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

fn displacement_for(index: usize, positions: &[Point], neighbors: &[Vec<usize>], k: f64) -> Point {
    let origin = positions[index];
    let offset = |other: usize| {
        let dx = origin.x - positions[other].x;
        let dy = origin.y - positions[other].y;
        (dx, dy, dx.hypot(dy).max(MIN_DISTANCE))
    };

    let mut force = Point::default();
    for other in (0..positions.len()).filter(|other| *other != index) {
        let (dx, dy, distance) = offset(other);
        let repulsion = k * k / (distance * distance);
        force.x += dx * repulsion;
        force.y += dy * repulsion;
    }
    for &other in &neighbors[index] {
        let (dx, dy, distance) = offset(other);
        let attraction = distance / k;
        force.x -= dx * attraction;
        force.y -= dy * attraction;
    }
    force
}

#[cfg(not(feature = "parallel-layout"))]
fn displacements(positions: &[Point], neighbors: &[Vec<usize>], k: f64) -> Vec<Point> {
    (0..positions.len())
        .map(|index| displacement_for(index, positions, neighbors, k))
        .collect()
}

#[cfg(feature = "parallel-layout")]
fn displacements(positions: &[Point], neighbors: &[Vec<usize>], k: f64) -> Vec<Point> {
    use rayon::prelude::*;

    (0..positions.len())
        .into_par_iter()
        .map(|index| displacement_for(index, positions, neighbors, k))
        .collect()
}

fn extent(positions: &[Point]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for position in positions {
        min_x = min_x.min(position.x);
        max_x = max_x.max(position.x);
        min_y = min_y.min(position.y);
        max_y = max_y.max(position.y);
    }
    (max_x - min_x).max(max_y - min_y)
}

fn rescale(positions: &mut [Point], scale: f64) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;
    let mut limit = 0.0_f64;
    for position in positions.iter_mut() {
        position.x -= mean_x;
        position.y -= mean_y;
        limit = limit.max(position.x.abs()).max(position.y.abs());
    }
    if limit > 0.0 {
        for position in positions.iter_mut() {
            position.x *= scale / limit;
            position.y *= scale / limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use petgraph::graph::UnGraph;

    use super::{SpringLayoutConfig, displacement_length, neighbor_lists, spring_layout};
    use crate::core::types::Point;

    #[test]
    fn connected_nodes_end_closer_than_disconnected_ones() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        let d = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(c, d, ());

        let positions = spring_layout(&graph, SpringLayoutConfig::default());
        let linked = positions[0].distance_to(positions[1]);
        let unlinked = positions[0].distance_to(positions[2]);
        assert!(linked < unlinked, "linked={linked} unlinked={unlinked}");
    }

    #[test]
    fn single_node_sits_at_origin() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        graph.add_node(());
        let positions = spring_layout(&graph, SpringLayoutConfig::default());
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].x, 0.0);
        assert_eq!(positions[0].y, 0.0);
    }

    #[test]
    fn short_displacements_step_a_fixed_length() {
        assert_eq!(displacement_length(Point::new(0.0, 0.0)), 0.1);
        assert_eq!(displacement_length(Point::new(0.005, 0.0)), 0.1);
        assert_eq!(displacement_length(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn neighbor_lists_skip_self_loops_and_parallel_edges() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());
        graph.add_edge(c, c, ());

        let neighbors = neighbor_lists(&graph);
        assert_eq!(neighbors, vec![vec![1], vec![0], Vec::<usize>::new()]);
    }
}
