use std::collections::VecDeque;

/// Triangle-to-triangle adjacency across edges.
pub trait Adjacency {
    /// Number of triangles in the graph.
    fn triangle_count(&self) -> usize;

    /// Triangles across edges 0-1, 1-2 and 2-0 of `triangle`, `None` where
    /// there is no neighbor.
    fn neighbors(&self, triangle: usize) -> [Option<usize>; 3];
}

/// Decides whether the flood may grow from `from` into `candidate`.
///
/// Implementations must be pure: the result may depend only on the two
/// indices and on state that stays unchanged during the traversal.
pub trait Inclusion {
    fn include(&self, candidate: usize, from: usize) -> bool;
}

impl<F> Inclusion for F
where
    F: Fn(usize, usize) -> bool,
{
    fn include(&self, candidate: usize, from: usize) -> bool {
        self(candidate, from)
    }
}

/// Breadth-first flood fill from `start`.
///
/// A neighbor is entered when it has not been visited yet and
/// `predicate.include(neighbor, current)` holds. The start triangle is always
/// part of the result. Triangles appear once each, in BFS order, so the
/// output is sorted by graph distance from `start`.
///
/// # Panics
///
/// Panics if `start` is not a triangle of `graph`.
pub fn flood_fill<A, P>(graph: &A, start: usize, predicate: &P) -> Vec<usize>
where
    A: Adjacency + ?Sized,
    P: Inclusion + ?Sized,
{
    let count = graph.triangle_count();
    assert!(start < count, "start triangle {start} out of range ({count})");

    let mut visited = vec![false; count];
    let mut queue = VecDeque::new();
    let mut reached = Vec::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors(current).into_iter().flatten() {
            if !visited[neighbor] && predicate.include(neighbor, current) {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
        reached.push(current);
    }

    reached
}
