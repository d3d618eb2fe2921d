use std::collections::{HashMap, HashSet};

use crate::direction::Direction;
use crate::grid::{Grid, Location};

/// How the search last reached a location.
#[derive(Debug, Clone, Copy)]
struct Visit {
    dir: Direction,
    from: Location,
    distance: usize,
}

/// Find the shortest walk from `from` to `to` without pushing any box.
/// Walls and boxes both block. Returns `None` if `to` cannot be reached.
///
/// Neighbors are expanded in `Down, Left, Right, Up` order. A location seen
/// again from another node of the same frontier is re-assigned to that node,
/// so among equally short walks the last expanded predecessor wins. The
/// frontier keeps each location at its last position, which expands nodes
/// in the same order as a plain FIFO queue that re-queues on every
/// reassignment, without the queue growing with the number of shortest
/// paths.
pub fn shortest_path(grid: &Grid, from: Location, to: Location) -> Option<Vec<Direction>> {
    if from == to {
        return Some(Vec::new());
    }

    let mut visits: HashMap<Location, Visit> = HashMap::new();
    visits.insert(
        from,
        Visit {
            dir: Direction::Down,
            from,
            distance: 0,
        },
    );

    let mut frontier = vec![from];
    let mut distance = 0;
    let mut reached = false;

    while !frontier.is_empty() && !reached {
        let mut next = Vec::new();
        for &loc in &frontier {
            for (dir, neighbor) in grid.open_neighbors(loc) {
                if visits
                    .get(&neighbor)
                    .is_some_and(|visit| visit.distance <= distance)
                {
                    continue;
                }
                visits.insert(
                    neighbor,
                    Visit {
                        dir,
                        from: loc,
                        distance: distance + 1,
                    },
                );
                reached |= neighbor == to;
                next.push(neighbor);
            }
        }
        frontier = last_occurrences(next);
        distance += 1;
    }

    if !reached {
        return None;
    }

    let mut path = Vec::with_capacity(distance);
    let mut cur = to;
    while cur != from {
        let visit = visits[&cur];
        path.push(visit.dir);
        cur = visit.from;
    }
    path.reverse();
    Some(path)
}

/// Drop all but the last occurrence of each location, keeping order.
fn last_occurrences(queue: Vec<Location>) -> Vec<Location> {
    let mut seen = HashSet::new();
    let mut order: Vec<Location> = queue
        .into_iter()
        .rev()
        .filter(|loc| seen.insert(*loc))
        .collect();
    order.reverse();
    order
}
