use tracing::{debug, trace, warn};

use crate::path::shortest_path;
use crate::segment::Segment;

/// Run a single merge pass over `segments`.
///
/// For each segment `i`, candidates `j` are tried from the last segment
/// backwards, so the largest window is preferred. A window `i..=j` collapses
/// into one segment when both snapshots are equal and walking straight from
/// the start of `i` to the end of `j` (plus the final push) is strictly
/// cheaper than walking and pushing every segment of the window.
///
/// This is a greedy heuristic: it never undoes a merge and does not search
/// for the combination of windows with the lowest total cost.
pub fn merge_pass(segments: Vec<Segment>) -> Vec<Segment> {
    let costs = segment_costs(&segments);

    let mut windows = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        let j = find_window(&segments, &costs, i).unwrap_or(i);
        windows.push((i, j));
        i = j + 1;
    }

    let mut merged = Vec::with_capacity(windows.len());
    let mut rest = segments.into_iter();
    for (i, j) in windows {
        let Some(first) = rest.next() else {
            break;
        };
        if i == j {
            merged.push(first);
            continue;
        }
        let Some(last) = rest.nth(j - i - 1) else {
            break;
        };
        trace!(
            "merged segments {}..={} into a walk from {} to {}",
            i, j, first.start, last.end
        );
        merged.push(Segment {
            push: last.push,
            start: first.start,
            end: last.end,
            snapshot: last.snapshot,
        });
    }

    merged
}

/// Repeat merge passes until one leaves the number of segments unchanged.
pub fn merge_to_fixed_point(mut segments: Vec<Segment>) -> Vec<Segment> {
    let mut pass = 0;
    loop {
        let before = segments.len();
        segments = merge_pass(segments);
        pass += 1;
        debug!("merge pass {}: {} -> {} segments", pass, before, segments.len());
        if segments.len() == before {
            return segments;
        }
    }
}

/// Walk-plus-push cost of each segment within its own snapshot. A segment
/// whose walk cannot be found contributes nothing.
fn segment_costs(segments: &[Segment]) -> Vec<usize> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| match segment.walk() {
            Some(walk) => walk.len() + 1,
            None => {
                warn!("segment {} is not walkable: {}", index, segment);
                0
            }
        })
        .collect()
}

/// The largest `j > i` whose window `i..=j` is worth merging.
fn find_window(segments: &[Segment], costs: &[usize], i: usize) -> Option<usize> {
    let first = &segments[i];
    (i + 1..segments.len()).rev().find(|&j| {
        let last = &segments[j];
        if first.snapshot != last.snapshot {
            return false;
        }
        let Some(direct) = shortest_path(&first.snapshot, first.start, last.end) else {
            return false;
        };
        let replayed: usize = costs[i..=j].iter().sum();
        direct.len() + 1 < replayed
    })
}
