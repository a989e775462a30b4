//! # Cluster Analyzer
//!
//! Groups fuel cells that are invalid or subcritical into 6-connected
//! clusters, so a report can say "N problem cells form M clusters". Clusters
//! are diagnostics only and never feed back into validity or stats.
//!
//! Invalid cells are also labelled on their own. Removing a fuel cell can
//! turn a critical neighbour subcritical and bridge several problem clusters
//! at once, so only the invalid-only count keeps a bound under removal: it
//! drops by at most one as long as the fuel cell rules do not count fuel cell
//! neighbours.

use std::collections::VecDeque;

use bitvec::prelude::BitVec;
use cgmath::Point3;
use serde::Serialize;

use crate::planner_state::reactor::block::block_side::BlockSide;
use crate::planner_state::reactor::block::Block;
use crate::planner_state::reactor::grid::Grid;

/// A maximal connected set of problem fuel cells, in storage order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub positions: Vec<Point3<i32>>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.positions.contains(&position)
    }
}

/// Whether a block is a fuel cell that is invalid or not critical.
pub fn is_problem_cell(block: &Block) -> bool {
    block.as_fuel_cell().is_some_and(|cell| !cell.is_active())
}

/// Whether a block is a fuel cell failing its placement rules.
pub fn is_invalid_cell(block: &Block) -> bool {
    block.as_fuel_cell().is_some_and(|cell| !cell.is_valid())
}

/// Labels the 6-connected components of problem fuel cells.
///
/// Clusters come out ordered by their first cell in storage order, and each
/// cluster lists its cells in storage order.
pub fn find_clusters(grid: &Grid) -> Vec<Cluster> {
    label_clusters(grid, is_problem_cell)
}

/// Labels the 6-connected components of invalid fuel cells only.
pub fn find_invalid_clusters(grid: &Grid) -> Vec<Cluster> {
    label_clusters(grid, is_invalid_cell)
}

fn label_clusters(grid: &Grid, member: impl Fn(&Block) -> bool) -> Vec<Cluster> {
    let mut visited: BitVec = BitVec::repeat(false, grid.volume());
    let mut clusters = Vec::new();

    let seeds: Vec<Point3<i32>> = grid
        .occupied_blocks()
        .filter(|&block| member(block))
        .map(|block| block.position())
        .collect();

    for seed in seeds {
        let Some(seed_index) = grid.index_of(seed) else {
            continue;
        };
        if visited[seed_index] {
            continue;
        }

        visited.set(seed_index, true);
        let mut members = vec![seed_index];
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            for side in BlockSide::all() {
                let neighbour = current + side.offset();
                let Some(index) = grid.index_of(neighbour) else {
                    continue;
                };
                if visited[index] || !member(grid.block_at(neighbour)) {
                    continue;
                }
                visited.set(index, true);
                members.push(index);
                queue.push_back(neighbour);
            }
        }

        members.sort_unstable();
        clusters.push(Cluster {
            positions: members.into_iter().map(|index| grid.position_of(index)).collect(),
        });
    }

    clusters
}
