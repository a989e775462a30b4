//! # Grid Iteration Module
//!
//! Iterators over the blocks of a [`Grid`].
//!
//! `GridBlockIterator` walks the occupancy bit vector and yields only non-Air
//! blocks, skipping runs of empty cells a word at a time. `LayerIterator`
//! yields every cell of one horizontal layer, which is what a per-layer view
//! of the reactor needs.

use crate::planner_state::reactor::block::Block;

use super::Grid;

/// An iterator over all non-Air blocks of a grid, in storage order.
pub struct GridBlockIterator<'a> {
    /// Reference to the grid being iterated over
    grid_ref: &'a Grid,
    /// Next dense index to examine
    next_index: usize,
}

impl<'a> GridBlockIterator<'a> {
    pub fn new(grid_ref: &'a Grid) -> Self {
        GridBlockIterator {
            grid_ref,
            next_index: 0,
        }
    }
}

impl<'a> Iterator for GridBlockIterator<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let occupied = &self.grid_ref.occupied;
        if self.next_index >= occupied.len() {
            return None;
        }

        let offset = occupied[self.next_index..].first_one()?;
        let index = self.next_index + offset;
        self.next_index = index + 1;

        Some(&self.grid_ref.blocks[index])
    }
}

/// An iterator over every cell of one horizontal (constant y) layer.
pub struct LayerIterator<'a> {
    grid_ref: &'a Grid,
    /// Next index within the layer, `x + width * z`
    cursor: usize,
    /// Dense index of the layer's first cell, `None` for layers outside the grid
    layer_start: Option<usize>,
}

impl<'a> LayerIterator<'a> {
    pub fn new(grid_ref: &'a Grid, y: i32) -> Self {
        let layer_start = (1..=grid_ref.dims.y)
            .contains(&y)
            .then(|| (y - 1) as usize * grid_ref.dims.x as usize);

        LayerIterator {
            grid_ref,
            cursor: 0,
            layer_start,
        }
    }
}

impl<'a> Iterator for LayerIterator<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let layer_start = self.layer_start?;
        let width = self.grid_ref.dims.x as usize;
        let depth = self.grid_ref.dims.z as usize;
        if self.cursor >= width * depth {
            return None;
        }

        let plane = width * self.grid_ref.dims.y as usize;
        let x = self.cursor % width;
        let z = self.cursor / width;
        self.cursor += 1;

        Some(&self.grid_ref.blocks[layer_start + x + plane * z])
    }
}
