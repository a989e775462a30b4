//! # Placement Rules
//!
//! The static adjacency table that decides whether fuel cells, reflectors and
//! heat sinks are valid. A rule asks for at least `count` of the six neighbours
//! to be of a given block type, optionally with a given name.
//!
//! Rules are evaluated in one of two modes:
//!
//! * [`RuleMode::Placement`] counts neighbours by type alone. Fuel cells and
//!   reflectors use it, which keeps their validity independent of moderators.
//! * [`RuleMode::Validated`] only counts neighbours that are currently valid.
//!   Heat sinks use it once moderators and fuel cells are resolved.
//!
//! In both modes a neighbour on the casing ring counts as a casing.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::planner_state::reactor::block::block_side::BlockSide;
use crate::planner_state::reactor::block::block_type::BlockType;
use crate::planner_state::reactor::block::CASING_NAME;
use crate::planner_state::reactor::grid::Grid;

fn default_count() -> u8 {
    1
}

/// "At least `count` neighbours of type `neighbour` (named `name`)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRule {
    pub neighbour: BlockType,
    #[serde(default = "default_count")]
    pub count: u8,
    /// Restricts the rule to neighbours with this display name (fuel name for fuel cells).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    Placement,
    Validated,
}

impl PlacementRule {
    pub fn at_least(count: u8, neighbour: BlockType) -> Self {
        PlacementRule {
            neighbour,
            count,
            name: None,
        }
    }

    pub fn at_least_named(count: u8, neighbour: BlockType, name: &str) -> Self {
        PlacementRule {
            neighbour,
            count,
            name: Some(name.to_string()),
        }
    }

    fn matches(&self, neighbour: &Neighbour<'_>, mode: RuleMode) -> bool {
        if neighbour.block_type != self.neighbour {
            return false;
        }
        if mode == RuleMode::Validated && !neighbour.valid {
            return false;
        }
        match &self.name {
            Some(name) => name == neighbour.name,
            None => true,
        }
    }

    fn satisfied_by(&self, neighbours: &[Neighbour<'_>], mode: RuleMode) -> bool {
        let matching = neighbours
            .iter()
            .filter(|neighbour| self.matches(neighbour, mode))
            .count();
        matching >= self.count as usize
    }
}

/// What a rule sees of one neighbouring cell.
struct Neighbour<'a> {
    block_type: BlockType,
    name: &'a str,
    valid: bool,
}

fn neighbours_of(grid: &Grid, position: Point3<i32>) -> Vec<Neighbour<'_>> {
    BlockSide::all()
        .into_iter()
        .map(|side| {
            let neighbour_position = position + side.offset();
            if grid.is_casing_ring(neighbour_position) {
                return Neighbour {
                    block_type: BlockType::Casing,
                    name: CASING_NAME,
                    valid: true,
                };
            }
            let block = grid.block_at(neighbour_position);
            Neighbour {
                block_type: block.block_type(),
                name: block.variant_key(),
                valid: block.is_valid(),
            }
        })
        .collect()
}

/// Whether the block at `position` satisfies every rule in `rules`.
///
/// An empty rule list is always satisfied.
pub fn rules_satisfied(
    grid: &Grid,
    position: Point3<i32>,
    rules: &[PlacementRule],
    mode: RuleMode,
) -> bool {
    if rules.is_empty() {
        return true;
    }
    let neighbours = neighbours_of(grid, position);
    rules.iter().all(|rule| rule.satisfied_by(&neighbours, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::planner_state::reactor::block::Block;
    use cgmath::Vector3;

    fn grid_with(blocks: &[(BlockType, &str, [i32; 3])]) -> Grid {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(3, 3, 3)).unwrap();
        for (block_type, name, [x, y, z]) in blocks {
            let block =
                Block::from_config(*block_type, name, Point3::new(*x, *y, *z), &config).unwrap();
            grid.set_block(block).unwrap();
        }
        grid
    }

    #[test]
    fn casing_ring_counts_as_casing() {
        let grid = grid_with(&[]);
        let corner = Point3::new(1, 1, 1);
        let centre = Point3::new(2, 2, 2);

        let three_casings = [PlacementRule::at_least(3, BlockType::Casing)];
        assert!(rules_satisfied(&grid, corner, &three_casings, RuleMode::Placement));
        assert!(!rules_satisfied(&grid, centre, &three_casings, RuleMode::Placement));
    }

    #[test]
    fn placement_mode_ignores_validity() {
        let grid = grid_with(&[(BlockType::Moderator, "Graphite", [2, 2, 1])]);
        let rule = [PlacementRule::at_least(1, BlockType::Moderator)];
        let position = Point3::new(2, 2, 2);

        assert!(rules_satisfied(&grid, position, &rule, RuleMode::Placement));
        assert!(!rules_satisfied(&grid, position, &rule, RuleMode::Validated));
    }

    #[test]
    fn named_rules_match_display_names() {
        let grid = grid_with(&[
            (BlockType::HeatSink, "Water", [1, 2, 2]),
            (BlockType::FuelCell, "HEU-235 Oxide", [3, 2, 2]),
        ]);
        let position = Point3::new(2, 2, 2);

        let water = [PlacementRule::at_least_named(1, BlockType::HeatSink, "Water")];
        let iron = [PlacementRule::at_least_named(1, BlockType::HeatSink, "Iron")];
        let heu = [PlacementRule::at_least_named(1, BlockType::FuelCell, "HEU-235 Oxide")];
        assert!(rules_satisfied(&grid, position, &water, RuleMode::Placement));
        assert!(!rules_satisfied(&grid, position, &iron, RuleMode::Placement));
        assert!(rules_satisfied(&grid, position, &heu, RuleMode::Placement));
    }

    #[test]
    fn every_rule_must_hold() {
        let grid = grid_with(&[(BlockType::FuelCell, "LEU-235 Oxide", [2, 2, 1])]);
        let rules = [
            PlacementRule::at_least(1, BlockType::FuelCell),
            PlacementRule::at_least(1, BlockType::Moderator),
        ];
        assert!(!rules_satisfied(&grid, Point3::new(2, 2, 2), &rules, RuleMode::Placement));
        assert!(rules_satisfied(&grid, Point3::new(2, 2, 2), &[], RuleMode::Validated));
    }

    #[test]
    fn count_defaults_to_one_in_json() {
        let rule: PlacementRule = serde_json::from_str(r#"{ "neighbour": "Casing" }"#).unwrap();
        assert_eq!(rule, PlacementRule::at_least(1, BlockType::Casing));
    }
}
