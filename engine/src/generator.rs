use std::collections::HashSet;

use rand::prelude::*;
use types::{Cell, CellKind, Difficulty, Grid, GridSize, PlayerPool, COMBO_SEPARATOR};

use crate::error::EngineError;

/// Attempts per cell to find a value not already on the board before
/// a duplicate is accepted.
const DEDUP_ATTEMPTS: usize = 20;

/// Last-resort nation when a pool has no usable nations at all.
const NATION_FALLBACK: &str = "India";

/// Build a `size`-sided grid from `pool`. The cell-kind mix depends on
/// `difficulty`; kind placement is shuffled so no position is biased
/// toward a kind.
pub fn generate(
    pool: &PlayerPool,
    size: GridSize,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Result<Grid, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::EmptyPool(pool.source()));
    }

    let mut kinds = kind_quota(size.cell_count(), difficulty);
    kinds.shuffle(rng);

    let mut cells = Vec::with_capacity(kinds.len());
    let mut seen: HashSet<String> = HashSet::new();
    for kind in kinds {
        let mut cell = gen_cell(pool, kind, rng);
        for _ in 1..DEDUP_ATTEMPTS {
            if !seen.contains(&cell.value) {
                break;
            }
            cell = gen_cell(pool, kind, rng);
        }
        if seen.contains(&cell.value) {
            log::debug!(
                "accepting duplicate value \"{}\" after {DEDUP_ATTEMPTS} draws",
                cell.value
            );
        }
        seen.insert(cell.value.clone());
        cells.push(cell);
    }
    Ok(Grid::new(size, cells))
}

/// Cell kinds for an `n`-cell board, before shuffling:
/// easy is all teams, normal splits teams/nations, hard adds combos.
fn kind_quota(n: usize, difficulty: Difficulty) -> Vec<CellKind> {
    match difficulty {
        Difficulty::Easy => vec![CellKind::Team; n],
        Difficulty::Normal => {
            let teams = n / 2;
            let mut kinds = vec![CellKind::Team; teams];
            kinds.extend(vec![CellKind::Nation; n - teams]);
            kinds
        }
        Difficulty::Hard => {
            let third = n / 3;
            let mut kinds = vec![CellKind::Team; third];
            kinds.extend(vec![CellKind::Nation; third]);
            kinds.extend(vec![CellKind::Combo; n - 2 * third]);
            kinds
        }
    }
}

fn gen_cell(pool: &PlayerPool, kind: CellKind, rng: &mut impl Rng) -> Cell {
    match kind {
        CellKind::Team => {
            if let Some(team) = pool.team_names().choose(rng) {
                return Cell::new(CellKind::Team, *team);
            }
        }
        CellKind::Trophy => {
            if let Some(trophy) = pool.trophies().choose(rng) {
                return Cell::new(CellKind::Trophy, *trophy);
            }
        }
        CellKind::Combo => {
            if let Some(cell) = gen_combo(pool, rng) {
                return cell;
            }
        }
        CellKind::Nation => {}
    }

    // Trophy-less pools and empty unions all bottom out at a nation
    // cell, matching the evaluator's cheapest attribute.
    match pool.nations().choose(rng) {
        Some(nation) => Cell::new(CellKind::Nation, *nation),
        None => Cell::new(CellKind::Nation, NATION_FALLBACK),
    }
}

/// A combo is anchored on one random player so the board stays
/// satisfiable: team + nation always, and when the player has trophies
/// also team + trophy and nation + trophy.
fn gen_combo(pool: &PlayerPool, rng: &mut impl Rng) -> Option<Cell> {
    let player = pool.players().choose(rng)?;
    let team = player.teams.choose(rng)?;
    let mut candidates = vec![format!("{team}{COMBO_SEPARATOR}{}", player.nation)];
    if let Some(trophy) = player.trophies.choose(rng) {
        candidates.push(format!("{team}{COMBO_SEPARATOR}{trophy}"));
        candidates.push(format!("{}{COMBO_SEPARATOR}{trophy}", player.nation));
    }
    candidates
        .choose(rng)
        .map(|value| Cell::new(CellKind::Combo, value.clone()))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use types::{DataSource, PlayerRecord};

    use super::*;

    fn record(id: &str, nation: &str, teams: &[&str], trophies: &[&str]) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: format!("Player {id}"),
            nation: nation.to_string(),
            teams: teams.iter().map(ToString::to_string).collect(),
            trophies: trophies.iter().map(ToString::to_string).collect(),
        }
    }

    fn varied_pool() -> PlayerPool {
        PlayerPool::new(
            DataSource::Overall,
            vec![
                record("p1", "India", &["Mumbai Indians"], &["IPL 2020"]),
                record("p2", "Australia", &["Gujarat Titans"], &[]),
                record("p3", "England", &["Chennai Super Kings"], &["IPL 2021"]),
                record("p4", "India", &["Rajasthan Royals"], &[]),
                record("p5", "South Africa", &["Delhi Capitals"], &["IPL 2008"]),
                record("p6", "New Zealand", &["Punjab Kings"], &[]),
            ],
        )
    }

    fn count_kind(grid: &Grid, kind: CellKind) -> usize {
        grid.cells().iter().filter(|cell| cell.kind == kind).count()
    }

    #[test]
    fn empty_pool_is_a_hard_error() {
        let pool = PlayerPool::new(DataSource::Overall, vec![]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&pool, GridSize::Three, Difficulty::Easy, &mut rng),
            Err(EngineError::EmptyPool(DataSource::Overall))
        );
    }

    #[test]
    fn easy_three_is_all_team_cells() {
        let mut rng = StdRng::seed_from_u64(2);
        let grid = generate(&varied_pool(), GridSize::Three, Difficulty::Easy, &mut rng)
            .expect("non-empty pool");
        assert_eq!(grid.len(), 9);
        assert_eq!(count_kind(&grid, CellKind::Team), 9);
    }

    #[test]
    fn normal_three_splits_four_team_five_nation() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = generate(&varied_pool(), GridSize::Three, Difficulty::Normal, &mut rng)
            .expect("non-empty pool");
        assert_eq!(count_kind(&grid, CellKind::Team), 4);
        assert_eq!(count_kind(&grid, CellKind::Nation), 5);
    }

    #[test]
    fn hard_four_splits_five_five_six() {
        let mut rng = StdRng::seed_from_u64(4);
        let grid = generate(&varied_pool(), GridSize::Four, Difficulty::Hard, &mut rng)
            .expect("non-empty pool");
        assert_eq!(grid.len(), 16);
        assert_eq!(count_kind(&grid, CellKind::Team), 5);
        assert_eq!(count_kind(&grid, CellKind::Nation), 5);
        assert_eq!(count_kind(&grid, CellKind::Combo), 6);
    }

    #[test]
    fn same_seed_reproduces_the_same_grid() {
        let pool = varied_pool();
        let grid_a = generate(
            &pool,
            GridSize::Three,
            Difficulty::Hard,
            &mut StdRng::seed_from_u64(42),
        )
        .expect("non-empty pool");
        let grid_b = generate(
            &pool,
            GridSize::Three,
            Difficulty::Hard,
            &mut StdRng::seed_from_u64(42),
        )
        .expect("non-empty pool");
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn pathological_pool_accepts_duplicates_after_retries() {
        // One team, one nation: a 3x3 easy board cannot avoid repeats.
        let pool = PlayerPool::new(
            DataSource::Overall,
            vec![record("p1", "India", &["Mumbai Indians"], &[])],
        );
        let mut rng = StdRng::seed_from_u64(5);
        let grid = generate(&pool, GridSize::Three, Difficulty::Easy, &mut rng)
            .expect("non-empty pool");
        assert_eq!(grid.len(), 9);
        assert!(grid
            .cells()
            .iter()
            .all(|cell| cell.value == "Mumbai Indians"));
    }

    #[test]
    fn current_source_combos_are_team_plus_nation() {
        let pool = PlayerPool::new(
            DataSource::Current,
            vec![
                record("p1", "India", &["Mumbai Indians"], &["IPL 2020"]),
                record("p2", "Australia", &["Gujarat Titans"], &[]),
            ],
        );
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..20 {
            if let Some(cell) = gen_combo(&pool, &mut rng) {
                let parts = cell.parts();
                assert_eq!(parts.len(), 2);
                let player = pool
                    .players()
                    .iter()
                    .find(|p| p.teams.iter().any(|t| t == parts[0]))
                    .expect("combo anchored on a pooled player");
                assert_eq!(parts[1], player.nation);
            }
        }
    }
}
