use types::{Cell, CellKind, PlayerRecord};

/// Whether `player` satisfies `cell`. Pure and deterministic.
///
/// Combo cells are conjunctive: every `+`-joined part must
/// independently be one of the player's teams, their nation, or one of
/// their trophies.
pub fn matches(player: &PlayerRecord, cell: &Cell) -> bool {
    match cell.kind {
        CellKind::Team => player.teams.iter().any(|team| *team == cell.value),
        CellKind::Nation => player.nation == cell.value,
        CellKind::Trophy => player.trophies.iter().any(|trophy| *trophy == cell.value),
        CellKind::Combo => {
            let parts = cell.parts();
            !parts.is_empty() && parts.iter().all(|part| satisfies_part(player, part))
        }
    }
}

fn satisfies_part(player: &PlayerRecord, part: &str) -> bool {
    player.teams.iter().any(|team| team == part)
        || player.nation == part
        || player.trophies.iter().any(|trophy| trophy == part)
}
