use finders_core as game;

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Converts page coordinates, anything negative or too large is not a cell.
pub(crate) fn to_coords(row: i32, col: i32) -> Option<game::Coord2> {
    Some((row.try_into().ok()?, col.try_into().ok()?))
}

/// Stylesheet class used for a cell.
pub(crate) fn css_class(kind: game::DisplayKind) -> String {
    use game::DisplayKind::*;

    match kind {
        Hidden => "hidden".to_string(),
        Flagged => "marker".to_string(),
        Target => "target".to_string(),
        IncorrectFlag => "incorrect-marker".to_string(),
        UnflaggedTarget => "unmarked-target".to_string(),
        Number(count) => format!("number-{}", count),
    }
}

/// Action button state name.
pub(crate) fn state_name(state: game::GameState) -> &'static str {
    use game::GameState::*;

    match state {
        NotStarted => "start",
        InProgress => "in-progress",
        Won => "won",
        Lost => "lost",
    }
}
