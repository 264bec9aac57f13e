use bombfinder_core::{Board, FlagIcon, Tile, TileValue};

fn value_char(value: TileValue) -> char {
    match value {
        TileValue::Bomb => '*',
        TileValue::Number(0) => '.',
        TileValue::Number(count) => char::from(b'0' + count),
    }
}

fn player_char(tile: &Tile) -> char {
    if tile.is_shown() {
        return value_char(tile.value());
    }
    match tile.flag_icon() {
        FlagIcon::None => '#',
        FlagIcon::Flag => 'F',
        FlagIcon::Question => '?',
    }
}

fn grid(board: &Board, cell: impl Fn(&Tile) -> char) -> String {
    board
        .tiles()
        .chunks(usize::from(board.width()))
        .map(|row| {
            row.iter()
                .map(|tile| cell(tile).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole layout, hidden or not.
pub fn layout(board: &Board) -> String {
    grid(board, |tile| value_char(tile.value()))
}

/// What the player sees: covers, markers and shown tiles.
pub fn player_view(board: &Board) -> String {
    grid(board, player_char)
}
