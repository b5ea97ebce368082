use minefield_core::{BoardView, CellView, GameStatus, iter_coords};

pub fn glyph(cell: CellView) -> char {
    use CellView::*;
    match cell {
        Hidden => '~',
        Revealed(0) => ' ',
        Revealed(count) => char::from(b'0' + count),
        Flagged => 'F',
        Questioned => '?',
        Exploded => '*',
        Mine => 'M',
        IncorrectFlag => 'X',
    }
}

/// Header with the counters followed by the board, rows and columns labelled.
pub fn render(view: &BoardView) -> String {
    let (height, width) = view.size;
    let mut out = format!(
        "Mines: {:>3}  Time: {:03}\n   ",
        view.mines_left, view.elapsed_secs
    );

    for col in 0..width {
        out.push_str(&format!("{:>3}", col));
    }
    for (row, col) in iter_coords((height, width)) {
        if col == 0 {
            out.push_str(&format!("\n{:>3}", row));
        }
        out.push_str(&format!("{:>3}", glyph(view.cell_at((row, col)))));
    }
    out.push('\n');

    out
}

pub fn status_message(view: &BoardView) -> Option<String> {
    match view.status? {
        GameStatus::InProgress => None,
        GameStatus::Won { elapsed_secs } => Some(format!(
            "You win! You cleared the minefield in {} seconds!",
            elapsed_secs
        )),
        GameStatus::Lost {
            elapsed_secs,
            trigger: (row, col),
        } => Some(format!(
            "Game over! Mine at {} {} with {} mines left at {} seconds...",
            row, col, view.mines_left, elapsed_secs
        )),
    }
}
