use minegym_core::Observation;

/// Renders the observation as an indexed grid: column header, rule line, one
/// numbered row per line.
pub fn render_board(observation: &Observation) -> String {
    let mut out = String::new();

    let header: Vec<String> = (0..observation.cols)
        .map(|col| format!("{col:2}"))
        .collect();
    out.push_str("   ");
    out.push_str(&header.join(" "));
    out.push('\n');

    out.push_str("  ");
    out.push_str(&"─".repeat(usize::from(observation.cols) * 3 + 1));
    out.push('\n');

    for (row, symbols) in observation.board.iter().enumerate() {
        let cells: Vec<String> = symbols.iter().map(char::to_string).collect();
        out.push_str(&format!("{row:2}│ "));
        out.push_str(&cells.join("  "));
        out.push('\n');
    }

    out
}

/// Builds the instruction block for an external decision-maker: game state as
/// JSON, the symbol legend, and the exact reply shape expected on the wire.
pub fn render_prompt(observation: &Observation) -> String {
    let state = serde_json::to_string_pretty(observation).unwrap_or_default();
    format!(
        r#"You are playing Minesweeper on a {rows}x{cols} board with {mines} mines.

Current state:
{state}

Board legend: '.' hidden, 'F' flagged, '*' exploded mine, digits are
adjacent mine counts. Row and column indices start at 0.

Reply with exactly one JSON object and nothing else:
  {{"type": "reveal", "row": <int>, "col": <int>}}  reveals a cell
  {{"type": "flag", "row": <int>, "col": <int>}}    toggles a flag

Revealing every safe cell wins. Revealing a mine, or sending any
invalid move, ends the game immediately.
"#,
        rows = observation.rows,
        cols = observation.cols,
        mines = observation.mines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegym_core::Coord;

    fn grid(board: &[&str]) -> Observation {
        let board: Vec<Vec<char>> = board.iter().map(|row| row.chars().collect()).collect();
        let rows = board.len() as Coord;
        let cols = board.first().map_or(0, |row| row.len()) as Coord;
        Observation {
            board,
            rows,
            cols,
            mines: 1,
            flags_placed: 1,
            cells_revealed: 1,
        }
    }

    #[test]
    fn renders_the_indexed_grid() {
        let observation = grid(&[".1", "F*"]);
        let want = "    0  1\n  ───────\n 0│ .  1\n 1│ F  *\n";
        assert_eq!(render_board(&observation), want);
    }

    #[test]
    fn renders_wide_boards_with_two_digit_indices() {
        let observation = grid(&["..........."]);
        let rendered = render_board(&observation);
        let header = rendered.lines().next().unwrap();
        assert!(header.ends_with("10"));
        assert!(rendered.lines().nth(1).unwrap().chars().all(|c| c == ' ' || c == '─'));
    }

    #[test]
    fn prompt_embeds_state_and_reply_shape() {
        let observation = grid(&[".1", "F*"]);
        let prompt = render_prompt(&observation);
        assert!(prompt.contains("2x2 board with 1 mines"));
        assert!(prompt.contains("\"cells_revealed\": 1"));
        assert!(prompt.contains("\"type\": \"reveal\""));
        assert!(prompt.contains("'.' hidden"));
    }
}
