//! Synthetic Drag
//!
//! This example drives a drawing session with scripted pointer events
//! instead of a real pointer.
//!
//! Key concepts:
//! - Session as the single owner of game state
//! - Pattern and line listeners
//! - Repeated hovers over one tile are filtered out
//!
//! Run with: RUST_LOG=tilelock=debug cargo run --example synthetic_drag

use tilelock::observer::listener;
use tilelock::puzzle::{LineSnapshot, Point, PuzzleConfig, Session, SessionError, Tile};
use tracing_subscriber::EnvFilter;

const CELL: f64 = 40.0;

fn center(tile: Tile) -> Point {
    Point::new(
        (tile.column as f64 + 0.5) * CELL,
        (tile.row as f64 + 0.5) * CELL,
    )
}

fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("=== Synthetic Drag ===\n");

    let config = PuzzleConfig::from_json(r#"{ "columns": 3, "rows": 3 }"#)?;
    let mut session = Session::new(config)?;

    let on_pattern = listener(|tiles: &Vec<Tile>| {
        let path: Vec<String> = tiles.iter().map(Tile::to_string).collect();
        println!("\nPattern committed: {}", path.join(" -> "));
        Ok(())
    });
    let on_lines = listener(|snapshot: &LineSnapshot| {
        let pending = match &snapshot.incomplete {
            Some(pending) => format!(
                "dragging from {} to ({:.0}, {:.0})",
                pending.anchor, pending.pointer.x, pending.pointer.y
            ),
            None => "no pending line".to_string(),
        };
        println!("  lines: {} completed, {}", snapshot.completed.len(), pending);
        Ok(())
    });
    session.on_pattern(&on_pattern);
    session.on_lines(&on_lines);

    // An L-shaped gesture with a few jittery moves inside the same cell.
    let path = [(0, 0), (0, 0), (0, 1), (0, 2), (0, 2), (1, 2), (2, 2)];

    let start = Tile::from(path[0]);
    println!("Press on {start}");
    session.press(start)?;

    for (column, row) in path.iter().copied().skip(1) {
        let tile = Tile::new(column, row);
        println!("Hover over {tile}");
        session.hover(Some(tile), center(tile))?;
    }

    println!("Release");
    session.release()?;

    println!("\nFinal state: {}", session.state());
    println!("\n=== Example Complete ===");
    Ok(())
}
