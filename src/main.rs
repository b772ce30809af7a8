//! Terminal runner (default binary).
//!
//! Wires the pieces together end to end: the capture thread feeds key
//! snapshots into the handling layer, the fixed-tick loop drains the
//! action queue into the game, and a plain character grid shows the
//! result. Everything interesting lives in the member crates; this file
//! is scaffolding.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyCode;
use crossterm::{cursor, execute, queue, style::Print, terminal};
use serde::Deserialize;

use tetrion::engine::{Game, TickClock};
use tetrion::input::{Handling, InputCapture, KeyBindings, KeySnapshot};
use tetrion::types::{HandlingConfig, MATRIX_WIDTH, TICK_MS, VISIBLE_HEIGHT, VISIBLE_TOP};

/// Host configuration document. Both sections are optional; missing keys
/// fall back to the documented defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppConfig {
    handling: HandlingConfig,
    bindings: KeyBindings,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(&args)?;

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(config);

    // Always try to restore terminal state.
    let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn load_config(args: &[String]) -> Result<AppConfig> {
    let mut path: Option<String> = None;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                path = Some(v.clone());
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path))
        }
        None => Ok(AppConfig::default()),
    }
}

fn run(config: AppConfig) -> Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1);

    let mut game = Game::new(seed, config.handling.clone());
    game.start();

    let mut handling = Handling::new(config.handling, config.bindings);
    let mut capture = InputCapture::spawn();
    let slot = capture.slot();

    let mut clock = TickClock::new(TICK_MS);
    let started = Instant::now();
    let mut last_iteration = Instant::now();
    let mut keys = KeySnapshot::default();

    loop {
        // Drain the latest key snapshot at the start of the iteration;
        // the hand-off is last-writer-wins.
        if let Some(snapshot) = slot.take() {
            keys = snapshot;
        }
        if keys.is_down(KeyCode::Esc) || keys.is_down(KeyCode::Char('q')) {
            break;
        }

        let elapsed_ms = last_iteration.elapsed().as_millis() as u32;
        last_iteration = Instant::now();

        for _ in 0..clock.advance(elapsed_ms) {
            handling.tick(started.elapsed(), &keys);
            while let Some(event) = handling.consume() {
                game.apply(event.action);
            }
            game.tick(TICK_MS);
        }

        draw(&game)?;
        if game.flags().game_over {
            break;
        }

        thread::sleep(Duration::from_millis(u64::from(TICK_MS) / 2));
    }

    capture.shutdown();
    Ok(())
}

/// Plain character grid of the visible field: `#` stack, `@` active piece,
/// `:` ghost.
fn draw(game: &Game) -> Result<()> {
    let mut grid = [[b'.'; MATRIX_WIDTH]; VISIBLE_HEIGHT];

    for (row, cells) in grid.iter_mut().enumerate() {
        let y = (VISIBLE_TOP + row) as i32;
        for (x, cell) in cells.iter_mut().enumerate() {
            if game.matrix().cell(x as i32, y) != 0 {
                *cell = b'#';
            }
        }
    }

    if let Some(piece) = game.active() {
        let overlay = |grid: &mut [[u8; MATRIX_WIDTH]; VISIBLE_HEIGHT], oy: i32, glyph: u8| {
            for (dx, dy, _) in piece.mask().filled() {
                let x = piece.x() + dx as i32;
                let y = oy + dy as i32 - VISIBLE_TOP as i32;
                if (0..VISIBLE_HEIGHT as i32).contains(&y) {
                    grid[y as usize][x as usize] = glyph;
                }
            }
        };
        overlay(&mut grid, piece.ghost_y(game.matrix()), b':');
        overlay(&mut grid, piece.y(), b'@');
    }

    let mut stdout = io::stdout();
    queue!(stdout, cursor::MoveTo(0, 0))?;
    for row in &grid {
        queue!(
            stdout,
            Print("|"),
            Print(String::from_utf8_lossy(row)),
            Print("|\r\n")
        )?;
    }
    queue!(stdout, Print("+"), Print("-".repeat(MATRIX_WIDTH)), Print("+\r\n"))?;

    let flags = game.flags();
    let mut status = String::new();
    if let Some(held) = game.hold_piece() {
        status.push_str(&format!("hold:{} ", held.as_char()));
    }
    if let Some(spin) = flags.spin.as_str() {
        status.push_str(spin);
        status.push(' ');
    }
    if flags.danger {
        status.push_str("danger ");
    }
    if flags.game_over {
        status.push_str("game over");
    }
    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::UntilNewLine),
        Print(status),
        Print("\r\n")
    )?;

    stdout.flush()?;
    Ok(())
}
