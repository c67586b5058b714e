//! Terminal host (default binary).
//!
//! Owns the frame loop: feeds elapsed time and key presses into the session,
//! prints a plain character frame and turns session events into log lines.
//! Pause is the host withholding ticks and actions.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, style::Print, terminal, QueueableCommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use stackfall::core::{GameSnapshot, GameState};
use stackfall::input::{handle_key_event, host_command, should_quit, HostCommand};
use stackfall::types::{GameEvent, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, FRAME_MS};
use stackfall::HostConfig;

fn main() -> Result<()> {
    let config = HostConfig::from_env()?;
    init_logging(&config)?;

    let mut stdout = io::stdout();
    enter(&mut stdout)?;
    let result = run(&mut stdout, &config);

    // Always try to restore terminal state.
    let _ = exit(&mut stdout);
    result
}

fn init_logging(config: &HostConfig) -> Result<()> {
    let file = File::create(&config.log_path)
        .with_context(|| format!("creating log file {}", config.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn enter(out: &mut impl Write) -> Result<()> {
    terminal::enable_raw_mode()?;
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    out.flush()?;
    Ok(())
}

fn exit(out: &mut impl Write) -> Result<()> {
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    out.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

fn run(out: &mut impl Write, config: &HostConfig) -> Result<()> {
    let mut game = GameState::new(config.session);
    info!(seed = ?config.session.seed, level = config.session.start_level, "session started");

    let frame = Duration::from_millis(u64::from(FRAME_MS));
    let mut snapshot = GameSnapshot::default();
    let mut paused = false;
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snapshot);
        draw(out, &snapshot, paused)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match host_command(key) {
                        Some(HostCommand::TogglePause) => {
                            paused = !paused;
                            // Resume without a burst of stored-up time.
                            last_tick = Instant::now();
                        }
                        Some(HostCommand::Restart) => {
                            game.restart();
                            paused = false;
                            info!("restarted");
                        }
                        None => {
                            if let Some(action) = handle_key_event(key).filter(|_| !paused) {
                                game.apply_action(action);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            if !paused {
                game.update(u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX));
            }
        }

        for event in game.drain_events() {
            log_event(event);
        }
    }
}

/// Stand-in for the audio layer: every event becomes a log line
fn log_event(event: GameEvent) {
    match event {
        GameEvent::PieceRotated => debug!("rotate"),
        GameEvent::PiecePlaced { kind, lines_cleared } => debug!(?kind, lines_cleared, "place"),
        GameEvent::LinesCleared { count, points } => info!(count, points, "line clear"),
        GameEvent::LevelUp { level } => info!(level, "level up"),
        GameEvent::PieceHeld { kind } => debug!(?kind, "hold"),
        GameEvent::GameOver => info!("game over"),
    }
}

fn cell_char(tag: u8) -> char {
    PieceKind::from_tag(tag).map_or('.', PieceKind::as_char)
}

fn draw(out: &mut impl Write, snap: &GameSnapshot, paused: bool) -> Result<()> {
    let width = BOARD_WIDTH as usize;
    let height = BOARD_HEIGHT as usize;

    let mut rows: Vec<Vec<char>> = snap
        .board
        .iter()
        .map(|row| row.iter().map(|&t| cell_char(t)).collect())
        .collect();

    let active = snap.active;
    let cells = stackfall::core::cells(active.kind, active.rotation);
    if !snap.game_over {
        for &(dx, dy) in &cells {
            let (x, y) = (active.x + dx, snap.ghost_y + dy);
            if (0..width as i8).contains(&x) && (0..height as i8).contains(&y) {
                rows[y as usize][x as usize] = ':';
            }
        }
    }
    for &(dx, dy) in &cells {
        let (x, y) = (active.x + dx, active.y + dy);
        if (0..width as i8).contains(&x) && (0..height as i8).contains(&y) {
            rows[y as usize][x as usize] = active.kind.as_char();
        }
    }

    let next: String = snap.next_queue.iter().map(|k| k.as_char()).collect();
    let side = [
        format!("score {}", snap.score),
        format!("level {}", snap.level),
        format!("lines {}", snap.lines),
        format!("next  {next}"),
        format!("hold  {}", snap.hold.map_or('-', PieceKind::as_char)),
        String::new(),
        match (snap.game_over, paused) {
            (true, _) => "GAME OVER  r: restart".to_string(),
            (false, true) => "PAUSED  p: resume".to_string(),
            (false, false) => String::new(),
        },
        "q: quit".to_string(),
    ];

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, row) in rows.iter().enumerate() {
        let line: String = row.iter().flat_map(|&c| [c, ' ']).collect();
        out.queue(cursor::MoveTo(0, y as u16))?;
        out.queue(Print(format!("|{line}|")))?;
        if let Some(text) = side.get(y) {
            out.queue(Print(format!("  {text}")))?;
        }
    }
    out.queue(cursor::MoveTo(0, height as u16))?;
    out.queue(Print(format!("+{}+", "-".repeat(width * 2))))?;
    out.flush()?;
    Ok(())
}
