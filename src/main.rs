//! Terminal room preview (default binary).
//!
//! Renders a room with half-block glyphs and drives it with the keyboard and
//! mouse. Configuration comes from `ISOROOM_*` environment variables; see
//! [`isoroom::preview::PreviewConfig`].

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use isoroom::input::{handle_key_event, should_quit, PointerTracker};
use isoroom::preview::{load_catalog, load_room, PreviewConfig, Scene};
use isoroom::term::{FrameBuffer, RenderThrottle, RoomView, TermSize, TerminalRenderer};

/// How long a status message replaces the help line.
const NOTICE_MS: u64 = 3000;

fn main() -> Result<()> {
    let config = PreviewConfig::from_env();

    // Load before touching the terminal so errors print normally.
    let load = load_room(&config)?;
    let catalog = load_catalog(&config)?;
    let size = terminal_size();
    let scene = Scene::new(load, catalog, size, config.verbose)?
        .with_screenshot_path(config.screenshot_path.clone());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, scene, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn terminal_size() -> TermSize {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    TermSize::new(w, h)
}

fn run(term: &mut TerminalRenderer, mut scene: Scene, config: &PreviewConfig) -> Result<()> {
    let view = RoomView::default();
    let mut pointer = PointerTracker::new();
    let mut throttle = RenderThrottle::preview();
    let mut fb = FrameBuffer::new(0, 0);
    let mut size = terminal_size();

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick = Duration::from_millis(config.tick_ms);
    let mut notice: Option<(String, u64)> = None;

    loop {
        let now_ms = started.elapsed().as_millis() as u64;

        // Render.
        if throttle.should_render(now_ms, scene.fingerprint(), scene.is_animating()) {
            let status = match &notice {
                Some((text, until)) if *until > now_ms => text.clone(),
                _ => scene.status_line(),
            };
            view.render_into(scene.render(), &status, size, &mut fb);
            term.draw_swap(&mut fb)?;
        }

        // Input until the next tick.
        let timeout = tick.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        let message = match scene.apply(action) {
                            Ok(message) => message,
                            Err(e) => Some(format!("{:#}", e)),
                        };
                        if let Some(text) = message {
                            notice = Some((text, now_ms + NOTICE_MS));
                            throttle.invalidate();
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    for input in pointer.handle(mouse) {
                        scene.pointer(input, now_ms);
                    }
                }
                Event::Resize(w, h) => {
                    size = TermSize::new(w, h);
                    scene.resize(size);
                    term.invalidate();
                    throttle.invalidate();
                }
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            last_tick = Instant::now();
            scene.tick(elapsed.as_secs_f64() * 1000.0);
        }
    }
}
