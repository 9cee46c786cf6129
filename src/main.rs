/// Entry point and board loop.

mod board;
mod config;
mod data;
mod domain;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

use board::event::BoardEvent;
use board::state::{BoardState, FeedStatus};
use config::BoardConfig;
use data::feed::FeedHandle;
use data::mock;
use domain::flight::Mode;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
/// How long transient notices stay on the message bar.
const MESSAGE_TTL: Duration = Duration::from_secs(4);

fn main() {
    let config = BoardConfig::load();

    let mut board = BoardState::new(&config);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Could not set up the terminal: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let feed = FeedHandle::spawn(config.proxy_url.clone());

    let result = board_loop(&mut board, &mut renderer, sound.as_ref(), &feed, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Could not restore the terminal: {e}");
    }
    if let Err(e) = result {
        eprintln!("Board error: {e}");
    }
}

/// Wall-clock anchors for the refresh and page-rotation cycles.
struct Timers {
    refresh: Instant,
    rotate: Instant,
}

fn board_loop(
    board: &mut BoardState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    feed: &FeedHandle,
    config: &BoardConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut rng = StdRng::from_os_rng();

    // First fill: live boards ask the feed, mock boards seed on the spot.
    let now = Instant::now();
    if config.live {
        feed.request(&config.airport, board.mode());
    } else {
        apply_mock(board, &mut rng, now);
    }
    let mut timers = Timers { refresh: now, rotate: now };

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        let now = Instant::now();
        handle_keys(board, feed, config, &kb, &mut rng, now, &mut timers);

        if now.duration_since(timers.refresh) >= config.refresh {
            if config.live {
                feed.request(&config.airport, board.mode());
            } else {
                apply_mock(board, &mut rng, now);
            }
            timers.refresh = now;
        }

        if board.auto_rotate && now.duration_since(timers.rotate) >= config.rotate {
            board.advance_page(now);
            timers.rotate = now;
        }

        poll_feed(board, feed, &mut rng, now);

        let events = board.tick(now);
        if !board.muted {
            process_sound_events(sound, &events);
        }

        renderer.render(board)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[BoardEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            BoardEvent::FlapClick => sfx.play_click(),
        }
    }
}

// ── Key map ──

const KEYS_ARRIVALS: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_DEPARTURES: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_PREV_PAGE: &[KeyCode] = &[KeyCode::Left];
const KEYS_NEXT_PAGE: &[KeyCode] = &[KeyCode::Right];
const KEYS_ROTATE: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

fn handle_keys(
    board: &mut BoardState,
    feed: &FeedHandle,
    config: &BoardConfig,
    kb: &InputState,
    rng: &mut StdRng,
    now: Instant,
    timers: &mut Timers,
) {
    if kb.any_pressed(KEYS_ARRIVALS) && board.mode() != Mode::Arrivals {
        switch_mode(board, Mode::Arrivals, feed, config, rng, now, timers);
    } else if kb.any_pressed(KEYS_DEPARTURES) && board.mode() != Mode::Departures {
        switch_mode(board, Mode::Departures, feed, config, rng, now, timers);
    }

    // Manual paging restarts the rotation clock so the page just picked
    // stays up for a full period.
    if kb.any_pressed(KEYS_NEXT_PAGE) {
        board.advance_page(now);
        timers.rotate = now;
    } else if kb.any_pressed(KEYS_PREV_PAGE) {
        board.previous_page(now);
        timers.rotate = now;
    }

    for digit in kb.digits_pressed() {
        if digit >= 1 {
            board.jump_to_page(digit as usize - 1, now);
            timers.rotate = now;
        }
    }

    if kb.any_pressed(KEYS_ROTATE) {
        board.auto_rotate = !board.auto_rotate;
        let text = if board.auto_rotate { "PAGE ROTATION ON" } else { "PAGE ROTATION OFF" };
        board.set_message(text, now, MESSAGE_TTL);
        timers.rotate = now;
    }

    if kb.any_pressed(KEYS_MUTE) {
        board.muted = !board.muted;
        let text = if board.muted { "SOUND OFF" } else { "SOUND ON" };
        board.set_message(text, now, MESSAGE_TTL);
    }
}

/// Tear the grid down and fill the other side of the airport: live asks
/// the feed, mock seeds straight away. The refresh clock restarts either
/// way so the new side gets its full period on screen.
fn switch_mode(
    board: &mut BoardState,
    mode: Mode,
    feed: &FeedHandle,
    config: &BoardConfig,
    rng: &mut StdRng,
    now: Instant,
    timers: &mut Timers,
) {
    board.switch_mode(mode);
    if config.live {
        feed.request(&config.airport, mode);
    } else {
        apply_mock(board, rng, now);
    }
    let text = format!("NOW SHOWING {}", mode.title());
    board.set_message(&text, now, MESSAGE_TTL);
    timers.refresh = now;
    timers.rotate = now;
}

/// Roll the board toward the next generation of locally produced rows:
/// a fresh seed when the list is empty, small random drift otherwise.
fn apply_mock(board: &mut BoardState, rng: &mut StdRng, now: Instant) {
    let rows = mock::refresh(board.flights(), board.mode(), rng);
    board.set_flights(rows, now);
}

/// Apply one finished fetch, if the worker has one ready. A failed fetch
/// drops the board into mock fallback; the title chip flips to DOWN and
/// a notice is posted once per outage.
fn poll_feed(board: &mut BoardState, feed: &FeedHandle, rng: &mut StdRng, now: Instant) {
    let Some((mode, result)) = feed.poll() else { return };
    if mode != board.mode() {
        return; // the board switched sides while this fetch was in flight
    }
    match result {
        Ok(flights) => {
            board.set_flights(flights, now);
            board.feed = FeedStatus::Live;
        }
        Err(_) => {
            apply_mock(board, rng, now);
            if board.feed != FeedStatus::Down {
                board.set_message("LIVE FEED UNAVAILABLE", now, MESSAGE_TTL);
            }
            board.feed = FeedStatus::Down;
        }
    }
}
