/// BoardState: the complete snapshot of the running sign.
///
/// All mutation funnels through here. The cell grid covers one visible
/// page (`page_size` rows of `ROW_CHARS` cells); changing the page or the
/// flight list retargets the grid and the cells roll from whatever they
/// currently show to the new text. The renderer only reads.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::event::BoardEvent;
use crate::config::BoardConfig;
use crate::domain::alphabet::Alphabet;
use crate::domain::flight::{self, Flight, Mode};
use crate::domain::roller::{FlapTiming, Roller, Tick};

/// Where the rows currently come from, shown as a chip in the title row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeedStatus {
    /// Generated locally (live disabled, or never fetched).
    Mock,
    /// Last fetch succeeded.
    Live,
    /// Live configured but the last fetch failed; rows are mock drift.
    Down,
}

impl FeedStatus {
    pub fn label(self) -> &'static str {
        match self {
            FeedStatus::Mock => "MOCK",
            FeedStatus::Live => "LIVE",
            FeedStatus::Down => "DOWN",
        }
    }
}

pub struct BoardState {
    // ── Data ──
    airport: String,
    mode: Mode,
    flights: Vec<Flight>,
    page: usize,
    page_size: usize,

    // ── Cells ──
    wheel: Alphabet,
    timing: FlapTiming,
    rows: Vec<Vec<Roller>>,
    rng: StdRng,

    // ── Presentation flags ──
    pub auto_rotate: bool,
    pub muted: bool,
    pub feed: FeedStatus,

    // ── Message bar ──
    message: String,
    message_until: Option<Instant>,
}

// ── Construction / accessors ──

impl BoardState {
    pub fn new(config: &BoardConfig) -> Self {
        let wheel = Alphabet::default();
        let rows = fresh_rows(&wheel, config.timing, config.page_size);
        BoardState {
            airport: config.airport.clone(),
            mode: config.mode,
            flights: Vec::new(),
            page: 0,
            page_size: config.page_size,
            wheel,
            timing: config.timing,
            rows,
            rng: StdRng::from_os_rng(),
            auto_rotate: config.auto_rotate,
            muted: false,
            feed: FeedStatus::Mock,
            message: String::new(),
            message_until: None,
        }
    }

    pub fn airport(&self) -> &str {
        &self.airport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        if self.flights.is_empty() {
            1
        } else {
            self.flights.len().div_ceil(self.page_size)
        }
    }

    /// The cell grid, outer index row, inner index column.
    pub fn rows(&self) -> &[Vec<Roller>] {
        &self.rows
    }

    pub fn message(&self) -> Option<&str> {
        if self.message.is_empty() {
            None
        } else {
            Some(&self.message)
        }
    }

    /// True while any cell on the page is still rolling or settling.
    #[allow(dead_code)]
    pub fn animating(&self) -> bool {
        self.rows.iter().flatten().any(|c| c.is_animating())
    }
}

// ── Mutation ──

impl BoardState {
    /// Replace the flight list and roll every visible cell toward the new
    /// text. Rows past the end of the list roll back to blank. If the list
    /// shrank below the current page, the view clamps to the last page.
    pub fn set_flights(&mut self, flights: Vec<Flight>, now: Instant) {
        self.flights = flights;
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
        }
        self.retarget(now);
    }

    pub fn advance_page(&mut self, now: Instant) {
        let count = self.page_count();
        if count > 1 {
            self.page = (self.page + 1) % count;
            self.retarget(now);
        }
    }

    pub fn previous_page(&mut self, now: Instant) {
        let count = self.page_count();
        if count > 1 {
            self.page = (self.page + count - 1) % count;
            self.retarget(now);
        }
    }

    pub fn jump_to_page(&mut self, page: usize, now: Instant) {
        if page != self.page && page < self.page_count() {
            self.page = page;
            self.retarget(now);
        }
    }

    /// Switch sides of the airport. The old cells are torn down and the
    /// grid restarts from blank; the next data delivery rolls the new
    /// side's rows up from nothing.
    pub fn switch_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.page = 0;
        self.flights.clear();
        self.rows = fresh_rows(&self.wheel, self.timing, self.page_size);
    }

    pub fn set_message(&mut self, text: &str, now: Instant, duration: Duration) {
        self.message = text.to_string();
        self.message_until = Some(now + duration);
    }

    fn retarget(&mut self, now: Instant) {
        let start = self.page * self.page_size;
        let wheel = &self.wheel;
        let rng = &mut self.rng;
        for (i, row) in self.rows.iter_mut().enumerate() {
            let run = match self.flights.get(start + i) {
                Some(f) => flight::row_chars(f),
                None => flight::blank_row(),
            };
            for (cell, face) in row.iter_mut().zip(run) {
                cell.set_target(wheel, face, now, rng);
            }
        }
    }
}

// ── Tick ──

impl BoardState {
    /// Advance every cell and the message timer. Returns the click events
    /// this frame produced; the caller maps them onto the sound engine.
    pub fn tick(&mut self, now: Instant) -> Vec<BoardEvent> {
        if let Some(until) = self.message_until {
            if now >= until {
                self.message.clear();
                self.message_until = None;
            }
        }
        let mut events = Vec::new();
        let rng = &mut self.rng;
        for row in self.rows.iter_mut() {
            for cell in row.iter_mut() {
                if let Tick::Flap { click: true } = cell.tick(now, rng) {
                    events.push(BoardEvent::FlapClick);
                }
            }
        }
        events
    }
}

fn fresh_rows(wheel: &Alphabet, timing: FlapTiming, page_size: usize) -> Vec<Vec<Roller>> {
    (0..page_size)
        .map(|_| (0..flight::ROW_CHARS).map(|_| Roller::new(wheel, timing)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(page_size: usize) -> BoardConfig {
        BoardConfig {
            airport: "IAD".into(),
            mode: Mode::Arrivals,
            page_size,
            rotate: Duration::from_secs(7),
            refresh: Duration::from_secs(12),
            auto_rotate: true,
            live: false,
            proxy_url: String::new(),
            timing: FlapTiming { start_ms: (0, 0), step_ms: (0, 0), settle_ms: (0, 0) },
        }
    }

    fn named(code: &str) -> Flight {
        Flight {
            flight: code.into(),
            origin: "CHICAGO".into(),
            time: "14:40".into(),
            gate: "B12".into(),
            status: "ON TIME".into(),
        }
    }

    /// Tick the whole board until every cell is idle, counting click events.
    fn drain(board: &mut BoardState) -> usize {
        let mut clicks = 0;
        let mut now = Instant::now();
        for _ in 0..10_000 {
            if !board.animating() {
                return clicks;
            }
            now += Duration::from_millis(50);
            clicks += board.tick(now).len();
        }
        panic!("board failed to settle");
    }

    fn row_targets(board: &BoardState, row: usize) -> String {
        board.rows()[row].iter().map(|c| c.target()).collect()
    }

    #[test]
    fn set_flights_targets_visible_cells() {
        let mut board = BoardState::new(&test_config(2));
        board.set_flights(vec![named("UA118")], Instant::now());

        let want: String = flight::row_chars(&named("UA118")).iter().collect();
        assert_eq!(row_targets(&board, 0), want);
        assert!(row_targets(&board, 1).chars().all(|c| c == ' ')); // no second flight
    }

    #[test]
    fn pages_wrap_in_both_directions() {
        let mut board = BoardState::new(&test_config(2));
        let flights: Vec<Flight> = (0..5).map(|i| named(&format!("UA{i:03}"))).collect();
        let now = Instant::now();
        board.set_flights(flights, now);
        assert_eq!(board.page_count(), 3);

        board.advance_page(now);
        assert_eq!(board.page(), 1);
        assert!(row_targets(&board, 0).starts_with("UA002"));

        board.advance_page(now);
        board.advance_page(now);
        assert_eq!(board.page(), 0); // wrapped

        board.previous_page(now);
        assert_eq!(board.page(), 2);
        // last page has one flight and one blank row
        assert!(row_targets(&board, 0).starts_with("UA004"));
        assert!(row_targets(&board, 1).chars().all(|c| c == ' '));
    }

    #[test]
    fn jump_to_missing_page_is_ignored() {
        let mut board = BoardState::new(&test_config(2));
        let now = Instant::now();
        board.set_flights(vec![named("UA001"), named("UA002"), named("UA003")], now);

        board.jump_to_page(1, now);
        assert_eq!(board.page(), 1);
        board.jump_to_page(7, now);
        assert_eq!(board.page(), 1);
    }

    #[test]
    fn page_clamps_when_the_list_shrinks() {
        let mut board = BoardState::new(&test_config(2));
        let now = Instant::now();
        let flights: Vec<Flight> = (0..6).map(|i| named(&format!("UA{i:03}"))).collect();
        board.set_flights(flights, now);
        board.jump_to_page(2, now);

        board.set_flights(vec![named("UA000")], now);
        assert_eq!(board.page_count(), 1);
        assert_eq!(board.page(), 0);
    }

    #[test]
    fn empty_board_still_has_one_page() {
        let board = BoardState::new(&test_config(3));
        assert_eq!(board.page_count(), 1);
        assert_eq!(board.page(), 0);
    }

    #[test]
    fn mode_switch_tears_the_grid_down_mid_flight() {
        let mut board = BoardState::new(&test_config(2));
        let now = Instant::now();
        board.set_flights(vec![named("UA118"), named("DL202")], now);
        assert!(board.animating());

        board.switch_mode(Mode::Departures);
        assert_eq!(board.mode(), Mode::Departures);
        assert!(board.flights().is_empty());
        assert_eq!(board.page(), 0);
        assert!(!board.animating()); // fresh cells, nothing scheduled
        for row in board.rows() {
            for cell in row {
                assert_eq!(cell.current(), ' ');
                assert_eq!(cell.target(), ' ');
            }
        }
        assert!(board.tick(now + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn switch_to_same_mode_changes_nothing() {
        let mut board = BoardState::new(&test_config(2));
        let now = Instant::now();
        board.set_flights(vec![named("UA118")], now);

        board.switch_mode(Mode::Arrivals);
        assert_eq!(board.flights().len(), 1);
    }

    #[test]
    fn clicks_bubble_up_as_events() {
        let mut board = BoardState::new(&test_config(1));
        let wheel = Alphabet::default();
        let f = named("UA118");
        let now = Instant::now();

        // every other flap clicks, so each cell contributes ceil(path / 2)
        let mut want = 0;
        for face in flight::row_chars(&f) {
            let path = wheel.steps_between(' ', face).len();
            want += path.div_ceil(2);
        }

        board.set_flights(vec![f], now);
        assert_eq!(drain(&mut board), want);
    }

    #[test]
    fn message_expires_on_its_own() {
        let mut board = BoardState::new(&test_config(1));
        let now = Instant::now();
        board.set_message("LIVE FEED UNAVAILABLE", now, Duration::from_millis(100));

        board.tick(now + Duration::from_millis(50));
        assert_eq!(board.message(), Some("LIVE FEED UNAVAILABLE"));

        board.tick(now + Duration::from_millis(150));
        assert_eq!(board.message(), None);
    }
}
