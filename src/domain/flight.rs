/// Flight records and the fixed column layout of the board.
/// Field text is normalized here (uppercase, clipped, padded) so that by
/// the time a row reaches the cells it is exactly one wheel face per cell.

use serde::Deserialize;

/// Which side of the airport the board shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Arrivals,
    Departures,
}

impl Mode {
    /// Value of the `type` query parameter on the feed endpoint.
    pub fn as_query(self) -> &'static str {
        match self {
            Mode::Arrivals => "arrivals",
            Mode::Departures => "departures",
        }
    }

    /// Board title.
    pub fn title(self) -> &'static str {
        match self {
            Mode::Arrivals => "ARRIVALS",
            Mode::Departures => "DEPARTURES",
        }
    }

    /// Header of the place column, which reads differently per direction.
    pub fn place_header(self) -> &'static str {
        match self {
            Mode::Arrivals => "ORIGIN",
            Mode::Departures => "DESTINATION",
        }
    }
}

/// One row of the board, as delivered by the feed. The wire uses a single
/// `origin` field for both directions; in departures mode it holds the
/// destination city.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub flight: String,
    pub origin: String,
    pub time: String,
    pub gate: String,
    pub status: String,
}

pub const FLIGHT_W: usize = 8;
pub const PLACE_W: usize = 15;
pub const TIME_W: usize = 6;
pub const GATE_W: usize = 5;
pub const STATUS_W: usize = 10;

/// Cells per row: every column, no separators.
pub const ROW_CHARS: usize = FLIGHT_W + PLACE_W + TIME_W + GATE_W + STATUS_W;

/// (start offset, width) of each column within a row's cell run.
pub fn column_spans() -> [(usize, usize); 5] {
    let widths = [FLIGHT_W, PLACE_W, TIME_W, GATE_W, STATUS_W];
    let mut spans = [(0, 0); 5];
    let mut start = 0;
    for (span, w) in spans.iter_mut().zip(widths) {
        *span = (start, w);
        start += w;
    }
    spans
}

/// Column headers, left to right.
pub fn column_titles(mode: Mode) -> [&'static str; 5] {
    ["FLIGHT", mode.place_header(), "TIME", "GATE", "STATUS"]
}

/// Uppercase, clip to `width`, pad right with blanks. Keeps a column
/// exactly `width` cells wide no matter what the feed sends.
pub fn pad_field(s: &str, width: usize) -> String {
    let mut out: String = s.to_uppercase().chars().take(width).collect();
    let used = out.chars().count();
    for _ in used..width {
        out.push(' ');
    }
    out
}

/// The full cell run for one row: every column padded and concatenated.
pub fn row_chars(f: &Flight) -> Vec<char> {
    let mut run = Vec::with_capacity(ROW_CHARS);
    run.extend(pad_field(&f.flight, FLIGHT_W).chars());
    run.extend(pad_field(&f.origin, PLACE_W).chars());
    run.extend(pad_field(&f.time, TIME_W).chars());
    run.extend(pad_field(&f.gate, GATE_W).chars());
    run.extend(pad_field(&f.status, STATUS_W).chars());
    run
}

/// Cell run for a row with no flight behind it.
pub fn blank_row() -> Vec<char> {
    vec![' '; ROW_CHARS]
}
