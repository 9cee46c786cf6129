/// Mock flight data: seed lists plus a light random drift between
/// refreshes, used when the live feed is disabled or unreachable.

use rand::Rng;

use crate::domain::flight::{Flight, Mode};

/// Statuses the drift can roll a flight onto.
pub const STATUSES: [&str; 5] = ["ON TIME", "DELAYED", "BOARDING", "ARRIVED", "CANCELED"];

/// Gates the drift can move a flight to.
const GATES: [&str; 9] = ["A1", "B4", "B12", "C3", "C9", "D7", "D11", "E5", "X1"];

fn record(code: &str, origin: &str, time: &str, gate: &str, status: &str) -> Flight {
    Flight {
        flight: code.into(),
        origin: origin.into(),
        time: time.into(),
        gate: gate.into(),
        status: status.into(),
    }
}

/// Starter rows for one side of the airport.
pub fn seed(mode: Mode) -> Vec<Flight> {
    match mode {
        Mode::Arrivals => vec![
            record("UA118", "CHICAGO", "14:40", "B12", "ON TIME"),
            record("DL202", "ATLANTA", "14:55", "C3", "DELAYED"),
            record("BA292", "LONDON", "15:05", "B12", "BOARDING"),
            record("AF054", "PARIS", "15:16", "X1", "ARRIVED"),
            record("AC761", "TORONTO", "15:23", "C9", "ON TIME"),
        ],
        Mode::Departures => vec![
            record("UA927", "LONDON", "16:10", "C3", "BOARDING"),
            record("AA101", "NEW YORK", "16:25", "B7", "ON TIME"),
            record("AF055", "PARIS", "16:40", "D11", "DELAYED"),
            record("DL404", "BOSTON", "17:05", "A4", "ON TIME"),
            record("BA216", "LONDON", "17:20", "C9", "ON TIME"),
        ],
    }
}

/// Seed when there is nothing yet, drift otherwise.
pub fn refresh(prev: &[Flight], mode: Mode, rng: &mut impl Rng) -> Vec<Flight> {
    if prev.is_empty() {
        seed(mode)
    } else {
        drift(prev, rng)
    }
}

/// Nudge a list the way a real board moves between refreshes: a quarter of
/// the rows change status, a tenth move gates, a tenth slip their time a
/// few minutes. Everything else stays put.
pub fn drift(list: &[Flight], rng: &mut impl Rng) -> Vec<Flight> {
    list.iter()
        .map(|f| {
            let mut f = f.clone();
            let roll: f64 = rng.random();
            if roll < 0.25 {
                f.status = STATUSES[rng.random_range(0..STATUSES.len())].to_string();
            } else if roll < 0.35 {
                f.gate = GATES[rng.random_range(0..GATES.len())].to_string();
            } else if roll < 0.45 {
                f.time = drift_time(&f.time, rng);
            }
            f
        })
        .collect()
}

/// Slip an `HH:MM` time by -5..=+5 minutes, wrapping around midnight.
/// Input that does not look like `HH:MM` becomes the dashed placeholder.
fn drift_time(hhmm: &str, rng: &mut impl Rng) -> String {
    let minutes = match parse_hhmm(hhmm) {
        Some(m) => m,
        None => return "--:--".to_string(),
    };
    let offset = rng.random_range(-5i32..=5);
    let day = 24 * 60;
    let mins = (minutes + offset).rem_euclid(day);
    format!("{:02}:{:02}", mins / 60, mins % 60)
}

fn parse_hhmm(s: &str) -> Option<i32> {
    let (hh, mm) = s.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hh.parse().ok()?;
    let minutes: i32 = mm.parse().ok()?;
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn seeds_fit_the_board_columns() {
        for mode in [Mode::Arrivals, Mode::Departures] {
            let rows = seed(mode);
            assert_eq!(rows.len(), 5);
            for f in rows {
                assert!(f.flight.len() <= flight::FLIGHT_W);
                assert!(f.origin.len() <= flight::PLACE_W);
                assert!(f.time.len() <= flight::TIME_W);
                assert!(f.gate.len() <= flight::GATE_W);
                assert!(f.status.len() <= flight::STATUS_W);
            }
        }
    }

    #[test]
    fn refresh_seeds_an_empty_list_then_drifts() {
        let mut rng = rng();
        let first = refresh(&[], Mode::Arrivals, &mut rng);
        assert_eq!(first, seed(Mode::Arrivals));

        let second = refresh(&first, Mode::Arrivals, &mut rng);
        assert_eq!(second.len(), first.len());
    }

    #[test]
    fn drift_only_touches_status_gate_or_time() {
        let mut rng = rng();
        let before = seed(Mode::Arrivals);
        // run a bunch of drifts and check every outcome stays in range
        let mut rows = before.clone();
        for _ in 0..50 {
            rows = drift(&rows, &mut rng);
            for (f, orig) in rows.iter().zip(&before) {
                assert_eq!(f.flight, orig.flight);
                assert_eq!(f.origin, orig.origin);
                assert!(
                    f.status == orig.status || STATUSES.contains(&f.status.as_str()),
                    "unexpected status {:?}",
                    f.status
                );
                assert!(
                    f.gate == orig.gate || GATES.contains(&f.gate.as_str()),
                    "unexpected gate {:?}",
                    f.gate
                );
                assert!(
                    f.time == "--:--" || parse_hhmm(&f.time).is_some(),
                    "unexpected time {:?}",
                    f.time
                );
            }
        }
    }

    #[test]
    fn drift_time_stays_on_the_clock() {
        let mut rng = rng();
        for _ in 0..200 {
            let t = drift_time("23:58", &mut rng);
            let m = parse_hhmm(&t).unwrap();
            assert!((0..24 * 60).contains(&m), "wrapped badly: {t}");
        }
        for _ in 0..200 {
            let t = drift_time("00:01", &mut rng);
            assert!(parse_hhmm(&t).is_some());
        }
    }

    #[test]
    fn malformed_times_become_dashes() {
        let mut rng = rng();
        assert_eq!(drift_time("", &mut rng), "--:--");
        assert_eq!(drift_time("9:05", &mut rng), "--:--");
        assert_eq!(drift_time("bogus", &mut rng), "--:--");
        assert_eq!(drift_time("1a:22", &mut rng), "--:--");
        // off-range digits still parse, same as the lenient feed
        assert!(parse_hhmm("99:99").is_some());
    }
}
