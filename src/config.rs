/// Board configuration.
///
/// An optional `config.toml` next to the binary (or in the CWD) overrides
/// the built-in defaults; a missing or broken file just means defaults.
/// Values are sanitized on the way in so the rest of the program never
/// sees an empty airport code or a zero page size.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::flight::Mode;
use crate::domain::roller::FlapTiming;

// ── Resolved settings ──

#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Airport code shown in the title and sent to the feed endpoint.
    /// Uppercase ASCII alphanumerics only.
    pub airport: String,
    pub mode: Mode,
    /// Rows per page.
    pub page_size: usize,
    /// Page auto-rotation period.
    pub rotate: Duration,
    /// Data refresh period.
    pub refresh: Duration,
    pub auto_rotate: bool,
    /// Fetch from the proxy endpoint instead of generating mock rows.
    pub live: bool,
    pub proxy_url: String,
    pub timing: FlapTiming,
}

// ── TOML schema, every field optional ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    feed: TomlFeed,
    #[serde(default)]
    flap: TomlFlap,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_airport")]
    airport: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default = "default_rotate_ms")]
    rotate_ms: u64,
    #[serde(default = "default_refresh_ms")]
    refresh_ms: u64,
    #[serde(default = "default_auto_rotate")]
    auto_rotate: bool,
}

#[derive(Deserialize, Debug)]
struct TomlFeed {
    #[serde(default = "default_live")]
    live: bool,
    #[serde(default = "default_proxy_url")]
    proxy_url: String,
}

#[derive(Deserialize, Debug)]
struct TomlFlap {
    #[serde(default = "default_start_ms")]
    start_ms: [u64; 2],
    #[serde(default = "default_step_ms")]
    step_ms: [u64; 2],
    #[serde(default = "default_settle_ms")]
    settle_ms: [u64; 2],
}

// ── Default values ──

fn default_airport() -> String { "IAD".into() }
fn default_mode() -> String { "arrivals".into() }
fn default_page_size() -> usize { 15 }
fn default_rotate_ms() -> u64 { 7000 }
fn default_refresh_ms() -> u64 { 12000 }
fn default_auto_rotate() -> bool { true }

fn default_live() -> bool { false }
fn default_proxy_url() -> String {
    "https://split-flap-flights.netlify.app/.netlify/functions/flights".into()
}

fn default_start_ms() -> [u64; 2] { [0, 60] }
fn default_step_ms() -> [u64; 2] { [35, 90] }
fn default_settle_ms() -> [u64; 2] { [40, 100] }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            airport: default_airport(),
            mode: default_mode(),
            page_size: default_page_size(),
            rotate_ms: default_rotate_ms(),
            refresh_ms: default_refresh_ms(),
            auto_rotate: default_auto_rotate(),
        }
    }
}

impl Default for TomlFeed {
    fn default() -> Self {
        TomlFeed {
            live: default_live(),
            proxy_url: default_proxy_url(),
        }
    }
}

impl Default for TomlFlap {
    fn default() -> Self {
        TomlFlap {
            start_ms: default_start_ms(),
            step_ms: default_step_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

// ── File loading ──

impl BoardConfig {
    /// Settings for this run, from the first `config.toml` found.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data dir, (4) /usr/share. Missing file or missing keys
    /// gracefully fall back to defaults.
    pub fn load() -> Self {
        resolve(load_toml(&candidate_dirs()))
    }
}

/// Turn the raw TOML schema into a sanitized runtime config.
fn resolve(toml_cfg: TomlConfig) -> BoardConfig {
    let airport = sanitize_airport(&toml_cfg.board.airport);

    let mode = match toml_cfg.board.mode.to_lowercase().as_str() {
        "arrivals" => Mode::Arrivals,
        "departures" => Mode::Departures,
        other => {
            eprintln!("Warning: unknown mode {other:?} in config.toml, using arrivals.");
            Mode::Arrivals
        }
    };

    BoardConfig {
        airport,
        mode,
        page_size: toml_cfg.board.page_size.clamp(1, 30),
        rotate: Duration::from_millis(toml_cfg.board.rotate_ms.max(1000)),
        refresh: Duration::from_millis(toml_cfg.board.refresh_ms.max(1000)),
        auto_rotate: toml_cfg.board.auto_rotate,
        live: toml_cfg.feed.live,
        proxy_url: toml_cfg.feed.proxy_url,
        timing: FlapTiming {
            start_ms: ordered(toml_cfg.flap.start_ms),
            step_ms: ordered(toml_cfg.flap.step_ms),
            settle_ms: ordered(toml_cfg.flap.settle_ms),
        },
    }
}

/// Uppercase ASCII alphanumerics only; anything else is dropped. An
/// airport that sanitizes away entirely falls back to the default.
fn sanitize_airport(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if cleaned.is_empty() {
        default_airport()
    } else {
        cleaned
    }
}

fn ordered(range: [u64; 2]) -> (u64, u64) {
    if range[0] <= range[1] {
        (range[0], range[1])
    } else {
        (range[1], range[0])
    }
}

/// Directories searched for `config.toml`, most specific first.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    // Directory of the real binary, symlinks resolved, so a packaged
    // install finds the config that ships next to the executable.
    if let Ok(exe) = std::env::current_exe() {
        let exe = exe.canonicalize().unwrap_or(exe);
        if let Some(dir) = exe.parent() {
            push_unique(&mut dirs, dir.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        push_unique(&mut dirs, cwd);
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(home).join(".local/share/flapboard");
        if xdg.is_dir() {
            push_unique(&mut dirs, xdg);
        }
    }

    let sys = PathBuf::from("/usr/share/flapboard");
    if sys.is_dir() {
        push_unique(&mut dirs, sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

fn push_unique(dirs: &mut Vec<PathBuf>, dir: PathBuf) {
    if !dirs.contains(&dir) {
        dirs.push(dir);
    }
}

/// First parseable `config.toml` among the candidates, defaults otherwise.
/// An unreadable file moves the search on; a file that parses badly stops
/// it, so a typo never silently falls through to some other config.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for path in search_dirs.iter().map(|dir| dir.join("config.toml")) {
        if !path.exists() {
            continue;
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                continue;
            }
        };
        return toml::from_str(&text).unwrap_or_else(|e| {
            eprintln!("Warning: config.toml parse error: {e}");
            eprintln!("Using default settings.");
            TomlConfig::default()
        });
    }
    TomlConfig::default()
}
