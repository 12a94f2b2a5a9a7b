use std::{
    io::Write,
    sync::OnceLock,
};

use core::str::FromStr;

use parking_lot::Mutex;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use crate::*;

use fmt::SegmentSpec;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CustomFmt(usize);

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
    Always = -1,
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl LevelFmt {

    #[inline(always)]
    pub fn level(&self) -> Level {
        match self {
            Self::Error => Level::Error,
            Self::Warn => Level::Warn,
            Self::Info => Level::Info,
            Self::Debug => Level::Debug,
            Self::Trace => Level::Trace,
            Self::Other(_, level) => *level,
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Parses `RUST_LOG` style filters: `level` sets the base level,
/// `target=level` sets the level of a module path and everything below it.
/// Unparseable entries are skipped.
pub fn parse_filters(filters: &str) -> (Option<Level>, FxHashMap<CompactString, Level>) {
    let mut target_levels = FxHashMap::default();
    let mut base_level = None;
    for arg in filters.split(',') {
        let arg = arg.trim();
        if arg.is_empty() {
            continue
        }
        let (target, level) = match arg.find('=') {
            Some(i) => (Some(arg[..i].trim()), arg[i + 1..].trim()),
            None => (None, arg),
        };
        let Ok(level) = Level::from_str(level) else {
            continue
        };
        match target {
            Some(target) => {
                target_levels.insert(CompactString::new(target), level);
            },
            None => base_level = Some(level),
        }
    }
    (base_level, target_levels)
}

fn default_fmt(color: Color) -> LogFmt {
    let mut fmt = LogFmt::default();
    LogFmtBuilder::new(&mut fmt)
        .level(|spec| spec.with_color_spec(|c| { c.set_fg(Some(color)).set_bold(true); }))
        .text(" ", |spec| spec)
        .target(|spec| spec.with_color_spec(|c| { c.set_dimmed(true); }))
        .text(": ", |spec| spec)
        .message(|spec| spec);
    fmt
}

pub(crate) struct Logger<W: WriteColor> {
    out: W,
    info_fmt: LogFmt,
    warn_fmt: LogFmt,
    error_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: Vec<LogFmt>,
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl<W: WriteColor> Logger<W> {

    fn new(out: W, filters: &str) -> Self {
        let (base_level, target_levels) = parse_filters(filters);
        Self {
            out,
            info_fmt: default_fmt(Color::Green),
            warn_fmt: default_fmt(Color::Yellow),
            error_fmt: default_fmt(Color::Red),
            debug_fmt: default_fmt(Color::Blue),
            trace_fmt: default_fmt(Color::Magenta),
            custom_fmt: Vec::new(),
            target_levels,
            base_level: base_level.unwrap_or(Level::Error),
        }
    }

    fn set_level(&mut self, target: Option<&str>, level: Level) {
        match target {
            Some(target) => {
                self.target_levels.insert(CompactString::new(target), level);
            },
            None => self.base_level = level,
        }
    }

    fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[0..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    #[inline(always)]
    fn enabled(&self, target: &str, level: Level) -> bool {
        level <= self.target_level(target)
    }

    fn push_custom(&mut self, fmt: LogFmt) -> CustomFmt {
        self.custom_fmt.push(fmt);
        CustomFmt(self.custom_fmt.len() - 1)
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        let severity = level.level();
        if !self.enabled(target, severity) {
            return Ok(false)
        }
        let fmt = match level {
            LevelFmt::Error => &self.error_fmt,
            LevelFmt::Warn => &self.warn_fmt,
            LevelFmt::Info => &self.info_fmt,
            LevelFmt::Debug => &self.debug_fmt,
            LevelFmt::Trace => &self.trace_fmt,
            LevelFmt::Other(CustomFmt(index), _) => {
                self.custom_fmt
                    .get(index)
                    .ok_or(LogError::UnknownFormat { index })?
            },
        };
        for segment in fmt {
            match segment {
                SegmentSpec::Message(spec) => {
                    write_colored(&mut self.out, spec, format_args!("{}", msg))?;
                },
                SegmentSpec::Target(spec) => {
                    write_colored(&mut self.out, spec, format_args!("{}", target))?;
                },
                SegmentSpec::Level(spec) => {
                    write_colored(&mut self.out, spec, format_args!("{}", severity.as_str()))?;
                },
                SegmentSpec::Text(text, spec) => {
                    write_colored(&mut self.out, spec, format_args!("{}", text))?;
                },
            }
        }
        self.out.write_all(b"\n")?;
        Ok(true)
    }
}

fn write_colored<W: WriteColor>(out: &mut W, spec: &LogSpec, args: core::fmt::Arguments) -> Result<()> {
    if let Some(color_spec) = &spec.color_spec {
        out.set_color(color_spec)?;
        out.write_fmt(args)?;
        out.reset()?;
    } else {
        out.write_fmt(args)?;
    }
    Ok(())
}

static LOGGER: OnceLock<Mutex<Logger<StandardStream>>> = OnceLock::new();

/// Initializes the global logger from `RUST_LOG`.
///
/// Log calls made before this are dropped. Calling it again has no effect.
pub fn init() {
    let filters = std::env::var("RUST_LOG").unwrap_or_default();
    init_with(&filters)
}

/// Initializes the global logger from an explicit filter string, ignoring `RUST_LOG`.
pub fn init_with(filters: &str) {
    if LOGGER.get().is_some() { return }
    let _ = LOGGER.set(Mutex::new(Logger::new(
        StandardStream::stderr(ColorChoice::Auto),
        filters,
    )));
}

#[inline(always)]
fn with_logger<R>(f: impl FnOnce(&mut Logger<StandardStream>) -> R) -> Option<R> {
    LOGGER
        .get()
        .map(|logger| f(&mut logger.lock()))
}

#[inline(always)]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Sets the level of `target`, or the base level if `target` is `None`.
pub fn set_level(target: Option<&str>, level: Level) {
    with_logger(|logger| logger.set_level(target, level));
}

#[inline(always)]
pub fn enabled(target: &str, level: Level) -> bool {
    with_logger(|logger| logger.enabled(target, level))
        .unwrap_or(false)
}

#[inline(always)]
pub fn error_fmt(f: impl FnOnce(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.error_fmt)));
}

#[inline(always)]
pub fn warn_fmt(f: impl FnOnce(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.warn_fmt)));
}

#[inline(always)]
pub fn info_fmt(f: impl FnOnce(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.info_fmt)));
}

#[inline(always)]
pub fn debug_fmt(f: impl FnOnce(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.debug_fmt)));
}

#[inline(always)]
pub fn trace_fmt(f: impl FnOnce(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.trace_fmt)));
}

/// Registers a custom format. Returns `None` if the logger is not initialized.
#[inline(always)]
pub fn custom_fmt(fmt: LogFmt) -> Option<CustomFmt> {
    with_logger(|logger| logger.push_custom(fmt))
}

#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    with_logger(|logger| logger.log(target, level, args))
        .unwrap_or(Ok(false))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
