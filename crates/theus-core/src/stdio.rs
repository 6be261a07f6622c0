//! Forward `log` records to the host
//!
//! The host provides `env.__log(level, ptr, len)` and reads `len` bytes of
//! UTF-8 at `ptr` before returning. Levels use `log::Level` numbering
//! (1 = error .. 5 = trace).

use log::{Level, LevelFilter, Log, Metadata, Record};

#[link(wasm_import_module = "env")]
extern "C" {
    fn __log(level: u32, ptr: *const u8, len: u32);
}

pub struct HostLogger;

static LOGGER: HostLogger = HostLogger;

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{}: {}", record.target(), record.args());
        let level = match record.level() {
            Level::Error => 1,
            Level::Warn => 2,
            Level::Info => 3,
            Level::Debug => 4,
            Level::Trace => 5,
        };
        unsafe {
            __log(level, line.as_ptr(), line.len() as u32);
        }
    }

    fn flush(&self) {}
}

/// Install [`HostLogger`] as the global logger. Calling it again only
/// changes the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

fn level_filter(level: u32) -> LevelFilter {
    match level {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Called by the host after instantiation to turn on module logging.
#[no_mangle]
pub extern "C" fn theus_init_log(level: u32) {
    init(level_filter(level));
}
