use log::LevelFilter;

/// Map a count of `-v` flags to a log level, starting from warnings.
pub fn level_filter(occurrences: u8) -> LevelFilter {
    match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
