use std::sync::OnceLock;

use crate::logging::init_log;

pub struct Config {
    pub log_config: LogConfig,
    /// Worker threads for evaluating wide distance levels. `1` keeps the
    /// trace builder sequential.
    pub threads: usize,
}

pub enum LogConfig {
    NoLog,
    Verbose(u8),
    Trace,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn init_config(config: Config) {
    CONFIG.set(config).unwrap_or_else(|_| {
        panic!("cannot init config again after init");
    });
    let config = get_config();
    init_log(&config.log_config);
    if config.threads > 1 {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
        {
            log::warn!("cannot size global thread pool: {}", err);
        }
    }
}

pub fn get_config() -> &'static Config {
    CONFIG.get().expect("cannot get config before init")
}

pub fn try_get_config() -> Option<&'static Config> {
    CONFIG.get()
}

pub(crate) fn worker_threads() -> usize {
    try_get_config().map_or(1, |config| config.threads.max(1))
}
