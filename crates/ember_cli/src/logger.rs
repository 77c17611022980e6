use log::LevelFilter;

/// Initialize the logger at `level`; `RUST_LOG` can still refine modules.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
