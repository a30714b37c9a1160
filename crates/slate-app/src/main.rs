//! Main application entry point (native).
//!
//! Usage: `slate [config.json]`

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Slate");

    let config = match std::env::args().nth(1) {
        Some(path) => match slate_app::AppConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => slate_app::AppConfig::default(),
    };

    pollster::block_on(slate_app::App::run_with_config(config));
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
