//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Keyplane");

    keyplane_app::App::run();
}
