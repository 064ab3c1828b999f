//! Ricochet: a bouncing logo, an orbit of items and a handful of themes,
//! built with Rust, the Bevy game engine, and Linebender crates.

use ricochet::core;

fn main() {
    core::platform::init_panic_handling();
    let cli_args = core::platform::get_cli_args();
    match core::runner::run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
