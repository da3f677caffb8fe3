//! Terminal monitor demo using crossterm.
//!
//! Run: cargo run --bin monitor

use cascade_core::Point;
use cascade_core::app::{App, AppConfig};
use cascade_crossterm::{CrosstermDriver, terminal_size};
use cascade_demos::{HEIGHT, Monitor, WIDTH};

fn main() {
    let size = terminal_size().unwrap_or(Point::new(WIDTH, HEIGHT));
    let monitor = match Monitor::new(size) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let mut app = App::new(AppConfig {
        model: monitor,
        driver: CrosstermDriver::new(),
        width: size.x,
        height: size.y,
    });

    if let Err(e) = app.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
