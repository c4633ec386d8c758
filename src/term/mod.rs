pub mod color;

use std::sync::atomic::{AtomicBool, Ordering};


/// Whether diagnostics should be painted. Set once at startup.
static COLORS: AtomicBool = AtomicBool::new(true);


/// Enable colored diagnostics only if stderr is attached to a terminal.
pub fn detect_colors() {
	set_colors(termion::is_tty(&std::io::stderr()));
}


pub fn set_colors(enabled: bool) {
	COLORS.store(enabled, Ordering::Relaxed);
}


pub fn colors_enabled() -> bool {
	COLORS.load(Ordering::Relaxed)
}
