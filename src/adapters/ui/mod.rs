pub mod banner;
pub mod notices;
pub mod progress;
pub mod tui;

/// Prints the welcome banner and applies the neon theme for all subsequent inquire prompts.
/// Call once at startup (e.g. in main after tracing init).
pub fn init_ui(backend: &str) {
    banner::print_welcome(backend);
    tui::apply_theme();
}
