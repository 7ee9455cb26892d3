use std::io;

pub type Tui = ratatui::DefaultTerminal;

/// Enter raw mode and the alternate screen. Installs a panic hook that
/// restores the terminal first.
pub fn init() -> io::Result<Tui> {
    ratatui::try_init()
}

pub fn restore() -> io::Result<()> {
    ratatui::try_restore()
}
