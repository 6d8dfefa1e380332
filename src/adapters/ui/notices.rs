//! Implements NoticePort by printing colored lines to the terminal.

use crate::domain::markdown::strip_controls;
use crate::domain::{Notice, NoticeLevel};
use crate::ports::NoticePort;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

pub struct TerminalNotices;

impl TerminalNotices {
    fn marker(level: NoticeLevel) -> (&'static str, Color) {
        match level {
            NoticeLevel::Info => ("✔", Color::Green),
            NoticeLevel::Error => ("✘", Color::Red),
        }
    }
}

impl NoticePort for TerminalNotices {
    fn notify(&self, notice: Notice) {
        let (marker, color) = Self::marker(notice.level);
        let mut out = stdout();
        let _ = out.execute(SetForegroundColor(color));
        let _ = out.execute(Print(format!("{} {}\r\n", marker, strip_controls(&notice.text))));
        let _ = out.execute(ResetColor);
        let _ = out.flush();
    }
}
