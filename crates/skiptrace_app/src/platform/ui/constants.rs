use ratatui::style::{Color, Modifier, Style};

pub const APP_TITLE: &str = " Skip Trace ";
pub const TABLE_HEADERS: [&str; 4] = [
    "Business Name",
    "Business Address",
    "Contact Numbers",
    "Search Resources",
];

pub const UPLOAD_INTRO: &str =
    "Choose a CSV of businesses to skip trace. Type its path or drop the file onto this window.";
pub const UPLOAD_HELP: &str =
    "Enter: select file  Ctrl+U: upload  Paste/drop a file path  Ctrl+Q: quit";
pub const PROGRESS_HELP: &str = "Waiting for the job to finish  Ctrl+N: start over  Ctrl+Q: quit";
pub const RESULTS_HELP: &str =
    "Type to search  Up/Down: scroll  Ctrl+D: download  Ctrl+E: export filtered  Ctrl+N: new upload  Ctrl+Q: quit";
pub const MODAL_HELP: &str = "Esc/Enter: close";
pub const UPLOADING_TEXT: &str = "Uploading...";

pub const PAGE_ROWS: isize = 10;

pub const ACCENT: Color = Color::Cyan;

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn contact_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Green)
}

pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn notice_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn selected_row_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}
