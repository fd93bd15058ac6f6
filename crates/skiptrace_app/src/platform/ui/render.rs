use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use skiptrace_core::{AppViewModel, ContactCell, ResultRowView, Screen, NO_CONTACTS_FOUND};

use super::constants::{
    contact_style, error_style, muted_style, notice_style, selected_row_style, title_style,
    APP_TITLE, MODAL_HELP, PROGRESS_HELP, RESULTS_HELP, TABLE_HEADERS, UPLOADING_TEXT,
    UPLOAD_HELP, UPLOAD_INTRO,
};
use super::UiState;

pub fn draw(frame: &mut Frame, view: &AppViewModel, ui: &mut UiState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(Span::styled(APP_TITLE, title_style())), header);

    match view.screen {
        Screen::Upload => draw_upload(frame, body, view),
        Screen::Progress => draw_progress(frame, body, view),
        Screen::Results => draw_results(frame, body, view, ui),
    }

    draw_footer(frame, footer, view);

    if view.uploading {
        draw_overlay(frame, UPLOADING_TEXT);
    }
    if let Some(message) = view.error.as_deref() {
        draw_error(frame, message);
    }
}

fn draw_upload(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let [intro, input, file] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(UPLOAD_INTRO), intro);
    frame.render_widget(
        Paragraph::new(format!("{}_", view.path_input))
            .block(Block::bordered().title(" CSV file ")),
        input,
    );

    let details = match &view.file {
        Some(file) => vec![
            Line::from(vec![
                Span::raw("Selected: "),
                Span::styled(file.name.clone(), title_style()),
            ]),
            Line::from(format!("Size: {}", file.size_label)),
            Line::from(Span::styled("Ctrl+U to upload", muted_style())),
        ],
        None => vec![Line::from(Span::styled("No file selected", muted_style()))],
    };
    frame.render_widget(
        Paragraph::new(details).block(Block::bordered().title(" File ")),
        file,
    );
}

fn draw_progress(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let [gauge, details] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(area);
    let progress = &view.progress;

    frame.render_widget(
        Gauge::default()
            .block(Block::bordered().title(" Processing "))
            .gauge_style(title_style())
            .percent(progress.percent.min(100) as u16)
            .label(progress.percentage_label.clone()),
        gauge,
    );

    let lines = vec![
        Line::from(format!("Status: {}", progress.status_label)),
        Line::from(progress.text.clone()),
        Line::from(format!("Estimated time remaining: {}", progress.eta_label)),
    ];
    let mut block = Block::bordered();
    if let Some(job_id) = view.job_id.as_deref() {
        block = block.title(format!(" Job {job_id} "));
    }
    frame.render_widget(Paragraph::new(lines).block(block), details);
}

fn draw_results(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &mut UiState) {
    let [summary, search, table] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    let stats = &view.summary;
    frame.render_widget(
        Paragraph::new(format!(
            "Total businesses: {}   With contacts: {}   Success rate: {}",
            stats.total, stats.with_contacts, stats.success_rate_label
        )),
        summary,
    );
    frame.render_widget(
        Paragraph::new(format!("{}_", view.query)).block(Block::bordered().title(" Search ")),
        search,
    );

    let rows: Vec<Row> = view.rows.iter().map(result_row).collect();
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];
    let header = Row::new(TABLE_HEADERS).style(title_style());
    let title = format!(" Results ({} of {}) ", view.rows.len(), stats.total);
    frame.render_stateful_widget(
        Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(title))
            .row_highlight_style(selected_row_style()),
        table,
        &mut ui.table,
    );
}

fn result_row(row: &ResultRowView) -> Row<'static> {
    let contacts = match &row.contacts {
        ContactCell::Numbers(numbers) => {
            let mut spans = Vec::with_capacity(numbers.len() * 2);
            for (index, number) in numbers.iter().enumerate() {
                if index > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(number.clone(), contact_style()));
            }
            Line::from(spans)
        }
        ContactCell::NoneFound => Line::from(Span::styled(NO_CONTACTS_FOUND, muted_style())),
    };
    Row::new(vec![
        Cell::from(row.business_name.clone()),
        Cell::from(row.business_address.clone()),
        Cell::from(contacts),
        Cell::from(row.search_resources.clone()),
    ])
}

fn draw_footer(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let help = match view.screen {
        Screen::Upload => UPLOAD_HELP,
        Screen::Progress => PROGRESS_HELP,
        Screen::Results => RESULTS_HELP,
    };
    let notice = view
        .notice
        .as_deref()
        .map(|notice| Line::from(Span::styled(notice.to_string(), notice_style())))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(vec![notice, Line::from(Span::styled(help, muted_style()))]),
        area,
    );
}

fn draw_overlay(frame: &mut Frame, text: &str) {
    let area = centered_rect(30, 3, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        area,
    );
}

fn draw_error(frame: &mut Frame, message: &str) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled(MODAL_HELP, muted_style())),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(Span::styled(" Error ", error_style()))),
        area,
    );
}

/// A box `percent_x` of the width and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use skiptrace_core::{ProgressView, SummaryView};

    fn rendered(view: &AppViewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        let mut ui = UiState::default();
        ui.clamp(view.rows.len());
        terminal.draw(|frame| draw(frame, view, &mut ui)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn results_screen_shows_summary_and_contacts() {
        let view = AppViewModel {
            screen: Screen::Results,
            summary: SummaryView {
                total: 2,
                with_contacts: 1,
                success_rate: 50,
                success_rate_label: "50%".to_string(),
            },
            rows: vec![
                ResultRowView {
                    business_name: "Acme".to_string(),
                    business_address: "1 Main St".to_string(),
                    contacts: ContactCell::Numbers(vec!["555-0100".to_string()]),
                    search_resources: "N/A".to_string(),
                },
                ResultRowView {
                    business_name: "Globex".to_string(),
                    business_address: "N/A".to_string(),
                    contacts: ContactCell::NoneFound,
                    search_resources: "N/A".to_string(),
                },
            ],
            ..AppViewModel::default()
        };

        let text = rendered(&view);
        assert!(text.contains("Success rate: 50%"));
        assert!(text.contains("555-0100"));
        assert!(text.contains("No contacts found"));
        assert!(text.contains("Results (2 of 2)"));
    }

    #[test]
    fn progress_screen_shows_gauge_label_and_eta() {
        let view = AppViewModel {
            screen: Screen::Progress,
            job_id: Some("job-7".to_string()),
            progress: ProgressView {
                percent: 40,
                text: "4 / 10 processed".to_string(),
                percentage_label: "40%".to_string(),
                eta_label: "3 minutes".to_string(),
                status_label: "Processing".to_string(),
            },
            ..AppViewModel::default()
        };

        let text = rendered(&view);
        assert!(text.contains("40%"));
        assert!(text.contains("4 / 10 processed"));
        assert!(text.contains("Estimated time remaining: 3 minutes"));
        assert!(text.contains("Job job-7"));
    }

    #[test]
    fn error_dialog_overlays_the_screen() {
        let view = AppViewModel {
            error: Some("Please select a CSV file.".to_string()),
            ..AppViewModel::default()
        };
        let text = rendered(&view);
        assert!(text.contains("Error"));
        assert!(text.contains("Please select a CSV file."));
    }
}
