pub mod constants;
pub mod keys;
pub mod render;

use ratatui::widgets::TableState;

/// Presentation state that never reaches the core: table selection and scroll.
#[derive(Debug, Default)]
pub struct UiState {
    pub table: TableState,
}

impl UiState {
    pub fn scroll(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(row_count - 1);
        self.table.select(Some(next));
    }

    /// Keeps the selection inside the visible rows after a filter change.
    pub fn clamp(&mut self, row_count: usize) {
        match (self.table.selected(), row_count) {
            (_, 0) => self.table.select(None),
            (None, _) => self.table.select(Some(0)),
            (Some(index), count) if index >= count => self.table.select(Some(count - 1)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_stays_within_rows() {
        let mut ui = UiState::default();
        ui.clamp(3);
        assert_eq!(ui.table.selected(), Some(0));
        ui.scroll(-1, 3);
        assert_eq!(ui.table.selected(), Some(0));
        ui.scroll(10, 3);
        assert_eq!(ui.table.selected(), Some(2));
        ui.clamp(1);
        assert_eq!(ui.table.selected(), Some(0));
        ui.clamp(0);
        assert_eq!(ui.table.selected(), None);
    }
}
