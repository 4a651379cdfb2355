use super::app_state::AppMode;
use crate::lister::DirectoryLister;
use crate::selection::PathSegments;
use crate::tree::{SelectMode, TreeRow, TreeSession};
use crossterm::event::{KeyCode, KeyEvent};

pub struct TuiApp<L> {
    pub(super) session: TreeSession<L>,
    /// Rows after filtering, rebuilt after every session change.
    pub(super) rows: Vec<TreeRow>,
    pub(super) cursor: usize,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) confirmed: bool,
    pub(super) mode: AppMode,
    pub(super) filter_input: String,
    pub(super) filter_cursor_pos: usize,
    pub(super) list_viewport_height: usize,
    pub(super) summary_limit: usize,
}

impl<L: DirectoryLister> TuiApp<L> {
    pub fn new(session: TreeSession<L>, summary_limit: usize) -> Self {
        let mut app = TuiApp {
            session,
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            quit: false,
            confirmed: false,
            mode: AppMode::Normal,
            filter_input: String::new(),
            filter_cursor_pos: 0,
            list_viewport_height: 0, // Will be updated by ui_renderer
            summary_limit,
        };
        app.session.sync();
        app.rebuild_rows();
        app
    }

    pub fn into_session(self) -> TreeSession<L> {
        self.session
    }

    pub(super) fn current_path(&self) -> Option<PathSegments> {
        self.rows.get(self.cursor).map(|row| row.path.clone())
    }

    /// Recomputes the visible rows, keeping the cursor on the same path or
    /// its nearest visible ancestor.
    pub(super) fn rebuild_rows(&mut self) {
        let anchor = self.current_path();
        let all = self.session.visible_rows();
        self.rows = if self.filter_input.is_empty() {
            all
        } else {
            let needle = self.filter_input.to_lowercase();
            let matching: Vec<&PathSegments> = all
                .iter()
                .filter(|row| row.label().to_lowercase().contains(&needle))
                .map(|row| &row.path)
                .collect();
            all.iter()
                .filter(|row| matching.iter().any(|m| row.path.covers(m)))
                .cloned()
                .collect()
        };

        self.cursor = anchor
            .and_then(|anchor| {
                self.rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.path.covers(&anchor))
                    .max_by_key(|(_, row)| row.path.depth())
                    .map(|(idx, _)| idx)
            })
            .unwrap_or(0);
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn move_cursor(&mut self, delta: i32) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(len) as usize;
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        let list_height = self.list_viewport_height;
        if self.rows.is_empty() || list_height == 0 {
            self.scroll_offset = 0;
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + list_height {
            self.scroll_offset = self.cursor.saturating_sub(list_height - 1);
        }
        let max_offset = self.rows.len().saturating_sub(list_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn with_current(&mut self, action: impl FnOnce(&mut TreeSession<L>, &PathSegments)) {
        if let Some(path) = self.current_path() {
            action(&mut self.session, &path);
            self.rebuild_rows();
        }
    }

    pub(super) fn activate_current(&mut self) {
        self.with_current(|session, path| session.activate(path));
    }

    pub(super) fn toggle_expand_current(&mut self) {
        self.with_current(|session, path| session.toggle_expand(path));
    }

    pub(super) fn expand_current(&mut self) {
        self.with_current(|session, path| session.expand(path));
    }

    /// Collapses the current node, or moves to its parent when already closed.
    pub(super) fn collapse_or_ascend(&mut self) {
        let Some(path) = self.current_path() else {
            return;
        };
        if self.session.node(&path).is_some_and(|n| n.is_open()) {
            self.session.collapse(&path);
            self.rebuild_rows();
        } else if let Some(parent) = path.parent() {
            if let Some(idx) = self.rows.iter().position(|row| row.path == parent) {
                self.cursor = idx;
                self.ensure_selection_is_visible_in_viewport();
            }
        }
    }

    pub(super) fn refresh_current(&mut self) {
        self.with_current(|session, path| session.refresh(path));
    }

    pub(super) fn clear_selection(&mut self) {
        if self.session.options().mode == SelectMode::Multi {
            self.session.select(&PathSegments::root(), false, &[]);
            self.rebuild_rows();
        }
    }

    pub(super) fn collapse_all_roots(&mut self) {
        for root in self.session.roots() {
            self.session.collapse(&root);
        }
        self.rebuild_rows();
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('/') => {
                self.mode = AppMode::Filtering;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('y') => {
                self.confirmed = true;
                self.quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_current(),
            KeyCode::Char('o') | KeyCode::Tab => self.toggle_expand_current(),
            KeyCode::Right | KeyCode::Char('l') => self.expand_current(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_or_ascend(),
            KeyCode::Char('r') => self.refresh_current(),
            KeyCode::Char('c') => self.clear_selection(),
            KeyCode::Char('-') => self.collapse_all_roots(),
            _ => {}
        }
    }

    pub(super) fn handle_filtering_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.filter_input.clear();
                self.filter_cursor_pos = 0;
                self.rebuild_rows();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert(self.filter_cursor_pos, c);
                self.filter_cursor_pos += c.len_utf8();
                self.rebuild_rows();
            }
            KeyCode::Backspace => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                    self.filter_input.remove(self.filter_cursor_pos);
                    self.rebuild_rows();
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.filter_input[self.filter_cursor_pos..].chars().next() {
                    self.filter_cursor_pos += c.len_utf8();
                }
            }
            _ => {}
        }
    }
}
