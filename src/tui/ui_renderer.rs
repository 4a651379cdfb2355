use super::app_logic::TuiApp;
use super::app_state::AppMode;
use crate::lister::DirectoryLister;
use crate::tree::{NodePhase, SelectMode, TreeRow};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn draw_help_block(f: &mut Frame, mode: SelectMode, area: Rect) {
    let action = match mode {
        SelectMode::Multi => "Space/Enter: Tick",
        SelectMode::Single => "Space/Enter: Go to",
    };
    let help_text_lines_content = vec![
        Line::from(format!(
            "Arrows/jk: Nav | {action} | Tab/o: Fold | y: Confirm | q/Esc: Quit"
        )),
        Line::from("l/h: Open/Close | r: Refresh | c: Clear | -: Collapse All | /: Filter"),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Scopeyank Folder Selection"),
    );
    f.render_widget(help_paragraph, area);
}

fn draw_filter_input_block<L>(f: &mut Frame, app: &TuiApp<L>, area: Rect) {
    let input_text = format!("/{}", app.filter_input);
    let filter_paragraph = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter (Esc to cancel, Enter to apply)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(filter_paragraph, area);
    let typed_width = app.filter_input[..app.filter_cursor_pos].chars().count() as u16;
    f.set_cursor_position((area.x + 1 + typed_width + 1, area.y + 1));
}

fn row_line(row: &TreeRow, mode: SelectMode) -> Line<'static> {
    let indent = "  ".repeat(row.level);
    let fold_marker = if row.empty {
        "  "
    } else {
        match row.phase {
            NodePhase::Collapsed => "▸ ",
            NodePhase::Expanding => "… ",
            NodePhase::Expanded => "▾ ",
        }
    };
    let checkbox = match mode {
        SelectMode::Multi if row.state.checked => "[x] ",
        SelectMode::Multi if row.state.indeterminate => "[-] ",
        SelectMode::Multi => "[ ] ",
        SelectMode::Single => "",
    };
    let label_style = if row.active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(format!("{indent}{fold_marker}{checkbox}")),
        Span::styled(row.label(), label_style),
    ])
}

fn draw_main_list_block<L: DirectoryLister>(f: &mut Frame, app: &mut TuiApp<L>, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let mode = app.session.options().mode;
    let end = (app.scroll_offset + app.list_viewport_height).min(app.rows.len());
    let list_items: Vec<ListItem> = app
        .rows
        .get(app.scroll_offset..end)
        .unwrap_or(&[])
        .iter()
        .map(|row| ListItem::new(row_line(row, mode)))
        .collect();

    let list_title = if !app.filter_input.is_empty() && app.mode == AppMode::Normal {
        format!("Folders (Filter: '{}')", app.filter_input)
    } else {
        "Folders".to_string()
    };

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ratatui::widgets::ListState::default();
    if app.cursor >= app.scroll_offset && app.cursor < end {
        list_state_for_view.select(Some(app.cursor - app.scroll_offset));
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

fn draw_status_block<L: DirectoryLister>(f: &mut Frame, app: &TuiApp<L>, area: Rect) {
    let status = match app.session.options().mode {
        SelectMode::Multi => app
            .session
            .selection()
            .summary(app.summary_limit)
            .to_string(),
        SelectMode::Single => app.session.current().to_slash_path(),
    };
    let status_paragraph =
        Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("Selected"));
    f.render_widget(status_paragraph, area);
}

pub(super) fn ui_frame<L: DirectoryLister>(frame: &mut Frame, app: &mut TuiApp<L>) {
    let help_lines = 2;
    let filter_input_height = if app.mode == AppMode::Filtering { 3 } else { 0 };
    let top_block_container_height = (help_lines + 2) + filter_input_height;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(top_block_container_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let top_container_area = main_chunks[0];
    let list_area = main_chunks[1];
    let status_area = main_chunks[2];

    let top_content_constraints = if app.mode == AppMode::Filtering {
        vec![
            Constraint::Length(help_lines + 2),
            Constraint::Length(filter_input_height),
        ]
    } else {
        vec![Constraint::Length(help_lines + 2)]
    };
    let top_content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(top_content_constraints)
        .split(top_container_area);

    draw_help_block(frame, app.session.options().mode, top_content_chunks[0]);
    if app.mode == AppMode::Filtering {
        draw_filter_input_block(frame, app, top_content_chunks[1]);
    }

    draw_main_list_block(frame, app, list_area);
    draw_status_block(frame, app, status_area);
}
