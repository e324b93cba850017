pub mod cloud_view;
pub mod palette;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::{AppMode, AppState},
    layout::RunState,
    ui::cloud_view::{CloudView, background_color},
};

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    if area.width < 20 || area.height < 4 {
        let warning = Paragraph::new("Terminal too small.")
            .block(Block::default().borders(Borders::ALL).title("terminal-wordcloud"));
        frame.render_widget(warning, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    render_cloud(frame, chunks[0], state);
    render_status_line(frame, chunks[1], state);
}

fn render_cloud(frame: &mut Frame, area: Rect, state: &AppState) {
    let surface = state.board.surface();
    let canvas = surface
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if state.capability.is_colored() {
        let fill = Block::default().style(Style::default().bg(background_color(&canvas, state.capability)));
        frame.render_widget(fill, area);
    }
    frame.render_widget(CloudView::new(&canvas, state.capability), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let (label, color) = status_label(state);
    let mut spans = vec![
        Span::styled(
            format!(" {label} "),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " placed {} · skipped {} · {} words",
            state.placed,
            state.skipped,
            state.words.len()
        )),
    ];
    if let Some(word) = &state.last_word {
        spans.push(Span::styled(
            format!(" · last: {word}"),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(err) = &state.last_error {
        spans.push(Span::styled(
            format!(" · {err}"),
            Style::default().fg(Color::LightRed),
        ));
    }
    spans.push(Span::styled(
        format!(
            "  shuffle {} · q quit · r restart · s shuffle",
            if state.settings.layout.shuffle { "on" } else { "off" }
        ),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_label(state: &AppState) -> (&'static str, Color) {
    match (state.mode, state.run_state) {
        (AppMode::Unsupported, _) => ("unsupported", Color::LightRed),
        (_, RunState::Aborted) => ("aborted", Color::Yellow),
        (AppMode::Finished, _) | (_, RunState::Stopped) => ("done", Color::LightGreen),
        _ => ("packing", Color::LightCyan),
    }
}
