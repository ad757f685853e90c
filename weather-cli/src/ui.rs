use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use weather_core::WeatherView;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_input(frame, app, chunks[0]);
    render_card(frame, &app.view, chunks[1]);
    render_help(frame, &app.view, chunks[2]);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(" City "));
    frame.render_widget(input, area);

    let offset = app.input.chars().count() as u16;
    let x = (area.x + 1 + offset).min(area.right().saturating_sub(2));
    frame.set_cursor_position((x, area.y + 1));
}

fn card_lines(view: &WeatherView) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(view.icon.as_str()),
        Line::from(Span::styled(
            view.temperature.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(view.description.as_str()),
        Line::from(""),
        Line::from(vec![Span::styled("Humidity  ", label), Span::raw(view.humidity.as_str())]),
        Line::from(vec![Span::styled("Wind      ", label), Span::raw(view.wind.as_str())]),
        Line::from(vec![Span::styled("Location  ", label), Span::raw(view.location.as_str())]),
        Line::from(""),
        Line::from(Span::styled(view.updated.as_str(), label)),
    ]
}

fn render_card(frame: &mut Frame, view: &WeatherView, area: Rect) {
    let style = if view.loading {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let card = Paragraph::new(card_lines(view))
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Weather "));
    frame.render_widget(card, area);
}

fn render_help(frame: &mut Frame, view: &WeatherView, area: Rect) {
    let help = format!(
        "Enter search | F2/Ctrl-G my location | Tab units ({}) | Esc quit",
        view.unit_label
    );
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use weather_core::UnitSystem;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn draws_input_fields_and_help() {
        let mut view = WeatherView::initial(UnitSystem::Imperial);
        view.temperature = "86°".into();
        view.description = "Clear sky".into();
        view.wind = "6.7 mph".into();
        let mut app = App::new(view);
        app.input = "Hyderabad".into();

        let screen = screen(&app);
        assert!(screen.contains("Hyderabad"));
        assert!(screen.contains("86°"));
        assert!(screen.contains("Clear sky"));
        assert!(screen.contains("6.7 mph"));
        assert!(screen.contains("Tab units (°F)"));
    }
}
