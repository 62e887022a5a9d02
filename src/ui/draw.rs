use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::config::RgbColor;
use crate::product::Product;

use super::app::{App, SearchFocus, View};

const SEARCH_HELP_INPUT: &str = "Type to filter  Esc: focus results  Enter: open";
const SEARCH_HELP_RESULTS: &str = "j/k: nav  Enter: open  /: focus search  q: quit";
const DETAIL_HELP: &str = "j/k: scroll  Esc: back to catalog  q: quit";
const NO_MATCHES: &str = "No products match the current search.";

pub fn render<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_body(frame, layout[1], app);
    draw_footer(frame, layout[2], app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let style = header_text_style(app);
    let text = match &app.view {
        View::Detail { product, .. } => {
            format!("CATALOG://{}  product {}", app.catalog_origin(), product.id)
        }
        View::List => format!(
            "CATALOG://{}  {}/{} products",
            app.catalog_origin(),
            app.filtered.len(),
            app.product_count()
        ),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style))),
        area,
    );
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, app: &App) {
    if let View::Detail { product, scroll } = &app.view {
        draw_detail(frame, area, app, product, *scroll);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(area);
    draw_search(frame, chunks[0], app);
    draw_summary(frame, chunks[1], app);
}

fn draw_search(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = matches!(app.search_focus, SearchFocus::Input);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    draw_search_input(frame, layout[0], app, active);
    draw_search_list(frame, layout[1], app);
}

fn draw_search_input(frame: &mut Frame<'_>, area: Rect, app: &App, active: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let label = "SEARCH: ";
    let value_style = if active {
        selection_style(app)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled(label, header_text_style(app)),
        Span::styled(app.search_input.value().to_string(), value_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if active {
        let column = label.len() + app.search_input.visual_cursor();
        let x = area.x.saturating_add(column as u16);
        frame.set_cursor_position((x, area.y));
    }
}

fn draw_search_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let items: Vec<ListItem> = if app.filtered.is_empty() {
        vec![ListItem::new(Line::from(NO_MATCHES))]
    } else {
        app.filtered_products()
            .map(|p| ListItem::new(Line::from(p.title.clone())))
            .collect()
    };

    let mut state = ListState::default();
    if !app.filtered.is_empty() {
        state.select(Some(app.selected));
    }

    let list = List::new(items)
        .highlight_style(selection_style(app))
        .highlight_symbol(" ")
        .repeat_highlight_symbol(false);

    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_summary(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(product) = app.selected_product() else {
        frame.render_widget(Paragraph::new(NO_MATCHES), inner);
        return;
    };

    let lines = product_lines(app, product, None);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Card content for a product. The `reverse` hint mirrors the card: the
/// image reference leads instead of trailing.
fn product_lines<'a>(app: &App, product: &Product, details: Option<&str>) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            product.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(product.description.clone()),
    ];
    if let Some(details) = details {
        lines.push(Line::from(""));
        lines.push(Line::from(details.to_string()));
    }
    if !product.image.is_empty() {
        let image_line = Line::from(Span::styled(
            format!("image: {}", product.image),
            header_text_style(app),
        ));
        if product.reverse.unwrap_or(false) {
            lines.insert(0, Line::from(""));
            lines.insert(0, image_line);
        } else {
            lines.push(Line::from(""));
            lines.push(image_line);
        }
    }
    lines
}

fn draw_detail(frame: &mut Frame<'_>, area: Rect, app: &App, product: &Product, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines = product_lines(app, product, product.details.as_deref());
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let message: String = if let Some(status) = &app.status {
        status.clone()
    } else {
        match &app.view {
            View::Detail { .. } => DETAIL_HELP.to_string(),
            View::List => match app.search_focus {
                SearchFocus::Input => SEARCH_HELP_INPUT.to_string(),
                SearchFocus::Results => SEARCH_HELP_RESULTS.to_string(),
            },
        }
    };

    let colors = &app.config().ui.colors;
    let style = Style::default()
        .fg(color(colors.status_fg))
        .bg(color(colors.status_bg));
    frame.render_widget(Paragraph::new(message).style(style), area);
}

fn selection_style(app: &App) -> Style {
    let colors = &app.config().ui.colors;
    Style::default()
        .fg(color(colors.selection_fg))
        .bg(color(colors.selection_bg))
}

fn border_style(app: &App) -> Style {
    Style::default().fg(color(app.config().ui.colors.border))
}

fn header_text_style(app: &App) -> Style {
    Style::default().fg(color(app.config().ui.colors.border))
}

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
