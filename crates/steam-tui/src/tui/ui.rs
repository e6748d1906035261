//! Frame rendering
//!
//! The frame is drawn with ratatui widgets into a [`Buffer`]: the app hands
//! in the terminal's buffer, [`render_frame`] an off-screen one whose rows
//! are read back as strings.

use super::image::Artwork;
use crate::library::Library;
use crate::nav::NavigationState;
use crate::rows::{FlatRow, build_flat_list};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget,
};
use ratatui_image::Image;
use steam_api::{FamilyMember, Game};
use steam_ui::{
    ELLIPSIS, colors_enabled, display_width, fit_width, icons, pad_text, truncate_text,
};

const LEFT_PANE_PERCENT: usize = 35;
const MAX_ARTWORK_HEIGHT: usize = 20;
const ARTWORK_MARGIN: usize = 4;
const ARTWORK_INDENT: u16 = 2;
const MEMBER_NAME_WIDTH: usize = 20;

const SEARCH_PLACEHOLDER: &str = "  Press / to search";
const DETAIL_PLACEHOLDER: &str = "  Select a game to see details.";
const NO_RESULTS: &str = "  No results";
const KEY_LEGEND: &str = "[↑↓/jk] move  [→/l] open  [←/h] close  [/] search  [q] quit";

/// What the detail pane shows where the artwork goes
#[derive(Debug)]
pub enum ArtworkView {
    /// No renderer; the block is omitted entirely
    Disabled,
    Loading,
    Ready(Artwork),
    Unavailable,
}

/// `(left, right)` pane widths; one column between them is the separator
pub fn pane_widths(width: usize) -> (usize, usize) {
    let left = width * LEFT_PANE_PERCENT / 100;
    let right = width.saturating_sub(left + 1);
    (left, right)
}

/// Cell box the artwork is rendered into, or `None` if there is no room
pub fn artwork_size(width: usize, height: usize) -> Option<(usize, usize)> {
    let (_, right) = pane_widths(width);
    let w = right.saturating_sub(ARTWORK_MARGIN);
    let h = artwork_rows(height);
    (w > 0 && h > 0).then_some((w, h))
}

fn artwork_rows(pane_height: usize) -> usize {
    MAX_ARTWORK_HEIGHT.min(pane_height / 2)
}

fn dim() -> Style {
    Style::new().add_modifier(Modifier::DIM)
}

fn fg(color: Color) -> Style {
    if colors_enabled() {
        Style::new().fg(color)
    } else {
        Style::new()
    }
}

/// Cut a line to `width` columns. Anything dropped is replaced by an
/// ellipsis in the last column.
fn fit(line: Line<'static>, width: usize) -> Line<'static> {
    if line.width() <= width {
        return line;
    }

    let style = line.style;
    let mut budget = width.saturating_sub(1);
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        let w = span.width();
        if w <= budget {
            budget -= w;
            spans.push(span);
            continue;
        }
        spans.push(Span::styled(fit_width(&span.content, budget).to_string(), span.style));
        break;
    }
    if width > 0 {
        spans.push(Span::raw(ELLIPSIS.to_string()));
    }
    Line::from(spans).style(style)
}

/// Draw a whole frame into `area`: search bar, both panes, status bar.
///
/// `list` carries the tree pane's scroll offset from one frame to the next.
pub fn render(
    area: Rect,
    buf: &mut Buffer,
    library: &Library,
    state: &NavigationState,
    artwork: &ArtworkView,
    list: &mut ListState,
) {
    let width = usize::from(area.width);
    let [search_area, body, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let (left_width, _) = pane_widths(width);
    let [left, right] =
        Layout::horizontal([Constraint::Length(left_width as u16), Constraint::Fill(1)])
            .areas(body);

    Paragraph::new(fit(render_search_bar(state), width)).render(search_area, buf);
    render_tree_pane(library, state, list, left, buf);

    let separator = Block::new().borders(Borders::LEFT).border_style(dim());
    let detail = separator.inner(right);
    separator.render(right, buf);
    render_detail_pane(&library.family, state.selected(), artwork, detail, buf);

    Paragraph::new(fit(Line::styled(KEY_LEGEND, dim()), width)).render(status_area, buf);
}

/// Render a whole frame off-screen with a fresh scroll offset.
///
/// `height` is the pane height; the result has `height + 2` lines, each
/// exactly `width` columns.
pub fn render_frame(
    library: &Library,
    state: &NavigationState,
    artwork: &ArtworkView,
    width: u16,
    height: u16,
) -> Vec<String> {
    let area = Rect::new(0, 0, width, height.saturating_add(2));
    let mut buf = Buffer::empty(area);
    render(area, &mut buf, library, state, artwork, &mut ListState::default());
    buffer_lines(&buf)
}

/// One string per buffer row. The cell after a wide glyph only pads it and
/// is skipped.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut skip = 0;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buf[(x, y)].symbol();
                skip = display_width(symbol).saturating_sub(1);
                line.push_str(symbol);
            }
            line
        })
        .collect()
}

pub fn render_search_bar(state: &NavigationState) -> Line<'static> {
    let Some(search) = state.search() else {
        return Line::styled(SEARCH_PLACEHOLDER, dim());
    };

    let mut spans = vec![Span::raw(format!(
        "/ {}{}",
        search.query,
        icons::INPUT_CURSOR
    ))];
    if !search.query.is_empty() {
        let count = match search.results.len() {
            1 => "(1 match)".to_string(),
            n => format!("({n} matches)"),
        };
        spans.push(Span::styled(format!("  {count}"), dim()));
    }
    Line::from(spans)
}

/// Left pane: the flat tree in browse mode, result names in search mode
pub fn render_tree_pane(
    library: &Library,
    state: &NavigationState,
    list: &mut ListState,
    area: Rect,
    buf: &mut Buffer,
) {
    let rows: Vec<(String, bool)> = match state.search() {
        Some(search) => search
            .results
            .iter()
            .map(|g| (format!("  {}", g.name), false))
            .collect(),
        None => build_flat_list(&library.tree, state.expanded())
            .into_iter()
            .map(|row| match row {
                FlatRow::GenreHeader {
                    genre,
                    game_count,
                    expanded,
                } => {
                    let icon = if expanded {
                        icons::EXPANDED
                    } else {
                        icons::COLLAPSED
                    };
                    (format!("{icon} {genre} ({game_count})"), true)
                }
                FlatRow::GameRow { game, .. } => {
                    (format!("  {} {}", icons::BRANCH, game.name), false)
                }
            })
            .collect(),
    };

    if rows.is_empty() {
        list.select(None);
        if state.search().is_some_and(|s| !s.query.is_empty()) {
            Paragraph::new(Line::styled(NO_RESULTS, dim())).render(area, buf);
        }
        return;
    }

    let width = usize::from(area.width);
    let cursor = state.cursor().min(rows.len() - 1);
    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (text, header))| {
            let mut text = truncate_text(&text, width.saturating_sub(3));
            if i == cursor {
                text = format!(
                    "{} {}",
                    pad_text(&text, width.saturating_sub(2)),
                    icons::CURSOR_MARKER
                );
            }
            let style = if header {
                Style::new().add_modifier(Modifier::BOLD)
            } else {
                Style::new()
            };
            ListItem::new(Line::from(text)).style(style)
        })
        .collect();

    list.select(Some(cursor));
    let tree = List::new(items).highlight_style(Style::new().add_modifier(Modifier::REVERSED));
    StatefulWidget::render(tree, area, buf, list);
}

/// Right pane: placeholder, or artwork and details of the selected game
pub fn render_detail_pane(
    family: &[FamilyMember],
    selected: Option<&Game>,
    artwork: &ArtworkView,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = usize::from(area.width);
    let Some(game) = selected else {
        let lines = vec![Line::default(), fit(Line::styled(DETAIL_PLACEHOLDER, dim()), width)];
        Paragraph::new(lines).render(area, buf);
        return;
    };

    let mut lines = Vec::new();
    let mut text_area = area;
    match artwork {
        ArtworkView::Disabled => {}
        ArtworkView::Loading => {
            lines.push(Line::styled("  Loading artwork…", dim()));
            lines.push(Line::default());
        }
        ArtworkView::Unavailable => {
            lines.push(Line::styled("  No artwork available", dim()));
            lines.push(Line::default());
        }
        ArtworkView::Ready(art) => {
            let rows = match art {
                Artwork::Text(text) => text.height(),
                Artwork::Image(_) => artwork_rows(usize::from(area.height)),
            };
            let rows = u16::try_from(rows).unwrap_or(u16::MAX);
            let [art_area, rest] = Layout::vertical([
                Constraint::Length(rows.saturating_add(1)),
                Constraint::Fill(1),
            ])
            .areas(area);
            let [_, art_area] =
                Layout::horizontal([Constraint::Length(ARTWORK_INDENT), Constraint::Fill(1)])
                    .areas(art_area);

            match art {
                Artwork::Text(text) => Paragraph::new(text.clone()).render(art_area, buf),
                Artwork::Image(protocol) => Image::new(protocol).render(art_area, buf),
            }
            text_area = rest;
        }
    }

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(game.name.clone(), Style::new().add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::raw(format!("  AppID:    {}", game.appid)));
    lines.push(Line::raw(format!("  Playtime: {}", game.playtime_display())));
    lines.push(Line::default());
    lines.push(Line::styled("  Family ownership:", dim()));

    let mut owners = 0;
    for member in family {
        let name = pad_text(
            &truncate_text(&member.persona_name, MEMBER_NAME_WIDTH),
            MEMBER_NAME_WIDTH,
        );
        if member.owns(game.appid) {
            owners += 1;
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(icons::OWNED, fg(Color::Green)),
                Span::raw(format!(" {name} owned")),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(icons::NOT_OWNED, fg(Color::Red)),
                Span::raw(format!(" {name} ")),
                Span::styled("not owned", dim()),
            ]));
        }
    }

    lines.push(Line::default());
    lines.push(Line::raw(format!(
        "  {owners} / {} members own this",
        family.len()
    )));

    let lines: Vec<Line> = lines.into_iter().map(|l| fit(l, width)).collect();
    Paragraph::new(lines).render(text_area, buf);
}
