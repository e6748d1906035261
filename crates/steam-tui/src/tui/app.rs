use super::image::detect_renderer;
use super::ui::{ArtworkView, artwork_size, render};
use super::worker::{ArtworkKey, ArtworkRequest, ArtworkResponse, spawn_artwork_worker};
use crate::artwork::{ArtworkCache, HttpSource};
use crate::library::Library;
use crate::nav::{Flow, Input, NavigationState};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, warn};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, widgets::ListState};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const MAX_EVENTS_PER_FRAME: usize = 100;

/// Runtime options for the browser
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache_dir: PathBuf,
    pub cache_max_entries: usize,
    /// Fetch and render cover art for the selected game
    pub artwork: bool,
}

struct ArtworkChannel {
    req_tx: Sender<ArtworkRequest>,
    resp_rx: Receiver<ArtworkResponse>,
}

struct App {
    library: Library,
    nav: NavigationState,
    artwork: Option<ArtworkChannel>,
    /// Key of the most recent request; responses for anything else are stale
    artwork_key: Option<ArtworkKey>,
    artwork_view: ArtworkView,
    /// Scroll offset of the tree pane
    tree_list: ListState,
    dirty: bool,
    should_quit: bool,
}

impl App {
    fn new(library: Library, artwork: Option<ArtworkChannel>) -> Self {
        Self {
            library,
            nav: NavigationState::new(),
            artwork,
            artwork_key: None,
            artwork_view: ArtworkView::Disabled,
            tree_list: ListState::default(),
            dirty: true,
            should_quit: false,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(input) = decode_key(key) else {
                    return;
                };
                if self.nav.handle(&self.library, input) == Flow::Quit {
                    self.should_quit = true;
                }
                self.dirty = true;
            }
            Event::Resize(..) => self.dirty = true,
            _ => {}
        }
    }

    /// Request artwork for the selected game if it is not already in flight
    fn sync_artwork(&mut self, width: usize, height: usize) {
        let Some(channel) = &self.artwork else {
            return;
        };
        let Some(game) = self.nav.selected() else {
            self.artwork_key = None;
            return;
        };
        let Some((w, h)) = artwork_size(width, height) else {
            self.artwork_key = None;
            if !matches!(self.artwork_view, ArtworkView::Unavailable) {
                self.artwork_view = ArtworkView::Unavailable;
                self.dirty = true;
            }
            return;
        };

        let key = ArtworkKey {
            appid: game.appid,
            width: w,
            height: h,
        };
        if self.artwork_key == Some(key) {
            return;
        }

        self.artwork_key = Some(key);
        self.artwork_view = ArtworkView::Loading;
        self.dirty = true;
        let request = ArtworkRequest {
            key,
            game: game.clone(),
        };
        if let Err(e) = channel.req_tx.send(request) {
            warn!("Artwork worker is gone: {e}");
            self.artwork_view = ArtworkView::Unavailable;
        }
    }

    fn poll_artwork(&mut self) {
        let Some(channel) = &self.artwork else {
            return;
        };
        while let Ok(resp) = channel.resp_rx.try_recv() {
            if self.artwork_key != Some(resp.key) {
                debug!("Discarding stale artwork for {}", resp.key.appid);
                continue;
            }
            self.artwork_view = match resp.artwork {
                Some(artwork) => ArtworkView::Ready(artwork),
                None => ArtworkView::Unavailable,
            };
            self.dirty = true;
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        render(
            area,
            frame.buffer_mut(),
            &self.library,
            &self.nav,
            &self.artwork_view,
            &mut self.tree_list,
        );
        self.dirty = false;
    }
}

/// Map a key press onto a controller input; unmapped keys yield `None`
pub fn decode_key(key: KeyEvent) -> Option<Input> {
    let input = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Input::Interrupt,
        (KeyCode::Up, _) => Input::Up,
        (KeyCode::Down, _) => Input::Down,
        (KeyCode::Left, _) => Input::Left,
        (KeyCode::Right, _) => Input::Right,
        (KeyCode::Enter, _) => Input::Enter,
        (KeyCode::Esc, _) => Input::Esc,
        (KeyCode::Backspace, _) => Input::Backspace,
        (KeyCode::Delete, _) => Input::Delete,
        (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Input::Char(c)
        }
        _ => return None,
    };
    Some(input)
}

fn start_artwork_worker(config: &AppConfig) -> Result<Option<ArtworkChannel>> {
    if !config.artwork {
        return Ok(None);
    }
    let Some(renderer) = detect_renderer() else {
        return Ok(None);
    };

    let source = HttpSource::new().context("Failed to build artwork HTTP client")?;
    let cache = ArtworkCache::new(&config.cache_dir, config.cache_max_entries, source);
    let (req_tx, req_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    spawn_artwork_worker(cache, renderer, req_rx, resp_tx);

    Ok(Some(ArtworkChannel { req_tx, resp_rx }))
}

/// Run the browser until the user quits
pub fn run(library: Library, config: AppConfig) -> Result<()> {
    // Renderer detection may query the terminal, so it happens before raw mode
    let artwork = start_artwork_worker(&config)?;
    let mut app = App::new(library, artwork);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode()?;
        return Err(e).context("Failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_artwork();

        let size = terminal.size()?;
        app.sync_artwork(
            usize::from(size.width),
            usize::from(size.height).saturating_sub(2),
        );

        if app.dirty {
            terminal.draw(|frame| app.draw(frame))?;
        }

        if event::poll(POLL_INTERVAL)? {
            let mut processed = 0;
            loop {
                app.handle_event(event::read()?);
                processed += 1;
                if app.should_quit
                    || processed >= MAX_EVENTS_PER_FRAME
                    || !event::poll(Duration::ZERO)?
                {
                    break;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
