//! Turning cached artwork files into something the detail pane can draw

use ansi_to_tui::IntoText;
use image::ImageReader;
use log::debug;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui_image::Resize;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::Protocol;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Rendered artwork, already fitted to the cell box it was requested for
pub enum Artwork {
    /// Styled symbols from an external tool
    Text(Text<'static>),
    /// A terminal image protocol: half blocks, kitty, sixel or iTerm2
    Image(Protocol),
}

impl fmt::Debug for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artwork::Text(text) => f.debug_tuple("Text").field(&text.height()).finish(),
            Artwork::Image(_) => f.write_str("Image"),
        }
    }
}

/// Renders an image file into at most `width` × `height` terminal cells
pub trait ArtworkRenderer: Send {
    fn render(&self, path: &Path, width: usize, height: usize) -> Option<Artwork>;
}

/// Shells out to `chafa` for symbol-based rendering
pub struct ChafaRenderer {
    program: PathBuf,
}

impl ChafaRenderer {
    /// `None` when `chafa` is not on `PATH`
    pub fn detect() -> Option<Self> {
        which::which("chafa").ok().map(|program| Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArtworkRenderer for ChafaRenderer {
    fn render(&self, path: &Path, width: usize, height: usize) -> Option<Artwork> {
        if width == 0 || height == 0 {
            return None;
        }

        let output = Command::new(&self.program)
            .args(["--format", "symbols", "--size"])
            .arg(format!("{width}x{height}"))
            .arg(path)
            .output()
            .map_err(|e| debug!("Failed to run {}: {e}", self.program.display()))
            .ok()?;
        if !output.status.success() {
            debug!("chafa exited with {} for {}", output.status, path.display());
            return None;
        }

        let mut text = output
            .stdout
            .into_text()
            .map_err(|e| debug!("Unreadable chafa output for {}: {e}", path.display()))
            .ok()?;
        text.lines.retain(|line| line.width() > 0);
        text.lines.truncate(height);
        (!text.lines.is_empty()).then_some(Artwork::Text(text))
    }
}

/// Decodes with `image` and encodes for the terminal with `ratatui-image`
pub struct PickerRenderer {
    picker: Picker,
}

impl PickerRenderer {
    /// Two pixels per cell with the upper half block. Needs truecolor.
    pub fn halfblocks() -> Self {
        Self {
            picker: Picker::halfblocks(),
        }
    }

    /// Ask the terminal which graphics protocol and font size it has.
    /// Must run before the alternate screen is entered.
    pub fn query() -> Option<Self> {
        Picker::from_query_stdio()
            .map_err(|e| debug!("Terminal graphics query failed: {e:?}"))
            .ok()
            .map(|picker| Self { picker })
    }
}

impl ArtworkRenderer for PickerRenderer {
    fn render(&self, path: &Path, width: usize, height: usize) -> Option<Artwork> {
        if width == 0 || height == 0 {
            return None;
        }

        // The cache names every file .jpg, whatever the content
        let img = ImageReader::open(path)
            .ok()?
            .with_guessed_format()
            .ok()?
            .decode()
            .map_err(|e| debug!("Cannot decode {}: {e}", path.display()))
            .ok()?;

        let size = Rect::new(0, 0, u16::try_from(width).ok()?, u16::try_from(height).ok()?);
        self.picker
            .new_protocol(img, size, Resize::Fit(None))
            .map_err(|e| debug!("Cannot encode {}: {e:?}", path.display()))
            .ok()
            .map(Artwork::Image)
    }
}

/// True for `COLORTERM` values that advertise 24-bit colour
pub fn is_truecolor(colorterm: Option<&str>) -> bool {
    matches!(colorterm, Some("truecolor" | "24bit"))
}

/// Kitty and Ghostty speak a real image protocol
pub fn supports_graphics(term: Option<&str>, term_program: Option<&str>) -> bool {
    term.is_some_and(|t| t.contains("kitty") || t.contains("ghostty"))
        || term_program.is_some_and(|p| p.to_lowercase().contains("ghostty"))
}

/// Pick a renderer once at startup: chafa, then a terminal image protocol,
/// then half blocks on truecolor terminals, then nothing
pub fn detect_renderer() -> Option<Box<dyn ArtworkRenderer>> {
    if let Some(chafa) = ChafaRenderer::detect() {
        debug!("Rendering artwork with {}", chafa.program.display());
        return Some(Box::new(chafa));
    }

    let term = std::env::var("TERM").ok();
    let term_program = std::env::var("TERM_PROGRAM").ok();
    if supports_graphics(term.as_deref(), term_program.as_deref()) {
        if let Some(renderer) = PickerRenderer::query() {
            debug!("Rendering artwork with the terminal image protocol");
            return Some(Box::new(renderer));
        }
    }

    let colorterm = std::env::var("COLORTERM").ok();
    if is_truecolor(colorterm.as_deref()) {
        debug!("Rendering artwork with half blocks");
        return Some(Box::new(PickerRenderer::halfblocks()));
    }

    debug!("No artwork renderer available");
    None
}
