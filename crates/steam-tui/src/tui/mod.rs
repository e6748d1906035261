//! Interactive terminal browser
//!
//! Architecture:
//! - Main thread: input events, state transitions and frame rendering
//! - Worker thread: artwork download, caching and rendering
//! - Communication via mpsc channels (request -> worker, artwork <- worker)
//!
//! Layout:
//! ```text
//!   / portal|  (2 matches)
//! ▼ Action (12)         │  ▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀
//!   ├ Half-Life         │  ▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀
//!   ├ Portal 2        ◀ │
//! ▶ Puzzle (4)          │  Portal 2
//! ▶ Strategy (9)        │  AppID:    620
//!                       │  Playtime: 14h 2m
//!                       │
//!                       │  Family ownership:
//!                       │    ✓ alice                owned
//!                       │    ✗ bob                  not owned
//!                       │
//!                       │  1 / 2 members own this
//! [↑↓/jk] move  [→/l] open  [←/h] close  [/] search  [q] quit
//! ```

mod app;
pub mod image;
pub mod ui;
pub mod worker;

pub use app::{AppConfig, decode_key, run};
