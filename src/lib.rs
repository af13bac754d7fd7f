//! Scratch-to-reveal card: an opaque gold overlay the user rubs away with the
//! pointer, revealing the content underneath and reporting completion once more
//! than half of it is gone.
//!
//! [`scratch::ScratchSurface`] is the core. [`card`] and [`board`] host it the
//! way a page would, and [`draw`] puts the board in a window.

pub mod board;
pub mod card;
pub mod confetti;
pub mod config;
pub mod coverage;
pub mod draw;
pub mod erase;
pub mod error;
pub mod font;
pub mod overlay;
pub mod pointer;
pub mod scratch;
pub mod types;

pub use board::{Board, BoardLayout, CardId, InputKind};
pub use card::{CardProps, Reveal, ScratchCard};
pub use config::{CoverageStrategy, ScratchConfig};
pub use error::{Error, Result};
pub use pointer::{ClientPoint, PointerEvent, ScreenBox};
pub use scratch::{CompletionCallback, Phase, ScratchSurface};
