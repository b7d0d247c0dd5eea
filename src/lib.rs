//! Recognizes the letter wheel of a word-wheel puzzle game from a screenshot,
//! finds every word the wheel letters can spell, and turns each one into an
//! ordered drag path over the letter tiles.
//!
//! The crate is the recognition-and-solving core only. Capturing the screen,
//! injecting pointer input, recognizing text and keeping the game process
//! alive are boundary traits ([`FrameSource`], [`InputInjector`],
//! [`TextRecognizer`], [`DeviceController`]) that callers implement for
//! their platform. Any `FnMut(&GrayImage, LineMode) -> Result<String, Error>`
//! closure works as a [`TextRecognizer`].
//!
//! # Basic usage
//! ```no_run
//! # use wordwheel_solver::{
//! #     matching_words, rank_candidates, recognize_wheel, Config, Dictionary, Error, LineMode,
//! #     Recognition,
//! # };
//! let cfg = Config::default();
//! let gray = image::open("screenshots/wheel.png")?.into_luma8();
//! let mut ocr = |_strip: &image::GrayImage, _mode: LineMode| -> Result<String, Error> {
//!     // hand the strip to tesseract or any other line recognizer here
//!     Ok(String::from("TACKLE"))
//! };
//! if let Recognition::Board(board) = recognize_wheel(&gray, &cfg, &mut ocr)? {
//!     let dictionary = Dictionary::load("words.txt")?;
//!     let words = rank_candidates(matching_words(&dictionary, &board), false);
//!     println!("board {}: {} playable words", board.signature(), words.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! A full bot wraps the same pipeline in a [`Session`], which re-runs it
//! forever, shuffles the wheel on failed or unchanged boards, and plays every
//! ranked word through the [`InputInjector`].

mod config;
mod error;
mod moves;
mod recognize;
mod segment;
mod shape;
mod solver;
mod words;

pub use config::{Config, Scale};
pub use error::Error;
pub use moves::build_move;
pub use recognize::{
    recognize_wheel, BoardState, Glyph, LineMode, Recognition, RecognitionFailure, TextRecognizer,
};
pub use segment::{repack_strip, segment_wheel, GlyphStrip, Segmentation};
pub use shape::{ShapeMatcher, SHAPE_MATCH_THRESHOLD};
pub use solver::{
    CycleOutcome, DeviceController, FrameSource, InputInjector, Session, CYCLE_COOLDOWN,
    DRAG_STEP, SETTLE_AFTER_CLICK, WORD_PAUSE,
};
pub use words::{matching_words, rank_candidates, Dictionary};
