use crate::config::Config;
use crate::segment::{repack_strip, segment_wheel};
use crate::Error;
use image::GrayImage;
use log::debug;

/// Segmentation hint passed to the external line recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Treat the image as one raw text line of uniformly sized characters,
    /// bypassing any layout analysis.
    RawLine,
}

/// External single-line text recognition capability.
///
/// Implementations may return stray characters (noise, punctuation); the
/// adapter filters everything that is not an uppercase letter.
pub trait TextRecognizer {
    fn recognize_line(&mut self, strip: &GrayImage, mode: LineMode) -> Result<String, Error>;
}

impl<F> TextRecognizer for F
where
    F: FnMut(&GrayImage, LineMode) -> Result<String, Error>,
{
    fn recognize_line(&mut self, strip: &GrayImage, mode: LineMode) -> Result<String, Error> {
        self(strip, mode)
    }
}

/// One recognized letter tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Uppercase letter
    pub ch: char,
    /// Centroid in frame coordinates; the position a drag gesture targets
    pub pos: (u32, u32),
    /// Bounding-box width and height of the glyph contour
    pub size: (u32, u32),
}

/// All glyphs recognized in one cycle, in extraction order.
///
/// The order is stable within a cycle but carries no geometric meaning.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub glyphs: Vec<Glyph>,
}

impl BoardState {
    /// Concatenated glyph letters, used to detect an unchanged board across
    /// cycles.
    pub fn signature(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// Why a cycle produced no board. A frequent, normal outcome while the wheel
/// is absent or mid-animation; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionFailure {
    /// Glyph contour count outside the 6..=7 board sizes
    GlyphCount(usize),
    /// Recognized letter count does not match the extracted glyph count
    LetterCount { glyphs: usize, letters: usize },
}

/// Outcome of one recognition pass over a frame.
#[derive(Debug, Clone)]
pub enum Recognition {
    Board(BoardState),
    Failed(RecognitionFailure),
}

/// Run one full recognition pass: segment the wheel, repack the glyphs into
/// a strip, recognize the strip, and validate the result.
///
/// A recognition never yields a partial board: on any count mismatch the
/// whole cycle fails.
///
/// # Errors
/// Only if the external recognizer itself fails; mismatches are reported as
/// [`Recognition::Failed`].
pub fn recognize_wheel<R: TextRecognizer>(
    gray: &GrayImage,
    cfg: &Config,
    ocr: &mut R,
) -> Result<Recognition, Error> {
    let seg = segment_wheel(gray, cfg);
    let boxes = match seg.board_boxes() {
        Some(boxes) => boxes,
        None => {
            return Ok(Recognition::Failed(RecognitionFailure::GlyphCount(
                seg.boxes.len(),
            )))
        }
    };

    let strip = repack_strip(&seg, cfg);
    let text = ocr.recognize_line(&strip.image, LineMode::RawLine)?;
    let letters: Vec<char> = text.chars().filter(char::is_ascii_uppercase).collect();
    debug!("recognizer returned {:?}, kept {:?}", text, letters);

    if letters.len() != strip.positions.len() {
        return Ok(Recognition::Failed(RecognitionFailure::LetterCount {
            glyphs: strip.positions.len(),
            letters: letters.len(),
        }));
    }

    let glyphs = letters
        .into_iter()
        .zip(strip.positions.iter().zip(boxes))
        .map(|(ch, (&pos, r))| Glyph {
            ch,
            pos,
            size: (r.width, r.height),
        })
        .collect();
    Ok(Recognition::Board(BoardState { glyphs }))
}
