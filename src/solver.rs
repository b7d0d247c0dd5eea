use crate::config::{Config, Scale};
use crate::moves::build_move;
use crate::recognize::{recognize_wheel, Recognition, RecognitionFailure, TextRecognizer};
use crate::shape::ShapeMatcher;
use crate::words::{matching_words, rank_candidates, Dictionary};
use crate::Error;
use image::buffer::ConvertBuffer;
use image::math::Rect;
use image::{GrayImage, RgbImage};
use log::{info, warn};
use std::convert::Infallible;
use std::thread;
use std::time::Duration;

/// Wait after the wheel-center click for floating rewards to collapse.
pub const SETTLE_AFTER_CLICK: Duration = Duration::from_millis(700);
/// Duration hint for each drag step between letters.
pub const DRAG_STEP: Duration = Duration::from_millis(100);
/// Pause between finishing one word and starting the next.
pub const WORD_PAUSE: Duration = Duration::from_millis(100);
/// Cooldown after a solved board, while the game plays its animations.
pub const CYCLE_COOLDOWN: Duration = Duration::from_secs(12);

/// Delivers the current raster contents of a display region.
pub trait FrameSource {
    /// `region` is in device-pixel coordinates.
    fn capture_frame(&mut self, region: Rect) -> Result<RgbImage, Error>;
}

/// Simulated pointer at base-resolution coordinates.
pub trait InputInjector {
    fn press_and_hold(&mut self, pos: (u32, u32));
    fn move_to(&mut self, pos: (u32, u32), duration: Duration);
    fn release(&mut self, pos: (u32, u32));
    fn click(&mut self, pos: (u32, u32));
}

/// Brings the game window up before the loop starts. Idempotent,
/// fire-and-forget; the loop consumes no result from it.
pub trait DeviceController {
    fn ensure_app_running(&mut self);
}

/// What one recognition cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Recognition failed; a reshuffle was requested
    Failed(RecognitionFailure),
    /// The board did not change since the previous cycle; a reshuffle was
    /// requested without re-solving
    Duplicate,
    /// The board was solved and every buildable word was played
    Solved { words_played: usize },
}

/// The solve loop: one owner of all cross-cycle state.
///
/// Strictly sequential; a cycle runs to completion, including the execution
/// of every move it produces, before the next one begins. The only state
/// carried across cycles is the previous board signature.
pub struct Session<F, I, R> {
    cfg: Config,
    dictionary: Dictionary,
    shapes: ShapeMatcher,
    frames: F,
    input: I,
    ocr: R,
    prev_signature: String,
}

impl<F, I, R> Session<F, I, R>
where
    F: FrameSource,
    I: InputInjector,
    R: TextRecognizer,
{
    pub fn new(cfg: Config, dictionary: Dictionary, frames: F, input: I, ocr: R) -> Self {
        let shapes = ShapeMatcher::new(cfg.scale);
        Session {
            cfg,
            dictionary,
            shapes,
            frames,
            input,
            ocr,
            prev_signature: String::new(),
        }
    }

    /// Run cycles until the process is terminated.
    ///
    /// Only a solved board is followed by the [`CYCLE_COOLDOWN`]; failed and
    /// duplicate cycles have already requested a reshuffle and retry
    /// immediately after the next settle wait.
    ///
    /// # Errors
    /// Only collaborator failures (capture, recognizer backend) end the loop;
    /// recognition failures and duplicate boards are handled in-cycle.
    pub fn run<D: DeviceController>(mut self, device: &mut D) -> Result<Infallible, Error> {
        device.ensure_app_running();
        loop {
            let outcome = self.run_cycle()?;
            info!("cycle finished: {:?}", outcome);
            thread::sleep(cooldown(&outcome));
        }
    }

    /// One full cycle: capture, recognize, solve, play.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, Error> {
        // collapse any floating reward animation before capturing
        self.input.click(self.cfg.wheel_center);
        thread::sleep(SETTLE_AFTER_CLICK);

        let region = self.cfg.scale.up_rect(self.cfg.screenshot_region);
        let frame = self.frames.capture_frame(region)?;
        let gray: GrayImage = frame.convert();

        let board = match recognize_wheel(&gray, &self.cfg, &mut self.ocr)? {
            Recognition::Board(board) => board,
            Recognition::Failed(why) => {
                info!("recognition failed ({:?}), reshuffling", why);
                self.input.click(self.cfg.shuffle_button);
                // a piggybank popup may be covering the wheel
                self.input.click(self.cfg.piggybank_close);
                return Ok(CycleOutcome::Failed(why));
            }
        };

        let signature = board.signature();
        if signature == self.prev_signature {
            info!("board {} unchanged, reshuffling", signature);
            self.input.click(self.cfg.shuffle_button);
            return Ok(CycleOutcome::Duplicate);
        }
        self.prev_signature = signature;

        let forbidden = self.shapes.forbidden_mode(&gray, &self.cfg);
        let candidates = rank_candidates(matching_words(&self.dictionary, &board), forbidden);
        info!(
            "board {}: {} candidate words (forbidden mode: {})",
            self.prev_signature,
            candidates.len(),
            forbidden
        );

        let mut words_played = 0;
        for word in candidates {
            match build_move(word, &board.glyphs) {
                Some(path) => {
                    Self::play(&mut self.input, self.cfg.scale, &path);
                    words_played += 1;
                    thread::sleep(WORD_PAUSE);
                }
                // the matcher admitted the word, so this should not happen
                None => warn!("no glyph path for {:?}, skipping", word),
            }
        }
        Ok(CycleOutcome::Solved { words_played })
    }

    /// Drag through the path: press on the first letter, glide through the
    /// middle ones, release on the last.
    fn play(input: &mut I, scale: Scale, path: &[(u32, u32)]) {
        let Some((&first, rest)) = path.split_first() else {
            return;
        };
        input.press_and_hold(scale.down_point(first));
        match rest.split_last() {
            Some((&last, mid)) => {
                for &pos in mid {
                    input.move_to(scale.down_point(pos), DRAG_STEP);
                }
                input.release(scale.down_point(last));
            }
            // degenerate single-letter path: release in place
            None => input.release(scale.down_point(first)),
        }
    }
}

/// How long to wait before the next cycle. Only a solved board needs the
/// animation cooldown; anything else retries right away.
fn cooldown(outcome: &CycleOutcome) -> Duration {
    match outcome {
        CycleOutcome::Solved { .. } => CYCLE_COOLDOWN,
        CycleOutcome::Failed(_) | CycleOutcome::Duplicate => Duration::ZERO,
    }
}
