use crate::config::Config;
use image::math::Rect;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::drawing::draw_filled_circle_mut;
use log::debug;

/// Half side of the square patch sampled at the wheel center to pick the
/// thresholding polarity. The center of the wheel is known to be empty, so a
/// mostly-foreground sample means the binarization came out inverted.
const CENTER_SAMPLE_HALF: u32 = 8;

/// A binarized frame restricted to the letter wheel, with the glyph contours
/// found in it.
pub struct Segmentation {
    /// Otsu-thresholded frame, masked to the wheel disk, polarity corrected.
    /// Glyph pixels are foreground (255).
    pub binary: GrayImage,
    /// Bounding boxes of the glyph-sized contours, in extraction order.
    ///
    /// The order is whatever the contour walk produced; it has no geometric
    /// meaning and consumers must not assume one.
    pub boxes: Vec<Rect>,
}

impl Segmentation {
    /// The glyph boxes, if their count is a plausible board.
    ///
    /// Boards always hold 6 or 7 letters; anything else means the wheel is
    /// absent or mid-animation and the frame carries no board.
    pub fn board_boxes(&self) -> Option<&[Rect]> {
        matches!(self.boxes.len(), 6 | 7).then(|| self.boxes.as_slice())
    }
}

/// Extract candidate glyph contours from a grayscale frame.
///
/// The frame is Otsu-thresholded, masked to the wheel disk, polarity
/// corrected from the known-empty center patch, and the external contours
/// whose bounding boxes are glyph-sized are kept.
pub fn segment_wheel(gray: &GrayImage, cfg: &Config) -> Segmentation {
    let mut binary = threshold(gray, otsu_level(gray), ThresholdType::Binary);

    let (cx, cy) = cfg.scale.up_point(cfg.wheel_center);
    let radius = cfg.scale.up(cfg.wheel_radius);
    let mut mask = GrayImage::new(binary.width(), binary.height());
    draw_filled_circle_mut(&mut mask, (cx as i32, cy as i32), radius as i32, Luma([255u8]));
    for (m, p) in mask.pixels().zip(binary.pixels_mut()) {
        if m[0] == 0 {
            p[0] = 0;
        }
    }

    if center_mostly_foreground(&binary, (cx, cy), cfg.scale.up(CENTER_SAMPLE_HALF)) {
        for (m, p) in mask.pixels().zip(binary.pixels_mut()) {
            if m[0] != 0 {
                p[0] = 255 - p[0];
            }
        }
    }

    let contours = find_contours::<i32>(&binary);
    let min_h = cfg.scale.up(cfg.glyph_min_height);
    let max_h = cfg.scale.up(cfg.glyph_max_height);
    let min_w = cfg.scale.up(cfg.glyph_min_width);
    let max_w = cfg.scale.up(cfg.glyph_max_width);
    let boxes: Vec<Rect> = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(bounding_box)
        .filter(|r| {
            (min_h..=max_h).contains(&r.height) && (min_w..=max_w).contains(&r.width)
        })
        .collect();
    debug!(
        "segmenter: {} contours, {} glyph-sized",
        contours.len(),
        boxes.len()
    );

    Segmentation { binary, boxes }
}

fn center_mostly_foreground(binary: &GrayImage, (cx, cy): (u32, u32), half: u32) -> bool {
    // clamp the sample window: the frame may be smaller than the configured
    // region, and the wheel center can then fall outside it entirely
    let x0 = cx.saturating_sub(half);
    let y0 = cy.saturating_sub(half);
    let x1 = (cx + half).min(binary.width());
    let y1 = (cy + half).min(binary.height());
    let mut foreground = 0u32;
    for y in y0..y1 {
        for x in x0..x1 {
            if binary.get_pixel(x, y)[0] != 0 {
                foreground += 1;
            }
        }
    }
    foreground > x1.saturating_sub(x0) * y1.saturating_sub(y0) / 2
}

fn bounding_box(contour: &Contour<i32>) -> Rect {
    let xs = contour.points.iter().map(|p| p.x);
    let ys = contour.points.iter().map(|p| p.y);
    let (x0, x1) = (xs.clone().min().unwrap(), xs.max().unwrap());
    let (y0, y1) = (ys.clone().min().unwrap(), ys.max().unwrap());
    Rect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0 + 1) as u32,
        height: (y1 - y0 + 1) as u32,
    }
}

/// The glyph patches repacked into one horizontal strip, ready for a
/// line recognizer.
pub struct GlyphStrip {
    /// Dark-on-light strip image, tightly cropped around the glyphs.
    pub image: GrayImage,
    /// Per glyph: centroid (horizontal center, near-top vertical offset) in
    /// frame coordinates, in strip order.
    pub positions: Vec<(u32, u32)>,
}

/// Repack the glyph patches of a segmentation into a single strip image.
///
/// Glyphs are blitted left to right in extraction order with fixed padding,
/// then the strip is inverted (the recognizer expects dark text on a light
/// background) and cropped to the occupied area.
pub fn repack_strip(seg: &Segmentation, cfg: &Config) -> GlyphStrip {
    let box_size = cfg.scale.up(cfg.strip_box);
    let padding = cfg.scale.up(cfg.strip_padding);
    let mut strip = GrayImage::new(cfg.strip_slots * box_size, box_size);

    let mut positions = Vec::with_capacity(seg.boxes.len());
    let mut max_y = 0;
    let mut px = padding;
    for r in &seg.boxes {
        positions.push((r.x + r.width / 2, r.y + 2));
        for dy in 0..r.height {
            for dx in 0..r.width {
                let v = seg.binary.get_pixel(r.x + dx, r.y + dy)[0];
                strip.put_pixel(px + dx, padding + dy, Luma([v]));
            }
        }
        max_y = max_y.max(padding + r.height);
        px += r.width + padding;
    }

    image::imageops::invert(&mut strip);
    let image = image::imageops::crop_imm(&strip, 0, 0, px, max_y + padding).to_image();
    GlyphStrip { image, positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use image::RgbImage;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as DrawRect;

    const GLYPH_W: u32 = 20;
    const GLYPH_H: u32 = 34;

    /// A synthetic frame: `n` glyph-sized blobs spread around the wheel.
    fn wheel_frame(n: usize, fg: Rgb<u8>, bg: Option<Rgb<u8>>) -> GrayImage {
        let cfg = Config::default();
        let mut img = RgbImage::new(cfg.screenshot_region.width, cfg.screenshot_region.height);
        let (cx, cy) = cfg.wheel_center;
        if let Some(bg) = bg {
            draw_filled_circle_mut(
                &mut img,
                (cx as i32, cy as i32),
                cfg.wheel_radius as i32,
                bg,
            );
        }
        for i in 0..n {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            let x = cx as f64 + 70.0 * angle.cos() - GLYPH_W as f64 / 2.0;
            let y = cy as f64 + 70.0 * angle.sin() - GLYPH_H as f64 / 2.0;
            draw_filled_rect_mut(
                &mut img,
                DrawRect::at(x as i32, y as i32).of_size(GLYPH_W, GLYPH_H),
                fg,
            );
        }
        use image::buffer::ConvertBuffer;
        img.convert()
    }

    fn light_on_dark(n: usize) -> GrayImage {
        wheel_frame(n, Rgb([255, 255, 255]), None)
    }

    #[test]
    fn test_board_sizes_pass_the_gate() {
        let cfg = Config::default();
        for n in [6, 7] {
            let seg = segment_wheel(&light_on_dark(n), &cfg);
            let boxes = seg.board_boxes().expect("board expected");
            assert_eq!(boxes.len(), n);
        }
    }

    #[test]
    fn test_off_sizes_report_no_board() {
        let cfg = Config::default();
        for n in [5, 8] {
            let seg = segment_wheel(&light_on_dark(n), &cfg);
            assert_eq!(seg.boxes.len(), n);
            assert!(seg.board_boxes().is_none());
        }
    }

    #[test]
    fn test_inverted_polarity_is_corrected() {
        // dark glyphs on a light wheel: the center sample trips the
        // polarity correction and the glyphs still come out as foreground
        let cfg = Config::default();
        let frame = wheel_frame(6, Rgb([0, 0, 0]), Some(Rgb([255, 255, 255])));
        let seg = segment_wheel(&frame, &cfg);
        let boxes = seg.board_boxes().expect("board expected");
        assert_eq!(boxes.len(), 6);
        for r in boxes {
            assert_eq!(r.width, GLYPH_W);
            assert_eq!(r.height, GLYPH_H);
        }
    }

    #[test]
    fn test_glyph_boxes_are_tight() {
        let cfg = Config::default();
        let seg = segment_wheel(&light_on_dark(7), &cfg);
        for r in &seg.boxes {
            assert_eq!((r.width, r.height), (GLYPH_W, GLYPH_H));
        }
    }

    #[test]
    fn test_strip_layout_and_positions() {
        let cfg = Config::default();
        let seg = segment_wheel(&light_on_dark(6), &cfg);
        let strip = repack_strip(&seg, &cfg);

        assert_eq!(strip.positions.len(), 6);
        for (r, &(px, py)) in seg.boxes.iter().zip(&strip.positions) {
            assert_eq!(px, r.x + r.width / 2);
            assert_eq!(py, r.y + 2);
        }

        // 6 glyphs of width 20 with 8px padding, cropped tight
        let pad = cfg.strip_padding;
        assert_eq!(strip.image.width(), pad + 6 * (GLYPH_W + pad));
        assert_eq!(strip.image.height(), GLYPH_H + 2 * pad);

        // inverted: glyph pixels dark, background light
        assert_eq!(strip.image.get_pixel(pad + 1, pad + 1)[0], 0);
        assert_eq!(strip.image.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_undersized_frame_reports_no_board() {
        // a frame smaller than the configured region leaves the wheel center
        // outside the image; the segmenter must still come back empty-handed
        let cfg = Config::default();
        let mut img = RgbImage::new(100, 100);
        draw_filled_rect_mut(
            &mut img,
            DrawRect::at(40, 40).of_size(GLYPH_W, GLYPH_H),
            Rgb([255, 255, 255]),
        );
        use image::buffer::ConvertBuffer;
        let seg = segment_wheel(&img.convert(), &cfg);
        assert!(seg.board_boxes().is_none());
    }
}
