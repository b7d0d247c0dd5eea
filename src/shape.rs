use crate::config::Config;
use crate::Scale;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::point::Point;
use log::debug;

/// Score below which a contour counts as the mode-indicator disk.
pub const SHAPE_MATCH_THRESHOLD: f64 = 0.06;

/// Base-resolution radius of the synthetic reference disk.
const REFERENCE_RADIUS: u32 = 11;

/// Hu invariants this small are numerical noise and excluded from the score.
const HU_EPS: f64 = 1e-5;

/// Detects the no-short-words game mode from a disk-shaped indicator in a
/// fixed sub-region of the frame.
///
/// The reference contour (a rasterized disk) is built once; every check
/// compares the largest contour found in the sub-region against it with a
/// moment-based distance that is invariant to translation, scale and
/// rotation.
pub struct ShapeMatcher {
    reference: [f64; 7],
}

impl ShapeMatcher {
    pub fn new(scale: Scale) -> ShapeMatcher {
        let r = scale.up(REFERENCE_RADIUS) as i32;
        let mut disk = GrayImage::new(4 * r as u32, 4 * r as u32);
        draw_filled_circle_mut(&mut disk, (2 * r, 2 * r), r, Luma([255u8]));
        let contours = find_contours::<i32>(&disk);
        let outer = contours
            .iter()
            .find(|c| c.border_type == BorderType::Outer)
            .unwrap(); // can not fail: the disk is drawn onto the canvas above
        ShapeMatcher {
            reference: hu_invariants(&contour_moments(&outer.points)),
        }
    }

    /// True iff the forbidden-zone sub-region of `gray` holds a disk-like
    /// contour.
    ///
    /// An empty sub-region (no contour at all) is a definite "not forbidden",
    /// not an error.
    pub fn forbidden_mode(&self, gray: &GrayImage, cfg: &Config) -> bool {
        let binary = threshold(gray, otsu_level(gray), ThresholdType::Binary);
        let zone = cfg.scale.up_rect(cfg.forbidden_zone);
        let sub = image::imageops::crop_imm(&binary, zone.x, zone.y, zone.width, zone.height)
            .to_image();
        let contours = find_contours::<i32>(&sub);
        let largest = match largest_contour(&contours) {
            Some(c) => c,
            None => {
                debug!("forbidden zone: no contour");
                return false;
            }
        };
        let score = match_score(
            &self.reference,
            &hu_invariants(&contour_moments(&largest.points)),
        );
        debug!("forbidden zone: shape score {:.4}", score);
        score < SHAPE_MATCH_THRESHOLD
    }
}

fn largest_contour<'a>(contours: &'a [Contour<i32>]) -> Option<&'a Contour<i32>> {
    contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| (c, contour_moments(&c.points).m00))
        .filter(|&(_, area)| area > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Raw spatial moments of a closed contour polygon, up to third order.
#[derive(Debug, Default, Clone, Copy)]
struct Moments {
    m00: f64,
    m10: f64,
    m01: f64,
    m20: f64,
    m11: f64,
    m02: f64,
    m30: f64,
    m21: f64,
    m12: f64,
    m03: f64,
}

/// Integrate the moments along the contour boundary (Green's theorem).
fn contour_moments(points: &[Point<i32>]) -> Moments {
    let n = points.len();
    let (mut a00, mut a10, mut a01) = (0f64, 0f64, 0f64);
    let (mut a20, mut a11, mut a02) = (0f64, 0f64, 0f64);
    let (mut a30, mut a21, mut a12, mut a03) = (0f64, 0f64, 0f64, 0f64);
    for i in 0..n {
        let p = points[if i == 0 { n - 1 } else { i - 1 }];
        let q = points[i];
        let (xp, yp) = (p.x as f64, p.y as f64);
        let (xq, yq) = (q.x as f64, q.y as f64);
        let (xp2, yp2, xq2, yq2) = (xp * xp, yp * yp, xq * xq, yq * yq);
        let dxy = xp * yq - xq * yp;
        let xpq = xp + xq;
        let ypq = yp + yq;
        a00 += dxy;
        a10 += dxy * xpq;
        a01 += dxy * ypq;
        a20 += dxy * (xp * xpq + xq2);
        a11 += dxy * (xp * (ypq + yp) + xq * (ypq + yq));
        a02 += dxy * (yp * ypq + yq2);
        a30 += dxy * xpq * (xp2 + xq2);
        a03 += dxy * ypq * (yp2 + yq2);
        a21 += dxy * (xp2 * (3.0 * yp + yq) + 2.0 * xp * xq * ypq + xq2 * (yp + 3.0 * yq));
        a12 += dxy * (yp2 * (3.0 * xp + xq) + 2.0 * yp * yq * xpq + yq2 * (xp + 3.0 * xq));
    }
    // flip the integration sign for clockwise contours so that m00 > 0
    let s = if a00 > 0.0 { 1.0 } else { -1.0 };
    Moments {
        m00: s * a00 / 2.0,
        m10: s * a10 / 6.0,
        m01: s * a01 / 6.0,
        m20: s * a20 / 12.0,
        m11: s * a11 / 24.0,
        m02: s * a02 / 12.0,
        m30: s * a30 / 20.0,
        m21: s * a21 / 60.0,
        m12: s * a12 / 60.0,
        m03: s * a03 / 20.0,
    }
}

/// The seven Hu invariants of a contour, from its normalized central moments.
fn hu_invariants(m: &Moments) -> [f64; 7] {
    if m.m00 <= f64::EPSILON {
        return [0.0; 7];
    }
    let cx = m.m10 / m.m00;
    let cy = m.m01 / m.m00;
    let mu20 = m.m20 - cx * m.m10;
    let mu11 = m.m11 - cx * m.m01;
    let mu02 = m.m02 - cy * m.m01;
    let mu30 = m.m30 - 3.0 * cx * m.m20 + 2.0 * cx * cx * m.m10;
    let mu21 = m.m21 - 2.0 * cx * m.m11 - cy * m.m20 + 2.0 * cx * cx * m.m01;
    let mu12 = m.m12 - 2.0 * cy * m.m11 - cx * m.m02 + 2.0 * cy * cy * m.m10;
    let mu03 = m.m03 - 3.0 * cy * m.m02 + 2.0 * cy * cy * m.m01;
    let n2 = 1.0 / (m.m00 * m.m00);
    let n3 = n2 / m.m00.sqrt();
    let (e20, e11, e02) = (mu20 * n2, mu11 * n2, mu02 * n2);
    let (e30, e21, e12, e03) = (mu30 * n3, mu21 * n3, mu12 * n3, mu03 * n3);
    [
        e20 + e02,
        (e20 - e02).powi(2) + 4.0 * e11 * e11,
        (e30 - 3.0 * e12).powi(2) + (3.0 * e21 - e03).powi(2),
        (e30 + e12).powi(2) + (e21 + e03).powi(2),
        (e30 - 3.0 * e12)
            * (e30 + e12)
            * ((e30 + e12).powi(2) - 3.0 * (e21 + e03).powi(2))
            + (3.0 * e21 - e03) * (e21 + e03) * (3.0 * (e30 + e12).powi(2) - (e21 + e03).powi(2)),
        (e20 - e02) * ((e30 + e12).powi(2) - (e21 + e03).powi(2))
            + 4.0 * e11 * (e30 + e12) * (e21 + e03),
        (3.0 * e21 - e03)
            * (e30 + e12)
            * ((e30 + e12).powi(2) - 3.0 * (e21 + e03).powi(2))
            - (e30 - 3.0 * e12) * (e21 + e03) * (3.0 * (e30 + e12).powi(2) - (e21 + e03).powi(2)),
    ]
}

/// Log-reciprocal distance between two sets of Hu invariants.
///
/// Lower is more similar; identical contours score 0.
fn match_score(a: &[f64; 7], b: &[f64; 7]) -> f64 {
    let mut score = 0.0;
    for (&ha, &hb) in a.iter().zip(b.iter()) {
        let (abs_a, abs_b) = (ha.abs(), hb.abs());
        if abs_a > HU_EPS && abs_b > HU_EPS {
            let ma = ha.signum() * abs_a.log10();
            let mb = hb.signum() * abs_b.log10();
            score += (1.0 / ma - 1.0 / mb).abs();
        }
    }
    score
}
