use image::math::Rect;

/// Integer display scale factor (device pixels per base pixel).
///
/// All geometry in [`Config`] is expressed at the base resolution. Captured
/// frames are at device resolution, so coordinates are upscaled on the way
/// into segmentation and downscaled again before they reach the pointer.
/// Downscaling is floor division, which matters because the results feed
/// pixel-exact input coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale(pub u32);

impl Scale {
    pub fn up(self, v: u32) -> u32 {
        v * self.0
    }

    pub fn down(self, v: u32) -> u32 {
        v / self.0
    }

    pub fn up_point(self, (x, y): (u32, u32)) -> (u32, u32) {
        (x * self.0, y * self.0)
    }

    pub fn down_point(self, (x, y): (u32, u32)) -> (u32, u32) {
        (x / self.0, y / self.0)
    }

    pub fn up_rect(self, r: Rect) -> Rect {
        Rect {
            x: r.x * self.0,
            y: r.y * self.0,
            width: r.width * self.0,
            height: r.height * self.0,
        }
    }

    pub fn down_rect(self, r: Rect) -> Rect {
        Rect {
            x: r.x / self.0,
            y: r.y / self.0,
            width: r.width / self.0,
            height: r.height / self.0,
        }
    }
}

/// Fixed geometry of the game window, in base-resolution coordinates.
///
/// Constructed once at startup and passed by reference into every component;
/// nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display region to capture each cycle
    pub screenshot_region: Rect,
    /// Center of the letter wheel
    pub wheel_center: (u32, u32),
    /// Radius of the letter wheel
    pub wheel_radius: u32,
    /// The shuffle button, clicked to request a new board
    pub shuffle_button: (u32, u32),
    /// Close button of the piggybank popup that can cover the shuffle button
    pub piggybank_close: (u32, u32),
    /// Sub-region checked for the no-short-words mode indicator
    pub forbidden_zone: Rect,
    /// Accepted glyph bounding-box height range
    pub glyph_min_height: u32,
    pub glyph_max_height: u32,
    /// Accepted glyph bounding-box width range
    pub glyph_min_width: u32,
    pub glyph_max_width: u32,
    /// Cell size of the recognition strip
    pub strip_box: u32,
    /// Padding between glyphs in the recognition strip
    pub strip_padding: u32,
    /// Strip capacity, in cells (one more than the largest board)
    pub strip_slots: u32,
    pub scale: Scale,
}

impl Config {
    /// Geometry for the stock 353x768 game window.
    ///
    /// `scale_factor` is the display pixel density (2 on a retina mac).
    /// `y_offset` shifts everything below the window title bar down; macOS
    /// needs 45 to compensate for the menu bar plus title bar.
    pub fn new(scale_factor: u32, y_offset: u32) -> Config {
        Config {
            screenshot_region: Rect {
                x: 0,
                y: 0,
                width: 353,
                height: 768 + y_offset,
            },
            wheel_center: (176, 640 + y_offset),
            wheel_radius: 109,
            shuffle_button: (32, 520 + y_offset),
            piggybank_close: (285, 210 + y_offset),
            forbidden_zone: Rect {
                x: 44,
                y: 736 + y_offset,
                width: 22,
                height: 22,
            },
            glyph_min_height: 30,
            glyph_max_height: 39,
            glyph_min_width: 6,
            glyph_max_width: 50,
            strip_box: 64,
            strip_padding: 8,
            strip_slots: 8,
            scale: Scale(scale_factor),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_round_trip() {
        let s = Scale(2);
        assert_eq!(s.down(s.up(176)), 176);
        assert_eq!(s.down_point(s.up_point((176, 640))), (176, 640));
        let r = Rect {
            x: 44,
            y: 736,
            width: 22,
            height: 22,
        };
        assert_eq!(s.down_rect(s.up_rect(r)), r);
    }

    #[test]
    fn test_downscale_floors() {
        let s = Scale(2);
        assert_eq!(s.down(7), 3);
        assert_eq!(s.down_point((7, 9)), (3, 4));
        let odd = Rect {
            x: 7,
            y: 9,
            width: 11,
            height: 13,
        };
        assert_eq!(
            s.down_rect(odd),
            Rect {
                x: 3,
                y: 4,
                width: 5,
                height: 6
            }
        );
    }

    #[test]
    fn test_identity_scale() {
        let s = Scale(1);
        assert_eq!(s.up(109), 109);
        assert_eq!(s.down(109), 109);
    }

    #[test]
    fn test_y_offset_shifts_window_geometry() {
        let cfg = Config::new(1, 45);
        assert_eq!(cfg.wheel_center, (176, 685));
        assert_eq!(cfg.screenshot_region.height, 813);
        assert_eq!(cfg.forbidden_zone.y, 781);
        // x coordinates are unaffected
        assert_eq!(cfg.shuffle_button.0, 32);
    }
}
