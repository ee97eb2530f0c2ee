use crate::DomainError;

pub const ZOOM_STEP: f64 = 1.2;
/// 1.2^12 is roughly 8.9x in either direction.
pub const MAX_ZOOM_STEPS: i32 = 12;
pub const DEFAULT_STROKE_COLOR: [u8; 3] = [255, 0, 0];
pub const DEFAULT_STROKE_WIDTH: u32 = 3;
pub const MAX_STROKE_WIDTH: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Pixel-space rectangle, already clamped to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop rectangle spanned by two drag corners, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl CropRect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Intersects the rectangle with a `width` x `height` image. The right and
    /// bottom edges are exclusive.
    pub fn clamp_to(&self, width: u32, height: u32) -> Result<PixelRect, DomainError> {
        let left = self.left.clamp(0, i64::from(width));
        let right = self.right.clamp(0, i64::from(width));
        let top = self.top.clamp(0, i64::from(height));
        let bottom = self.bottom.clamp(0, i64::from(height));
        if right <= left || bottom <= top {
            return Err(DomainError::EmptyCrop);
        }
        // Every value is within 0..=u32::MAX after clamping.
        Ok(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// A freehand annotation: consecutive points joined by straight segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: [u8; 3],
    pub width: u32,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            color: DEFAULT_STROKE_COLOR,
            width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.width == 0 {
            return Err(DomainError::ZeroStrokeWidth);
        }
        if self.width > MAX_STROKE_WIDTH {
            return Err(DomainError::StrokeTooWide {
                width: self.width,
                max: MAX_STROKE_WIDTH,
            });
        }
        Ok(())
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let single = (self.points.len() == 1).then(|| (self.points[0], self.points[0]));
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(single)
    }
}

/// Clips the segment `from -> to` to the inclusive box `min..=max`. Returns
/// `None` when the segment misses the box. Coordinates may span the whole
/// `i64` range.
pub fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let (x0, y0) = (from.x as f64, from.y as f64);
    let dx = to.x as f64 - x0;
    let dy = to.y as f64 - y0;
    let (min_x, min_y) = (min.x as f64, min.y as f64);
    let (max_x, max_y) = (max.x as f64, max.y as f64);

    let mut enter = 0.0_f64;
    let mut leave = 1.0_f64;
    for (p, q) in [(-dx, x0 - min_x), (dx, max_x - x0), (-dy, y0 - min_y), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            leave = leave.min(t);
        }
    }
    if enter > leave {
        return None;
    }

    let at = |t: f64| {
        Point::new(
            (x0 + t * dx).round().clamp(min_x, max_x) as i64,
            (y0 + t * dy).round().clamp(min_y, max_y) as i64,
        )
    };
    Some((at(enter), at(leave)))
}

/// Display-only magnification of an edit session, kept as a number of
/// `ZOOM_STEP` steps within `-MAX_ZOOM_STEPS..=MAX_ZOOM_STEPS`. Steps past
/// either end are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoomLevel {
    steps: i32,
}

impl ZoomLevel {
    pub fn steps(&self) -> i32 {
        self.steps
    }

    pub fn factor(&self) -> f64 {
        ZOOM_STEP.powi(self.steps)
    }

    pub fn zoom_in(&mut self) {
        self.steps = (self.steps + 1).min(MAX_ZOOM_STEPS);
    }

    pub fn zoom_out(&mut self) {
        self.steps = (self.steps - 1).max(-MAX_ZOOM_STEPS);
    }

    pub fn is_identity(&self) -> bool {
        self.steps == 0
    }

    /// Dimensions of a `width` x `height` buffer at this zoom, never below 1px.
    pub fn scale(&self, width: u32, height: u32) -> (u32, u32) {
        let factor = self.factor();
        let scaled =
            |value: u32| (f64::from(value) * factor).round().clamp(1.0, f64::from(u32::MAX)) as u32;
        (scaled(width), scaled(height))
    }
}

/// Height that keeps the aspect ratio when resizing to `new_width`.
pub fn resized_height(width: u32, height: u32, new_width: u32) -> Result<u32, DomainError> {
    if width == 0 || height == 0 || new_width == 0 {
        return Err(DomainError::ZeroDimension);
    }
    let exact = f64::from(new_width) * f64::from(height) / f64::from(width);
    Ok((exact.round() as u32).max(1))
}
