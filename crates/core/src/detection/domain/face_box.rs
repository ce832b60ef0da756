/// An axis-aligned face bounding box in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl FaceBox {
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &FaceBox) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// Integer crop rectangle `(x, y, width, height)` grown by `padding`
    /// (fraction of box size per side) and clamped to the frame.
    ///
    /// Returns `None` if nothing of the box lies inside the frame.
    pub fn crop_rect(
        &self,
        padding: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let pad_x = self.width() * padding;
        let pad_y = self.height() * padding;

        let x1 = (self.x1 - pad_x).floor().clamp(0.0, frame_width as f64);
        let y1 = (self.y1 - pad_y).floor().clamp(0.0, frame_height as f64);
        let x2 = (self.x2 + pad_x).ceil().clamp(0.0, frame_width as f64);
        let y2 = (self.y2 + pad_y).ceil().clamp(0.0, frame_height as f64);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
    }
}
