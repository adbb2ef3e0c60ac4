use eframe::egui;

pub const MIN_MAGNIFICATION: f32 = 1.0 / 16.0;
pub const MAX_MAGNIFICATION: f32 = 16.0;

/// Discrete steps used by `+`/`-` and ctrl-scroll.
pub const ZOOM_LEVELS: [f32; 17] = [
    1.0 / 16.0,
    1.0 / 12.0,
    1.0 / 8.0,
    1.0 / 6.0,
    1.0 / 4.0,
    1.0 / 3.0,
    1.0 / 2.0,
    0.75,
    1.0,
    1.5,
    2.0,
    3.0,
    4.0,
    6.0,
    8.0,
    12.0,
    16.0,
];

/// Minimum number of image pixels kept on screen while panning.
const PAN_MARGIN: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

/// Placement of one diagram inside its canvas.
///
/// The image is drawn centred on the canvas, shifted by `offset` screen
/// points. While `fit` is set the magnification tracks the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    pub magnification: f32,
    pub offset: egui::Vec2,
    pub fit: bool,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            magnification: 1.0,
            offset: egui::Vec2::ZERO,
            fit: true,
        }
    }
}

impl ZoomState {
    pub fn fit_to(&mut self, canvas: egui::Rect, image: [usize; 2]) {
        let [image_w, image_h] = image_extent(image);
        self.magnification = (canvas.width() / image_w)
            .min(canvas.height() / image_h)
            .clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION);
        self.offset = egui::Vec2::ZERO;
        self.fit = true;
    }

    pub fn actual_size(&mut self) {
        self.magnification = 1.0;
        self.offset = egui::Vec2::ZERO;
        self.fit = false;
    }

    pub fn step_at(
        &mut self,
        step: ZoomStep,
        canvas: egui::Rect,
        pointer: egui::Pos2,
        image: [usize; 2],
    ) {
        let next = match step {
            ZoomStep::In => zoom_level_up(self.magnification),
            ZoomStep::Out => zoom_level_down(self.magnification),
        };
        self.set_magnification_at(canvas, pointer, next, image);
    }

    /// Changes magnification while keeping the image point under `pointer`
    /// fixed on screen.
    pub fn set_magnification_at(
        &mut self,
        canvas: egui::Rect,
        pointer: egui::Pos2,
        next_magnification: f32,
        image: [usize; 2],
    ) {
        let next = next_magnification.clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION);
        let extent = egui::Vec2::from(image_extent(image));
        let current = self.image_rect(canvas, image);
        let anchor = (pointer - current.min) / self.magnification;

        let next_min = pointer - anchor * next;
        self.offset = next_min - canvas.center() + extent * next * 0.5;
        self.magnification = next;
        self.fit = false;
        self.clamp_offset(canvas, image);
    }

    pub fn pan_by(&mut self, delta: egui::Vec2, canvas: egui::Rect, image: [usize; 2]) {
        if delta == egui::Vec2::ZERO {
            return;
        }
        self.offset += delta;
        self.fit = false;
        self.clamp_offset(canvas, image);
    }

    /// Screen rectangle the whole image occupies.
    pub fn image_rect(&self, canvas: egui::Rect, image: [usize; 2]) -> egui::Rect {
        let size = egui::Vec2::from(image_extent(image)) * self.magnification;
        egui::Rect::from_center_size(canvas.center() + self.offset, size)
    }

    pub fn percent(&self) -> u32 {
        (self.magnification * 100.0).round() as u32
    }

    fn clamp_offset(&mut self, canvas: egui::Rect, image: [usize; 2]) {
        let size = egui::Vec2::from(image_extent(image)) * self.magnification;
        let limit = |image_len: f32, canvas_len: f32| {
            ((image_len + canvas_len) * 0.5 - PAN_MARGIN.min(image_len)).max(0.0)
        };
        let limit_x = limit(size.x, canvas.width());
        let limit_y = limit(size.y, canvas.height());
        self.offset.x = self.offset.x.clamp(-limit_x, limit_x);
        self.offset.y = self.offset.y.clamp(-limit_y, limit_y);
    }
}

pub fn zoom_level_down(current: f32) -> f32 {
    let mut next = ZOOM_LEVELS[0];
    for level in ZOOM_LEVELS {
        if level < current {
            next = level;
        } else {
            break;
        }
    }
    next
}

pub fn zoom_level_up(current: f32) -> f32 {
    let mut next = ZOOM_LEVELS[ZOOM_LEVELS.len() - 1];
    for level in ZOOM_LEVELS.iter().rev().copied() {
        if level > current {
            next = level;
        } else {
            break;
        }
    }
    next
}

fn image_extent(image: [usize; 2]) -> [f32; 2] {
    [image[0].max(1) as f32, image[1].max(1) as f32]
}
