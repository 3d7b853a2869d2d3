//! Pixel editor surface: a magnified, grid-outlined painting session
//!
//! An [`EditorSession`] owns a private working copy of one texture. Nothing
//! outside the session sees the edits until [`EditorSession::commit`] hands the
//! finished image back by value; [`EditorSession::abandon`] throws them away.
//!
//! Canvas coordinates map to texture pixels by integer division by the cell
//! size: with 16px cells, a pointer at (33, 5) lands on pixel (2, 0).

use image::{Rgba, RgbaImage};

use crate::raster::{PixelGrid, RasterError, BYTES_PER_PIXEL};

/// Canvas pixels per texture pixel
pub const DEFAULT_PIXEL_SIZE: u32 = 16;

/// Cell outline color (Qt's `gray`, #A0A0A4)
pub const GRID_LINE_COLOR: Rgba<u8> = Rgba([160, 160, 164, 255]);

/// Initial paint color
pub const DEFAULT_PAINT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Source of a new paint color, e.g. a modal color dialog.
pub trait ColorPicker {
    /// Offer a choice starting from `current`. `None` means the user cancelled.
    fn pick(&mut self, current: Rgba<u8>) -> Option<Rgba<u8>>;
}

impl<F> ColorPicker for F
where
    F: FnMut(Rgba<u8>) -> Option<Rgba<u8>>,
{
    fn pick(&mut self, current: Rgba<u8>) -> Option<Rgba<u8>> {
        self(current)
    }
}

/// Session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Canvas pixels per texture pixel (at least 1)
    pub pixel_size: u32,
    /// Outline drawn around each cell
    pub grid_color: Rgba<u8>,
    /// Paint color at session start
    pub initial_color: Rgba<u8>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            grid_color: GRID_LINE_COLOR,
            initial_color: DEFAULT_PAINT_COLOR,
        }
    }
}

/// One open editing interaction over a private copy of a texture.
#[derive(Debug)]
pub struct EditorSession {
    working: PixelGrid,
    options: EditorOptions,
    color: Rgba<u8>,
    redraw_requested: bool,
}

impl EditorSession {
    /// Open a session with default options.
    pub fn open(image: &RgbaImage) -> Self {
        Self::open_with(image, EditorOptions::default())
    }

    /// Open a session on a copy of `image`.
    ///
    /// A `pixel_size` of 0 is raised to 1.
    pub fn open_with(image: &RgbaImage, options: EditorOptions) -> Self {
        let options = EditorOptions { pixel_size: options.pixel_size.max(1), ..options };
        log::debug!(
            "Opening editor on {}x{} image at {}px cells",
            image.width(),
            image.height(),
            options.pixel_size
        );
        Self {
            working: PixelGrid::from_image(image),
            color: options.initial_color,
            options,
            // First paint
            redraw_requested: true,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.working.dimensions()
    }

    pub fn pixel_size(&self) -> u32 {
        self.options.pixel_size
    }

    /// Size of the rendered canvas in canvas pixels.
    ///
    /// Fails when the canvas dimensions or its RGBA buffer would overflow.
    pub fn canvas_size(&self) -> Result<(u32, u32), RasterError> {
        let (w, h) = self.working.dimensions();
        let size = self.options.pixel_size;
        let too_large = RasterError::CanvasTooLarge { width: w, height: h, pixel_size: size };
        let (cw, ch) = match (w.checked_mul(size), h.checked_mul(size)) {
            (Some(cw), Some(ch)) => (cw, ch),
            _ => return Err(too_large),
        };
        let bytes = (cw as usize)
            .checked_mul(ch as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL));
        match bytes {
            Some(_) => Ok((cw, ch)),
            None => Err(too_large),
        }
    }

    /// Current paint color.
    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    /// Let `picker` choose a new paint color. Cancelling keeps the current one.
    ///
    /// Returns `true` if the color was replaced.
    pub fn choose_color<P: ColorPicker + ?Sized>(&mut self, picker: &mut P) -> bool {
        match picker.pick(self.color) {
            Some(color) => {
                self.color = color;
                true
            }
            None => false,
        }
    }

    /// Color of a texture pixel in the working copy.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.working.get(x, y)
    }

    /// Copy of the working image at 1:1 scale, for previews.
    pub fn snapshot(&self) -> Result<RgbaImage, RasterError> {
        self.working.clone().into_image()
    }

    /// Map canvas coordinates to the texture pixel under them.
    pub fn pixel_at(&self, px: i32, py: i32) -> Option<(u32, u32)> {
        if px < 0 || py < 0 {
            return None;
        }
        let size = self.options.pixel_size;
        let (x, y) = (px as u32 / size, py as u32 / size);
        let (w, h) = self.working.dimensions();
        if x < w && y < h {
            Some((x, y))
        } else {
            None
        }
    }

    /// Handle a pointer press: paint the pixel under `(px, py)` with the
    /// current color and request a redraw.
    ///
    /// Returns the painted pixel, or `None` for presses outside the image.
    pub fn click(&mut self, px: i32, py: i32) -> Option<(u32, u32)> {
        let (x, y) = self.pixel_at(px, py)?;
        self.paint(x, y).then_some((x, y))
    }

    /// Paint a pixel addressed in texture coordinates.
    pub fn paint(&mut self, x: u32, y: u32) -> bool {
        let painted = self.working.set(x, y, self.color);
        if painted {
            self.redraw_requested = true;
        }
        painted
    }

    /// Whether the canvas needs repainting. Clears the request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Render the working copy as a grid of `pixel_size` squares.
    ///
    /// Each cell carries a 1px grid line on its left and top edge, so
    /// neighbouring cells share a single line at every multiple of the cell
    /// size. At 1px cells the grid line covers the whole cell.
    pub fn render(&self) -> Result<RgbaImage, RasterError> {
        let size = self.options.pixel_size;
        let (cw, ch) = self.canvas_size()?;
        let mut canvas = RgbaImage::new(cw, ch);
        let (w, h) = self.working.dimensions();

        for y in 0..h {
            for x in 0..w {
                let Some(color) = self.working.get(x, y) else { continue };
                let (x0, y0) = (x * size, y * size);
                for dy in 0..size {
                    for dx in 0..size {
                        let edge = dx == 0 || dy == 0;
                        let c = if edge { self.options.grid_color } else { color };
                        canvas.put_pixel(x0 + dx, y0 + dy, c);
                    }
                }
            }
        }

        Ok(canvas)
    }

    /// Finish the session and hand back the edited image.
    pub fn commit(self) -> Result<RgbaImage, RasterError> {
        log::debug!("Committing editor session");
        self.working.into_image()
    }

    /// Close without saving. The working copy is dropped.
    pub fn abandon(self) {
        log::debug!("Editor session closed without saving");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn pick_red(_: Rgba<u8>) -> Option<Rgba<u8>> {
        Some(RED)
    }

    fn cancel(_: Rgba<u8>) -> Option<Rgba<u8>> {
        None
    }

    fn white_4x4() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, WHITE)
    }

    #[test]
    fn test_pointer_mapping() {
        let session = EditorSession::open(&white_4x4());
        assert_eq!(session.pixel_at(33, 5), Some((2, 0)));
        assert_eq!(session.pixel_at(0, 0), Some((0, 0)));
        assert_eq!(session.pixel_at(63, 63), Some((3, 3)));
        assert_eq!(session.pixel_at(64, 0), None);
        assert_eq!(session.pixel_at(200, 5), None);
        assert_eq!(session.pixel_at(-1, 5), None);
    }

    #[test]
    fn test_click_paints_current_color() {
        let mut session = EditorSession::open(&white_4x4());
        session.set_color(RED);
        session.take_redraw_request();

        assert_eq!(session.click(33, 5), Some((2, 0)));
        assert_eq!(session.pixel(2, 0), Some(RED));
        assert!(session.take_redraw_request());
        assert!(!session.take_redraw_request());
    }

    #[test]
    fn test_out_of_bounds_click_is_noop() {
        let original = white_4x4();
        let mut session = EditorSession::open(&original);
        session.take_redraw_request();

        assert_eq!(session.click(200, 5), None);
        assert!(!session.take_redraw_request());
        assert_eq!(session.commit().unwrap(), original);
    }

    #[test]
    fn test_cancelled_pick_keeps_color() {
        let mut session = EditorSession::open(&white_4x4());
        assert!(session.choose_color(&mut pick_red));
        assert!(!session.choose_color(&mut cancel));
        assert_eq!(session.color(), RED);

        session.click(0, 0);
        session.click(17, 17);
        assert_eq!(session.pixel(0, 0), Some(RED));
        assert_eq!(session.pixel(1, 1), Some(RED));
    }

    #[test]
    fn test_picker_sees_current_color() {
        let mut session = EditorSession::open(&white_4x4());
        let mut seen = None;
        session.choose_color(&mut |current: Rgba<u8>| -> Option<Rgba<u8>> {
            seen = Some(current);
            None
        });
        assert_eq!(seen, Some(DEFAULT_PAINT_COLOR));
    }

    #[test]
    fn test_render_cells_and_outline() {
        let mut image = RgbaImage::from_pixel(2, 1, WHITE);
        image.put_pixel(1, 0, RED);
        let session = EditorSession::open(&image);

        let canvas = session.render().unwrap();
        assert_eq!(canvas.dimensions(), (32, 16));
        // Cell interiors reach the right and bottom edge
        assert_eq!(*canvas.get_pixel(8, 8), WHITE);
        assert_eq!(*canvas.get_pixel(15, 8), WHITE);
        assert_eq!(*canvas.get_pixel(24, 8), RED);
        assert_eq!(*canvas.get_pixel(31, 15), RED);
        // Left and top lines
        assert_eq!(*canvas.get_pixel(0, 0), GRID_LINE_COLOR);
        assert_eq!(*canvas.get_pixel(16, 8), GRID_LINE_COLOR);
        assert_eq!(*canvas.get_pixel(24, 0), GRID_LINE_COLOR);
    }

    #[test]
    fn test_grid_lines_are_one_pixel_wide() {
        let session = EditorSession::open(&RgbaImage::from_pixel(2, 1, WHITE));
        let canvas = session.render().unwrap();

        let gray: Vec<u32> =
            (0..32).filter(|&x| *canvas.get_pixel(x, 8) == GRID_LINE_COLOR).collect();
        assert_eq!(gray, [0, 16]);
        let gray_rows: Vec<u32> =
            (0..16).filter(|&y| *canvas.get_pixel(8, y) == GRID_LINE_COLOR).collect();
        assert_eq!(gray_rows, [0]);
    }

    #[test]
    fn test_render_reflects_edits() {
        let mut session = EditorSession::open(&white_4x4());
        session.set_color(RED);
        session.click(40, 40);
        assert_eq!(*session.render().unwrap().get_pixel(40, 40), RED);
    }

    #[test]
    fn test_one_pixel_cells_are_all_grid() {
        let options = EditorOptions { pixel_size: 1, ..Default::default() };
        let session = EditorSession::open_with(&white_4x4(), options);
        let canvas = session.render().unwrap();
        assert_eq!(canvas.dimensions(), (4, 4));
        assert!(canvas.pixels().all(|p| *p == GRID_LINE_COLOR));
    }

    #[test]
    fn test_two_pixel_cells_keep_one_colored_pixel() {
        let options = EditorOptions { pixel_size: 2, ..Default::default() };
        let session = EditorSession::open_with(&RgbaImage::from_pixel(1, 1, RED), options);
        let canvas = session.render().unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), GRID_LINE_COLOR);
        assert_eq!(*canvas.get_pixel(1, 0), GRID_LINE_COLOR);
        assert_eq!(*canvas.get_pixel(0, 1), GRID_LINE_COLOR);
        assert_eq!(*canvas.get_pixel(1, 1), RED);
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        let options = EditorOptions { pixel_size: u32::MAX / 2 + 1, ..Default::default() };
        let session = EditorSession::open_with(&RgbaImage::from_pixel(2, 1, WHITE), options);
        let expected = RasterError::CanvasTooLarge {
            width: 2,
            height: 1,
            pixel_size: u32::MAX / 2 + 1,
        };
        assert_eq!(session.canvas_size(), Err(expected.clone()));
        assert_eq!(session.render(), Err(expected));
    }

    #[test]
    fn test_zero_pixel_size_is_clamped() {
        let options = EditorOptions { pixel_size: 0, ..Default::default() };
        let session = EditorSession::open_with(&white_4x4(), options);
        assert_eq!(session.pixel_size(), 1);
        assert_eq!(session.pixel_at(3, 3), Some((3, 3)));
    }

    #[test]
    fn test_working_copy_is_private() {
        let original = white_4x4();
        let mut session = EditorSession::open(&original);
        session.set_color(RED);
        session.click(0, 0);

        assert_eq!(*original.get_pixel(0, 0), WHITE);
        let edited = session.commit().unwrap();
        assert_eq!(*edited.get_pixel(0, 0), RED);
        assert_eq!(*edited.get_pixel(1, 0), WHITE);
    }

    #[test]
    fn test_snapshot_leaves_session_open() {
        let mut session = EditorSession::open(&white_4x4());
        session.set_color(RED);
        session.click(0, 0);

        let preview = session.snapshot().unwrap();
        assert_eq!(preview.dimensions(), (4, 4));
        assert_eq!(*preview.get_pixel(0, 0), RED);

        session.click(16, 0);
        assert_eq!(*preview.get_pixel(1, 0), WHITE);
        assert_eq!(session.pixel(1, 0), Some(RED));
    }

    #[test]
    fn test_repainting_same_color_still_requests_redraw() {
        let mut session = EditorSession::open(&white_4x4());
        session.set_color(WHITE);
        session.take_redraw_request();
        assert_eq!(session.click(1, 1), Some((0, 0)));
        assert!(session.take_redraw_request());
    }
}
