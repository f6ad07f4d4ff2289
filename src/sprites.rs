//! Sprite bank and pixel-accurate collision masks.
//!
//! Sprites are irregular (rounded bird, capped pipe), so collision uses a
//! rasterized opacity bitmap per sprite rather than bounding boxes. The
//! `SpriteBank` is an explicit asset bundle constructed once at startup and
//! passed by reference into simulation and rendering code.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Classic asset dimensions after 2x scaling
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
pub const BASE_WIDTH: u32 = 672;
pub const BASE_HEIGHT: u32 = 224;

/// Per-pixel opacity bitmap derived from a sprite
#[derive(Clone, Debug)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl PixelMask {
    /// Create an empty (fully transparent) mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Derive a mask from an image's alpha channel (alpha > 0 is opaque)
    pub fn from_alpha(image: &RgbaImage) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] > 0 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at (x, y); out-of-range coordinates are transparent
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Set opacity at (x, y)
    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = opaque;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// First point where this mask and `other` are both opaque, with `other`
    /// placed at `offset` relative to this mask's origin. Returns coordinates
    /// in this mask's frame, scanning row-major from the top-left.
    pub fn overlap(&self, other: &PixelMask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (ox, oy) = offset;

        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_end = (oy + other.height as i32).min(self.height as i32);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }

        None
    }
}

/// A sprite image together with its collision mask
#[derive(Clone, Debug)]
pub struct Sprite {
    pub image: RgbaImage,
    pub mask: PixelMask,
}

impl Sprite {
    /// Build a sprite and derive its mask from the alpha channel
    pub fn from_image(image: RgbaImage) -> Self {
        let mask = PixelMask::from_alpha(&image);
        Self { image, mask }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// All sprites needed by the game, loaded once at startup
#[derive(Clone, Debug)]
pub struct SpriteBank {
    /// Bird animation frames (wing up, mid, down)
    pub bird: [Sprite; 3],
    /// Downward-facing pipe hanging from the top of the screen
    pub pipe_top: Sprite,
    /// Upward-facing pipe standing on the ground
    pub pipe_bottom: Sprite,
    /// Scrolling ground tile
    pub base: Sprite,
    /// Static background (no mask needed)
    pub background: RgbaImage,
}

impl SpriteBank {
    /// Load sprites from a directory of PNG files, applying the classic 2x
    /// nearest-neighbour scaling. A missing or undecodable file is fatal.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, AssetError> {
        let dir = dir.as_ref();

        let bird1 = load_scaled(&dir.join("bird1.png"))?;
        let bird2 = load_scaled(&dir.join("bird2.png"))?;
        let bird3 = load_scaled(&dir.join("bird3.png"))?;
        let pipe = load_scaled(&dir.join("pipe.png"))?;
        let base = load_scaled(&dir.join("base.png"))?;
        let background = load_scaled(&dir.join("bg.png"))?;

        let pipe_top = imageops::flip_vertical(&pipe);

        Ok(Self {
            bird: [
                Sprite::from_image(bird1),
                Sprite::from_image(bird2),
                Sprite::from_image(bird3),
            ],
            pipe_top: Sprite::from_image(pipe_top),
            pipe_bottom: Sprite::from_image(pipe),
            base: Sprite::from_image(base),
            background,
        })
    }

    /// Procedurally drawn sprites with the classic dimensions. Used by
    /// headless training and tests, and by the GUI when no asset directory
    /// is present.
    pub fn builtin() -> Self {
        let pipe = draw_pipe();
        let pipe_top = imageops::flip_vertical(&pipe);

        Self {
            bird: [
                Sprite::from_image(draw_bird(WingPose::Up)),
                Sprite::from_image(draw_bird(WingPose::Mid)),
                Sprite::from_image(draw_bird(WingPose::Down)),
            ],
            pipe_top: Sprite::from_image(pipe_top),
            pipe_bottom: Sprite::from_image(pipe),
            base: Sprite::from_image(draw_base()),
            background: draw_background(),
        }
    }

    /// Width of the pipe sprite in pixels
    pub fn pipe_width(&self) -> u32 {
        self.pipe_bottom.width()
    }

    /// Height of the pipe sprite in pixels
    pub fn pipe_height(&self) -> u32 {
        self.pipe_bottom.height()
    }

    /// Height of a bird frame in pixels
    pub fn bird_height(&self) -> u32 {
        self.bird[0].height()
    }
}

/// Load a PNG and scale it 2x with nearest-neighbour filtering
fn load_scaled(path: &Path) -> Result<RgbaImage, AssetError> {
    if !path.exists() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }
    let image = image::open(path)?.to_rgba8();
    Ok(imageops::resize(
        &image,
        image.width() * 2,
        image.height() * 2,
        FilterType::Nearest,
    ))
}

/// Wing position for the three bird animation frames
#[derive(Clone, Copy)]
enum WingPose {
    Up,
    Mid,
    Down,
}

/// Draw a bird frame: elliptical body, eye, beak, and a wing whose vertical
/// position depends on the pose. Corners stay transparent so the mask is
/// genuinely irregular.
fn draw_bird(pose: WingPose) -> RgbaImage {
    let mut img = RgbaImage::new(BIRD_WIDTH, BIRD_HEIGHT);

    let body = Rgba([230, 200, 60, 255]);
    let belly = Rgba([245, 235, 200, 255]);
    let wing = Rgba([210, 170, 40, 255]);
    let beak = Rgba([235, 120, 60, 255]);
    let eye = Rgba([20, 20, 20, 255]);

    let (cx, cy) = (BIRD_WIDTH as f32 / 2.0, BIRD_HEIGHT as f32 / 2.0);
    let (rx, ry) = (cx - 6.0, cy - 4.0);

    for y in 0..BIRD_HEIGHT {
        for x in 0..BIRD_WIDTH {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                let color = if dy > 0.4 { belly } else { body };
                img.put_pixel(x, y, color);
            }
        }
    }

    // Wing: a small blob on the left half, shifted by pose
    let wing_cy = match pose {
        WingPose::Up => cy - 8.0,
        WingPose::Mid => cy,
        WingPose::Down => cy + 8.0,
    };
    for y in 0..BIRD_HEIGHT {
        for x in 0..BIRD_WIDTH {
            let dx = (x as f32 + 0.5 - (cx - 12.0)) / 14.0;
            let dy = (y as f32 + 0.5 - wing_cy) / 7.0;
            if dx * dx + dy * dy <= 1.0 {
                img.put_pixel(x, y, wing);
            }
        }
    }

    // Beak: short wedge on the right edge
    for y in (cy as u32).saturating_sub(4)..(cy as u32 + 4).min(BIRD_HEIGHT) {
        for x in (BIRD_WIDTH - 10)..BIRD_WIDTH {
            img.put_pixel(x, y, beak);
        }
    }

    // Eye
    for y in (cy as u32).saturating_sub(10)..(cy as u32).saturating_sub(6) {
        for x in (BIRD_WIDTH - 22)..(BIRD_WIDTH - 18) {
            img.put_pixel(x, y, eye);
        }
    }

    img
}

/// Draw the upward-facing pipe: inset body with a wider cap at the gap end.
/// The cap sits at the top of the sprite; the top pipe is a vertical flip.
fn draw_pipe() -> RgbaImage {
    let mut img = RgbaImage::new(PIPE_WIDTH, PIPE_HEIGHT);

    let lit = Rgba([120, 200, 90, 255]);
    let body = Rgba([90, 170, 70, 255]);
    let shade = Rgba([60, 130, 50, 255]);

    let cap_height = 48;
    let body_inset = 6;

    for y in 0..PIPE_HEIGHT {
        let (x_min, x_max) = if y < cap_height {
            // Rounded cap corners
            let corner = match y {
                0 | 1 => 3,
                2 | 3 => 1,
                _ => 0,
            };
            (corner, PIPE_WIDTH - corner)
        } else {
            (body_inset, PIPE_WIDTH - body_inset)
        };

        for x in x_min..x_max {
            let color = if x < x_min + 12 {
                lit
            } else if x >= x_max - 16 {
                shade
            } else {
                body
            };
            img.put_pixel(x, y, color);
        }
    }

    img
}

/// Draw the ground tile: dirt with a grass lip
fn draw_base() -> RgbaImage {
    let mut img = RgbaImage::new(BASE_WIDTH, BASE_HEIGHT);

    let grass = Rgba([130, 200, 80, 255]);
    let lip = Rgba([100, 160, 60, 255]);
    let dirt = Rgba([210, 180, 130, 255]);

    for y in 0..BASE_HEIGHT {
        let color = if y < 8 {
            grass
        } else if y < 12 {
            lip
        } else {
            dirt
        };
        for x in 0..BASE_WIDTH {
            img.put_pixel(x, y, color);
        }
    }

    img
}

/// Draw the sky background with a simple vertical gradient
fn draw_background() -> RgbaImage {
    let (w, h) = (500, 800);
    let mut img = RgbaImage::new(w, h);

    for y in 0..h {
        let t = y as f32 / h as f32;
        let r = (90.0 + 60.0 * t) as u8;
        let g = (160.0 + 50.0 * t) as u8;
        let b = (220.0 + 20.0 * t) as u8;
        for x in 0..w {
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }

    img
}

/// Errors that can occur while loading assets
#[derive(Debug)]
pub enum AssetError {
    Missing(PathBuf),
    Image(image::ImageError),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "missing asset file: {}", path.display()),
            Self::Image(e) => write!(f, "failed to decode asset: {}", e),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(size: u32) -> PixelMask {
        let mut mask = PixelMask::new(size, size);
        for y in 0..size {
            for x in 0..size {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn test_overlap_at_origin() {
        let a = square_mask(10);
        let b = square_mask(10);
        assert_eq!(a.overlap(&b, (0, 0)), Some((0, 0)));
    }

    #[test]
    fn test_no_overlap_when_boxes_disjoint() {
        let a = square_mask(10);
        let b = square_mask(10);
        assert_eq!(a.overlap(&b, (10, 0)), None);
        assert_eq!(a.overlap(&b, (0, 10)), None);
        assert_eq!(a.overlap(&b, (-10, -10)), None);
        assert_eq!(a.overlap(&b, (100, 100)), None);
    }

    #[test]
    fn test_overlap_respects_transparent_pixels() {
        // Two masks whose boxes intersect but whose opaque pixels do not:
        // `a` is opaque only in the left column, `b` only in the right column.
        let mut a = PixelMask::new(4, 4);
        let mut b = PixelMask::new(4, 4);
        for y in 0..4 {
            a.set(0, y, true);
            b.set(3, y, true);
        }

        assert_eq!(a.overlap(&b, (0, 0)), None);
        // Shift b left so its opaque column lands on a's opaque column
        assert_eq!(a.overlap(&b, (-3, 0)), Some((0, 0)));
    }

    #[test]
    fn test_overlap_partial_offset() {
        let a = square_mask(10);
        let b = square_mask(10);
        // One-pixel corner contact
        assert_eq!(a.overlap(&b, (9, 9)), Some((9, 9)));
    }

    #[test]
    fn test_mask_from_alpha() {
        let mut img = RgbaImage::new(3, 3);
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));

        let mask = PixelMask::from_alpha(&img);
        assert!(mask.get(1, 1));
        assert!(!mask.get(0, 0));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_builtin_dimensions() {
        let bank = SpriteBank::builtin();
        assert_eq!(bank.bird[0].width(), BIRD_WIDTH);
        assert_eq!(bank.bird[0].height(), BIRD_HEIGHT);
        assert_eq!(bank.pipe_width(), PIPE_WIDTH);
        assert_eq!(bank.pipe_height(), PIPE_HEIGHT);
        assert_eq!(bank.base.width(), BASE_WIDTH);
    }

    #[test]
    fn test_builtin_masks_are_irregular() {
        let bank = SpriteBank::builtin();
        // The bird's corners must be transparent; bounding-box collision
        // would behave differently.
        let mask = &bank.bird[0].mask;
        assert!(!mask.get(0, 0));
        assert!(!mask.get(BIRD_WIDTH - 1, BIRD_HEIGHT - 1));
        assert!(mask.get(BIRD_WIDTH / 2, BIRD_HEIGHT / 2));
        assert!(mask.count() > 0);
    }

    #[test]
    fn test_pipe_flip_symmetry() {
        let bank = SpriteBank::builtin();
        let bottom = &bank.pipe_bottom.mask;
        let top = &bank.pipe_top.mask;
        assert_eq!(bottom.count(), top.count());
        // Bottom cap is at the top of its sprite, top cap at the bottom
        assert_eq!(bottom.get(0, 0), top.get(0, PIPE_HEIGHT - 1));
    }

    #[test]
    fn test_load_missing_directory_fails() {
        let err = SpriteBank::load("/nonexistent/asset/dir").unwrap_err();
        assert!(matches!(err, AssetError::Missing(_)));
    }

    #[test]
    fn test_load_roundtrip_from_saved_images() {
        let dir = std::path::Path::new("/tmp/flapnet_test_assets");
        std::fs::create_dir_all(dir).unwrap();

        let bank = SpriteBank::builtin();
        // Save builtin sprites at half size; load() scales them back 2x.
        let half = |img: &RgbaImage| {
            imageops::resize(img, img.width() / 2, img.height() / 2, FilterType::Nearest)
        };
        half(&bank.bird[0].image).save(dir.join("bird1.png")).unwrap();
        half(&bank.bird[1].image).save(dir.join("bird2.png")).unwrap();
        half(&bank.bird[2].image).save(dir.join("bird3.png")).unwrap();
        half(&bank.pipe_bottom.image).save(dir.join("pipe.png")).unwrap();
        half(&bank.base.image).save(dir.join("base.png")).unwrap();
        half(&bank.background).save(dir.join("bg.png")).unwrap();

        let loaded = SpriteBank::load(dir).unwrap();
        assert_eq!(loaded.bird[0].width(), BIRD_WIDTH);
        assert_eq!(loaded.pipe_height(), PIPE_HEIGHT);

        std::fs::remove_dir_all(dir).ok();
    }
}
