use chrono::{DateTime, Utc};
use image::{DynamicImage, GenericImageView, Pixel, Rgb, RgbImage};
use uuid::Uuid;

/// Read access to a decoded camera frame.
///
/// Coordinates outside the buffer return `None`, never panic.
pub trait FrameBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>>;

    fn frame_id(&self) -> Option<Uuid> {
        None
    }
}

impl FrameBuffer for RgbImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.get_pixel_checked(x, y).copied()
    }
}

impl FrameBuffer for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.get_pixel(x, y).to_rgb())
    }
}

/// A frame as delivered by a camera source.
pub struct Frame {
    source_id: Uuid,
    image: DynamicImage,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn new(source_id: Uuid, image: DynamicImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            source_id,
            image,
            captured_at,
            frame_id: Uuid::new_v4(),
        }
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl FrameBuffer for Frame {
    fn width(&self) -> u32 {
        FrameBuffer::width(&self.image)
    }

    fn height(&self) -> u32 {
        FrameBuffer::height(&self.image)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        FrameBuffer::pixel(&self.image, x, y)
    }

    fn frame_id(&self) -> Option<Uuid> {
        Some(self.frame_id)
    }
}
