//! CPU image buffers produced by the renderers.

use crate::color_maps::ColorMap;

/// A square-or-rectangular grayscale image, row-major.
///
/// Row `j` holds the rays through volume-space `y = j / zoom`, column `i`
/// the rays through `x = i / zoom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ProjectionImage {
    /// Creates a black image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Wraps existing row-major pixels, or returns `None` on a size mismatch.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Returns the image width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel in column `i`, row `j`.
    #[must_use]
    pub fn get(&self, i: u32, j: u32) -> Option<u8> {
        (i < self.width && j < self.height)
            .then(|| self.pixels[j as usize * self.width as usize + i as usize])
    }

    /// Returns the row-major pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consumes the image and returns its pixels.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns the number of non-black pixels.
    #[must_use]
    pub fn lit_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p > 0).count()
    }
}

/// An RGB image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl ColorImage {
    /// Colourizes a grayscale projection through `color_map`.
    #[must_use]
    pub fn from_projection(image: &ProjectionImage, color_map: &ColorMap) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image
                .pixels()
                .iter()
                .map(|&p| color_map.map_intensity(p))
                .collect(),
        }
    }

    /// Returns the image width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel in column `i`, row `j`.
    #[must_use]
    pub fn get(&self, i: u32, j: u32) -> Option<[u8; 3]> {
        (i < self.width && j < self.height)
            .then(|| self.pixels[j as usize * self.width as usize + i as usize])
    }

    /// Returns the row-major pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Returns the pixels flattened to `RGBRGB...` bytes.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}
