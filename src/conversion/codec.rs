use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder};

/// Narrow codec capability the pipeline depends on, keeping the
/// underlying image library swappable.
pub trait ImageCodec: Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;
    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate.
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).context("image crate failed to decode image from memory")
    }

    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new(&mut buffer);
        encoder
            .write_image(
                image.as_bytes(),
                image.width(),
                image.height(),
                image.color().into(),
            )
            .context("failed to encode image as PNG")?;
        Ok(buffer)
    }
}
