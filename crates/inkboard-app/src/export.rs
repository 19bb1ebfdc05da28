//! PNG export of rendered frames.

use image::RgbaImage;

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
    }
    log::debug!(
        "Encoded {}x{} PNG ({} bytes)",
        image.width(),
        image.height(),
        png_data.len()
    );
    Ok(png_data)
}
