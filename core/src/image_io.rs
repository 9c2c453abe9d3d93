//! Image I/O

use crate::base::*;
use crate::film::RenderedImage;
use exr::prelude as exrs;
use exr::prelude::*;
use image::*;
use std::path::Path;
use std::result::Result;

/// Read an image as linear RGB. OpenEXR files are read as is; 8-bit formats
/// are converted from sRGB.
///
/// * `path` - Input file path.
pub fn read_image(path: &str) -> Result<RenderedImage, String> {
    match get_extension_from_filename(path).as_deref() {
        Some("exr") => read_exr(path),
        Some(_extension) => read_8_bit(path),
        None => Err(format!("Can't determine file type from suffix of filename {path}.")),
    }
}

/// Read a single layer OpenEXR file.
///
/// * `path` - Input file path.
fn read_exr(path: &str) -> Result<RenderedImage, String> {
    let reader = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| RenderedImage::black(resolution.width(), resolution.height()),
            |img, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let offset = 3 * (position.y() * img.width + position.x());
                img.rgb[offset] = r as Float;
                img.rgb[offset + 1] = g as Float;
                img.rgb[offset + 2] = b as Float;
            },
        )
        .first_valid_layer()
        .all_attributes();

    match reader.from_file(path) {
        Ok(image) => {
            let pixels = image.layer_data.channel_data.pixels;
            info!("Read EXR image {path} ({} x {})", pixels.width, pixels.height);
            Ok(pixels)
        }
        Err(err) => Err(err.to_string()),
    }
}

/// Read an 8-bit image and convert it to linear RGB.
///
/// * `path` - Input file path.
fn read_8_bit(path: &str) -> Result<RenderedImage, String> {
    let img: RgbImage = match open(path) {
        Ok(i) => i.into_rgb8(),
        Err(err) => return Err(format!("{:}", err)),
    };

    let width = img.width() as usize;
    let height = img.height() as usize;
    let rgb: Vec<Float> = img
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| inverse_gamma_correct(v as Float / 255.0))
        .collect();

    info!("Read 8-bit image {path} ({width} x {height})");
    Ok(RenderedImage { width, height, rgb })
}

/// Write the image to the given path. The format is chosen by the file
/// extension: `exr` keeps linear floats, everything `image` supports is
/// written as gamma corrected 8-bit.
///
/// * `path`  - Output file path.
/// * `image` - The image.
pub fn write_image(path: &str, image: &RenderedImage) -> Result<(), String> {
    if image.rgb.len() != image.width * image.height * 3 {
        return Err(format!(
            "Image data has {} values, expected {}",
            image.rgb.len(),
            image.width * image.height * 3
        ));
    }

    match get_extension_from_filename(path).as_deref() {
        Some("exr") => write_exr(path, image),
        Some(extension) => match ImageFormat::from_extension(extension) {
            Some(format) => write_8_bit(path, image, format),
            None => Err(format!("Extension {extension} is not supported")),
        },
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Retrieve the lower case extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_exr(path: &str, image: &RenderedImage) -> Result<(), String> {
    info!("Writing image {} with resolution {}x{}", path, image.width, image.height);

    let width = image.width;
    let size = Vec2(width, image.height);
    let rgb = &image.rgb;

    let layer = Layer::new(
        size,
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * width + pos.0);
            (rgb[offset] as f32, rgb[offset + 1] as f32, rgb[offset + 2] as f32)
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    match Image::empty(attributes).with_layer(layer).write().to_file(path) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}")),
    }
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `image`        - The image.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, image: &RenderedImage, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {}x{}", image.width, image.height);

    let buffer: Vec<u8> = image.rgb.iter().map(|v| clamp_byte(*v)).collect();
    let imgbuf: RgbImage = match ImageBuffer::from_raw(image.width as u32, image.height as u32, buffer) {
        Some(imgbuf) => imgbuf,
        None => return Err(format!("Error allocating output image {path}")),
    };

    match imgbuf.save_with_format(path, image_format) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}.")),
    }
}

/// Clamp floating point value to 8-bit range [0, 255] after gamma
/// correction.
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(get_extension_from_filename("a/b.PNG").as_deref(), Some("png"));
        assert_eq!(get_extension_from_filename("a.b/c.exr").as_deref(), Some("exr"));
        assert_eq!(get_extension_from_filename("noext"), None);
    }

    #[test]
    fn clamp_byte_saturates() {
        assert_eq!(clamp_byte(-1.0), 0);
        assert_eq!(clamp_byte(0.0), 0);
        assert_eq!(clamp_byte(1.0), 255);
        assert_eq!(clamp_byte(10.0), 255);
    }

    #[test]
    fn mismatched_data_is_rejected() {
        let image = RenderedImage {
            width: 2,
            height: 2,
            rgb: vec![0.0; 5],
        };
        assert!(write_image("out.png", &image).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let image = RenderedImage::black(1, 1);
        assert!(write_image("out.nope", &image).is_err());
    }

    #[test]
    fn png_round_trip() {
        let path = std::env::temp_dir().join("tessera_image_io_round_trip.png");
        let path = path.to_string_lossy().to_string();
        let mut image = RenderedImage::black(2, 1);
        image.rgb = vec![0.0, 0.5, 1.0, 0.25, 0.75, 0.1];
        write_image(&path, &image).unwrap();
        let read = read_image(&path).unwrap();
        assert_eq!((read.width, read.height), (2, 1));
        for (a, b) in image.rgb.iter().zip(read.rgb.iter()) {
            assert!((a - b).abs() < 0.01, "{} vs {}", a, b);
        }
        let _ = std::fs::remove_file(&path);
    }
}
