//! Image XObjects for grid pages
//!
//! PNG files are decoded and stored as raw RGB samples (plus a soft mask when
//! the image has transparency); the stream is Flate-compressed when the output
//! document is saved. Everything else is treated as JPEG and embedded
//! unchanged with `DCTDecode`, after checking that it actually decodes.

use std::io::Cursor;
use image::codecs::jpeg::JpegDecoder;
use image::{ExtendedColorType, ImageDecoder, ImageFormat, Limits};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::{Error, Result};

/// An image ready to be embedded, with its pixel dimensions
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    image: Stream,
    soft_mask: Option<Stream>,
}

impl PreparedImage {
    /// Decode `bytes` with the codec implied by `media_type`
    pub fn decode(name: &str, media_type: &str, bytes: &[u8]) -> Result<Self> {
        if media_type.eq_ignore_ascii_case("image/png") {
            Self::from_png(name, bytes)
        } else {
            Self::from_jpeg(name, bytes)
        }
    }

    fn from_png(name: &str, bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| unsupported(name, e))?;
        let (width, height) = (img.width(), img.height());

        if !img.color().has_alpha() {
            let rgb = img.to_rgb8().into_raw();
            return Ok(Self {
                width,
                height,
                image: Stream::new(image_dict(width, height, "DeviceRGB"), rgb),
                soft_mask: None,
            });
        }

        let rgba = img.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        Ok(Self {
            width,
            height,
            image: Stream::new(image_dict(width, height, "DeviceRGB"), rgb),
            soft_mask: Some(Stream::new(image_dict(width, height, "DeviceGray"), alpha)),
        })
    }

    fn from_jpeg(name: &str, bytes: &[u8]) -> Result<Self> {
        let mut decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(|e| unsupported(name, e))?;
        let (width, height) = decoder.dimensions();

        // Buffer size comes straight from the header; cap it like the PNG path
        Limits::default()
            .reserve(decoder.total_bytes())
            .map_err(|e| unsupported(name, e))?;
        decoder.set_limits(Limits::default()).map_err(|e| unsupported(name, e))?;

        let color_space = match decoder.original_color_type() {
            ExtendedColorType::L8 => "DeviceGray",
            ExtendedColorType::Cmyk8 => "DeviceCMYK",
            _ => "DeviceRGB",
        };

        // Full decode so truncated or garbage files are caught here instead of
        // producing a page the viewer cannot render.
        let mut pixels = vec![0u8; decoder.total_bytes() as usize];
        decoder.read_image(&mut pixels).map_err(|e| unsupported(name, e))?;

        let mut dict = image_dict(width, height, color_space);
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        if color_space == "DeviceCMYK" {
            // Adobe CMYK JPEGs store inverted samples
            dict.set(
                "Decode",
                Object::Array([1, 0, 1, 0, 1, 0, 1, 0].into_iter().map(Object::Integer).collect()),
            );
        }

        let mut stream = Stream::new(dict, bytes.to_vec());
        stream.allows_compression = false;

        Ok(Self {
            width,
            height,
            image: stream,
            soft_mask: None,
        })
    }

    /// Add the image (and its mask) to `doc`, returning the image object id
    pub fn embed(self, doc: &mut Document) -> ObjectId {
        let mut image = self.image;
        if let Some(mask) = self.soft_mask {
            let mask_id = doc.add_object(mask);
            image.dict.set("SMask", Object::Reference(mask_id));
        }
        doc.add_object(image)
    }
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

fn unsupported(name: &str, err: image::ImageError) -> Error {
    Error::UnsupportedImageFormat {
        name: name.to_string(),
        reason: err.to_string(),
    }
}
