//! Read-only diagnostics for a generated image: pixel size, aspect ratio and
//! embedded resolution.

use image::{ImageFormat, ImageReader};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolution assumed when the file carries none.
pub const DEFAULT_DPI: (f64, f64) = (72.0, 72.0);

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const INCH_PER_METER: f64 = 0.0254;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read image {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode image {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub path: PathBuf,
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
    pub dpi: (f64, f64),
    /// False when `dpi` is [`DEFAULT_DPI`] because the file had no metadata.
    pub dpi_embedded: bool,
}

impl ImageReport {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "image: {}", self.path.display())?;
        if let Some(format) = self.format {
            writeln!(f, "format: {:?}", format)?;
        }
        writeln!(f, "size: {} x {} pixels", self.width, self.height)?;
        writeln!(f, "aspect ratio: {:.2}", self.aspect_ratio())?;
        write!(f, "dpi: {:.0} x {:.0}", self.dpi.0, self.dpi.1)?;
        if !self.dpi_embedded {
            write!(f, " (default)")?;
        }
        Ok(())
    }
}

pub fn inspect(path: &Path) -> Result<ImageReport, InspectError> {
    if !path.exists() {
        return Err(InspectError::NotFound(path.to_path_buf()));
    }

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let format = reader.format();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|source| InspectError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let embedded = match format {
        Some(ImageFormat::Png) => {
            let bytes = fs::read(path).map_err(|source| InspectError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            png_dpi(&bytes)
        }
        _ => None,
    };

    Ok(ImageReport {
        path: path.to_path_buf(),
        format,
        width,
        height,
        dpi: embedded.unwrap_or(DEFAULT_DPI),
        dpi_embedded: embedded.is_some(),
    })
}

/// Resolution from a PNG `pHYs` chunk, if present and expressed per meter.
fn png_dpi(bytes: &[u8]) -> Option<(f64, f64)> {
    let mut rest = bytes.strip_prefix(PNG_SIGNATURE.as_slice())?;

    // Chunk layout: length (4, BE) | type (4) | data (length) | crc (4)
    while rest.len() >= 8 {
        let len = u32::from_be_bytes(rest[0..4].try_into().ok()?) as usize;
        let kind = &rest[4..8];
        let data = rest.get(8..8 + len)?;

        match kind {
            b"pHYs" if len == 9 => {
                let x = u32::from_be_bytes(data[0..4].try_into().ok()?);
                let y = u32::from_be_bytes(data[4..8].try_into().ok()?);
                if data[8] != 1 {
                    return None;
                }
                return Some((x as f64 * INCH_PER_METER, y as f64 * INCH_PER_METER));
            }
            // pHYs must precede image data.
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        rest = rest.get(8 + len + 4..)?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    fn png_with(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        for c in chunks {
            out.extend_from_slice(c);
        }
        out
    }

    #[test]
    fn phys_in_meters_converts_to_dpi() {
        // 3780 px/m ~= 96 dpi
        let mut phys = 3780u32.to_be_bytes().to_vec();
        phys.extend_from_slice(&3780u32.to_be_bytes());
        phys.push(1);
        let bytes = png_with(&[chunk(b"IHDR", &[0; 13]), chunk(b"pHYs", &phys)]);

        let (x, y) = png_dpi(&bytes).unwrap();
        assert_eq!(format!("{:.0}", x), "96");
        assert_eq!(format!("{:.0}", y), "96");
    }

    #[test]
    fn phys_without_unit_is_ignored() {
        let mut phys = 1u32.to_be_bytes().to_vec();
        phys.extend_from_slice(&1u32.to_be_bytes());
        phys.push(0);
        let bytes = png_with(&[chunk(b"pHYs", &phys)]);
        assert_eq!(png_dpi(&bytes), None);
    }

    #[test]
    fn no_phys_before_idat() {
        let bytes = png_with(&[chunk(b"IHDR", &[0; 13]), chunk(b"IDAT", &[1, 2, 3])]);
        assert_eq!(png_dpi(&bytes), None);
        assert_eq!(png_dpi(b"not a png"), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = inspect(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, InspectError::NotFound(_)));
        assert_eq!(err.to_string(), "image file not found: definitely/not/here.png");
    }
}
