//! Multi-page TIFF decoding into `(rows, cols, pages)` stacks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use ndarray::{Array2, Array3, Axis};
use tiff::decoder::{Decoder, DecodingResult};

use crate::error::{Error, Result};

/// File extensions the store can open.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["tif", "tiff"];

/// Openability pre-check. Callers pre-check before [`open_stack`]; a
/// `false` here is reported to the user without touching any state.
pub fn can_open(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Decode a multi-page TIFF into a `(rows, cols, pages)` float stack.
///
/// RGB pages are converted to grayscale by channel mean. Every page must
/// share the first page's shape; a mismatch is fatal to this load only.
pub fn open_stack(path: &Path) -> Result<Array3<f32>> {
    if !can_open(path) {
        return Err(Error::Unsupported(path.display().to_string()));
    }
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let mut pages: Vec<Array2<f32>> = Vec::new();
    loop {
        pages.push(read_page(&mut decoder)?);
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }
    debug!("decoded {} page(s) from {}", pages.len(), path.display());

    stack_pages(&pages)
}

fn read_page<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<Array2<f32>> {
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);
    let samples = to_f32_samples(decoder.read_image()?)?;

    let pixels = width * height;
    let plane = if samples.len() == pixels {
        samples
    } else if samples.len() == pixels * 3 {
        // RGB: channel mean.
        samples
            .chunks_exact(3)
            .map(|rgb| (rgb[0] + rgb[1] + rgb[2]) / 3.0)
            .collect()
    } else {
        return Err(Error::Decode(format!(
            "unexpected sample count {} for {width}x{height} page",
            samples.len()
        )));
    };

    Array2::from_shape_vec((height, width), plane)
        .map_err(|e| Error::Decode(e.to_string()))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn to_f32_samples(result: DecodingResult) -> Result<Vec<f32>> {
    match result {
        DecodingResult::U8(v) => Ok(v.into_iter().map(f32::from).collect()),
        DecodingResult::U16(v) => Ok(v.into_iter().map(f32::from).collect()),
        DecodingResult::U32(v) => Ok(v.into_iter().map(|x| x as f32).collect()),
        DecodingResult::I8(v) => Ok(v.into_iter().map(f32::from).collect()),
        DecodingResult::I16(v) => Ok(v.into_iter().map(f32::from).collect()),
        DecodingResult::I32(v) => Ok(v.into_iter().map(|x| x as f32).collect()),
        DecodingResult::F32(v) => Ok(v),
        DecodingResult::F64(v) => Ok(v.into_iter().map(|x| x as f32).collect()),
        _ => Err(Error::Unsupported("sample format not supported".into())),
    }
}

fn stack_pages(pages: &[Array2<f32>]) -> Result<Array3<f32>> {
    let Some(first) = pages.first() else {
        return Err(phasor_core::Error::EmptyStack.into());
    };
    let (rows, cols) = first.dim();
    if rows == 0 || cols == 0 {
        return Err(phasor_core::Error::EmptyStack.into());
    }
    for page in pages {
        if page.dim() != (rows, cols) {
            return Err(phasor_core::Error::PlaneShape {
                expected_rows: rows,
                expected_cols: cols,
                rows: page.dim().0,
                cols: page.dim().1,
            }
            .into());
        }
    }

    let mut stack = Array3::<f32>::zeros((rows, cols, pages.len()));
    for (index, page) in pages.iter().enumerate() {
        stack.index_axis_mut(Axis(2), index).assign(page);
    }
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tiff::encoder::{colortype, TiffEncoder};

    fn write_stack(path: &Path, pages: &[Vec<f32>], width: u32, height: u32) {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        for page in pages {
            encoder
                .write_image::<colortype::Gray32Float>(width, height, page)
                .unwrap();
        }
    }

    #[test]
    fn can_open_checks_extension() {
        assert!(can_open(Path::new("a.tif")));
        assert!(can_open(Path::new("a.TIFF")));
        assert!(!can_open(Path::new("a.png")));
        assert!(!can_open(Path::new("a")));
    }

    #[test]
    fn decodes_a_three_page_stack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.tif");
        let mean = vec![5.0_f32, 6.0, 7.0, 8.0];
        let g = vec![0.1_f32, 0.2, 0.3, 0.4];
        let s = vec![0.5_f32, 0.6, 0.7, 0.8];
        write_stack(&path, &[mean, g.clone(), s], 2, 2);

        let stack = open_stack(&path).unwrap();
        assert_eq!(stack.dim(), (2, 2, 3));
        assert_eq!(stack[[0, 1, 1]], 0.2);
        assert_eq!(stack[[1, 0, 2]], 0.7);
    }

    #[test]
    fn unsupported_extension_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.dat");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not a tiff")
            .unwrap();
        assert!(matches!(open_stack(&path), Err(Error::Unsupported(_))));
    }

    #[test]
    fn truncated_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.tif");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"II*\0garbage")
            .unwrap();
        assert!(open_stack(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            open_stack(Path::new("/nonexistent/x.tif")),
            Err(Error::Io(_))
        ));
    }
}
