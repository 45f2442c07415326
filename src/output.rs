use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::render::Canvas;

/// Write the canvas as an image. The format follows the file extension.
pub fn save_image(canvas: &Canvas, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    canvas.to_rgb_image()?.save(path)?;
    info!("Image saved as {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("map.png");
        let canvas = Canvas::new(4, 3).unwrap();
        save_image(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = Canvas::new(1, 1).unwrap();
        assert!(save_image(&canvas, dir.path().join("map.unknownfmt")).is_err());
    }
}
