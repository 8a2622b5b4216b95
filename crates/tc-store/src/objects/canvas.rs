//! TCanvas payloads: a named SVG document with its pixel size.

use tc_core::SavedCanvas;

use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;
use crate::wbuffer::WBuffer;

/// Class name of stored canvases.
pub const CANVAS_CLASS: &str = "TCanvas";

const CANVAS_VERSION: u16 = 1;

/// Serialize a canvas.
pub fn write_canvas(c: &SavedCanvas) -> Vec<u8> {
    let mut w = WBuffer::new();
    w.write_versioned(CANVAS_VERSION, |w| {
        w.write_tnamed(&c.name, &c.title);
        w.write_u32(c.width);
        w.write_u32(c.height);
        w.write_string(&c.svg);
    });
    w.into_inner()
}

/// Read a canvas from decompressed object bytes.
pub fn read_canvas(data: &[u8]) -> Result<SavedCanvas> {
    let mut r = RBuffer::new(data);
    let (version, end) = r.read_version()?;
    if version != CANVAS_VERSION {
        return Err(RootError::Deserialization(format!("unsupported TCanvas version: {version}")));
    }
    let (name, title) = r.read_tnamed()?;
    let width = r.read_u32()?;
    let height = r.read_u32()?;
    let svg = r.read_string()?;
    r.expect_end(end, "TCanvas")?;
    Ok(SavedCanvas { name, title, width, height, svg })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_large_svg() {
        let c = SavedCanvas {
            name: "canvas".into(),
            title: "Toy histograms".into(),
            width: 800,
            height: 600,
            svg: format!("<svg>{}</svg>", "<rect/>".repeat(500)),
        };
        assert_eq!(read_canvas(&write_canvas(&c)).unwrap(), c);
    }
}
