//! TH1D payloads.
//!
//! ```text
//! TH1D (versioned, byte count)
//!   ├─ TNamed (name, title)
//!   ├─ style: line colour i16, line width i16, marker colour i16,
//!   │         marker style i16, marker size f32
//!   ├─ fNbins i32, fXmin f64, fXmax f64
//!   ├─ fEntries f64
//!   ├─ fBinErrorOpt i32
//!   ├─ content (u32 n + n×f64), sumw2 (u32 n + n×f64)
//!   └─ underflow f64, overflow f64
//! ```

use tc_core::{BinErrorOption, Binning, DrawStyle, Histogram};

use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;
use crate::wbuffer::WBuffer;

/// Class name of stored histograms.
pub const TH1D_CLASS: &str = "TH1D";

const TH1D_VERSION: u16 = 1;

/// Serialize a histogram.
pub fn write_th1d(h: &Histogram) -> Vec<u8> {
    let mut w = WBuffer::new();
    w.write_versioned(TH1D_VERSION, |w| {
        w.write_tnamed(&h.name, &h.title);
        w.write_i16(h.style.line_color);
        w.write_i16(h.style.line_width);
        w.write_i16(h.style.marker_color);
        w.write_i16(h.style.marker_style);
        w.write_f32(h.style.marker_size);

        let b = h.binning();
        w.write_i32(b.n_bins as i32);
        w.write_f64(b.x_min);
        w.write_f64(b.x_max);
        w.write_f64(h.entries());
        w.write_i32(h.error_option.code());
        w.write_counted_f64(h.bin_content());
        w.write_counted_f64(h.sumw2());
        w.write_f64(h.underflow());
        w.write_f64(h.overflow());
    });
    w.into_inner()
}

/// Read a TH1D from decompressed object bytes.
pub fn read_th1d(data: &[u8]) -> Result<Histogram> {
    let mut r = RBuffer::new(data);

    let (version, end) = r.read_version()?;
    if version != TH1D_VERSION {
        return Err(RootError::Deserialization(format!("unsupported TH1D version: {version}")));
    }
    let (name, title) = r.read_tnamed()?;

    let style = DrawStyle {
        line_color: r.read_i16()?,
        line_width: r.read_i16()?,
        marker_color: r.read_i16()?,
        marker_style: r.read_i16()?,
        marker_size: r.read_f32()?,
    };

    let n_bins = r.read_i32()?;
    if n_bins <= 0 {
        return Err(RootError::Deserialization(format!("TH1D '{name}': fNbins = {n_bins}")));
    }
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;
    let entries = r.read_f64()?;
    let error_option = BinErrorOption::from_code(r.read_i32()?)
        .map_err(|e| RootError::Deserialization(format!("TH1D '{name}': {e}")))?;
    let content = r.read_counted_f64()?;
    let sumw2 = r.read_counted_f64()?;
    let underflow = r.read_f64()?;
    let overflow = r.read_f64()?;
    r.expect_end(end, "TH1D")?;

    let binning = Binning { n_bins: n_bins as usize, x_min, x_max };
    let hist = Histogram::from_parts(
        name.clone(),
        title,
        binning,
        content,
        sumw2,
        underflow,
        overflow,
        entries,
    )
    .map_err(|e| RootError::Deserialization(format!("TH1D '{name}': {e}")))?;
    Ok(hist.with_error_option(error_option).with_style(style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Histogram {
        let b = Binning::new(4, 0.0, 8.0).unwrap();
        let mut h = Histogram::new("data_obs", "Observed", b)
            .with_error_option(BinErrorOption::Poisson)
            .with_style(DrawStyle {
                line_color: 1,
                line_width: 2,
                marker_color: 1,
                marker_style: 8,
                marker_size: 0.6,
            });
        for x in [1.0, 3.0, 3.5, -2.0, 9.0] {
            h.fill(x);
        }
        h
    }

    #[test]
    fn keeps_every_field() {
        let h = sample();
        let back = read_th1d(&write_th1d(&h)).unwrap();
        assert_eq!(back, h);
        approx::assert_relative_eq!(back.underflow(), 1.0);
        approx::assert_relative_eq!(back.overflow(), 1.0);
        assert_eq!(back.error_option, BinErrorOption::Poisson);
    }

    #[test]
    fn trailing_garbage_inside_object_is_detected() {
        let mut bytes = write_th1d(&sample());
        // Inflate the byte count by 8 and append 8 bytes: the reader must notice.
        let raw = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) + 8;
        bytes[0..4].copy_from_slice(&raw.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(read_th1d(&bytes), Err(RootError::Deserialization(_))));
    }

    #[test]
    fn truncated_payload_underflows() {
        let bytes = write_th1d(&sample());
        assert!(matches!(
            read_th1d(&bytes[..bytes.len() - 4]),
            Err(RootError::BufferUnderflow { .. })
        ));
    }
}
