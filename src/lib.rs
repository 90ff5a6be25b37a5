use rayon::prelude::*;
use std::io::{Cursor, Read, Seek};

pub mod error;
pub mod marker;
pub mod quant_tables;
pub mod sample_precision;

/// The scanner walks a JPEG byte stream segment by segment without decoding any of them.
pub mod scanner;

/// The estimator scores the first luminance quantization table against the standard
/// tables and turns the mean scale factor into a quality factor.
pub mod quality;

pub use error::QualityError;
pub use quality::{QualityEstimator, QualityReport};

/// Estimates the quality (0-100) the JPEG in `source` was encoded with. The stream must
/// start with the SOI marker.
pub fn estimate_quality<R: Read + Seek>(source: R) -> Result<u32, QualityError> {
    Ok(analyze_quality(source)?.quality)
}

/// [`estimate_quality`] over an in-memory JPEG.
pub fn estimate_quality_from_bytes(buf: &[u8]) -> Result<u32, QualityError> {
    estimate_quality(Cursor::new(buf))
}

/// Like [`estimate_quality`], with the scale factor statistics behind the estimate.
pub fn analyze_quality<R: Read + Seek>(source: R) -> Result<QualityReport, QualityError> {
    QualityEstimator::new(source)?.estimate()
}

/// Estimates every buffer in parallel. Results are in input order.
pub fn estimate_batch<B: AsRef<[u8]> + Sync>(buffers: &[B]) -> Vec<Result<u32, QualityError>> {
    buffers
        .par_iter()
        .map(|buf| estimate_quality_from_bytes(buf.as_ref()))
        .collect()
}
