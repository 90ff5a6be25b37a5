use crate::error::QualityError;
use crate::marker::Marker;
use crate::quant_tables::{is_valid_dqt_length, parse_dqt_payload, QuantizationTable, BLOCK_SIZE};
use crate::sample_precision::Precision;
use crate::scanner::SegmentScanner;
use std::io::{Read, Seek};

/// Running sums of the per-coefficient scale factors of one table, each scale factor being
/// `100 * qk / reference_k` with both sides in zig-zag order.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct ScaleStatistics {
    sum: f64,
    sum_of_squares: f64,
    all_ones: bool,
}

impl ScaleStatistics {
    pub fn collect(table: &QuantizationTable) -> Self {
        let reference = table.reference();
        let mut stats = ScaleStatistics {
            all_ones: true,
            ..Default::default()
        };

        for (&qk, &reference_k) in table.coefficients.iter().zip(reference.iter()) {
            let scale_factor = 100.0 * qk as f64 / reference_k as f64;
            stats.sum += scale_factor;
            stats.sum_of_squares += scale_factor * scale_factor;
            stats.all_ones &= qk == 1;
        }

        stats
    }

    pub fn mean(&self) -> f64 {
        self.sum / BLOCK_SIZE as f64
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.sum_of_squares / BLOCK_SIZE as f64 - mean * mean
    }

    pub fn all_ones(&self) -> bool {
        self.all_ones
    }

    /// Unrounded quality. An all-ones table is always 100.
    pub fn quality(&self) -> f64 {
        if self.all_ones {
            100.0
        } else {
            quality_from_mean_scale_factor(self.mean())
        }
    }
}

/// Inverts the libjpeg quality scaling: scale factors up to 100 map linearly onto
/// qualities 100 down to 50, larger ones hyperbolically onto qualities below 50.
pub fn quality_from_mean_scale_factor(mean_scale_factor: f64) -> f64 {
    if mean_scale_factor <= 100.0 {
        (200.0 - mean_scale_factor) / 2.0
    } else {
        5000.0 / mean_scale_factor
    }
}

pub(crate) fn round_quality(quality: f64) -> u32 {
    (quality + 0.5).floor() as u32
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct QualityReport {
    /// Rounded quality. Not clamped: very coarse tables can round down to 0.
    pub quality: u32,
    pub mean_scale_factor: f64,
    pub variance: f64,
    pub all_ones: bool,
    pub precision: Precision,
    pub table_index: u8,
}

impl QualityReport {
    pub fn from_table(table: &QuantizationTable) -> Self {
        let stats = ScaleStatistics::collect(table);
        let report = QualityReport {
            quality: round_quality(stats.quality()),
            mean_scale_factor: stats.mean(),
            variance: stats.variance(),
            all_ones: stats.all_ones(),
            precision: table.header.precision,
            table_index: table.header.index,
        };

        log::debug!(
            "mean scale factor {:.3}, variance {:.3}, quality {}",
            report.mean_scale_factor,
            report.variance,
            report.quality
        );

        report
    }
}

/// QualityEstimator drives a [`SegmentScanner`] up to the first DQT segment that defines
/// table 0 and scores that table.
pub struct QualityEstimator<R> {
    scanner: SegmentScanner<R>,
}

impl<R: Read + Seek> QualityEstimator<R> {
    pub fn new(source: R) -> Result<Self, QualityError> {
        Ok(QualityEstimator {
            scanner: SegmentScanner::new(source)?,
        })
    }

    pub fn estimate(mut self) -> Result<QualityReport, QualityError> {
        self.scanner.check_start_of_image()?;

        let table = self.find_luminance_table()?;
        Ok(QualityReport::from_table(&table))
    }

    fn find_luminance_table(&mut self) -> Result<QuantizationTable, QualityError> {
        loop {
            let Some(segment) = self.scanner.next_segment()? else {
                log::debug!("stream ended before a quantization table for destination 0");
                return Err(QualityError::InvalidFormat);
            };

            match segment.marker {
                Marker::DQT => {}
                Marker::EOI => {
                    log::debug!("end of image before a quantization table for destination 0");
                    return Err(QualityError::InvalidFormat);
                }
                _ => {
                    self.scanner.skip(segment.length)?;
                    continue;
                }
            }

            log::debug!("quantization segment, {} bytes", segment.length);
            if !is_valid_dqt_length(segment.length) {
                log::debug!(
                    "wrong size for quantization table: {} bytes ({} bytes short or {} bytes long)",
                    segment.length,
                    65 - segment.length % 65,
                    segment.length % 65
                );
                return Err(QualityError::WrongTableSize(segment.length));
            }
            let payload = self.scanner.read_payload(segment.length)?;

            // Only destination 0 is scored; segments without it are passed over.
            if let Some(table) = parse_dqt_payload(&payload)?
                .into_iter()
                .find(|table| table.header.index == 0)
            {
                return Ok(table);
            }
        }
    }
}
