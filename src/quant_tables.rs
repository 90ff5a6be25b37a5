use crate::error::QualityError;
use crate::sample_precision::Precision;

/// A DCT block is 8x8.
pub const BLOCK_SIZE: usize = 64;

pub type Block = [i32; BLOCK_SIZE];

/// Sample luminance quantization table from Annex K of the JPEG standard, natural order.
pub const STD_LUMINANCE_QUANT_TABLE: Block = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Sample chrominance quantization table from Annex K of the JPEG standard, natural order.
pub const STD_CHROMINANCE_QUANT_TABLE: Block = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// `ZIGZAG[i]` is the zig-zag position of the i'th element of a block read in natural
/// order (left to right, top to bottom).
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
    0, 1, 5, 6, 14, 15, 27, 28,
    2, 4, 7, 13, 16, 26, 29, 42,
    3, 8, 12, 17, 25, 30, 41, 43,
    9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

pub const fn zigzag_block(natural: &Block) -> Block {
    let mut zigzag = [0; BLOCK_SIZE];
    let mut i = 0;
    while i < BLOCK_SIZE {
        zigzag[ZIGZAG[i]] = natural[i];
        i += 1;
    }
    zigzag
}

// DQT coefficients arrive in zig-zag order, so the references are kept that way too.
static ZIGZAG_REFERENCE_TABLES: [Block; 2] = [
    zigzag_block(&STD_LUMINANCE_QUANT_TABLE),
    zigzag_block(&STD_CHROMINANCE_QUANT_TABLE),
];

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum TableType {
    Luminance = 0,
    Chrominance = 1,
}

impl TableType {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => TableType::Luminance,
            _ => TableType::Chrominance,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableType::Luminance => "luminance",
            TableType::Chrominance => "chrominance",
        }
    }
}

/// The standard table a destination is compared against, in zig-zag order.
/// Destination 0 is luminance, every other destination chrominance.
pub fn reference_table(index: u8) -> &'static Block {
    &ZIGZAG_REFERENCE_TABLES[TableType::from_index(index) as usize]
}

/// First byte of every table in a DQT segment.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct QuantTableHeader {
    /// Pq, the high nibble.
    pub precision: Precision,

    /// Tq, the low nibble: the destination the table is installed into.
    pub index: u8,
}

impl QuantTableHeader {
    pub fn decode(b: u8) -> Self {
        QuantTableHeader {
            precision: Precision::decode(b >> 4),
            index: b & 0x0F,
        }
    }

    /// Bytes taken by the header plus its 64 coefficients.
    pub fn table_bytes(&self) -> usize {
        1 + BLOCK_SIZE * self.precision.coefficient_bytes()
    }
}

/// The set of 64 quantization values used to quantize the DCT coefficients.
#[derive(Debug, PartialEq, Clone)]
pub struct QuantizationTable {
    pub header: QuantTableHeader,

    /// Specifies the kth element out of 64 elements, where k is the index in the zig-zag
    /// ordering of the DCT coefficients.
    pub coefficients: Block,
}

impl QuantizationTable {
    pub(crate) fn from(header: QuantTableHeader, data: &[u8]) -> Self {
        let width = header.precision.coefficient_bytes();
        debug_assert_eq!(data.len(), BLOCK_SIZE * width);

        let mut coefficients = [0; BLOCK_SIZE];
        for (qk, chunk) in coefficients.iter_mut().zip(data.chunks_exact(width)) {
            *qk = match header.precision {
                Precision::EightBit => chunk[0] as i32,
                Precision::SixteenBit => u16::from_be_bytes([chunk[0], chunk[1]]) as i32,
            };
        }

        QuantizationTable {
            header,
            coefficients,
        }
    }

    pub fn table_type(&self) -> TableType {
        TableType::from_index(self.header.index)
    }

    pub fn reference(&self) -> &'static Block {
        reference_table(self.header.index)
    }

    pub fn is_all_ones(&self) -> bool {
        self.coefficients.iter().all(|&qk| qk == 1)
    }
}

/// Whether `length` bytes can hold a whole number of tables, each one 65 bytes (8-bit)
/// or 129 bytes (16-bit) long.
pub fn is_valid_dqt_length(length: usize) -> bool {
    let eight_bit = QuantTableHeader::decode(0x00).table_bytes();
    let sixteen_bit = QuantTableHeader::decode(0x10).table_bytes();

    (0..=length / sixteen_bit).any(|n| (length - n * sixteen_bit) % eight_bit == 0)
}

/// Splits a DQT payload into its tables. Each table is one header byte followed by 64
/// coefficients of the width the header declares; the tables must fill the payload exactly.
pub fn parse_dqt_payload(payload: &[u8]) -> Result<Vec<QuantizationTable>, QualityError> {
    let mut tables = vec![];
    let mut offset = 0;

    while offset < payload.len() {
        let header = QuantTableHeader::decode(payload[offset]);
        let end = offset + header.table_bytes();

        if end > payload.len() {
            let remaining = payload.len() - offset;
            log::debug!(
                "wrong size for quantization table: {} bytes left, {} needed",
                remaining,
                header.table_bytes()
            );
            return Err(QualityError::WrongTableSize(payload.len()));
        }

        log::debug!(
            "precision={}; table index={} ({})",
            header.precision.bits(),
            header.index,
            TableType::from_index(header.index).name()
        );

        tables.push(QuantizationTable::from(header, &payload[offset + 1..end]));
        offset = end;
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn payload(header: u8, coefficients: &[u8]) -> Vec<u8> {
        let mut out = vec![header];
        out.extend_from_slice(coefficients);
        out
    }

    #[test]
    fn test_zigzag_reference_order() {
        let luminance = reference_table(0);
        assert_eq!(
            luminance[..16],
            [16, 11, 12, 14, 12, 10, 16, 14, 13, 14, 18, 17, 16, 19, 24, 40]
        );
        assert_eq!(luminance[63], 99);

        let chrominance = reference_table(1);
        assert_eq!(
            chrominance[..12],
            [17, 18, 18, 24, 21, 24, 47, 26, 26, 47, 99, 66]
        );
    }

    #[test]
    fn test_zigzag_is_a_permutation() {
        let mut seen = [false; BLOCK_SIZE];
        for &position in ZIGZAG.iter() {
            assert!(!seen[position]);
            seen[position] = true;
        }
        assert_eq!(ZIGZAG[8], 2);
    }

    #[test]
    fn test_reference_selection() {
        assert_eq!(
            reference_table(0),
            &zigzag_block(&STD_LUMINANCE_QUANT_TABLE)
        );
        assert_eq!(reference_table(1), reference_table(3));
        assert_ne!(reference_table(0), reference_table(1));
        assert_eq!(TableType::from_index(0).name(), "luminance");
        assert_eq!(TableType::from_index(2), TableType::Chrominance);
    }

    #[test]
    fn test_header_decode() {
        let header = QuantTableHeader::decode(0x00);
        assert_eq!(header.precision, Precision::EightBit);
        assert_eq!(header.index, 0);
        assert_eq!(header.table_bytes(), 65);

        let header = QuantTableHeader::decode(0x11);
        assert_eq!(header.precision, Precision::SixteenBit);
        assert_eq!(header.index, 1);
        assert_eq!(header.table_bytes(), 129);
    }

    #[test]
    fn test_parse_single_eight_bit_table() -> Result<()> {
        let coefficients: Vec<u8> = (1..=64).collect();
        let tables = parse_dqt_payload(&payload(0x00, &coefficients))?;

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_type(), TableType::Luminance);
        assert_eq!(tables[0].coefficients[0], 1);
        assert_eq!(tables[0].coefficients[63], 64);
        assert!(!tables[0].is_all_ones());

        Ok(())
    }

    #[test]
    fn test_parse_two_tables_in_one_segment() -> Result<()> {
        let mut data = payload(0x00, &[1; BLOCK_SIZE]);
        data.extend(payload(0x01, &[2; BLOCK_SIZE]));

        let tables = parse_dqt_payload(&data)?;
        assert_eq!(tables.len(), 2);
        assert!(tables[0].is_all_ones());
        assert_eq!(tables[1].header.index, 1);
        assert_eq!(tables[1].coefficients, [2; BLOCK_SIZE]);

        Ok(())
    }

    #[test]
    fn test_parse_sixteen_bit_table() -> Result<()> {
        let mut coefficients = vec![];
        for k in 0..BLOCK_SIZE as u16 {
            coefficients.extend_from_slice(&(k * 300).to_be_bytes());
        }
        let tables = parse_dqt_payload(&payload(0x10, &coefficients))?;

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header.precision, Precision::SixteenBit);
        assert_eq!(tables[0].coefficients[1], 300);
        assert_eq!(tables[0].coefficients[63], 63 * 300);

        Ok(())
    }

    #[test]
    fn test_parse_wrong_size() {
        let data = payload(0x00, &[1; 40]);
        assert!(matches!(
            parse_dqt_payload(&data),
            Err(QualityError::WrongTableSize(41))
        ));

        // 130 bytes is two 8-bit tables, but one 16-bit table leaves a single byte over.
        let mut data = payload(0x10, &[0; 2 * BLOCK_SIZE]);
        data.push(0x00);
        assert!(matches!(
            parse_dqt_payload(&data),
            Err(QualityError::WrongTableSize(130))
        ));
    }

    #[test]
    fn test_valid_dqt_lengths() {
        for length in [0, 65, 129, 130, 194, 258, 65 * 4] {
            assert!(is_valid_dqt_length(length), "{} bytes", length);
        }
        for length in [1, 41, 64, 66, 70, 128, 131] {
            assert!(!is_valid_dqt_length(length), "{} bytes", length);
        }
    }

    #[test]
    fn test_parse_empty_payload() -> Result<()> {
        assert!(parse_dqt_payload(&[])?.is_empty());
        Ok(())
    }
}
