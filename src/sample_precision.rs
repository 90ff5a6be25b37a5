/// Precision of the Qk values in a quantization table.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Precision {
    EightBit,
    SixteenBit,
}

impl Precision {
    /// Decodes Pq, the high nibble of a DQT table header. Zero selects 8-bit values,
    /// anything else 16-bit values.
    pub(crate) fn decode(pq: u8) -> Self {
        match pq {
            0 => Precision::EightBit,
            _ => Precision::SixteenBit,
        }
    }

    /// Width of one stored coefficient.
    pub fn coefficient_bytes(&self) -> usize {
        match self {
            Precision::EightBit => 1,
            Precision::SixteenBit => 2,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Precision::EightBit => 8,
            Precision::SixteenBit => 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(Precision::decode(0), Precision::EightBit);
        assert_eq!(Precision::decode(1), Precision::SixteenBit);
        assert_eq!(Precision::decode(0x0F), Precision::SixteenBit);
    }

    #[test]
    fn test_widths() {
        assert_eq!(Precision::EightBit.coefficient_bytes(), 1);
        assert_eq!(Precision::SixteenBit.coefficient_bytes(), 2);
        assert_eq!(Precision::SixteenBit.bits(), 16);
    }
}
