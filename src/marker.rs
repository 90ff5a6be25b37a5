pub(crate) enum MarkerType {
    Segment,
    StandAlone,
}

/// Marker codes, the byte that follows `0xFF` in the stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Start of Frame, `n` in 0..=15 except 4, 8 and 12.
    /// 0-3 Huffman non-differential, 5-7 Huffman differential,
    /// 9-11 arithmetic non-differential, 13-15 arithmetic differential.
    SOF(u8),

    /// Huffman table specification
    DHT,

    /// Reserved for JPEG extensions
    JPG,

    /// Define arithmetic coding conditioning(s)
    DAC,

    /// Restart with modulo 8 count "m"
    RST(u8),

    /// Start of image
    SOI,

    /// End of image
    EOI,

    /// Start of scan
    SOS,

    /// Define quantization table(s)
    DQT,

    /// Define number of lines
    DNL,

    /// Define restart interval
    DRI,

    /// Define hierarchical progression
    DHP,

    /// Expand reference components
    EXP,

    /// Reserved for application segments
    APP(u8),

    /// Reserved for JPEG extensions
    JPGn(u8),

    /// Comment
    COM,

    /// For temporary private use in arithmetic coding
    TEM,

    /// Reserved markers from 0x02 to 0xBF
    RES(u8),
}

impl Marker {
    pub(crate) const SIZE: usize = 2;

    pub(crate) const GLOBAL: u8 = 0xFF;

    /// `None` for the two bytes that may follow `0xFF` without forming a marker:
    /// the stuffed zero and another fill byte.
    pub fn from_u8(code: u8) -> Option<Marker> {
        use Marker::*;

        match code {
            0x00 | 0xFF => None,
            0x01 => Some(TEM),
            0x02..=0xBF => Some(RES(code)),
            0xC4 => Some(DHT),
            0xC8 => Some(JPG),
            0xCC => Some(DAC),
            0xC0..=0xCF => Some(SOF(code - 0xC0)),
            0xD0..=0xD7 => Some(RST(code - 0xD0)),
            0xD8 => Some(SOI),
            0xD9 => Some(EOI),
            0xDA => Some(SOS),
            0xDB => Some(DQT),
            0xDC => Some(DNL),
            0xDD => Some(DRI),
            0xDE => Some(DHP),
            0xDF => Some(EXP),
            0xE0..=0xEF => Some(APP(code - 0xE0)),
            0xF0..=0xFD => Some(JPGn(code - 0xF0)),
            0xFE => Some(COM),
        }
    }

    pub fn code(&self) -> u8 {
        use Marker::*;

        match *self {
            SOF(n) => 0xC0 + n,
            DHT => 0xC4,
            JPG => 0xC8,
            DAC => 0xCC,
            RST(m) => 0xD0 + m,
            SOI => 0xD8,
            EOI => 0xD9,
            SOS => 0xDA,
            DQT => 0xDB,
            DNL => 0xDC,
            DRI => 0xDD,
            DHP => 0xDE,
            EXP => 0xDF,
            APP(n) => 0xE0 + n,
            JPGn(n) => 0xF0 + n,
            COM => 0xFE,
            TEM => 0x01,
            RES(code) => code,
        }
    }

    /// Some markers stand alone, that is, they are not the start of a marker segment
    /// and no length field follows them.
    pub(crate) fn is_segment(&self) -> MarkerType {
        match self {
            Marker::RST(_) | Marker::SOI | Marker::EOI | Marker::TEM => MarkerType::StandAlone,
            _ => MarkerType::Segment,
        }
    }

    pub fn to_u16(&self) -> u16 {
        u16::from_be_bytes([Marker::GLOBAL, self.code()])
    }
}
