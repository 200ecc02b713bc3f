use std::{fmt::Write, str::FromStr};

use crate::record::{Extra, Semantics};

const BYTES_PER_LINE: usize = 16;
/// Width of the hex column of a full line, including the gap between halves.
const HEX_COLUMN_WIDTH: usize = BYTES_PER_LINE * 3;
const ID_LENGTH: usize = 10;

/// Renders `data` as a canonical hex dump: offset, hex bytes in two groups of
/// eight and the printable ASCII characters, sixteen bytes per line.
///
/// ```
/// use fwlog_core::format_hexdump;
///
/// assert_eq!(
///     format_hexdump(b"\xde\xad\xbe\xef"),
///     format!("00000000: DE AD BE EF{}....", " ".repeat(39)),
/// );
/// assert_eq!(format_hexdump(b""), "");
/// ```
pub fn format_hexdump(data: &[u8]) -> String {
    let mut lines = Vec::with_capacity(data.len().div_ceil(BYTES_PER_LINE));
    for (index, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let mut line = format!("{:08X}: ", index * BYTES_PER_LINE);
        let mut hex = String::with_capacity(HEX_COLUMN_WIDTH);
        for (i, byte) in chunk.iter().enumerate() {
            if i > 0 {
                hex.push(' ');
            }
            if i == BYTES_PER_LINE / 2 {
                hex.push(' ');
            }
            let _ = write!(hex, "{byte:02X}");
        }
        let _ = write!(line, "{hex:<width$}  ", width = HEX_COLUMN_WIDTH);
        line.extend(chunk.iter().map(|&byte| {
            if (0x20..=0x7E).contains(&byte) {
                byte as char
            } else {
                '.'
            }
        }));
        lines.push(line);
    }
    lines.join("\n")
}

/// Direction of a chunk of traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn semantics(self) -> Semantics {
        match self {
            Direction::In => Semantics::Inbound,
            Direction::Out => Semantics::Outbound,
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(()),
        }
    }
}

/// Extras attached to a hex dump record: the direction as semantics and the
/// tail of the peer address as identifier.
pub fn hexdump_extra(address: Option<&str>, direction: Option<Direction>) -> Extra {
    let id = address.filter(|address| !address.is_empty()).map(|address| {
        let skip = address.chars().count().saturating_sub(ID_LENGTH);
        address.chars().skip(skip).collect::<String>()
    });
    Extra {
        id,
        semantics: direction.map(Direction::semantics),
    }
}
