//! NMEA sentence field extraction
//!
//! Fields are the comma-delimited pieces of a sentence. Field 0 is the
//! address (`$GPGLL`), data fields start at index 1. A field is absent when
//! the sentence ends before it or when it starts with `,`, `*`, `\r` or `\n`
//! (empty value or end of the data section).
//!
//! All helpers take the sentence already trimmed to the message length
//! reported by the parser.

/// One field of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NmeaField<'a> {
    /// Byte offset of the field start within the sentence
    pub offset: usize,
    /// Field bytes up to the next comma or the end of the sentence
    pub bytes: &'a [u8],
}

impl<'a> NmeaField<'a> {
    /// Whether the field carries a value
    pub fn is_present(&self) -> bool {
        !matches!(
            self.bytes.first(),
            None | Some(b',') | Some(b'*') | Some(b'\r') | Some(b'\n')
        )
    }
}

/// Iterator over the fields of a sentence
///
/// Cheap to create; restart by calling [`fields`] again.
#[derive(Debug, Clone)]
pub struct NmeaFields<'a> {
    sentence: &'a [u8],
    next: Option<usize>,
}

/// Iterate the fields of `sentence`, starting with the address field
pub fn fields(sentence: &[u8]) -> NmeaFields<'_> {
    NmeaFields {
        sentence,
        next: Some(0),
    }
}

impl<'a> Iterator for NmeaFields<'a> {
    type Item = NmeaField<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next?;
        let rest = self.sentence.get(offset..)?;
        let end = rest.iter().position(|&b| b == b',');
        self.next = end.map(|e| offset + e + 1);
        Some(NmeaField {
            offset,
            bytes: &rest[..end.unwrap_or(rest.len())],
        })
    }
}

/// Byte offset of field `ix`, or `None` when the field is absent
pub fn find_nmea_item_pos(ix: usize, sentence: &[u8]) -> Option<usize> {
    fields(sentence)
        .nth(ix)
        .filter(NmeaField::is_present)
        .map(|field| field.offset)
}

/// Numeric value of field `ix`
///
/// Parses the longest numeric prefix of the field; `None` when the field is
/// absent or does not start with a number.
pub fn get_nmea_item(ix: usize, sentence: &[u8]) -> Option<f64> {
    let field = fields(sentence).nth(ix).filter(NmeaField::is_present)?;
    parse_number_prefix(field.bytes)
}

/// First character of field `ix`
pub fn get_nmea_char(ix: usize, sentence: &[u8]) -> Option<u8> {
    fields(sentence)
        .nth(ix)
        .filter(NmeaField::is_present)
        .and_then(|field| field.bytes.first().copied())
}

/// Angle in signed decimal degrees from fields `ix` (`DDDMM.MMMM`) and
/// `ix + 1` (hemisphere `N`, `S`, `E` or `W`)
pub fn get_nmea_angle(ix: usize, sentence: &[u8]) -> Option<f64> {
    let value = get_nmea_item(ix, sentence)?;
    let hemisphere = get_nmea_char(ix + 1, sentence)?;
    convert_angle(value, hemisphere)
}

/// Convert a `DDDMM.MMMM` value and its hemisphere to decimal degrees
///
/// Southern and western hemispheres are negative.
pub fn convert_angle(value: f64, hemisphere: u8) -> Option<f64> {
    let negative = match hemisphere {
        b'N' | b'E' => false,
        b'S' | b'W' => true,
        _ => return None,
    };

    let degrees = (value / 100.0) as i64 as f64;
    let minutes = value - degrees * 100.0;
    let angle = degrees + minutes / 60.0;

    Some(if negative { -angle } else { angle })
}

/// Parse the longest decimal number at the start of `bytes`
///
/// Accepts an optional sign, digits with an optional fraction and an
/// optional exponent. Returns `None` when no digit is consumed.
pub fn parse_number_prefix(bytes: &[u8]) -> Option<f64> {
    let len = number_prefix_len(bytes);
    core::str::from_utf8(&bytes[..len]).ok()?.parse::<f64>().ok()
}

/// Length of the `[+-]digits[.digits][(e|E)[+-]digits]` prefix of `bytes`
fn number_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |at: usize| {
        bytes
            .get(at..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut digits = digits_from(len);
    len += digits;
    if bytes.get(len) == Some(&b'.') {
        let fraction = digits_from(len + 1);
        digits += fraction;
        len += 1 + fraction;
    }
    if digits == 0 {
        return 0;
    }

    // Exponent only counts when it has digits
    if let Some(b'e' | b'E') = bytes.get(len) {
        let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+' | b'-')));
        let exponent = digits_from(len + 1 + sign);
        if exponent > 0 {
            len += 1 + sign + exponent;
        }
    }
    len
}
