//! Message framing over a byte pipe
//!
//! Transports push raw receiver output into a [`GnssParser`]; the parser
//! hands back one framed message per call. Recognized frames:
//!
//! - NMEA: `$` + printable characters + `*HH\r\n`, where `HH` is the
//!   upper-case XOR checksum of the bytes between `$` and `*`
//! - UBX: `B5 62 class id len_lo len_hi payload ck_a ck_b`
//!
//! Bytes in front of a frame are returned on their own as an `Unknown`
//! message so the caller consumes them before the frame.

use super::code::{MessageCode, Protocol};
use super::ubx::{hex_digit, UBX_HEADER_LEN, UBX_SYNC};
use heapless::Deque;

/// Capacity of the receive pipe in bytes
pub const PIPE_SIZE: usize = 2048;

/// Result of trying to frame one protocol at a given offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Complete frame of this many bytes
    Complete(usize),
    /// Prefix matches but the window ends before the frame does
    Wait,
    /// Not this protocol
    NotFound,
}

/// Receive pipe plus NMEA/UBX framing
pub struct GnssParser {
    pipe: Deque<u8, PIPE_SIZE>,
}

impl GnssParser {
    /// Create an empty parser
    pub const fn new() -> Self {
        Self {
            pipe: Deque::new(),
        }
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.pipe.len()
    }

    /// Whether no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.pipe.is_empty()
    }

    /// Free space in the pipe
    pub fn free(&self) -> usize {
        self.pipe.capacity() - self.pipe.len()
    }

    /// Append received bytes; returns how many fit
    pub fn put(&mut self, data: &[u8]) -> usize {
        let mut stored = 0;
        for &byte in data {
            if self.pipe.push_back(byte).is_err() {
                break;
            }
            stored += 1;
        }
        stored
    }

    /// Drop every buffered byte
    pub fn clear(&mut self) {
        self.pipe.clear();
    }

    /// Take the next message out of the pipe into `buf`
    ///
    /// Returns a positive code with the protocol and length of the bytes
    /// written to `buf`, [`MessageCode::WAIT`] when a frame has started but
    /// is incomplete, or [`MessageCode::NOT_FOUND`] when the pipe is empty.
    ///
    /// Only the first `buf.len()` buffered bytes are considered. A frame that
    /// does not fit in `buf` is returned as `Unknown` data rather than
    /// blocking the pipe.
    pub fn get_message(&mut self, buf: &mut [u8]) -> MessageCode {
        if self.pipe.is_empty() {
            return MessageCode::NOT_FOUND;
        }

        let window = buf.len().min(self.pipe.len());
        let may_wait = window == self.pipe.len() && !self.pipe.is_full();

        let mut unknown = 0;
        while unknown < window {
            let remaining = window - unknown;

            for (protocol, frame) in [
                (Protocol::Nmea, self.parse_nmea(unknown, remaining)),
                (Protocol::Ubx, self.parse_ubx(unknown, remaining)),
            ] {
                if frame != Frame::NotFound && unknown > 0 {
                    return self.take(buf, Protocol::Unknown, unknown);
                }
                match frame {
                    Frame::Wait if may_wait => return MessageCode::WAIT,
                    Frame::Complete(len) => return self.take(buf, protocol, len),
                    _ => {}
                }
            }

            unknown += 1;
        }

        self.take(buf, Protocol::Unknown, unknown)
    }

    fn take(&mut self, buf: &mut [u8], protocol: Protocol, len: usize) -> MessageCode {
        for slot in buf.iter_mut().take(len) {
            match self.pipe.pop_front() {
                Some(byte) => *slot = byte,
                None => break,
            }
        }
        MessageCode::new(protocol, len)
    }

    fn at(&self, index: usize) -> u8 {
        let (front, back) = self.pipe.as_slices();
        if index < front.len() {
            front[index]
        } else {
            back[index - front.len()]
        }
    }

    /// Frame an NMEA sentence starting at `start`, looking at most `len` bytes
    fn parse_nmea(&self, start: usize, len: usize) -> Frame {
        let mut o = 0;
        let next = |o: &mut usize| -> Option<u8> {
            if *o >= len {
                return None;
            }
            let byte = self.at(start + *o);
            *o += 1;
            Some(byte)
        };

        match next(&mut o) {
            None => return Frame::Wait,
            Some(b'$') => {}
            Some(_) => return Frame::NotFound,
        }

        let mut checksum = 0u8;
        loop {
            match next(&mut o) {
                None => return Frame::Wait,
                Some(b'*') => break,
                Some(ch) if (0x20..=0x7E).contains(&ch) => checksum ^= ch,
                Some(_) => return Frame::NotFound,
            }
        }

        let expected = [
            hex_digit(checksum >> 4),
            hex_digit(checksum),
            b'\r',
            b'\n',
        ];
        for want in expected {
            match next(&mut o) {
                None => return Frame::Wait,
                Some(got) if got == want => {}
                Some(_) => return Frame::NotFound,
            }
        }

        Frame::Complete(o)
    }

    /// Frame a UBX message starting at `start`, looking at most `len` bytes
    fn parse_ubx(&self, start: usize, len: usize) -> Frame {
        for (i, &sync) in UBX_SYNC.iter().enumerate() {
            if i >= len {
                return Frame::Wait;
            }
            if self.at(start + i) != sync {
                return Frame::NotFound;
            }
        }

        if len < UBX_HEADER_LEN {
            return Frame::Wait;
        }
        let payload_len =
            usize::from(self.at(start + 4)) | (usize::from(self.at(start + 5)) << 8);
        let total = UBX_HEADER_LEN + payload_len + 2;
        if len < total {
            return Frame::Wait;
        }

        let (mut ck_a, mut ck_b) = (0u8, 0u8);
        for i in 2..UBX_HEADER_LEN + payload_len {
            ck_a = ck_a.wrapping_add(self.at(start + i));
            ck_b = ck_b.wrapping_add(ck_a);
        }
        let end = start + UBX_HEADER_LEN + payload_len;
        if self.at(end) != ck_a || self.at(end + 1) != ck_b {
            return Frame::NotFound;
        }

        Frame::Complete(total)
    }
}

impl Default for GnssParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gnss::ubx::{build_cfg_msg, nmea_checksum};

    fn sentence(body: &str) -> Vec<u8> {
        let mut s = format!("${}*", body).into_bytes();
        let ck = nmea_checksum(&s);
        s.extend_from_slice(format!("{:02X}\r\n", ck).as_bytes());
        s
    }

    #[test]
    fn test_empty_pipe_not_found() {
        let mut parser = GnssParser::new();
        let mut buf = [0u8; 64];
        assert_eq!(parser.get_message(&mut buf), MessageCode::NOT_FOUND);
    }

    #[test]
    fn test_nmea_frame() {
        let mut parser = GnssParser::new();
        let msg = sentence("GPGLL,4916.45,N,12311.12,W,225444,A,");
        parser.put(&msg);

        let mut buf = [0u8; 256];
        let code = parser.get_message(&mut buf);
        assert_eq!(code.protocol(), Protocol::Nmea);
        assert_eq!(code.length(), msg.len());
        assert_eq!(&buf[..msg.len()], &msg[..]);
        assert!(parser.is_empty());
    }

    #[test]
    fn test_known_sentence_checksum() {
        let mut parser = GnssParser::new();
        parser.put(b"$GPGLL,4916.45,N,12311.12,W,225444,A,*1D\r\n");
        let mut buf = [0u8; 256];
        assert_eq!(parser.get_message(&mut buf).protocol(), Protocol::Nmea);
    }

    #[test]
    fn test_partial_nmea_waits() {
        let mut parser = GnssParser::new();
        let msg = sentence("GPVTG,054.7,T,034.4,M,005.5,N,010.2,K");
        parser.put(&msg[..10]);

        let mut buf = [0u8; 256];
        assert_eq!(parser.get_message(&mut buf), MessageCode::WAIT);
        assert_eq!(parser.len(), 10);

        parser.put(&msg[10..]);
        let code = parser.get_message(&mut buf);
        assert_eq!(code, MessageCode::new(Protocol::Nmea, msg.len()));
    }

    #[test]
    fn test_bad_checksum_is_unknown() {
        let mut parser = GnssParser::new();
        let mut msg = sentence("GPGGA,123519");
        let star = msg.iter().position(|&b| b == b'*').unwrap();
        msg[star + 1] = if msg[star + 1] == b'0' { b'1' } else { b'0' };
        parser.put(&msg);

        let mut buf = [0u8; 256];
        let code = parser.get_message(&mut buf);
        assert_eq!(code.protocol(), Protocol::Unknown);
        assert_eq!(code.length(), msg.len());
        assert!(parser.is_empty());
    }

    #[test]
    fn test_garbage_before_frame() {
        let mut parser = GnssParser::new();
        let msg = sentence("GPGGA,123519,4807.038,N");
        parser.put(b"\xFF\x00xy");
        parser.put(&msg);

        let mut buf = [0u8; 256];
        let code = parser.get_message(&mut buf);
        assert_eq!(code, MessageCode::new(Protocol::Unknown, 4));
        assert_eq!(&buf[..4], b"\xFF\x00xy");

        let code = parser.get_message(&mut buf);
        assert_eq!(code, MessageCode::new(Protocol::Nmea, msg.len()));
    }

    #[test]
    fn test_ubx_frame() {
        let mut parser = GnssParser::new();
        let frame = build_cfg_msg(0xF0, 0x01, 1);
        parser.put(&frame);

        let mut buf = [0u8; 64];
        let code = parser.get_message(&mut buf);
        assert_eq!(code, MessageCode::new(Protocol::Ubx, frame.len()));
        assert_eq!(&buf[..frame.len()], &frame[..]);
    }

    #[test]
    fn test_ubx_partial_waits() {
        let mut parser = GnssParser::new();
        let frame = build_cfg_msg(0xF0, 0x01, 1);
        parser.put(&frame[..7]);

        let mut buf = [0u8; 64];
        assert_eq!(parser.get_message(&mut buf), MessageCode::WAIT);
    }

    #[test]
    fn test_ubx_bad_checksum_is_unknown() {
        let mut parser = GnssParser::new();
        let mut frame = build_cfg_msg(0xF0, 0x01, 1);
        frame[10] ^= 0xFF;
        parser.put(&frame);

        let mut buf = [0u8; 64];
        let code = parser.get_message(&mut buf);
        assert_eq!(code.protocol(), Protocol::Unknown);
    }

    #[test]
    fn test_back_to_back_messages() {
        let mut parser = GnssParser::new();
        let first = sentence("GPGLL,1,N");
        let ubx = build_cfg_msg(0xF0, 0x00, 1);
        let second = sentence("GPVTG,2,T");
        parser.put(&first);
        parser.put(&ubx);
        parser.put(&second);

        let mut buf = [0u8; 128];
        assert_eq!(
            parser.get_message(&mut buf),
            MessageCode::new(Protocol::Nmea, first.len())
        );
        assert_eq!(
            parser.get_message(&mut buf),
            MessageCode::new(Protocol::Ubx, ubx.len())
        );
        assert_eq!(
            parser.get_message(&mut buf),
            MessageCode::new(Protocol::Nmea, second.len())
        );
        assert_eq!(parser.get_message(&mut buf), MessageCode::NOT_FOUND);
    }

    #[test]
    fn test_frame_larger_than_buffer_is_consumed() {
        let mut parser = GnssParser::new();
        let msg = sentence("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M");
        parser.put(&msg);

        let mut buf = [0u8; 16];
        let code = parser.get_message(&mut buf);
        assert_eq!(code, MessageCode::new(Protocol::Unknown, 16));
        assert_eq!(parser.len(), msg.len() - 16);
    }

    #[test]
    fn test_pipe_capacity() {
        let mut parser = GnssParser::new();
        let data = [b'x'; PIPE_SIZE + 10];
        assert_eq!(parser.put(&data), PIPE_SIZE);
        assert_eq!(parser.free(), 0);

        parser.clear();
        assert_eq!(parser.free(), PIPE_SIZE);
    }
}
