//! u-blox configuration commands and checksums
//!
//! Builds the UBX frames sent to the receiver during initialization and
//! provides the checksum algorithms shared with the message parser.
//!
//! # References
//!
//! - [u-blox 8 / M8 Receiver Description (UBX-13003221)](https://content.u-blox.com/sites/default/files/products/documents/u-blox8-M8_ReceiverDescrProtSpec_UBX-13003221.pdf)

/// UBX sync characters
pub const UBX_SYNC: [u8; 2] = [0xB5, 0x62];

/// UBX header length (sync, class, id, length)
pub const UBX_HEADER_LEN: usize = 6;

/// UBX frame overhead (header plus checksum)
pub const UBX_OVERHEAD: usize = UBX_HEADER_LEN + 2;

/// NMEA message class in UBX-CFG-MSG
pub const NMEA_CLASS: u8 = 0xF0;

/// NMEA sentences the reporter consumes, as (UBX-CFG-MSG id, talker code)
pub const REPORTED_SENTENCES: [(u8, &str); 4] =
    [(0x01, "GLL"), (0x00, "GGA"), (0x0D, "GNS"), (0x05, "VTG")];

/// Build UBX-CFG-MSG command to set an NMEA message rate on the current port
///
/// # Arguments
///
/// * `msg_class` - Message class (0xF0 for standard NMEA)
/// * `msg_id` - Message ID (0x00=GGA, 0x01=GLL, 0x05=VTG, 0x0D=GNS)
/// * `rate` - Output rate (0=disabled, 1=every solution, 2=every 2nd, etc.)
pub fn build_cfg_msg(msg_class: u8, msg_id: u8, rate: u8) -> [u8; 11] {
    let mut cmd = [0u8; 11];
    write_frame(&mut cmd, 0x06, 0x01, &[msg_class, msg_id, rate]);
    cmd
}

/// Build UBX-CFG-PRT for the DDC (I2C) port
///
/// Selects 7-bit slave address `address` and enables UBX and NMEA on both
/// directions of the port.
pub fn build_cfg_prt_ddc(address: u8) -> [u8; 28] {
    let mode = u32::from(address & 0x7F) << 1;
    let mode = mode.to_le_bytes();
    let payload = [
        0x00, // portID: DDC
        0x00, // reserved
        0x00, 0x00, // txReady: disabled
        mode[0], mode[1], mode[2], mode[3], // mode: slave address
        0x00, 0x00, 0x00, 0x00, // reserved
        0x03, 0x00, // inProtoMask: UBX | NMEA
        0x03, 0x00, // outProtoMask: UBX | NMEA
        0x00, 0x00, // flags
        0x00, 0x00, // reserved
    ];

    let mut cmd = [0u8; 28];
    write_frame(&mut cmd, 0x06, 0x00, &payload);
    cmd
}

/// Fill `out` with a complete UBX frame; `out` must be exactly
/// `payload.len() + UBX_OVERHEAD` bytes
fn write_frame(out: &mut [u8], class: u8, id: u8, payload: &[u8]) {
    let len = payload.len() as u16;
    out[..2].copy_from_slice(&UBX_SYNC);
    out[2] = class;
    out[3] = id;
    out[4..6].copy_from_slice(&len.to_le_bytes());
    out[6..6 + payload.len()].copy_from_slice(payload);

    let end = UBX_HEADER_LEN + payload.len();
    let (ck_a, ck_b) = ubx_checksum(&out[2..end]);
    out[end] = ck_a;
    out[end + 1] = ck_b;
}

/// Calculate UBX checksum (8-bit Fletcher algorithm)
///
/// Covers class, id, length and payload.
pub fn ubx_checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;

    for &byte in data {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }

    (ck_a, ck_b)
}

/// Calculate NMEA checksum
///
/// XOR of every byte after a leading `$` up to (not including) `*` or the
/// end of `sentence`.
pub fn nmea_checksum(sentence: &[u8]) -> u8 {
    let body = sentence.strip_prefix(b"$").unwrap_or(sentence);
    body.iter()
        .take_while(|&&b| b != b'*')
        .fold(0u8, |acc, &b| acc ^ b)
}

/// Upper-case hex digit for the low nibble of `value`
pub(crate) const fn hex_digit(value: u8) -> u8 {
    b"0123456789ABCDEF"[(value & 0x0F) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ubx_checksum() {
        // CFG-MSG for GGA: Class=0x06, ID=0x01, Len=0x0003, Payload=0xF0,0x00,0x01
        let data = [0x06, 0x01, 0x03, 0x00, 0xF0, 0x00, 0x01];
        assert_eq!(ubx_checksum(&data), (0xFB, 0x11));
    }

    #[test]
    fn test_build_cfg_msg_gga() {
        let msg = build_cfg_msg(NMEA_CLASS, 0x00, 1);
        assert_eq!(
            msg,
            [0xB5, 0x62, 0x06, 0x01, 0x03, 0x00, 0xF0, 0x00, 0x01, 0xFB, 0x11]
        );
    }

    #[test]
    fn test_build_cfg_msg_gll() {
        let msg = build_cfg_msg(NMEA_CLASS, 0x01, 1);
        assert_eq!(&msg[6..9], &[0xF0, 0x01, 0x01]);
        assert_eq!((msg[9], msg[10]), ubx_checksum(&msg[2..9]));
    }

    #[test]
    fn test_build_cfg_prt_ddc() {
        let msg = build_cfg_prt_ddc(0x42);

        assert_eq!(&msg[..6], &[0xB5, 0x62, 0x06, 0x00, 20, 0]);
        // portID, then mode carries the address shifted left by one
        assert_eq!(msg[6], 0x00);
        assert_eq!(&msg[10..14], &[0x84, 0x00, 0x00, 0x00]);
        assert_eq!(&msg[18..22], &[0x03, 0x00, 0x03, 0x00]);
        assert_eq!((msg[26], msg[27]), ubx_checksum(&msg[2..26]));
    }

    #[test]
    fn test_nmea_checksum() {
        // Well-known GGA example sentence
        let sentence = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        assert_eq!(nmea_checksum(sentence), 0x47);
    }

    #[test]
    fn test_nmea_checksum_without_dollar() {
        assert_eq!(nmea_checksum(b"AB"), b'A' ^ b'B');
        assert_eq!(nmea_checksum(b"$"), 0);
    }

    #[test]
    fn test_hex_digit() {
        assert_eq!(hex_digit(0x4), b'4');
        assert_eq!(hex_digit(0xAF), b'F');
    }

    #[test]
    fn test_reported_sentences_ids() {
        for (id, talker) in REPORTED_SENTENCES {
            assert_eq!(talker.len(), 3);
            assert!(id <= 0x0D);
        }
    }
}
