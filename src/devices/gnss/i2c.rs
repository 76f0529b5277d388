//! u-blox DDC (I2C) transport
//!
//! The receiver exposes a register interface at its slave address:
//! - 0xFD/0xFE: number of bytes waiting (big endian)
//! - 0xFF: message stream
//!
//! Messages to the receiver are written as plain I2C writes.

use super::{
    parser::GnssParser,
    ubx::{build_cfg_msg, build_cfg_prt_ddc, NMEA_CLASS, REPORTED_SENTENCES},
    wait_for_data, GnssSource, MessageCode, PendingBytes,
};
use crate::platform::{
    traits::{I2cInterface, TimerInterface},
    Result,
};

/// Register holding the high byte of the pending byte count
pub const REG_LENGTH: u8 = 0xFD;

/// Stream register
pub const REG_STREAM: u8 = 0xFF;

/// GNSS receiver on I2C
pub struct GnssI2c<I: I2cInterface, T: TimerInterface> {
    i2c: I,
    timer: T,
    address: u8,
    parser: GnssParser,
}

impl<I: I2cInterface, T: TimerInterface> GnssI2c<I, T> {
    /// Create a transport for the receiver at 7-bit `address`
    pub fn new(i2c: I, timer: T, address: u8) -> Self {
        Self {
            i2c,
            timer,
            address,
            parser: GnssParser::new(),
        }
    }

    /// Get mutable reference to the I2C bus
    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Send a raw frame (UBX command or NMEA sentence) to the receiver
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if the write fails.
    pub async fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.i2c.write(self.address, frame).await
    }

    /// Get buffered-byte count from the parser
    pub fn buffered(&self) -> usize {
        self.parser.len()
    }

    async fn configure(&mut self) -> Result<()> {
        self.send(&build_cfg_prt_ddc(self.address)).await?;
        for (id, _) in REPORTED_SENTENCES {
            self.send(&build_cfg_msg(NMEA_CLASS, id, 1)).await?;
        }
        Ok(())
    }
}

/// DDC stream of one receiver
struct DdcStream<'a, I: I2cInterface> {
    i2c: &'a mut I,
    address: u8,
}

impl<I: I2cInterface> PendingBytes for DdcStream<'_, I> {
    /// Read the pending byte count, then up to that many stream bytes
    async fn read_pending(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut count = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_LENGTH], &mut count)
            .await?;

        let pending = usize::from(u16::from_be_bytes(count));
        let size = pending.min(buf.len());
        if size == 0 {
            return Ok(0);
        }

        self.i2c
            .write_read(self.address, &[REG_STREAM], &mut buf[..size])
            .await?;
        Ok(size)
    }
}

impl<I: I2cInterface, T: TimerInterface> GnssSource for GnssI2c<I, T> {
    async fn init(&mut self) -> Result<()> {
        // Any addressed transfer wakes the receiver from backup mode
        if let Err(e) = self.i2c.write(self.address, &[]).await {
            crate::log_debug!("GNSS: wake-up write failed: {}", e);
        }

        let mut stream = DdcStream {
            i2c: &mut self.i2c,
            address: self.address,
        };
        wait_for_data(&mut self.parser, &mut self.timer, &mut stream).await?;

        self.configure().await?;
        crate::log_info!("GNSS: receiver at 0x{:x} ready", self.address);
        Ok(())
    }

    async fn get_message(&mut self, buf: &mut [u8]) -> Result<MessageCode> {
        let room = self.parser.free().min(buf.len());
        if room > 0 {
            let mut stream = DdcStream {
                i2c: &mut self.i2c,
                address: self.address,
            };
            let n = stream.read_pending(&mut buf[..room]).await?;
            self.parser.put(&buf[..n]);
        }
        Ok(self.parser.get_message(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gnss::{ubx::nmea_checksum, Protocol};
    use crate::platform::error::{GnssError, PlatformError};
    use crate::platform::mock::{I2cTransaction, MockI2c, MockTimer};
    use crate::platform::traits::I2cConfig;

    fn sentence(body: &str) -> Vec<u8> {
        let mut s = format!("${}*", body).into_bytes();
        let ck = nmea_checksum(&s);
        s.extend_from_slice(format!("{:02X}\r\n", ck).as_bytes());
        s
    }

    fn queue_stream(gnss: &mut GnssI2c<MockI2c, MockTimer>, data: &[u8]) {
        let len = (data.len() as u16).to_be_bytes();
        gnss.i2c_mut().queue_read_data(&len);
        gnss.i2c_mut().queue_read_data(data);
    }

    fn queue_empty(gnss: &mut GnssI2c<MockI2c, MockTimer>) {
        gnss.i2c_mut().queue_read_data(&[0x00, 0x00]);
    }

    fn new_gnss() -> GnssI2c<MockI2c, MockTimer> {
        GnssI2c::new(MockI2c::new(I2cConfig::default()), MockTimer::new(), 0x42)
    }

    #[tokio::test]
    async fn test_get_message_reads_length_then_stream() {
        let mut gnss = new_gnss();
        let msg = sentence("GPGLL,4916.45,N,12311.12,W,225444,A,");
        queue_stream(&mut gnss, &msg);

        let mut buf = [0u8; 256];
        let code = gnss.get_message(&mut buf).await.unwrap();
        assert_eq!(code, MessageCode::new(Protocol::Nmea, msg.len()));
        assert_eq!(&buf[..msg.len()], &msg[..]);

        let transactions = gnss.i2c_mut().transactions();
        assert_eq!(
            transactions,
            vec![
                I2cTransaction::WriteRead {
                    addr: 0x42,
                    write_data: vec![REG_LENGTH],
                    read_len: 2
                },
                I2cTransaction::WriteRead {
                    addr: 0x42,
                    write_data: vec![REG_STREAM],
                    read_len: msg.len()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_message_nothing_pending() {
        let mut gnss = new_gnss();
        queue_empty(&mut gnss);

        let mut buf = [0u8; 256];
        assert_eq!(gnss.get_message(&mut buf).await.unwrap(), MessageCode::NOT_FOUND);
        // No stream read when the count is zero
        assert_eq!(gnss.i2c_mut().transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_message_split_across_reads() {
        let mut gnss = new_gnss();
        let msg = sentence("GPVTG,054.7,T,034.4,M,005.5,N,010.2,K");
        queue_stream(&mut gnss, &msg[..12]);

        let mut buf = [0u8; 256];
        assert_eq!(gnss.get_message(&mut buf).await.unwrap(), MessageCode::WAIT);
        assert_eq!(gnss.buffered(), 12);

        queue_stream(&mut gnss, &msg[12..]);
        let code = gnss.get_message(&mut buf).await.unwrap();
        assert_eq!(code, MessageCode::new(Protocol::Nmea, msg.len()));
        assert_eq!(&buf[..msg.len()], &msg[..]);
    }

    #[tokio::test]
    async fn test_read_limited_to_buffer() {
        let mut gnss = new_gnss();
        // Receiver reports more than the caller can take
        gnss.i2c_mut().queue_read_data(&[0x01, 0x00]);

        let mut buf = [0u8; 32];
        let _ = gnss.get_message(&mut buf).await.unwrap();

        let transactions = gnss.i2c_mut().transactions();
        assert_eq!(
            transactions[1],
            I2cTransaction::WriteRead {
                addr: 0x42,
                write_data: vec![REG_STREAM],
                read_len: 32
            }
        );
    }

    #[tokio::test]
    async fn test_bus_error_propagates() {
        let mut gnss = new_gnss();
        gnss.i2c_mut().nack_next(1);

        let mut buf = [0u8; 64];
        assert!(matches!(
            gnss.get_message(&mut buf).await,
            Err(PlatformError::I2c(_))
        ));
    }

    #[tokio::test]
    async fn test_init_configures_receiver() {
        let mut gnss = new_gnss();
        queue_empty(&mut gnss);
        queue_stream(&mut gnss, b"$G");

        gnss.init().await.unwrap();

        let writes: Vec<Vec<u8>> = gnss
            .i2c_mut()
            .transactions()
            .into_iter()
            .filter_map(|t| match t {
                I2cTransaction::Write { data, .. } => Some(data),
                _ => None,
            })
            .collect();

        // Wake-up, CFG-PRT, then one CFG-MSG per reported sentence
        assert_eq!(writes.len(), 2 + REPORTED_SENTENCES.len());
        assert!(writes[0].is_empty());
        assert_eq!(writes[1], build_cfg_prt_ddc(0x42).to_vec());
        assert_eq!(writes[2], build_cfg_msg(NMEA_CLASS, 0x01, 1).to_vec());
        // Bytes seen while waking stay buffered
        assert_eq!(gnss.buffered(), 2);
    }

    #[tokio::test]
    async fn test_init_waits_between_polls() {
        let mut gnss = new_gnss();
        queue_empty(&mut gnss);
        queue_empty(&mut gnss);
        queue_stream(&mut gnss, b"$");

        gnss.init().await.unwrap();
        assert_eq!(gnss.timer.delay_count(), 2);
    }

    #[tokio::test]
    async fn test_init_not_responding() {
        let mut gnss = new_gnss();
        for _ in 0..crate::devices::gnss::WAKE_POLLS {
            queue_empty(&mut gnss);
        }

        assert_eq!(
            gnss.init().await,
            Err(PlatformError::Gnss(GnssError::NotResponding))
        );
        assert_eq!(
            gnss.timer.now_ms(),
            u64::from(crate::devices::gnss::WAKE_POLLS * crate::devices::gnss::WAKE_POLL_INTERVAL_MS)
        );
    }

    #[tokio::test]
    async fn test_init_tolerates_bus_errors_while_waking() {
        let mut gnss = new_gnss();
        // Wake-up write and first poll NACK
        gnss.i2c_mut().nack_next(2);
        queue_stream(&mut gnss, b"$");

        assert!(gnss.init().await.is_ok());
    }
}
