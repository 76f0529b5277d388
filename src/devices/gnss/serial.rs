//! u-blox UART transport
//!
//! Same framing as the DDC transport; the receiver's serial port pushes bytes
//! on its own, so a poll just drains whatever the UART has buffered.

use super::{
    parser::GnssParser,
    ubx::{build_cfg_msg, NMEA_CLASS, REPORTED_SENTENCES},
    wait_for_data, GnssSource, MessageCode, PendingBytes,
};
use crate::platform::{
    error::{PlatformError, UartError},
    traits::{TimerInterface, UartInterface},
    Result,
};

/// GNSS receiver on a UART
pub struct GnssSerial<U: UartInterface, T: TimerInterface> {
    uart: U,
    timer: T,
    parser: GnssParser,
}

impl<U: UartInterface, T: TimerInterface> GnssSerial<U, T> {
    /// Create a transport over `uart`
    pub fn new(uart: U, timer: T) -> Self {
        Self {
            uart,
            timer,
            parser: GnssParser::new(),
        }
    }

    /// Get mutable reference to UART interface
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Send a raw frame (UBX command or NMEA sentence) to the receiver
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart` if the write fails.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut sent = 0;
        while sent < frame.len() {
            let n = self.uart.write(&frame[sent..])?;
            if n == 0 {
                return Err(PlatformError::Uart(UartError::WriteFailed));
            }
            sent += n;
        }
        self.uart.flush()
    }
}

/// Buffered UART receive side
struct UartStream<'a, U: UartInterface>(&'a mut U);

impl<U: UartInterface> PendingBytes for UartStream<'_, U> {
    async fn read_pending(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.0.available() {
            return Ok(0);
        }
        self.0.read(buf)
    }
}

impl<U: UartInterface, T: TimerInterface> GnssSource for GnssSerial<U, T> {
    async fn init(&mut self) -> Result<()> {
        let mut stream = UartStream(&mut self.uart);
        wait_for_data(&mut self.parser, &mut self.timer, &mut stream).await?;

        for (id, _) in REPORTED_SENTENCES {
            self.send(&build_cfg_msg(NMEA_CLASS, id, 1))?;
        }
        crate::log_info!("GNSS: serial receiver ready");
        Ok(())
    }

    async fn get_message(&mut self, buf: &mut [u8]) -> Result<MessageCode> {
        let room = self.parser.free().min(buf.len());
        if room > 0 {
            let n = UartStream(&mut self.uart)
                .read_pending(&mut buf[..room])
                .await?;
            self.parser.put(&buf[..n]);
        }
        Ok(self.parser.get_message(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::gnss::{nmea, ubx::nmea_checksum, Protocol};
    use crate::platform::error::GnssError;
    use crate::platform::mock::{MockTimer, MockUart};
    use crate::platform::traits::UartConfig;

    fn sentence(body: &str) -> Vec<u8> {
        let mut s = format!("${}*", body).into_bytes();
        let ck = nmea_checksum(&s);
        s.extend_from_slice(format!("{:02X}\r\n", ck).as_bytes());
        s
    }

    fn new_gnss() -> GnssSerial<MockUart, MockTimer> {
        GnssSerial::new(MockUart::new(UartConfig::default()), MockTimer::new())
    }

    #[tokio::test]
    async fn test_trickled_sentence() {
        let mut gnss = new_gnss();
        let msg = sentence("GPVTG,054.7,T,034.4,M,005.5,N,010.2,K");
        gnss.uart_mut().inject_rx_data(&msg);
        gnss.uart_mut().set_max_read(8);

        let mut buf = [0u8; 256];
        let mut polls = 0;
        let code = loop {
            polls += 1;
            let code = gnss.get_message(&mut buf).await.unwrap();
            if code.is_message() {
                break code;
            }
            assert_eq!(code, MessageCode::WAIT);
        };

        assert_eq!(polls, msg.len().div_ceil(8));
        assert_eq!(code.protocol(), Protocol::Nmea);
        assert_eq!(nmea::get_nmea_item(7, &buf[..code.length()]), Some(10.2));
    }

    #[tokio::test]
    async fn test_idle_uart() {
        let mut gnss = new_gnss();
        let mut buf = [0u8; 64];
        assert_eq!(gnss.get_message(&mut buf).await.unwrap(), MessageCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_init_sends_cfg_msg() {
        let mut gnss = new_gnss();
        gnss.uart_mut().inject_rx_data(b"$GP");

        gnss.init().await.unwrap();

        let tx = gnss.uart_mut().tx_buffer();
        assert_eq!(tx.len(), 11 * REPORTED_SENTENCES.len());
        assert_eq!(&tx[..11], &build_cfg_msg(NMEA_CLASS, 0x01, 1));
    }

    #[tokio::test]
    async fn test_init_silent_receiver() {
        let mut gnss = new_gnss();
        assert_eq!(
            gnss.init().await,
            Err(PlatformError::Gnss(GnssError::NotResponding))
        );
        assert!(gnss.uart_mut().tx_buffer().is_empty());
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let mut gnss = new_gnss();
        gnss.uart_mut().inject_rx_data(b"$");
        gnss.uart_mut().fail_reads(true);

        let mut buf = [0u8; 64];
        assert!(gnss.get_message(&mut buf).await.is_err());
    }
}
