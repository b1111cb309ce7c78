//! The transmit path.
//!
//! Transmission is synchronous: [`send`] returns once the radio has raised
//! its transmit-done flag, so no partially sent frame is ever observable.
//! The flag is polled, so these functions must not be called from a context
//! that prevents the radio from completing, and callers that cannot tolerate
//! a hung radio should pass [`TxWait::Polls`].
//!
//! Only [`TxPort`] is needed. Call these with interrupts enabled, never from
//! inside a critical section: the receive interrupt keeps being serviced
//! while a frame goes out.

use rfcore_frame::{ByteSink, FrameHeader, FrameRepr, FCS_LEN, MAX_PHY_PACKET_SIZE};

use crate::config::{TxConfig, TxWait};
use crate::port::{RfIrqF1, Strobe, TxFifo, TxPort};
use crate::{Error, Result};

/// Write a frame made of `header` and `payload` into the TX FIFO, transmit
/// it, and wait until transmission is done.
///
/// The TX FIFO is flushed first. The length prefix written to the FIFO
/// counts the header, the payload and the FCS the radio appends.
pub fn send<P: TxPort>(
    port: &mut P,
    header: &FrameHeader,
    payload: &[u8],
    config: &TxConfig,
) -> Result<()> {
    let len = header.len() + payload.len() + FCS_LEN;
    if len > MAX_PHY_PACKET_SIZE {
        return Err(Error::FrameTooLong);
    }

    port.strobe(Strobe::FlushTx);
    port.clear_rfirqf1(RfIrqF1::TXDONE);

    let mut fifo = TxFifo::new(port);
    fifo.write_byte(len as u8);
    header.emit(&mut fifo);
    fifo.write_all(payload);

    debug!("tx: {} octets, seq {}", len, header.sequence_number);
    start(port, config)
}

/// [`send`] for a [`FrameRepr`].
pub fn send_frame<P: TxPort>(port: &mut P, frame: &FrameRepr, config: &TxConfig) -> Result<()> {
    send(port, &frame.header, frame.payload, config)
}

/// [`send`], transmitting only if clear channel assessment passes.
pub fn send_with_cca<P: TxPort>(
    port: &mut P,
    header: &FrameHeader,
    payload: &[u8],
    wait: TxWait,
) -> Result<()> {
    send(port, header, payload, &TxConfig { cca: true, wait })
}

/// Transmit the TX FIFO again, unmodified, and wait until done.
///
/// The radio keeps the last frame in its TX FIFO after transmission, so
/// nothing is written. The previous transmission must have completed.
pub fn retransmit<P: TxPort>(port: &mut P, config: &TxConfig) -> Result<()> {
    trace!("tx: retransmit");
    start(port, config)
}

fn start<P: TxPort>(port: &mut P, config: &TxConfig) -> Result<()> {
    port.strobe(if config.cca {
        Strobe::TxOnCca
    } else {
        Strobe::TxOn
    });
    wait_tx_done(port, config.wait)
}

fn wait_tx_done<P: TxPort>(port: &mut P, wait: TxWait) -> Result<()> {
    let mut polls: u32 = 0;

    while !port.rfirqf1().contains(RfIrqF1::TXDONE) {
        if let TxWait::Polls(limit) = wait {
            polls += 1;
            if polls >= limit {
                warn!("tx: no TXDONE after {} polls", polls);
                return Err(Error::TxTimeout);
            }
        }
        core::hint::spin_loop();
    }

    port.clear_rfirqf1(RfIrqF1::TXDONE);
    Ok(())
}
