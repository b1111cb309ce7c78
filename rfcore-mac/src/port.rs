//! The boundary to the radio hardware.
//!
//! The MAC layer only needs a handful of primitives from the radio core: the
//! byte-wide FIFO data register, the RX FIFO fill level, two interrupt flag
//! registers, the CPU-side interrupt flag, and the command strobe register.
//!
//! They are split by the context that uses them. [`RxPort`] is what the
//! radio interrupt handler touches and [`TxPort`] is what the main context
//! touches, so a board crate can hand the two halves to different owners and
//! transmit without holding off the receive interrupt. [`RadioPort`] is any
//! type that implements both.

use bitflags::bitflags;
use rfcore_frame::{ByteSink, ByteSource};

use crate::config::RegisterConfig;

/// Command strobes understood by the radio core's command strobe processor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Strobe {
    /// Enable and calibrate the receiver.
    RxOn = 0xe3,
    /// Calibrate, then transmit the TX FIFO.
    TxOn = 0xe9,
    /// Calibrate, then transmit the TX FIFO if the channel is clear.
    TxOnCca = 0xea,
    /// Disable RX and TX and the frequency synthesizer.
    RfOff = 0xef,
    /// Flush the RX FIFO.
    FlushRx = 0xed,
    /// Flush the TX FIFO.
    FlushTx = 0xee,
}

bitflags! {
    /// RF core interrupt flags, register 0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RfIrqF0: u8 {
        /// A complete frame has been received.
        const RXPKTDONE = 0x40;
    }
}

bitflags! {
    /// RF core interrupt flags, register 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RfIrqF1: u8 {
        /// A complete frame has been transmitted.
        const TXDONE = 0x02;
    }
}

/// The registers the receive interrupt handler uses.
pub trait RxPort {
    /// Pop one byte from the RX FIFO. Reading an empty FIFO must not fail;
    /// the value returned is then unspecified.
    fn read_rx_fifo(&mut self) -> u8;

    /// Number of bytes currently buffered in the RX FIFO. This may span more
    /// than one frame.
    fn rx_fifo_count(&mut self) -> u8;

    /// Read RF interrupt flag register 0.
    fn rfirqf0(&mut self) -> RfIrqF0;

    /// Clear the given flags in RF interrupt flag register 0.
    fn clear_rfirqf0(&mut self, flags: RfIrqF0);

    /// Clear the CPU-level RF interrupt flag. Both this flag and the RF core
    /// flag have to be cleared for the interrupt line to deassert.
    fn clear_cpu_interrupt(&mut self);

    /// Issue [`Strobe::FlushRx`].
    fn flush_rx(&mut self);
}

/// The registers the transmit path and radio control use.
pub trait TxPort {
    /// Push one byte to the TX FIFO.
    fn write_tx_fifo(&mut self, byte: u8);

    /// Read RF interrupt flag register 1.
    fn rfirqf1(&mut self) -> RfIrqF1;

    /// Clear the given flags in RF interrupt flag register 1.
    fn clear_rfirqf1(&mut self, flags: RfIrqF1);

    /// Issue a command strobe.
    fn strobe(&mut self, command: Strobe);

    /// Program channel, addresses and PAN ID.
    fn configure(&mut self, registers: &RegisterConfig);
}

/// Both halves in one owner.
pub trait RadioPort: RxPort + TxPort {}

impl<P: RxPort + TxPort> RadioPort for P {}

/// The RX FIFO of a port, as a [`ByteSource`].
pub struct RxFifo<'p, P: RxPort> {
    port: &'p mut P,
}

impl<'p, P: RxPort> RxFifo<'p, P> {
    pub fn new(port: &'p mut P) -> Self {
        Self { port }
    }
}

impl<P: RxPort> ByteSource for RxFifo<'_, P> {
    fn read_byte(&mut self) -> u8 {
        self.port.read_rx_fifo()
    }
}

/// The TX FIFO of a port, as a [`ByteSink`].
pub struct TxFifo<'p, P: TxPort> {
    port: &'p mut P,
}

impl<'p, P: TxPort> TxFifo<'p, P> {
    pub fn new(port: &'p mut P) -> Self {
        Self { port }
    }
}

impl<P: TxPort> ByteSink for TxFifo<'_, P> {
    fn write_byte(&mut self, byte: u8) {
        self.port.write_tx_fifo(byte)
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PortEvent {
        TxByte(u8),
        Strobe(Strobe),
        ClearRfIrqF0(RfIrqF0),
        ClearRfIrqF1(RfIrqF1),
        ClearCpuInterrupt,
        Configure(RegisterConfig),
    }

    /// An in-memory radio: FIFOs are queues, every write, strobe and flag
    /// clear is recorded, and TXDONE is raised after a scripted number of
    /// polls following a TX strobe.
    #[derive(Debug)]
    pub struct FakePort {
        pub events: Vec<PortEvent>,
        pub rx_fifo: VecDeque<u8>,
        pub tx_fifo: Vec<u8>,
        pub rfirqf0: RfIrqF0,
        pub rfirqf1: RfIrqF1,
        /// Raise TXDONE on this poll after a TX strobe. `None` never raises it.
        pub tx_done_after: Option<u32>,
        pub tx_polls: u32,
        /// Reads from the RX FIFO while it was empty.
        pub rx_underflows: u32,
        transmitting: bool,
    }

    impl FakePort {
        pub fn new() -> Self {
            Self {
                events: Vec::new(),
                rx_fifo: VecDeque::new(),
                tx_fifo: Vec::new(),
                rfirqf0: RfIrqF0::empty(),
                rfirqf1: RfIrqF1::empty(),
                tx_done_after: Some(1),
                tx_polls: 0,
                rx_underflows: 0,
                transmitting: false,
            }
        }

        /// Queue a received frame the way the radio stores it: length prefix,
        /// MPDU, then the RSSI and correlation bytes in place of the FCS.
        pub fn receive(&mut self, mpdu: &[u8]) {
            self.rx_fifo.push_back((mpdu.len() + 2) as u8);
            self.rx_fifo.extend(mpdu.iter().copied());
            self.rx_fifo.extend([0xd8, 0xe5]);
            self.rfirqf0 |= RfIrqF0::RXPKTDONE;
        }

        pub fn strobes(&self) -> Vec<Strobe> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    PortEvent::Strobe(s) => Some(*s),
                    _ => None,
                })
                .collect()
        }

        pub fn tx_bytes(&self) -> Vec<u8> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    PortEvent::TxByte(b) => Some(*b),
                    _ => None,
                })
                .collect()
        }
    }

    impl RxPort for FakePort {
        fn read_rx_fifo(&mut self) -> u8 {
            self.rx_fifo.pop_front().unwrap_or_else(|| {
                self.rx_underflows += 1;
                0
            })
        }

        fn rx_fifo_count(&mut self) -> u8 {
            self.rx_fifo.len() as u8
        }

        fn rfirqf0(&mut self) -> RfIrqF0 {
            self.rfirqf0
        }

        fn clear_rfirqf0(&mut self, flags: RfIrqF0) {
            self.events.push(PortEvent::ClearRfIrqF0(flags));
            self.rfirqf0.remove(flags);
        }

        fn clear_cpu_interrupt(&mut self) {
            self.events.push(PortEvent::ClearCpuInterrupt);
        }

        fn flush_rx(&mut self) {
            self.strobe(Strobe::FlushRx);
        }
    }

    impl TxPort for FakePort {
        fn write_tx_fifo(&mut self, byte: u8) {
            self.events.push(PortEvent::TxByte(byte));
            self.tx_fifo.push(byte);
        }

        fn rfirqf1(&mut self) -> RfIrqF1 {
            if self.transmitting {
                self.tx_polls += 1;
                if Some(self.tx_polls) == self.tx_done_after {
                    self.rfirqf1 |= RfIrqF1::TXDONE;
                    self.transmitting = false;
                }
            }
            self.rfirqf1
        }

        fn clear_rfirqf1(&mut self, flags: RfIrqF1) {
            self.events.push(PortEvent::ClearRfIrqF1(flags));
            self.rfirqf1.remove(flags);
        }

        fn strobe(&mut self, command: Strobe) {
            self.events.push(PortEvent::Strobe(command));
            match command {
                Strobe::TxOn | Strobe::TxOnCca => {
                    self.tx_polls = 0;
                    self.transmitting = true;
                }
                Strobe::FlushTx => self.tx_fifo.clear(),
                Strobe::FlushRx => self.rx_fifo.clear(),
                Strobe::RxOn | Strobe::RfOff => {}
            }
        }

        fn configure(&mut self, registers: &RegisterConfig) {
            self.events.push(PortEvent::Configure(*registers));
        }
    }

    #[test]
    fn strobe_codes() {
        assert_eq!(Strobe::RxOn as u8, 0xe3);
        assert_eq!(Strobe::TxOn as u8, 0xe9);
        assert_eq!(Strobe::TxOnCca as u8, 0xea);
        assert_eq!(Strobe::RfOff as u8, 0xef);
        assert_eq!(Strobe::FlushRx as u8, 0xed);
        assert_eq!(Strobe::FlushTx as u8, 0xee);
    }

    #[test]
    fn fifo_adapters() {
        let mut port = FakePort::new();
        port.rx_fifo.extend([0x34, 0x12]);
        assert_eq!(RxFifo::new(&mut port).read_u16_le(), 0x1234);

        TxFifo::new(&mut port).write_all(&[1, 2, 3]);
        assert_eq!(port.tx_bytes(), [1, 2, 3]);
    }

    #[test]
    fn tx_done_raised_after_polls() {
        let mut port = FakePort::new();
        port.tx_done_after = Some(3);
        port.strobe(Strobe::TxOn);
        assert!(!port.rfirqf1().contains(RfIrqF1::TXDONE));
        assert!(!port.rfirqf1().contains(RfIrqF1::TXDONE));
        assert!(port.rfirqf1().contains(RfIrqF1::TXDONE));
    }
}
