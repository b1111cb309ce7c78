//! A radio brought up with a [`RadioConfig`].
//!
//! Bring-up yields two owners. [`RadioSession`] keeps the transmit half of
//! the port, the configuration and the data sequence number, and stays on the
//! main context. [`RadioRx`] keeps the receive half and the [`Receiver`], and
//! is serviced from the radio interrupt. Only the receive side is shared, so
//! it alone goes into a [`SharedRx`] and a critical section. Transmitting
//! never masks interrupts.

use core::cell::RefCell;

use critical_section::Mutex;
use rand_core::RngCore;
use rfcore_frame::{Address, FrameBuilder, FrameHeader, FrameRepr, PanId, ShortAddress};

use crate::config::{RadioConfig, RegisterConfig, TxConfig};
use crate::port::{RxPort, Strobe, TxPort};
use crate::receive::{FrameHandler, Receiver};
use crate::{transmit, Result};

pub struct RadioSession<T: TxPort> {
    port: T,
    config: RadioConfig,
    tx_config: TxConfig,
    dsn: u8,
}

impl<T: TxPort> RadioSession<T> {
    /// Program the radio from `config`, empty both FIFOs and start receiving.
    ///
    /// The first data sequence number is drawn from `rng`.
    pub fn new<R: RxPort, G: RngCore>(
        mut tx: T,
        mut rx: R,
        config: RadioConfig,
        rng: &mut G,
    ) -> (Self, RadioRx<R>) {
        tx.configure(&RegisterConfig::from(&config));
        rx.flush_rx();
        tx.strobe(Strobe::FlushTx);
        tx.strobe(Strobe::RxOn);

        info!(
            "radio up: channel {}, pan {}, short address {}",
            config.channel as u8,
            config.pan_id.0,
            config.short_address.0
        );

        let session = Self {
            port: tx,
            config,
            tx_config: TxConfig::default(),
            dsn: rng.next_u32() as u8,
        };
        (session, RadioRx::new(rx))
    }

    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    pub fn tx_config(&self) -> &TxConfig {
        &self.tx_config
    }

    pub fn set_tx_config(&mut self, tx_config: TxConfig) {
        self.tx_config = tx_config;
    }

    pub fn port_mut(&mut self) -> &mut T {
        &mut self.port
    }

    /// Take the next data sequence number.
    pub fn next_sequence_number(&mut self) -> u8 {
        let dsn = self.dsn;
        self.dsn = self.dsn.wrapping_add(1);
        dsn
    }

    /// A data frame from this device to `dst_address` on its own PAN, with
    /// the next sequence number. PAN ID compression is applied.
    ///
    /// A device whose short address is [`ShortAddress::NONE`] sends from its
    /// configured extended address instead.
    pub fn data_frame<'p>(
        &mut self,
        dst_address: Address,
        payload: &'p [u8],
    ) -> rfcore_frame::Result<FrameRepr<'p>> {
        let pan_id: PanId = self.config.pan_id;
        let src_address = match self.config.extended_address {
            Some(ext) if self.config.short_address == ShortAddress::NONE => Address::Extended(ext),
            _ => Address::Short(self.config.short_address),
        };
        FrameBuilder::new_data(payload)
            .set_sequence_number(self.next_sequence_number())
            .set_dst_pan_id(pan_id)
            .set_dst_address(dst_address)
            .set_src_pan_id(pan_id)
            .set_src_address(src_address)
            .set_ack_request(dst_address.is_unicast())
            .finalize()
    }

    pub fn enable_rx(&mut self) {
        self.port.strobe(Strobe::RxOn);
    }

    /// Turn RX, TX and the synthesizer off.
    pub fn disable(&mut self) {
        self.port.strobe(Strobe::RfOff);
    }

    /// See [`transmit::send`].
    pub fn send(&mut self, header: &FrameHeader, payload: &[u8]) -> Result<()> {
        transmit::send(&mut self.port, header, payload, &self.tx_config)
    }

    pub fn send_frame(&mut self, frame: &FrameRepr) -> Result<()> {
        transmit::send_frame(&mut self.port, frame, &self.tx_config)
    }

    /// See [`transmit::send_with_cca`].
    pub fn send_with_cca(&mut self, header: &FrameHeader, payload: &[u8]) -> Result<()> {
        transmit::send_with_cca(&mut self.port, header, payload, self.tx_config.wait)
    }

    /// See [`transmit::retransmit`].
    pub fn retransmit(&mut self) -> Result<()> {
        transmit::retransmit(&mut self.port, &self.tx_config)
    }
}

/// The receive half of a session.
pub struct RadioRx<R: RxPort> {
    port: R,
    receiver: Receiver,
}

impl<R: RxPort> RadioRx<R> {
    pub const fn new(port: R) -> Self {
        Self {
            port,
            receiver: Receiver::new(),
        }
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    pub fn port_mut(&mut self) -> &mut R {
        &mut self.port
    }

    /// See [`Receiver::on_interrupt`].
    pub fn on_interrupt<H: FrameHandler>(&mut self, handler: &mut H) {
        self.receiver.on_interrupt(&mut self.port, handler)
    }
}

/// A [`RadioRx`] that can live in a `static` and be reached from the radio
/// interrupt handler.
///
/// The closure given to [`SharedRx::with`] runs with interrupts masked, so it
/// should only read or service the receiver. Transmit through the
/// [`RadioSession`], which is not shared.
///
/// ```ignore
/// static RADIO_RX: SharedRx<Cc2530Rx> = SharedRx::new();
///
/// fn main() {
///     let (mut radio, rx) = RadioSession::new(Cc2530Tx, Cc2530Rx, config, &mut rng);
///     RADIO_RX.install(rx);
///     let frame = radio.data_frame(Address::BROADCAST, b"hello").unwrap();
///     radio.send_frame(&frame).unwrap();
/// }
///
/// #[interrupt]
/// fn RF() {
///     RADIO_RX.with(|rx| rx.on_interrupt(&mut Handlers));
/// }
/// ```
pub struct SharedRx<R: RxPort> {
    inner: Mutex<RefCell<Option<RadioRx<R>>>>,
}

impl<R: RxPort> Default for SharedRx<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RxPort> SharedRx<R> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store `rx`, returning the one it replaces.
    pub fn install(&self, rx: RadioRx<R>) -> Option<RadioRx<R>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(rx))
    }

    /// Run `f` on the receive half inside a critical section. Returns `None`
    /// when nothing is installed.
    pub fn with<U>(&self, f: impl FnOnce(&mut RadioRx<R>) -> U) -> Option<U> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}
