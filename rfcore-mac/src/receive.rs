//! The receive state machine.
//!
//! [`Receiver::on_interrupt`] runs inside the radio interrupt handler. It
//! decodes one frame out of the RX FIFO in a single forward pass, one field
//! at a time, because the shape of the header is only known once the Frame
//! Control field has been read. It never fails: whatever the FIFO yields is
//! decoded and dispatched, and the hardware CRC check is the only filter.
//!
//! The states are traversed in this order for every frame:
//!
//! ```text
//! Idle -> LengthRead -> StaticHeaderRead -> DestAddressRead
//!      -> SourcePanIdRead -> SourceAddressRead -> PayloadRead
//!      -> Dispatch -> InterruptClear -> Idle
//! ```
//!
//! When the interrupt was not caused by a received frame, the machine goes
//! straight from `Idle` to `InterruptClear`.

use heapless::Vec;
use rfcore_frame::{
    AddressingMode, ByteSource, FrameHeader, FrameType, StaticHeader, FCS_LEN,
    MAX_PHY_PACKET_SIZE,
};

use crate::port::{RfIrqF0, RxFifo, RxPort};

/// The PHY length field is 7 bits wide. The top bit is reserved.
const LENGTH_MASK: u8 = 0x7f;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// Waiting for RXPKTDONE.
    Idle,
    LengthRead,
    StaticHeaderRead,
    DestAddressRead,
    SourcePanIdRead,
    SourceAddressRead,
    PayloadRead,
    Dispatch,
    InterruptClear,
}

/// The last frame taken out of the RX FIFO.
///
/// There is a single buffer per [`Receiver`], overwritten by every frame.
#[derive(Debug, Clone)]
pub struct RxBuffer {
    header: FrameHeader,
    /// Everything after the header, including the two status bytes the
    /// radio puts in place of the FCS.
    data: Vec<u8, MAX_PHY_PACKET_SIZE>,
    payload_len: usize,
}

impl RxBuffer {
    const fn new() -> Self {
        Self {
            header: FrameHeader {
                frame_control: rfcore_frame::FrameControlRepr::data(),
                sequence_number: 0,
                dst_pan_id: rfcore_frame::PanId(0),
                dst_address: rfcore_frame::Address::Absent,
                src_pan_id: None,
                src_address: rfcore_frame::Address::Absent,
            },
            data: Vec::new(),
            payload_len: 0,
        }
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// The MAC payload, without the trailing status bytes.
    pub fn payload(&self) -> &[u8] {
        let len = self.payload_len.min(self.data.len());
        &self.data[..len]
    }

    /// The RSSI and correlation bytes that trail the payload, if the frame
    /// was long enough to carry them.
    pub fn status(&self) -> Option<[u8; 2]> {
        match self.data[self.payload().len()..] {
            [rssi, correlation] => Some([rssi, correlation]),
            _ => None,
        }
    }
}

/// Receivers of decoded frames, one entry point per frame type.
///
/// Handlers are called from interrupt context and should return quickly.
/// `payload_len` excludes the trailing status bytes.
pub trait FrameHandler {
    fn beacon_received(&mut self, frame: &RxBuffer, payload_len: usize);
    fn data_received(&mut self, frame: &RxBuffer, payload_len: usize);
    fn ack_received(&mut self, frame: &RxBuffer, payload_len: usize);
    /// Called for MAC command frames and for every frame type without a
    /// handler of its own.
    fn mac_command_received(&mut self, frame: &RxBuffer, payload_len: usize);
}

/// The interrupt-side receiver. Owns the receive buffer.
#[derive(Debug, Clone)]
pub struct Receiver {
    state: RxState,
    buffer: RxBuffer,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    pub const fn new() -> Self {
        Self {
            state: RxState::Idle,
            buffer: RxBuffer::new(),
        }
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// The most recently received frame.
    pub fn buffer(&self) -> &RxBuffer {
        &self.buffer
    }

    /// Service a radio interrupt.
    ///
    /// If a frame has been received it is decoded and handed to `handler`.
    /// Either way the RX interrupt flags are cleared and the RX FIFO is
    /// flushed before returning.
    pub fn on_interrupt<P: RxPort, H: FrameHandler>(&mut self, port: &mut P, handler: &mut H) {
        // Total bytes in the FIFO, which may hold more than this frame.
        let mut buffered = 0usize;
        // Bytes of the current frame not read yet.
        let mut remaining = 0usize;

        self.state = if port.rfirqf0().contains(RfIrqF0::RXPKTDONE) {
            RxState::LengthRead
        } else {
            RxState::InterruptClear
        };

        loop {
            self.state = match self.state {
                RxState::LengthRead => {
                    buffered = port.rx_fifo_count() as usize;
                    remaining = (port.read_rx_fifo() & LENGTH_MASK) as usize;
                    buffered = buffered.saturating_sub(1 + remaining);
                    self.buffer.data.clear();
                    RxState::StaticHeaderRead
                }
                RxState::StaticHeaderRead => {
                    let head = StaticHeader::read(&mut RxFifo::new(port), &mut remaining);
                    let fc = &head.frame_control;
                    if fc.dst_addressing_mode == AddressingMode::Reserved
                        || fc.src_addressing_mode == AddressingMode::Reserved
                    {
                        debug!("rx: reserved addressing mode, seq {}", head.sequence_number);
                    }
                    self.buffer.header = head.into();
                    RxState::DestAddressRead
                }
                RxState::DestAddressRead => {
                    let head = self.buffer.header.static_header();
                    self.buffer.header.dst_address =
                        head.read_dst_address(&mut RxFifo::new(port), &mut remaining);
                    RxState::SourcePanIdRead
                }
                RxState::SourcePanIdRead => {
                    let head = self.buffer.header.static_header();
                    self.buffer.header.src_pan_id =
                        head.read_src_pan_id(&mut RxFifo::new(port), &mut remaining);
                    RxState::SourceAddressRead
                }
                RxState::SourceAddressRead => {
                    let head = self.buffer.header.static_header();
                    self.buffer.header.src_address =
                        head.read_src_address(&mut RxFifo::new(port), &mut remaining);
                    RxState::PayloadRead
                }
                RxState::PayloadRead => {
                    let mut fifo = RxFifo::new(port);
                    for _ in 0..remaining {
                        // The length is masked to 127, so this never overflows.
                        let _ = self.buffer.data.push(fifo.read_byte());
                    }
                    self.buffer.payload_len = remaining.saturating_sub(FCS_LEN);
                    RxState::Dispatch
                }
                RxState::Dispatch => {
                    self.dispatch(handler);
                    if buffered > 0 {
                        debug!("rx: dropping {} octets left in the FIFO", buffered);
                    }
                    RxState::InterruptClear
                }
                RxState::InterruptClear => {
                    port.clear_rfirqf0(RfIrqF0::RXPKTDONE);
                    port.clear_cpu_interrupt();
                    port.flush_rx();
                    RxState::Idle
                }
                RxState::Idle => break,
            };
        }
    }

    fn dispatch<H: FrameHandler>(&self, handler: &mut H) {
        let frame = &self.buffer;
        let len = frame.payload_len;
        let frame_type = frame.header.frame_control.frame_type;

        trace!(
            "rx: type {} seq {} payload {}",
            frame_type as u8,
            frame.header.sequence_number,
            len
        );

        match frame_type {
            FrameType::Beacon => handler.beacon_received(frame, len),
            FrameType::Data => handler.data_received(frame, len),
            FrameType::Ack => handler.ack_received(frame, len),
            FrameType::MacCommand
            | FrameType::Reserved
            | FrameType::Multipurpose
            | FrameType::FragmentOrFrak
            | FrameType::Extended => handler.mac_command_received(frame, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::port::tests::{FakePort, PortEvent};
    use crate::port::Strobe;
    use rfcore_frame::{
        header_len, Address, ExtendedAddress, FrameBuilder, FrameControlRepr, FrameRepr, PanId,
        ShortAddress,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Handled {
        Beacon(usize),
        Data(usize),
        Ack(usize),
        MacCommand(usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Handled>,
        payloads: Vec<Vec<u8>>,
    }

    impl Recorder {
        fn record(&mut self, call: Handled, frame: &RxBuffer) {
            self.calls.push(call);
            self.payloads.push(frame.payload().to_vec());
        }
    }

    impl FrameHandler for Recorder {
        fn beacon_received(&mut self, frame: &RxBuffer, payload_len: usize) {
            self.record(Handled::Beacon(payload_len), frame);
        }

        fn data_received(&mut self, frame: &RxBuffer, payload_len: usize) {
            self.record(Handled::Data(payload_len), frame);
        }

        fn ack_received(&mut self, frame: &RxBuffer, payload_len: usize) {
            self.record(Handled::Ack(payload_len), frame);
        }

        fn mac_command_received(&mut self, frame: &RxBuffer, payload_len: usize) {
            self.record(Handled::MacCommand(payload_len), frame);
        }
    }

    fn mpdu(frame: &FrameRepr) -> Vec<u8> {
        let mut out = Vec::new();
        frame.emit(&mut out);
        out
    }

    fn receive(mpdu: &[u8]) -> (Receiver, Recorder, FakePort) {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut port = FakePort::new();
        port.receive(mpdu);
        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();
        receiver.on_interrupt(&mut port, &mut recorder);
        (receiver, recorder, port)
    }

    #[test]
    fn data_frame_is_decoded_and_dispatched() {
        let payload = [0xde, 0xad, 0xbe, 0xef];
        let frame = FrameBuilder::new_data(&payload)
            .set_sequence_number(7)
            .set_dst_pan_id(PanId(0xabcd))
            .set_dst_address(Address::Short(ShortAddress(0x0001)))
            .set_src_pan_id(PanId(0x1234))
            .set_src_address(Address::Extended(ExtendedAddress([1, 2, 3, 4, 5, 6, 7, 8])))
            .set_ack_request(true)
            .finalize()
            .unwrap();

        let (receiver, recorder, port) = receive(&mpdu(&frame));

        assert_eq!(recorder.calls, [Handled::Data(4)]);
        assert_eq!(recorder.payloads[0], payload);
        assert_eq!(receiver.buffer().header(), &frame.header);
        assert_eq!(receiver.buffer().payload(), payload);
        assert_eq!(receiver.buffer().status(), Some([0xd8, 0xe5]));
        assert_eq!(receiver.state(), RxState::Idle);
        assert_eq!(port.rx_underflows, 0);
    }

    #[test]
    fn payload_length_excludes_status_bytes() {
        let modes = [
            AddressingMode::Absent,
            AddressingMode::Short,
            AddressingMode::Extended,
        ];

        for dst in modes {
            for src in modes {
                for compression in [false, true] {
                    let mut fc = FrameControlRepr::data();
                    fc.dst_addressing_mode = dst;
                    fc.src_addressing_mode = src;
                    fc.pan_id_compression = compression;

                    let header_len = header_len(&fc);
                    for payload_len in [0usize, 1, 127] {
                        // Payloads that do not fit a PHY packet are cut to fit.
                        let payload_len = payload_len.min(127 - 2 - header_len);

                        let mut mpdu = fc.to_bytes().to_vec();
                        mpdu.resize(header_len + payload_len, 0x5a);

                        let (receiver, recorder, port) = receive(&mpdu);
                        assert_eq!(recorder.calls, [Handled::Data(payload_len)]);
                        assert_eq!(receiver.buffer().payload().len(), payload_len);
                        assert_eq!(receiver.buffer().header().frame_control, fc);
                        assert_eq!(port.rx_underflows, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn dispatch_is_exclusive_per_frame_type() {
        // Ack frames reach the ack handler only. Beacon and data frames do
        // not also reach the MAC command handler. Every other type code,
        // including the reserved ones, goes to the MAC command handler.
        let expected = [
            (FrameType::Beacon, Handled::Beacon(1)),
            (FrameType::Data, Handled::Data(1)),
            (FrameType::Ack, Handled::Ack(1)),
            (FrameType::MacCommand, Handled::MacCommand(1)),
            (FrameType::Reserved, Handled::MacCommand(1)),
            (FrameType::Multipurpose, Handled::MacCommand(1)),
            (FrameType::FragmentOrFrak, Handled::MacCommand(1)),
            (FrameType::Extended, Handled::MacCommand(1)),
        ];

        for (frame_type, handled) in expected {
            let mut fc = FrameControlRepr::data();
            fc.frame_type = frame_type;
            fc.pan_id_compression = true;
            let mut mpdu = fc.to_bytes().to_vec();
            mpdu.extend_from_slice(&[0x01, 0xff, 0xff, 0x42]);

            let (_, recorder, _) = receive(&mpdu);
            assert_eq!(recorder.calls, [handled], "{frame_type:?}");
        }
    }

    #[test]
    fn ack_frame() {
        let frame = FrameBuilder::new_ack(0x56).finalize().unwrap();
        let (receiver, recorder, _) = receive(&mpdu(&frame));

        assert_eq!(recorder.calls, [Handled::Ack(0)]);
        assert_eq!(receiver.buffer().header().sequence_number, 0x56);
    }

    #[test]
    fn flags_cleared_and_fifo_flushed_in_order() {
        let frame = FrameBuilder::new_ack(1).finalize().unwrap();
        let (_, _, port) = receive(&mpdu(&frame));

        assert_eq!(
            port.events,
            [
                PortEvent::ClearRfIrqF0(RfIrqF0::RXPKTDONE),
                PortEvent::ClearCpuInterrupt,
                PortEvent::Strobe(Strobe::FlushRx),
            ]
        );
        assert!(port.rx_fifo.is_empty());
        assert!(!port.rfirqf0.contains(RfIrqF0::RXPKTDONE));
    }

    #[test]
    fn spurious_interrupt_still_clears_and_flushes() {
        let mut port = FakePort::new();
        port.rx_fifo.extend([0x01, 0x02, 0x03]);
        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();

        receiver.on_interrupt(&mut port, &mut recorder);

        assert!(recorder.calls.is_empty());
        assert_eq!(
            port.events,
            [
                PortEvent::ClearRfIrqF0(RfIrqF0::RXPKTDONE),
                PortEvent::ClearCpuInterrupt,
                PortEvent::Strobe(Strobe::FlushRx),
            ]
        );
        assert!(port.rx_fifo.is_empty());
        assert_eq!(receiver.state(), RxState::Idle);
    }

    #[test]
    fn truncated_frame_is_dispatched_anyway() {
        // Length byte claims 20 octets, the FIFO holds a 3 octet header.
        let mut port = FakePort::new();
        port.rx_fifo.extend([20, 0x41, 0x88, 0x09]);
        port.rfirqf0 = RfIrqF0::RXPKTDONE;

        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();
        receiver.on_interrupt(&mut port, &mut recorder);

        // Short dst, short src, compressed: 9 octets of header, 11 remain.
        assert_eq!(recorder.calls, [Handled::Data(9)]);
        assert_eq!(receiver.buffer().header().sequence_number, 0x09);
        assert!(port.rx_underflows > 0);
        assert_eq!(port.strobes(), [Strobe::FlushRx]);
    }

    #[test]
    fn length_shorter_than_header_saturates() {
        // Length byte of 3 with a header that needs 23 octets.
        let mut fc = FrameControlRepr::data();
        fc.dst_addressing_mode = AddressingMode::Extended;
        fc.src_addressing_mode = AddressingMode::Extended;
        let mut fifo = std::vec![3];
        fifo.extend_from_slice(&fc.to_bytes());
        fifo.resize(24, 0);

        let mut port = FakePort::new();
        port.rx_fifo.extend(fifo);
        port.rfirqf0 = RfIrqF0::RXPKTDONE;
        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();
        receiver.on_interrupt(&mut port, &mut recorder);

        assert_eq!(recorder.calls, [Handled::Data(0)]);
        assert_eq!(receiver.buffer().payload(), &[] as &[u8]);
        assert_eq!(receiver.buffer().status(), None);
    }

    #[test]
    fn residue_beyond_the_frame_is_flushed() {
        let first = FrameBuilder::new_ack(1).finalize().unwrap();
        let second = FrameBuilder::new_ack(2).finalize().unwrap();

        let mut port = FakePort::new();
        port.receive(&mpdu(&first));
        port.receive(&mpdu(&second));

        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();
        receiver.on_interrupt(&mut port, &mut recorder);

        assert_eq!(recorder.calls, [Handled::Ack(0)]);
        assert_eq!(receiver.buffer().header().sequence_number, 1);
        assert!(port.rx_fifo.is_empty());
    }

    #[test]
    fn buffer_is_reused_across_frames() {
        let long = FrameBuilder::new_data(&[1, 2, 3, 4, 5, 6])
            .set_dst_pan_id(PanId(1))
            .set_dst_address(Address::BROADCAST)
            .finalize()
            .unwrap();
        let short = FrameBuilder::new_data(&[9])
            .set_dst_pan_id(PanId(1))
            .set_dst_address(Address::BROADCAST)
            .finalize()
            .unwrap();

        let mut port = FakePort::new();
        let mut receiver = Receiver::new();
        let mut recorder = Recorder::default();

        port.receive(&mpdu(&long));
        receiver.on_interrupt(&mut port, &mut recorder);
        port.receive(&mpdu(&short));
        receiver.on_interrupt(&mut port, &mut recorder);

        assert_eq!(recorder.calls, [Handled::Data(6), Handled::Data(1)]);
        assert_eq!(receiver.buffer().payload(), &[9]);
        assert_eq!(receiver.buffer().status(), Some([0xd8, 0xe5]));
    }
}
