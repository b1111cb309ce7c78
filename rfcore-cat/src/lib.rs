use colored::*;
use rfcore_frame::{fcs, Address, FrameRepr, FCS_LEN};

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.indent = 0;
        self.writeln(title.underline().bold().to_string());
        self.increase_indent();
    }

    fn field(&mut self, name: &str, value: impl core::fmt::Display) {
        self.writeln(format!("{}: {}", name.bold(), value));
    }
}

/// How the bytes around the MPDU look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Just the MPDU.
    #[default]
    Mpdu,
    /// As read out of the RX FIFO: a length prefix, the MPDU, then the RSSI
    /// and correlation bytes that replace the FCS.
    Fifo,
    /// The MPDU followed by its FCS.
    WithFcs,
}

#[derive(Debug)]
pub enum Error {
    Hex(hex::FromHexError),
    /// The input ends before the length prefix says the frame does.
    Truncated { expected: usize, found: usize },
    /// The input ends before the header does.
    Frame(rfcore_frame::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Hex(err) => write!(f, "invalid hex input: {err}"),
            Error::Truncated { expected, found } => {
                write!(f, "expected {expected} octets, found {found}")
            }
            Error::Frame(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Hex(err)
    }
}

impl From<rfcore_frame::Error> for Error {
    fn from(err: rfcore_frame::Error) -> Self {
        Error::Frame(err)
    }
}

pub struct FrameParser {}

impl FrameParser {
    pub fn parse_hex(input: &str, framing: Framing) -> Result<String, Error> {
        let data = hex::decode(input)?;
        Self::parse(&data, framing)
    }

    pub fn parse(input: &[u8], framing: Framing) -> Result<String, Error> {
        let mut buffer = String::new();
        let mut w = Writer::new(&mut buffer);

        let (mpdu, trailer) = match framing {
            Framing::Mpdu => (input, None),
            Framing::Fifo => {
                let Some((&length, rest)) = input.split_first() else {
                    return Err(Error::Truncated {
                        expected: 1,
                        found: 0,
                    });
                };
                let length = (length & 0x7f) as usize;
                if rest.len() < length || length < FCS_LEN {
                    return Err(Error::Truncated {
                        expected: 1 + length.max(FCS_LEN),
                        found: input.len(),
                    });
                }

                w.section("Length");
                w.field("length", length);
                if rest.len() > length {
                    w.field("trailing octets", rest.len() - length);
                }

                let (mpdu, status) = rest[..length].split_at(length - FCS_LEN);
                (mpdu, Some(status))
            }
            Framing::WithFcs => {
                let Some(split) = input.len().checked_sub(FCS_LEN) else {
                    return Err(Error::Truncated {
                        expected: FCS_LEN,
                        found: input.len(),
                    });
                };
                let (mpdu, fcs) = input.split_at(split);
                (mpdu, Some(fcs))
            }
        };

        let frame = FrameRepr::parse(mpdu)?;
        let header = &frame.header;
        let fc = &header.frame_control;

        // -----------------------------------------------------------------
        // Frame Control
        // -----------------------------------------------------------------
        w.section("Frame Control");
        w.field("frame type", format!("{:?}", fc.frame_type).bright_blue());
        w.field("security", fc.security_enabled as usize);
        w.field("frame pending", fc.frame_pending as usize);
        w.field("ack request", fc.ack_request as usize);
        w.field("pan id compression", fc.pan_id_compression as usize);
        w.field("dst addressing mode", format!("{:?}", fc.dst_addressing_mode));
        w.field("src addressing mode", format!("{:?}", fc.src_addressing_mode));
        w.field(
            "frame version",
            format!("{} ({:?})", fc.frame_version as usize, fc.frame_version),
        );

        // -----------------------------------------------------------------
        // Sequence Number
        // -----------------------------------------------------------------
        w.section("Sequence Number");
        w.field("sequence number", header.sequence_number);

        // -----------------------------------------------------------------
        // Addressing
        // -----------------------------------------------------------------
        w.section("Addressing");
        w.field("dst pan id", header.dst_pan_id);
        if !header.dst_address.is_absent() {
            w.field("dst addr", describe(&header.dst_address));
        }
        if let Some(src_pan_id) = header.src_pan_id {
            w.field("src pan id", src_pan_id);
        }
        if !header.src_address.is_absent() {
            w.field("src addr", describe(&header.src_address));
        }

        // -----------------------------------------------------------------
        // Payload
        // -----------------------------------------------------------------
        if !frame.payload.is_empty() {
            w.section("Payload");
            w.writeln(format!("{:02x?}", frame.payload));
        }

        // -----------------------------------------------------------------
        // Trailer
        // -----------------------------------------------------------------
        match (framing, trailer) {
            (Framing::Fifo, Some(&[rssi, correlation])) => {
                w.section("Status");
                w.field("rssi", format!("{} (raw)", rssi as i8));
                w.field("crc ok", (correlation >> 7) as usize);
                w.field("correlation", correlation & 0x7f);
            }
            (Framing::WithFcs, Some(&[lo, hi])) => {
                let received = u16::from_le_bytes([lo, hi]);
                let valid = received == fcs::checksum(mpdu);
                w.section("FCS");
                w.field(
                    "fcs",
                    format!(
                        "{:04x} ({})",
                        received,
                        if valid { "valid".green() } else { "invalid".red() }
                    ),
                );
            }
            _ => {}
        }

        Ok(buffer)
    }
}

fn describe(address: &Address) -> String {
    format!(
        "{}{}",
        address,
        if address.is_broadcast() {
            " (broadcast)"
        } else {
            ""
        }
    )
}
