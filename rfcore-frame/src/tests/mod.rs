use super::*;

fn decode_hex(input: &str) -> std::vec::Vec<u8> {
    hex::decode(input).unwrap()
}

#[test]
fn parse_data_frame_with_extended_addresses() {
    // Data frame, ack requested, both addresses extended, PAN ID compressed.
    let mpdu = decode_hex("61cc2a3412ffeeddccbbaa9988112233445566778801020304");
    let frame = FrameRepr::parse(&mpdu).unwrap();
    let header = &frame.header;

    assert_eq!(header.frame_control.frame_type, FrameType::Data);
    assert!(header.frame_control.ack_request);
    assert!(header.frame_control.pan_id_compression);
    assert_eq!(header.frame_control.frame_version, FrameVersion::Ieee802154_2003);
    assert_eq!(header.sequence_number, 0x2a);
    assert_eq!(header.dst_pan_id, PanId(0x1234));
    assert_eq!(
        header.dst_address,
        Address::Extended(ExtendedAddress([
            0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa, 0x99, 0x88
        ]))
    );
    assert_eq!(header.src_pan_id, None);
    assert_eq!(
        header.src_address,
        Address::Extended(ExtendedAddress([
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88
        ]))
    );
    assert_eq!(frame.payload, &[0x01, 0x02, 0x03, 0x04]);
    assert!(frame.validate().is_ok());
}

#[test]
fn parse_mac_command_without_src_pan_compression() {
    // MAC command (data request), short dst, short src, both PAN IDs present.
    let mpdu = decode_hex("23880522110000ffff341204");
    let frame = FrameRepr::parse(&mpdu).unwrap();
    let header = &frame.header;

    assert_eq!(header.frame_control.frame_type, FrameType::MacCommand);
    assert!(header.frame_control.ack_request);
    assert!(!header.frame_control.pan_id_compression);
    assert_eq!(header.dst_address, Address::Short(ShortAddress(0x0000)));
    assert_eq!(header.src_pan_id, Some(PanId(0xffff)));
    assert_eq!(header.src_address, Address::Short(ShortAddress(0x1234)));
    assert_eq!(frame.payload, &[0x04]);
}

#[test]
fn payload_length_is_total_minus_header_minus_fcs() {
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

                for payload_len in [0usize, 1, 127] {
                    let total = header_len(&fc) + payload_len + FCS_LEN;
                    let mut remaining = total;

                    let mut mpdu = std::vec::Vec::new();
                    mpdu.extend_from_slice(&fc.to_bytes());
                    mpdu.resize(total, 0xa5);

                    let mut reader = BufferReader::new(&mpdu);
                    let header = FrameHeader::decode(&mut reader, &mut remaining);

                    assert_eq!(header.frame_control, fc);
                    assert_eq!(remaining - FCS_LEN, payload_len);
                    assert_eq!(reader.remaining().len(), remaining);
                }
            }
        }
    }
}

#[test]
fn build_then_parse() {
    let payload = [0xde, 0xad, 0xbe, 0xef];
    let frame = FrameBuilder::new_data(&payload)
        .set_sequence_number(200)
        .set_dst_pan_id(PanId(0x0bad))
        .set_dst_address(Address::Short(ShortAddress(0x0001)))
        .set_src_pan_id(PanId(0x0f00))
        .set_src_address(Address::Extended(ExtendedAddress([9, 8, 7, 6, 5, 4, 3, 2])))
        .finalize()
        .unwrap();

    let mut buffer = vec![0u8; frame.buffer_len()];
    frame.emit(&mut BufferWriter::new(&mut buffer));

    let parsed = FrameRepr::parse(&buffer).unwrap();
    assert_eq!(parsed, frame);
}
