//! Protocol constants shared across the ACN family (ANSI E1.17-2015,
//! ANSI E1.31-2018, ANSI E1.33-2019).

/// The length of the PDU flags and length field in bytes when the 12 bit
/// length encoding is used, as per ANSI E1.17-2015 Section 2.4.1.
pub const PDU_LENGTH_FLAGS_LENGTH: usize = 2;

/// The length of the PDU flags and length field in bytes when the 20 bit
/// length encoding is used (LFLAG set), as per ANSI E1.17-2015 Section 2.4.1.
pub const PDU_EXTENDED_LENGTH_FLAGS_LENGTH: usize = 3;

/// The largest PDU length representable with the 12 bit length encoding.
pub const PDU_TWELVE_BIT_LENGTH_MAX: usize = 0x0fff;

/// The largest PDU length representable with the 20 bit length encoding.
pub const PDU_TWENTY_BIT_LENGTH_MAX: usize = 0x000f_ffff;

/// Bit mask for the low nibble of the first flags/length byte, which holds
/// the most significant bits of the length field.
pub const PDU_LENGTH_HIGH_MASK: u8 = 0x0f;

/// The flags nibble carried by every well formed ACN PDU this library emits:
/// VFLAG, HFLAG and DFLAG set, LFLAG clear. As per ANSI E1.31-2018 Section 4
/// Table 4-1, 4-2, 4-3.
pub const ACN_PDU_FLAGS: u8 = 0x70;

/// The ACN root layer preamble size field value, as per ANSI E1.31-2018
/// Section 5.1. This doubles as the total size in bytes of the UDP preamble.
pub const PREAMBLE_SIZE: u16 = 0x0010;

/// The ACN root layer postamble size field value, as per ANSI E1.31-2018
/// Section 5.2.
pub const POSTAMBLE_SIZE: u16 = 0x0;

/// The ACN packet identifier, 0x41 0x53 0x43 0x2d 0x45 0x31 0x2e 0x31 0x37
/// 0x00 0x00 0x00 ("ASC-E1.17" plus three null bytes), as per
/// ANSI E1.31-2018 Section 5.3.
pub const ACN_PACKET_IDENTIFIER: [u8; 12] = [0x41, 0x53, 0x43, 0x2d, 0x45, 0x31, 0x2e, 0x31, 0x37, 0x00, 0x00, 0x00];

/// The length of the CID field in bytes, as per ANSI E1.31-2018 Section 4
/// Table 4-1, 4-2, 4-3.
pub const CID_FIELD_LENGTH: usize = 16;

/// The root layer vector identifying an E1.31 (rev 2 draft) PDU block,
/// kept for interoperability with pre-ratification gear.
pub const VECTOR_ROOT_E131_REV2: u32 = 0x0000_0003;

/// The root layer vector identifying an ANSI E1.31-2018 data PDU block, as
/// defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_ROOT_E131: u32 = 0x0000_0004;

/// The root layer vector identifying an ANSI E1.33 PDU block, as defined in
/// ANSI E1.33-2019 Appendix A.
pub const VECTOR_ROOT_E133: u32 = 0x0000_0008;

/// The root layer vector identifying an LLRP PDU block, as defined in
/// ANSI E1.33-2019 Appendix A.
pub const VECTOR_ROOT_LLRP: u32 = 0x0000_000a;

/// The E1.31 framing layer vector identifying a DMX data packet, as defined
/// in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_E131_DATA_PACKET: u32 = 0x0000_0002;

/// The E1.31 framing layer vector identifying a synchronisation packet, as
/// defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_E131_EXTENDED_SYNCHRONIZATION: u32 = 0x0000_0001;

/// The DMP layer vector identifying a set property message, as defined in
/// ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;

/// The LLRP vector identifying a probe request, as defined in
/// ANSI E1.33-2019 Appendix A.
pub const VECTOR_LLRP_PROBE_REQUEST: u32 = 0x0000_0001;

/// The LLRP vector identifying a probe reply, as defined in
/// ANSI E1.33-2019 Appendix A.
pub const VECTOR_LLRP_PROBE_REPLY: u32 = 0x0000_0002;

/// The LLRP vector identifying an RDM command, as defined in
/// ANSI E1.33-2019 Appendix A.
pub const VECTOR_LLRP_RDM_CMD: u32 = 0x0000_0003;

/// The RDM start code, used as the one byte vector of an RDM PDU, as per
/// ANSI E1.20 and ANSI E1.33-2019 Section 5.5.
pub const VECTOR_RDM_CMD_RDM_DATA: u8 = 0xcc;

/// The port used for E1.31/SDT traffic, as defined in ANSI E1.31-2018
/// Appendix A: Defined Parameters (Normative).
pub const ACN_SDT_MULTICAST_PORT: u16 = 5568;

/// The port used for E1.33/RDMnet traffic, as defined in ANSI E1.33-2019
/// Appendix A.
pub const E133_PORT: u16 = 5569;

/// The length of the E1.31 framing layer source name field in bytes, as per
/// ANSI E1.31-2018 Section 4, Table 4-1, 4-2, 4-3.
pub const E131_SOURCE_NAME_FIELD_LENGTH: usize = 64;

/// The length of the source name field in the rev 2 draft E1.31 framing
/// layer in bytes.
pub const E131_REV2_SOURCE_NAME_FIELD_LENGTH: usize = 32;

/// The bit mask for the preview-data option within the E1.31 options field,
/// as per ANSI E1.31-2018 Section 6.2.6.
pub const E131_PREVIEW_DATA_OPTION_BIT_MASK: u8 = 0b1000_0000;

/// The bit mask for the stream-termination option within the E1.31 options
/// field, as per ANSI E1.31-2018 Section 6.2.6.
pub const E131_STREAM_TERMINATION_OPTION_BIT_MASK: u8 = 0b0100_0000;
