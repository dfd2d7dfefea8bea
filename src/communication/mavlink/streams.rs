//! Telemetry Stream Groups
//!
//! Static table mapping named stream groups to the ordered message kinds they
//! carry. The table is compiled-in; only the per-group rate is operator
//! tunable (SR_* parameters, see [`crate::parameters::streams`]). The table is
//! consulted exclusively by the telemetry scheduler.

/// MAVLink v2 framing overhead: magic, length, incompat/compat flags, seq,
/// sysid, compid, 24-bit msgid, CRC
const FRAME_OVERHEAD: usize = 12;

/// Telemetry message kinds carried by the stream groups.
///
/// Each kind knows its fixed on-wire length so the scheduler can test the
/// transmit-buffer budget without serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    Heartbeat,
    SysStatus,
    PowerStatus,
    NavControllerOutput,
    GpsRaw,
    GlobalPosition,
    ServoOutputRaw,
    RcChannelsRaw,
    Attitude,
    RawImu,
    ScaledPressure,
    BatteryStatus,
    StatusText,
}

impl MsgKind {
    /// Maximum on-wire length in bytes (payload plus framing)
    pub const fn wire_len(self) -> usize {
        let payload = match self {
            MsgKind::Heartbeat => 9,
            MsgKind::SysStatus => 31,
            MsgKind::PowerStatus => 6,
            MsgKind::NavControllerOutput => 26,
            MsgKind::GpsRaw => 30,
            MsgKind::GlobalPosition => 28,
            MsgKind::ServoOutputRaw => 21,
            MsgKind::RcChannelsRaw => 22,
            MsgKind::Attitude => 28,
            MsgKind::RawImu => 26,
            MsgKind::ScaledPressure => 14,
            MsgKind::BatteryStatus => 36,
            MsgKind::StatusText => 51,
        };
        payload + FRAME_OVERHEAD
    }
}

/// Stream group identifiers, indexing both the table and the SR_* rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamId {
    RawSensors = 0,
    ExtendedStatus = 1,
    RcChannels = 2,
    RawController = 3,
    Position = 4,
    Extra1 = 5,
    Extra2 = 6,
    Extra3 = 7,
    Params = 8,
}

impl StreamId {
    /// Number of stream groups (rate slots)
    pub const COUNT: usize = 9;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One stream group: an ordered list of message kinds sent together
pub struct StreamEntry {
    pub id: StreamId,
    pub msgs: &'static [MsgKind],
}

/// Stream groups serviced by the scheduler, in send order.
///
/// Extra2 and Params carry a rate parameter but no table entry: the tracker
/// sends nothing in Extra2, and the parameter stream is drained by the
/// parameter protocol tooling outside this library.
pub const STREAM_TABLE: &[StreamEntry] = &[
    StreamEntry {
        id: StreamId::RawSensors,
        msgs: &[MsgKind::RawImu, MsgKind::ScaledPressure],
    },
    StreamEntry {
        id: StreamId::ExtendedStatus,
        msgs: &[
            MsgKind::SysStatus,
            MsgKind::PowerStatus,
            MsgKind::NavControllerOutput,
            MsgKind::GpsRaw,
        ],
    },
    StreamEntry {
        id: StreamId::RcChannels,
        msgs: &[MsgKind::RcChannelsRaw],
    },
    StreamEntry {
        id: StreamId::RawController,
        msgs: &[MsgKind::ServoOutputRaw],
    },
    StreamEntry {
        id: StreamId::Position,
        msgs: &[MsgKind::GlobalPosition],
    },
    StreamEntry {
        id: StreamId::Extra1,
        msgs: &[MsgKind::Attitude],
    },
    StreamEntry {
        id: StreamId::Extra3,
        msgs: &[MsgKind::BatteryStatus],
    },
];
