//! GCS Link Driver
//!
//! Ties the dispatcher, the telemetry scheduler and the parameter store
//! together behind the two entry points the control loop calls:
//!
//! - [`GcsLink::update`] - regular servicing: heartbeat, queued status
//!   texts, due telemetry streams, for every attached channel
//! - [`GcsLink::handle_message`] - inbound routing; responses go out on the
//!   channel the packet arrived on
//!
//! [`GcsLink::delay_cb`] keeps the ground station alive during blocking
//! operations (sensor calibration): heartbeat and SYS_STATUS at 1 Hz, stream
//! servicing at 50 Hz and an "Initialising" banner every 5 s, with a guard
//! against recursive entry.
//!
//! All transmit errors are absorbed here; the stream scheduler's
//! backpressure handling retries on the next pass and response messages rely
//! on GCS-side protocol retries.

use crate::communication::mavlink::dispatcher::MessageDispatcher;
use crate::communication::mavlink::handlers::telemetry::{
    build_heartbeat, build_message, TelemetryScheduler, MAX_CHANNELS,
};
use crate::communication::mavlink::status_notifier::StatusNotifier;
use crate::communication::mavlink::streams::MsgKind;
use crate::communication::mavlink::transport::GcsChannel;
use crate::communication::mavlink::vehicle::VehicleFacade;
use crate::parameters::{ParamFlags, ParamValue, ParameterStore, StreamRateParams};
use mavlink::common::MavMessage;
use mavlink::MavHeader;

/// Target system id parameter; 0 locks onto the first vehicle heard
pub const SYSID_TARGET_PARAM: &str = "SYSID_TARGET";

const HEARTBEAT_INTERVAL_MS: u32 = 1000;
const DELAY_STREAM_INTERVAL_MS: u32 = 20;
const DELAY_BANNER_INTERVAL_MS: u32 = 5000;

/// Stamps outbound headers with this system's ids and a running sequence
pub struct OutboundSequencer {
    system_id: u8,
    component_id: u8,
    sequence: u8,
}

impl OutboundSequencer {
    pub const fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence: 0,
        }
    }

    /// Next header to transmit with; the sequence number wraps at 255
    pub fn next_header(&mut self) -> MavHeader {
        let header = MavHeader {
            system_id: self.system_id,
            component_id: self.component_id,
            sequence: self.sequence,
        };
        self.sequence = self.sequence.wrapping_add(1);
        header
    }
}

/// Cadence state for [`GcsLink::delay_cb`]
struct LoopTimers {
    last_1hz_ms: Option<u32>,
    last_50hz_ms: Option<u32>,
    last_5s_ms: Option<u32>,
    in_delay_cb: bool,
}

impl LoopTimers {
    const fn new() -> Self {
        Self {
            last_1hz_ms: None,
            last_50hz_ms: None,
            last_5s_ms: None,
            in_delay_cb: false,
        }
    }
}

pub struct GcsLink {
    dispatcher: MessageDispatcher,
    scheduler: TelemetryScheduler,
    params: ParameterStore,
    seq: OutboundSequencer,
    timers: LoopTimers,
    /// Per-channel heartbeat timestamps; a full channel stays due
    last_heartbeat_ms: [Option<u32>; MAX_CHANNELS],
}

impl GcsLink {
    /// Create a link with a freshly registered parameter store
    pub fn new(system_id: u8, component_id: u8) -> Self {
        let mut params = ParameterStore::new();
        // The empty store has room for every builtin parameter
        let _ = StreamRateParams::register_defaults(&mut params);
        let _ = params.register(SYSID_TARGET_PARAM, ParamValue::Int(0), ParamFlags::empty());
        Self::from_store(system_id, component_id, params)
    }

    /// Create a link over a pre-loaded parameter store.
    ///
    /// A non-zero `SYSID_TARGET` pre-configures the target lock; the inbound
    /// filter itself is re-read from the store on every packet, so a live
    /// parameter write takes effect immediately.
    pub fn from_store(system_id: u8, component_id: u8, params: ParameterStore) -> Self {
        let sysid_target = Self::sysid_target_of(&params);

        Self {
            dispatcher: MessageDispatcher::new(sysid_target),
            scheduler: TelemetryScheduler::new(),
            params,
            seq: OutboundSequencer::new(system_id, component_id),
            timers: LoopTimers::new(),
            last_heartbeat_ms: [None; MAX_CHANNELS],
        }
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    /// Operator status-text queue; drained on the next servicing pass
    pub fn notifier(&mut self) -> &mut StatusNotifier {
        self.dispatcher.notifier()
    }

    /// Current SYSID_TARGET value, clamped to the u8 wire range
    fn sysid_target_of(params: &ParameterStore) -> u8 {
        params
            .get_int(SYSID_TARGET_PARAM)
            .unwrap_or(0)
            .clamp(0, u8::MAX as i32) as u8
    }

    fn elapsed(last_ms: Option<u32>, interval_ms: u32, now_ms: u32) -> bool {
        match last_ms {
            None => true,
            Some(t) => now_ms.wrapping_sub(t) >= interval_ms,
        }
    }

    /// Regular servicing pass; call from the main loop.
    ///
    /// # Arguments
    ///
    /// * `now_ms` - Current time in milliseconds
    /// * `facade` - Vehicle state source
    /// * `channels` - Attached GCS channels, at most [`MAX_CHANNELS`]
    pub fn update<F, C>(&mut self, now_ms: u32, facade: &F, channels: &mut [C])
    where
        F: VehicleFacade,
        C: GcsChannel,
    {
        let rates = StreamRateParams::from_store(&self.params);

        for (chan, channel) in channels.iter_mut().enumerate().take(MAX_CHANNELS) {
            if Self::elapsed(self.last_heartbeat_ms[chan], HEARTBEAT_INTERVAL_MS, now_ms)
                && channel.txspace() >= MsgKind::Heartbeat.wire_len()
                && channel
                    .send(&self.seq.next_header(), &build_heartbeat(facade))
                    .is_ok()
            {
                self.last_heartbeat_ms[chan] = Some(now_ms);
            }

            self.scheduler
                .data_stream_send(chan, channel, facade, &rates, &mut self.seq, now_ms);
        }

        self.flush_status_texts(channels);
    }

    /// Route one inbound message and transmit any responses.
    ///
    /// # Arguments
    ///
    /// * `chan` - Index of the channel the packet arrived on
    /// * `header` - The sender's header
    /// * `msg` - The decoded message
    /// * `facade` - Vehicle state and actions
    /// * `channels` - Attached GCS channels
    pub fn handle_message<F, C>(
        &mut self,
        chan: usize,
        header: &MavHeader,
        msg: &MavMessage,
        facade: &mut F,
        channels: &mut [C],
    ) where
        F: VehicleFacade,
        C: GcsChannel,
    {
        // The filter tracks the live parameter value
        self.dispatcher
            .set_sysid_filter(Self::sysid_target_of(&self.params));

        let responses = self.dispatcher.handle_message(header, msg, facade);

        if let Some(channel) = channels.get_mut(chan) {
            for response in &responses {
                // A response lost to a full buffer is recovered by the GCS
                // retrying its request
                let _ = channel.send(&self.seq.next_header(), response);
            }
        }

        self.flush_status_texts(channels);
    }

    /// Keep the GCS link alive while a blocking operation runs.
    ///
    /// Safe against recursive entry: a nested call returns immediately.
    pub fn delay_cb<F, C>(&mut self, now_ms: u32, facade: &F, channels: &mut [C])
    where
        F: VehicleFacade,
        C: GcsChannel,
    {
        if self.timers.in_delay_cb {
            return;
        }
        self.timers.in_delay_cb = true;

        if Self::elapsed(self.timers.last_1hz_ms, HEARTBEAT_INTERVAL_MS, now_ms) {
            self.timers.last_1hz_ms = Some(now_ms);
            for channel in channels.iter_mut() {
                if channel.txspace() >= MsgKind::Heartbeat.wire_len() {
                    let _ = channel.send(&self.seq.next_header(), &build_heartbeat(facade));
                }
                if channel.txspace() >= MsgKind::SysStatus.wire_len() {
                    if let Some(msg) = build_message(MsgKind::SysStatus, facade, now_ms) {
                        let _ = channel.send(&self.seq.next_header(), &msg);
                    }
                }
            }
        }

        if Self::elapsed(self.timers.last_50hz_ms, DELAY_STREAM_INTERVAL_MS, now_ms) {
            self.timers.last_50hz_ms = Some(now_ms);
            let rates = StreamRateParams::from_store(&self.params);
            for (chan, channel) in channels.iter_mut().enumerate().take(MAX_CHANNELS) {
                self.scheduler
                    .data_stream_send(chan, channel, facade, &rates, &mut self.seq, now_ms);
            }
        }

        if Self::elapsed(self.timers.last_5s_ms, DELAY_BANNER_INTERVAL_MS, now_ms) {
            self.timers.last_5s_ms = Some(now_ms);
            self.dispatcher.notifier().send_info("Initialising");
        }

        self.flush_status_texts(channels);
        self.timers.in_delay_cb = false;
    }

    /// Drain queued status texts to every channel with room
    fn flush_status_texts<C: GcsChannel>(&mut self, channels: &mut [C]) {
        for text in self.dispatcher.notifier().take_pending() {
            for channel in channels.iter_mut() {
                if channel.txspace() < MsgKind::StatusText.wire_len() {
                    continue;
                }
                let _ = channel.send(
                    &self.seq.next_header(),
                    &MavMessage::STATUSTEXT(text.clone()),
                );
            }
        }
    }
}
