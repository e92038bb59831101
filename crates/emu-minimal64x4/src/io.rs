//! Timed receive channels and the serial transmit pacer.
//!
//! The PS/2 keyboard and the UART each feed one 8-bit receive register. A
//! host-side FIFO holds bytes that have "arrived on the wire" but not yet
//! been clocked in. A countdown models the wire time between bytes, and the
//! register is only refilled once the CPU has read the previous byte.

use std::collections::VecDeque;

/// Cycles between PS/2 datagrams (2 ms at 8 MHz).
pub const KEYBOARD_DELAY: u32 = 16_000;
/// Cycles per received UART byte (11 bits at 16 cycles per bit).
pub const SERIAL_BYTE_DELAY: u32 = 176;
/// Cycles after a received line feed (10 ms at 8 MHz).
pub const SERIAL_LINE_DELAY: u32 = 80_000;
/// Cycles the UART needs to shift out one byte.
pub const SERIAL_TX_DELAY: u32 = 176;

/// Keyboard FIFO depth. Far beyond what a typist can fill in one frame.
pub const KEYBOARD_QUEUE_CAPACITY: usize = 256;
/// Serial FIFO depth. Holds a whole uploaded text file.
pub const SERIAL_QUEUE_CAPACITY: usize = 1 << 20;

/// Value of an empty receive register.
const IDLE_HOLD: u8 = 0xFF;

const LINE_FEED: u8 = 0x0A;

/// One receive channel: FIFO, hold register, ready flag and wire timer.
#[derive(Debug, Clone)]
pub struct IoChannel {
    name: &'static str,
    pending: VecDeque<u8>,
    capacity: usize,
    hold: u8,
    ready: bool,
    countdown: u32,
    byte_delay: u32,
    line_delay: Option<u32>,
}

impl IoChannel {
    /// A channel that delivers one byte every `byte_delay` cycles.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize, byte_delay: u32) -> Self {
        Self {
            name,
            pending: VecDeque::new(),
            capacity,
            hold: IDLE_HOLD,
            ready: false,
            countdown: byte_delay,
            byte_delay,
            line_delay: None,
        }
    }

    /// The PS/2 keyboard channel.
    #[must_use]
    pub fn keyboard() -> Self {
        Self::new("keyboard", KEYBOARD_QUEUE_CAPACITY, KEYBOARD_DELAY)
    }

    /// The UART receive channel, with the longer pause after a line feed.
    #[must_use]
    pub fn serial() -> Self {
        Self {
            line_delay: Some(SERIAL_LINE_DELAY),
            ..Self::new("serial", SERIAL_QUEUE_CAPACITY, SERIAL_BYTE_DELAY)
        }
    }

    /// Queue a byte for delivery. Returns false (and drops the byte) when
    /// the FIFO is full.
    pub fn enqueue(&mut self, byte: u8) -> bool {
        if self.pending.len() >= self.capacity {
            log::warn!("{}: FIFO full, dropped ${byte:02X}", self.name);
            return false;
        }
        self.pending.push_back(byte);
        true
    }

    /// Queue a run of bytes. Returns how many were accepted.
    pub fn enqueue_all(&mut self, bytes: &[u8]) -> usize {
        let room = self.capacity.saturating_sub(self.pending.len());
        let accepted = bytes.len().min(room);
        self.pending.extend(&bytes[..accepted]);
        if accepted < bytes.len() {
            log::warn!(
                "{}: FIFO full, dropped {} of {} bytes",
                self.name,
                bytes.len() - accepted,
                bytes.len()
            );
        }
        accepted
    }

    /// Discard everything not yet delivered.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Advance the wire timer by one cycle.
    ///
    /// The timer only runs while a byte is waiting and the register is free,
    /// so a byte always spends exactly one delay period on the wire after
    /// the CPU frees the register.
    pub fn tick(&mut self) {
        if self.ready || self.pending.is_empty() {
            return;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        if let Some(byte) = self.pending.pop_front() {
            self.hold = byte;
            self.ready = true;
            self.countdown = match self.line_delay {
                Some(delay) if byte == LINE_FEED => delay,
                _ => self.byte_delay,
            };
        }
    }

    /// CPU read of the receive register: returns the held byte and frees
    /// the register.
    pub fn take(&mut self) -> u8 {
        let byte = self.hold;
        self.hold = IDLE_HOLD;
        self.ready = false;
        byte
    }

    /// A byte is waiting in the receive register.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// Receive register contents, without reading it.
    #[must_use]
    pub fn hold(&self) -> u8 {
        self.hold
    }

    /// Bytes queued behind the receive register.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Cycles left before the next byte can land.
    #[must_use]
    pub fn countdown(&self) -> u32 {
        self.countdown
    }
}

/// Serial transmit side: paces outgoing bytes and captures them for the host.
#[derive(Debug, Clone, Default)]
pub struct SerialTransmitter {
    countdown: u32,
    output: Vec<u8>,
    overruns: u64,
}

impl SerialTransmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    /// Start shifting out `byte`. Sending while the previous byte is still
    /// on the wire counts as an overrun; the byte is captured regardless.
    pub fn send(&mut self, byte: u8) {
        if self.countdown > 0 {
            self.overruns += 1;
            log::warn!(
                "serial: transmit overrun, ${byte:02X} sent with {} cycles left",
                self.countdown
            );
        }
        self.output.push(byte);
        self.countdown = SERIAL_TX_DELAY;
    }

    /// The previous byte is still being shifted out.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.countdown > 0
    }

    #[must_use]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Drain the bytes sent since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}
