//! Inbound command queue.
//!
//! Raw command payloads are produced by the BLE GATT write callback, which
//! runs on the Bluedroid host task — not on the main control loop. To keep
//! every `EventLog` under a single writer, payloads are funnelled through
//! this lock-free SPSC ring and drained by the main loop, which parses and
//! dispatches one command to completion before taking the next.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ BLE write cb     │────▶│ Payload ring │────▶│  Main loop   │
//! │ (Bluedroid task) │     │  (lock-free) │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum pending payloads. Power of 2 for efficient ring modulo.
const QUEUE_CAP: usize = 8;

/// Longest accepted payload. The largest well-formed command is a
/// full `SIMLOG` (14 entries ≈ 94 bytes); JSON commands are shorter.
pub const MAX_PAYLOAD_LEN: usize = 192;

/// One queue slot: a length-tagged byte buffer, `Copy` so slots move in
/// and out of the ring without taking references to the static buffer.
#[derive(Clone, Copy)]
pub struct Payload {
    len: u8,
    bytes: [u8; MAX_PAYLOAD_LEN],
}

impl Payload {
    const EMPTY: Payload = Payload {
        len: 0,
        bytes: [0; MAX_PAYLOAD_LEN],
    };

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// BLE task writes (produce), main loop reads (consume).
// Uses atomic head/tail indices.  The buffer is intentionally
// kept in a static so the GATT callback can access it.

static QUEUE_HEAD: AtomicU8 = AtomicU8::new(0);
static QUEUE_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: PAYLOAD_BUFFER is accessed exclusively under the SPSC discipline.
// Producer (push_payload): Bluedroid callback task — one writer.
// Consumer (pop_payload): main-loop task — one reader.
// Slots are plain `Copy` data moved by value; the acquire/release pairs on
// head/tail order the slot contents with the index updates.
static mut PAYLOAD_BUFFER: [Payload; QUEUE_CAP] = [Payload::EMPTY; QUEUE_CAP];

/// Push a raw payload into the queue.
/// Returns `false` if the queue is full or the payload is oversized
/// (payload dropped — the control loop must never block the radio task).
pub fn push_payload(data: &[u8]) -> bool {
    if data.is_empty() || data.len() > MAX_PAYLOAD_LEN {
        return false;
    }

    let head = QUEUE_HEAD.load(Ordering::Relaxed);
    let tail = QUEUE_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop payload.
    }

    let mut slot = Payload::EMPTY;
    slot.bytes[..data.len()].copy_from_slice(data);
    slot.len = data.len() as u8;

    // SAFETY: only the single producer writes this slot, and the
    // Release store below publishes it to the consumer.
    unsafe {
        PAYLOAD_BUFFER[usize::from(head)] = slot;
    }

    QUEUE_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next payload from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_payload() -> Option<Payload> {
    let tail = QUEUE_TAIL.load(Ordering::Relaxed);
    let head = QUEUE_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: the slot was published by the producer's Release store and
    // is copied out by value before the tail advances.
    let payload = unsafe { PAYLOAD_BUFFER[usize::from(tail)] };
    QUEUE_TAIL.store((tail + 1) % QUEUE_CAP as u8, Ordering::Release);

    Some(payload)
}

/// Drain all pending payloads into a callback, FIFO order.
pub fn drain_payloads(mut handler: impl FnMut(&[u8])) {
    while let Some(payload) = pop_payload() {
        handler(payload.as_bytes());
    }
}

/// Check if the queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = QUEUE_TAIL.load(Ordering::Relaxed);
    let head = QUEUE_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending payloads.
pub fn queue_len() -> usize {
    let head = usize::from(QUEUE_HEAD.load(Ordering::Relaxed));
    let tail = usize::from(QUEUE_TAIL.load(Ordering::Relaxed));
    (head + QUEUE_CAP - tail) % QUEUE_CAP
}
