//! Fixed-capacity byte ring
//!
//! One slot is always left empty so that full and empty are
//! distinguishable without a separate counter:
//!
//! - empty: `head == tail`
//! - full:  `(head + 1) % N == tail`
//!
//! The usable capacity is therefore `N - 1`.
//!
//! The ring itself is not synchronized. Producer and consumer run in
//! different interrupt contexts, so every access goes through the
//! critical section owned by [`SharedTransmitter`](crate::transmit::SharedTransmitter).

/// A contiguous run of unread bytes starting at the tail
///
/// The run never crosses the physical end of the storage array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Run {
    /// Index of the first byte (always the tail at peek time)
    pub offset: usize,
    /// Number of bytes, at least 1
    pub len: usize,
}

/// Fixed-capacity circular byte buffer
///
/// # Type Parameters
///
/// - `N`: Number of storage slots. Usable capacity is `N - 1`. Must be >= 2.
pub struct CircularBuffer<const N: usize> {
    storage: [u8; N],
    /// Next slot to write (owned by the producer)
    head: usize,
    /// Oldest unread slot (owned by the consumer, bumped by the producer on eviction)
    tail: usize,
}

impl<const N: usize> Default for CircularBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CircularBuffer<N> {
    /// Create an empty buffer
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2.
    pub const fn new() -> Self {
        assert!(N >= 2, "ring buffer must have at least 2 slots (1 usable)");

        Self {
            storage: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Reset head and tail to 0, discarding all unread bytes
    pub fn init(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Number of storage slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Write position
    pub fn head(&self) -> usize {
        self.head
    }

    /// Read position
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Number of unread bytes, always in `0..=N-1`
    pub fn count(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    /// Check if there are no unread bytes
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Check if the next write would evict a byte
    pub fn is_full(&self) -> bool {
        (self.head + 1) % N == self.tail
    }

    /// Append a byte, evicting the oldest unread byte if the ring is full
    ///
    /// Never fails and never blocks. Returns `true` if a byte was evicted.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        let evicted = self.is_full();
        if evicted {
            self.tail = (self.tail + 1) % N;
        }

        self.storage[self.head] = byte;
        self.head = (self.head + 1) % N;
        evicted
    }

    /// Append every byte of `bytes`
    ///
    /// Returns the number of older bytes evicted to make room.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let mut evicted = 0;
        for &byte in bytes {
            if self.write_byte(byte) {
                evicted += 1;
            }
        }
        evicted
    }

    /// Longest run of unread bytes starting at the tail that does not
    /// cross the physical end of the storage
    ///
    /// Returns `None` when the ring is empty. When the unread data wraps,
    /// only the part up to the end of storage is returned; the remainder
    /// is picked up by the next peek after [`advance`](Self::advance).
    pub fn peek_contiguous_run(&self) -> Option<Run> {
        if self.is_empty() {
            return None;
        }

        let len = if self.tail < self.head {
            self.head - self.tail
        } else {
            N - self.tail
        };

        Some(Run {
            offset: self.tail,
            len,
        })
    }

    /// Bytes covered by a run
    ///
    /// This is the memory region handed to the block-transfer engine.
    /// The range is clamped to the storage, so a stale run cannot index
    /// out of bounds.
    pub fn run_bytes(&self, run: Run) -> &[u8] {
        let start = run.offset.min(N);
        let end = start.saturating_add(run.len).min(N);
        &self.storage[start..end]
    }

    /// Move the tail forward by `n` bytes
    ///
    /// `n` must not exceed the length of the run peeked last; this is
    /// not checked, and a larger value corrupts the logical count.
    pub fn advance(&mut self, n: usize) {
        self.tail = (self.tail + n % N) % N;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Drain by repeated (peek, advance), the way the transmitter does
    fn drain<const N: usize>(buf: &mut CircularBuffer<N>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(run) = buf.peek_contiguous_run() {
            out.extend_from_slice(buf.run_bytes(run));
            buf.advance(run.len);
        }
        out
    }

    #[test]
    fn test_two_bytes_then_drain() {
        let mut buf: CircularBuffer<4> = CircularBuffer::new();
        buf.write_byte(b'A');
        buf.write_byte(b'B');
        assert_eq!(buf.head(), 2);
        assert_eq!(buf.tail(), 0);
        assert_eq!(buf.count(), 2);

        let run = buf.peek_contiguous_run().unwrap();
        assert_eq!(run, Run { offset: 0, len: 2 });
        assert_eq!(buf.run_bytes(run), b"AB");

        buf.advance(2);
        assert_eq!(buf.tail(), 2);
        assert_eq!(buf.count(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overwrite_when_full() {
        let mut buf: CircularBuffer<4> = CircularBuffer::new();
        assert!(!buf.write_byte(b'a'));
        assert!(!buf.write_byte(b'b'));
        assert!(!buf.write_byte(b'c'));
        assert!(buf.is_full());
        assert_eq!(buf.count(), 3);

        // Fourth write evicts 'a'
        assert!(buf.write_byte(b'd'));
        assert_eq!(buf.tail(), 1);
        assert_eq!(buf.count(), 3);
        assert!(buf.is_full());

        assert_eq!(drain(&mut buf), b"bcd");
    }

    #[test]
    fn test_empty_peek() {
        let buf: CircularBuffer<8> = CircularBuffer::new();
        assert_eq!(buf.peek_contiguous_run(), None);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
    }

    #[test]
    fn test_run_stops_at_physical_end() {
        let mut buf: CircularBuffer<4> = CircularBuffer::new();
        buf.write(b"xyz");
        buf.advance(3); // head = tail = 3
        buf.write(b"12"); // '1' at 3, '2' at 0

        let first = buf.peek_contiguous_run().unwrap();
        assert_eq!(first, Run { offset: 3, len: 1 });
        assert_eq!(buf.run_bytes(first), b"1");
        buf.advance(first.len);

        let second = buf.peek_contiguous_run().unwrap();
        assert_eq!(second, Run { offset: 0, len: 1 });
        assert_eq!(buf.run_bytes(second), b"2");
        buf.advance(second.len);

        assert!(buf.is_empty());
    }

    #[test]
    fn test_write_reports_evictions() {
        let mut buf: CircularBuffer<4> = CircularBuffer::new();
        assert_eq!(buf.write(b"hello"), 2);
        assert_eq!(drain(&mut buf), b"llo");
    }

    #[test]
    fn test_init_discards() {
        let mut buf: CircularBuffer<4> = CircularBuffer::new();
        buf.write(b"ab");
        buf.init();
        assert!(buf.is_empty());
        assert_eq!(buf.head(), 0);
        assert_eq!(buf.tail(), 0);
    }

    #[test]
    fn test_stale_run_is_clamped() {
        let buf: CircularBuffer<4> = CircularBuffer::new();
        assert!(buf.run_bytes(Run { offset: 3, len: 9 }).len() <= 1);
        assert!(buf.run_bytes(Run { offset: 9, len: 1 }).is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Write(u8),
        Drain(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::Write),
            1 => (0usize..8).prop_map(Op::Drain),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_invariant(ops in proptest::collection::vec(op(), 0..200)) {
            let mut buf: CircularBuffer<5> = CircularBuffer::new();
            for op in ops {
                match op {
                    Op::Write(b) => { buf.write_byte(b); }
                    Op::Drain(max) => {
                        if let Some(run) = buf.peek_contiguous_run() {
                            prop_assert!(run.offset + run.len <= buf.capacity());
                            buf.advance(run.len.min(max));
                        }
                    }
                }
                prop_assert!(buf.count() <= buf.capacity() - 1);
                prop_assert_eq!(buf.count(), (buf.head() + 5 - buf.tail()) % 5);
                prop_assert!(buf.head() < 5 && buf.tail() < 5);
            }
        }

        #[test]
        fn prop_drain_matches_model(ops in proptest::collection::vec(op(), 0..200)) {
            // Reference model: a deque capped at N - 1 that drops its front on overflow
            let mut buf: CircularBuffer<7> = CircularBuffer::new();
            let mut model: VecDeque<u8> = VecDeque::new();
            let mut sent = Vec::new();
            let mut expected = Vec::new();

            for op in ops {
                match op {
                    Op::Write(b) => {
                        if model.len() == 6 {
                            model.pop_front();
                        }
                        model.push_back(b);
                        buf.write_byte(b);
                    }
                    Op::Drain(max) => {
                        if let Some(run) = buf.peek_contiguous_run() {
                            let take = run.len.min(max);
                            sent.extend_from_slice(&buf.run_bytes(run)[..take]);
                            buf.advance(take);
                            for _ in 0..take {
                                expected.push(model.pop_front().unwrap());
                            }
                        }
                    }
                }
            }

            sent.extend(drain(&mut buf));
            expected.extend(model.drain(..));
            prop_assert_eq!(sent, expected);
        }
    }
}
