//! Per-connection ordered reply queue.
//!
//! Replies are released strictly in the order they were queued. A reply that
//! is still sleeping at the front holds back everything behind it, even
//! replies that were ready earlier.

use std::collections::VecDeque;

use bytes::Bytes;

/// A rendered reply waiting for its turn on the wire.
#[derive(Debug, Clone)]
pub struct PendingReply {
    /// Per-connection reply number, starting at 1
    pub seq: u64,
    /// Fully serialized response
    pub bytes: Bytes,
    sleeping: bool,
}

impl PendingReply {
    /// A reply that can be written as soon as it reaches the front.
    pub fn ready(seq: u64, bytes: Bytes) -> Self {
        Self {
            seq,
            bytes,
            sleeping: false,
        }
    }

    /// A reply that waits for a delay timer before it can be written.
    pub fn sleeping(seq: u64, bytes: Bytes) -> Self {
        Self {
            seq,
            bytes,
            sleeping: true,
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}

/// What a flush would do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Nothing queued
    Idle,
    /// The front reply is still sleeping
    Blocked,
    /// The front reply can be written
    Flushing,
}

#[derive(Debug, Default)]
pub struct ReplyQueue {
    replies: VecDeque<PendingReply>,
}

impl ReplyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reply to the tail.
    pub fn enqueue(&mut self, reply: PendingReply) {
        self.replies.push_back(reply);
    }

    /// Marks the reply numbered `seq` as awake.
    ///
    /// Returns `false` if no such reply is queued (already discarded) or it
    /// was not sleeping.
    pub fn wake(&mut self, seq: u64) -> bool {
        match self.replies.iter_mut().find(|r| r.seq == seq) {
            Some(reply) if reply.sleeping => {
                reply.sleeping = false;
                true
            }
            _ => false,
        }
    }

    /// Pops replies from the front while they are awake, handing each one's
    /// bytes to `write`. Stops at the first sleeping reply, or when `write`
    /// returns `false`. Returns the number of replies released.
    pub fn flush<F>(&mut self, mut write: F) -> usize
    where
        F: FnMut(&PendingReply) -> bool,
    {
        let mut released = 0;

        while let Some(front) = self.replies.front() {
            if front.sleeping {
                break;
            }
            if !write(front) {
                break;
            }
            self.replies.pop_front();
            released += 1;
        }

        released
    }

    pub fn state(&self) -> QueueState {
        match self.replies.front() {
            None => QueueState::Idle,
            Some(r) if r.sleeping => QueueState::Blocked,
            Some(_) => QueueState::Flushing,
        }
    }

    /// Drops every queued reply, sleeping or not.
    pub fn clear(&mut self) -> usize {
        let dropped = self.replies.len();
        self.replies.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Sequence numbers currently queued, front first.
    pub fn pending_seqs(&self) -> Vec<u64> {
        self.replies.iter().map(|r| r.seq).collect()
    }
}
