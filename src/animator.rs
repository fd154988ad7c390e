//! Loading-message animator.
//!
//! A pure state machine: nothing here sleeps or spawns. Callers feed it the
//! elapsed load time (directly or through a [`Clock`]) and read back the text
//! to show. The spinner in the binary polls it on a short interval.
//!
//! Timeline: the original message stays untouched for the first 3 s, is then
//! erased one character per 20 ms, after which a randomly chosen message is
//! typed at 30 ms per character, held for 2 s, erased, followed by a 500 ms
//! gap, and the next message in the pool is typed.

use rand::Rng;
use std::time::{Duration, Instant};

pub const START_DELAY: Duration = Duration::from_millis(3000);
pub const TYPE_INTERVAL: Duration = Duration::from_millis(30);
pub const ERASE_INTERVAL: Duration = Duration::from_millis(20);
pub const PAUSE_AFTER_TYPING: Duration = Duration::from_millis(2000);
pub const PAUSE_AFTER_ERASE: Duration = Duration::from_millis(500);

pub const DEFAULT_MESSAGE: &str = "Analyzing security posture...";

pub const MESSAGE_POOL: &[&str] = &[
    "Checking vendor reputation...",
    "Analyzing vulnerability history...",
    "Reviewing compliance certifications...",
    "Evaluating security controls...",
    "Searching CVE databases...",
    "Reviewing incident disclosures...",
];

/// Source of elapsed load time.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time since construction.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Chooses the first message once the original has been erased.
pub trait MessagePicker: Send {
    /// Returns an index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RandomPicker;

impl MessagePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ErasingOriginal,
    Typing,
    PausedAfterTyping,
    ErasingMessage,
    PausedAfterErase,
}

pub struct LoadingAnimator {
    original: String,
    messages: Vec<String>,
    picker: Box<dyn MessagePicker>,
    phase: Phase,
    message_index: usize,
    char_index: usize,
    /// Elapsed time at which the next step fires.
    next_at: Duration,
}

impl LoadingAnimator {
    pub fn new(original: impl Into<String>) -> Self {
        Self::with_messages(original, MESSAGE_POOL.iter().map(|m| m.to_string()).collect())
    }

    pub fn with_messages(original: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            original: original.into(),
            messages,
            picker: Box::new(RandomPicker),
            phase: Phase::Idle,
            message_index: 0,
            char_index: 0,
            next_at: START_DELAY,
        }
    }

    pub fn with_picker(mut self, picker: impl MessagePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn message_index(&self) -> usize {
        self.message_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    /// Reads the clock and advances.
    pub fn tick(&mut self, clock: &dyn Clock) -> String {
        self.advance_to(clock.elapsed());
        self.text()
    }

    /// Runs every step whose deadline is at or before `elapsed`.
    pub fn advance_to(&mut self, elapsed: Duration) {
        // Without a pool there is nothing to switch to; keep the original.
        if self.messages.is_empty() {
            return;
        }

        while self.next_at <= elapsed {
            self.step();
        }
    }

    /// The text to display right now.
    pub fn text(&self) -> String {
        match self.phase {
            Phase::Idle => self.original.clone(),
            Phase::ErasingOriginal => prefix(&self.original, self.char_index),
            Phase::Typing | Phase::PausedAfterTyping | Phase::ErasingMessage => {
                prefix(self.current_message(), self.char_index)
            }
            Phase::PausedAfterErase => String::new(),
        }
    }

    fn current_message(&self) -> &str {
        &self.messages[self.message_index]
    }

    fn current_len(&self) -> usize {
        self.current_message().chars().count()
    }

    fn step(&mut self) {
        match self.phase {
            Phase::Idle => {
                self.char_index = self.original.chars().count();
                if self.char_index == 0 {
                    self.begin_first_message();
                } else {
                    self.phase = Phase::ErasingOriginal;
                    self.next_at += ERASE_INTERVAL;
                }
            }
            Phase::ErasingOriginal => {
                self.char_index -= 1;
                if self.char_index == 0 {
                    self.begin_first_message();
                } else {
                    self.next_at += ERASE_INTERVAL;
                }
            }
            Phase::Typing => {
                if self.char_index < self.current_len() {
                    self.char_index += 1;
                }
                if self.char_index >= self.current_len() {
                    self.phase = Phase::PausedAfterTyping;
                    self.next_at += PAUSE_AFTER_TYPING;
                } else {
                    self.next_at += TYPE_INTERVAL;
                }
            }
            Phase::PausedAfterTyping => {
                self.phase = Phase::ErasingMessage;
                self.next_at += ERASE_INTERVAL;
            }
            Phase::ErasingMessage => {
                self.char_index = self.char_index.saturating_sub(1);
                if self.char_index == 0 {
                    self.phase = Phase::PausedAfterErase;
                    self.next_at += PAUSE_AFTER_ERASE;
                } else {
                    self.next_at += ERASE_INTERVAL;
                }
            }
            Phase::PausedAfterErase => {
                self.message_index = (self.message_index + 1) % self.messages.len();
                self.phase = Phase::Typing;
                self.next_at += TYPE_INTERVAL;
            }
        }
    }

    fn begin_first_message(&mut self) {
        let len = self.messages.len();
        self.message_index = self.picker.pick(len).min(len - 1);
        self.char_index = 0;
        self.phase = Phase::Typing;
        self.next_at += TYPE_INTERVAL;
    }
}

fn prefix(s: &str, chars: usize) -> String {
    s.chars().take(chars).collect()
}
