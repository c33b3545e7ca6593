//! Code entry: turns touch samples into a digit sequence.
//!
//! Two pieces:
//!
//! - [`TouchEdgeDetector`] compares consecutive 8-bit touch samples and
//!   yields sensor indices (1–8) that went from released to touched.
//! - [`InputAccumulator`] appends those indices as decimal digits and
//!   hands out the code once it reaches [`CODE_LENGTH`].
//!
//! ```text
//!  poll() ──▶ 0b0000_0101 ──▶ [1, 3] ──▶ "13" ──▶ ... ──▶ "1342" ──▶ evaluate
//! ```

use core::fmt;

/// Number of digits in a complete code.
pub const CODE_LENGTH: usize = 4;

/// Highest sensor index on the keypad (CAP1188 has 8 inputs).
pub const MAX_SENSOR_INDEX: u8 = 8;

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// A digit sequence entered on the keypad.
///
/// Deliberately not `Display`-formatted into logs by the state machine:
/// only the authority report carries the digits.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Code(heapless::String<CODE_LENGTH>);

impl Code {
    pub fn new() -> Self {
        Self(heapless::String::new())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.0.len() >= CODE_LENGTH
    }

    /// Compare against the secret without short-circuiting on the first
    /// differing digit.
    pub fn matches(&self, secret: &str) -> bool {
        let a = self.0.as_bytes();
        let b = secret.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code(len={})", self.0.len())
    }
}

/// `c` is a digit the keypad can produce (`'1'..='8'`).
pub fn is_keypad_digit(c: char) -> bool {
    let max = char::from(b'0' + MAX_SENSOR_INDEX);
    ('1'..=max).contains(&c)
}

/// A string that is not exactly [`CODE_LENGTH`] keypad digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCode;

impl fmt::Display for InvalidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code must be {} digits in 1-{}", CODE_LENGTH, MAX_SENSOR_INDEX)
    }
}

/// Parses a complete code, e.g. one read back from a dashboard log.
impl TryFrom<&str> for Code {
    type Error = InvalidCode;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.len() != CODE_LENGTH || !s.chars().all(is_keypad_digit) {
            return Err(InvalidCode);
        }
        let mut code = Code::new();
        code.0.push_str(s).map_err(|()| InvalidCode)?;
        Ok(code)
    }
}

// ---------------------------------------------------------------------------
// Input accumulator
// ---------------------------------------------------------------------------

/// Builds a [`Code`] one touch at a time.
#[derive(Debug, Default)]
pub struct InputAccumulator {
    code: Code,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self { code: Code::new() }
    }

    /// Append the digit for `sensor_index` (1–8).
    ///
    /// Returns `false` without touching state when the index is out of
    /// range or the code is already complete and awaiting evaluation.
    pub fn record_touch(&mut self, sensor_index: u8) -> bool {
        if !(1..=MAX_SENSOR_INDEX).contains(&sensor_index) || self.code.is_complete() {
            return false;
        }
        self.code.0.push(char::from(b'0' + sensor_index)).is_ok()
    }

    /// Return and clear the code once it is complete.
    pub fn take_if_complete(&mut self) -> Option<Code> {
        if self.code.is_complete() {
            Some(core::mem::take(&mut self.code))
        } else {
            None
        }
    }

    /// Digits entered so far.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Discard any partial entry.
    pub fn clear(&mut self) {
        self.code = Code::new();
    }
}

// ---------------------------------------------------------------------------
// Edge detection
// ---------------------------------------------------------------------------

/// Yields sensors that were pressed since the previous sample.
///
/// A finger held on a pad registers once; it has to be lifted before the
/// same pad counts again.
#[derive(Debug, Default)]
pub struct TouchEdgeDetector {
    previous: u8,
}

impl TouchEdgeDetector {
    pub fn new() -> Self {
        Self { previous: 0 }
    }

    /// Feed a new sample; returns the newly-pressed sensor indices in
    /// ascending order.
    pub fn update(&mut self, sample: u8) -> NewPresses {
        let pressed = sample & !self.previous;
        self.previous = sample;
        NewPresses { mask: pressed, bit: 0 }
    }

    /// Forget the previous sample (all pads considered released).
    pub fn reset(&mut self) {
        self.previous = 0;
    }
}

/// Iterator over sensor indices (1–8) set in a press mask.
#[derive(Debug, Clone)]
pub struct NewPresses {
    mask: u8,
    bit: u8,
}

impl Iterator for NewPresses {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.bit < MAX_SENSOR_INDEX {
            let i = self.bit;
            self.bit += 1;
            if self.mask & (1 << i) != 0 {
                return Some(i + 1);
            }
        }
        None
    }
}
