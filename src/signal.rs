//! Infrared signals as scancodes and their canonical text form `0xXXXXXXXX`.

use crate::Error;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    sync::OnceLock,
    time::{SystemTime, UNIX_EPOCH},
};

/// Scancode as reported by the kernel, already decoded from the IR protocol
pub type ScanCode = u32;

static SIGNAL_RE: OnceLock<Regex> = OnceLock::new();

fn signal_re() -> &'static Regex {
    SIGNAL_RE.get_or_init(|| {
        Regex::new(r"^0[xX][0-9a-fA-F]{8}$").expect("signal regex is valid")
    })
}

/// A signal which can be bound to a button. It always prints in the
/// canonical form: `0x` followed by eight uppercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signal(ScanCode);

impl Signal {
    pub fn scancode(self) -> ScanCode {
        self.0
    }
}

impl From<ScanCode> for Signal {
    fn from(scancode: ScanCode) -> Self {
        Signal(scancode)
    }
}

impl FromStr for Signal {
    type Err = Error;

    /// Hex digits and the `0x` prefix are accepted in either case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !signal_re().is_match(s) {
            return Err(Error::InvalidSignalFormat(s.to_owned()));
        }

        u32::from_str_radix(&s[2..], 16)
            .map(Signal)
            .map_err(|_| Error::InvalidSignalFormat(s.to_owned()))
    }
}

impl TryFrom<String> for Signal {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        signal.to_string()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Seconds since the unix epoch, as a float
pub fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// A scancode received from the infrared receiver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSample {
    pub scancode: ScanCode,
    /// When the sample was accepted, seconds since the unix epoch
    pub timestamp: f64,
}

impl SignalSample {
    pub fn new(scancode: ScanCode) -> Self {
        SignalSample {
            scancode,
            timestamp: now_seconds(),
        }
    }

    /// Random sample for exercising a front end without an infrared receiver
    pub fn simulated() -> Self {
        SignalSample::new(rand::thread_rng().gen_range(0x87EE_0000..=0x87EE_FFFF))
    }

    pub fn signal(&self) -> Signal {
        Signal(self.scancode)
    }

    /// Name for a signal which is not bound to anything
    pub fn label(&self) -> String {
        format!("IR_{:08X}", self.scancode)
    }
}
