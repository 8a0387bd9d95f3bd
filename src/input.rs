//! Read scancodes from a linux input device such as `/dev/input/event1`.
//!
//! The kernel rc core decodes infrared and reports the scancode as an
//! `EV_MSC`/`MSC_SCAN` event. Every event is a `struct input_event`, which
//! on 64 bit linux is 24 bytes: a `timeval` (two 64 bit fields), then the
//! 16 bit type, the 16 bit code and the signed 32 bit value.

use crate::{
    dedup::SignalDeduplicator,
    signal::{ScanCode, SignalSample},
    Error,
};
use log::{debug, trace};
use nix::{
    errno::Errno,
    fcntl::OFlag,
    poll::{poll, PollFd, PollFlags, PollTimeout},
};
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, ErrorKind, Read},
    os::{
        fd::{AsFd, BorrowedFd},
        unix::fs::OpenOptionsExt,
    },
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

pub const DEFAULT_DEVICE: &str = "/dev/input/event1";

/// Size of `struct input_event`
pub const RECORD_SIZE: usize = 24;

const EV_MSC: u16 = 4;
const MSC_SCAN: u16 = 4;

/// Longest single wait for the device to become readable
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Deadline used when the timeout is too large to represent
const FOREVER: Duration = Duration::from_secs(u32::MAX as u64);

/// A single input event, as read from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    pub seconds: i64,
    pub microseconds: i64,
    pub ty: u16,
    pub code: u16,
    pub value: i32,
}

impl RawRecord {
    /// Event reporting a scancode
    pub fn scan(value: i32) -> Self {
        RawRecord {
            seconds: 0,
            microseconds: 0,
            ty: EV_MSC,
            code: MSC_SCAN,
            value,
        }
    }

    /// Decode using native byte order
    pub fn decode(buf: &[u8; RECORD_SIZE]) -> Self {
        let mut b8 = [0u8; 8];
        let mut b4 = [0u8; 4];
        let mut b2 = [0u8; 2];

        b8.copy_from_slice(&buf[0..8]);
        let seconds = i64::from_ne_bytes(b8);
        b8.copy_from_slice(&buf[8..16]);
        let microseconds = i64::from_ne_bytes(b8);
        b2.copy_from_slice(&buf[16..18]);
        let ty = u16::from_ne_bytes(b2);
        b2.copy_from_slice(&buf[18..20]);
        let code = u16::from_ne_bytes(b2);
        b4.copy_from_slice(&buf[20..24]);
        let value = i32::from_ne_bytes(b4);

        RawRecord {
            seconds,
            microseconds,
            ty,
            code,
            value,
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];

        buf[0..8].copy_from_slice(&self.seconds.to_ne_bytes());
        buf[8..16].copy_from_slice(&self.microseconds.to_ne_bytes());
        buf[16..18].copy_from_slice(&self.ty.to_ne_bytes());
        buf[18..20].copy_from_slice(&self.code.to_ne_bytes());
        buf[20..24].copy_from_slice(&self.value.to_ne_bytes());

        buf
    }

    /// Is this an `EV_MSC`/`MSC_SCAN` event
    pub fn is_scancode(&self) -> bool {
        self.ty == EV_MSC && self.code == MSC_SCAN
    }

    /// The kernel passes the scancode in a signed field; scancodes with the
    /// top bit set come out negative.
    pub fn scancode(&self) -> ScanCode {
        self.value as ScanCode
    }
}

/// Something that produces input event records, normally an [`InputDevice`]
pub trait EventSource {
    /// Wait at most `timeout` for data. Returns false if none arrived
    fn wait(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read a single record, returning the number of bytes read. Zero means
    /// end of file: nothing more will arrive until the writer adds more.
    fn read_record(&mut self, buf: &mut [u8; RECORD_SIZE]) -> io::Result<usize>;
}

/// An open input device. The device is closed when this is dropped.
pub struct InputDevice {
    path: PathBuf,
    file: File,
}

impl InputDevice {
    /// Open the device for non-blocking reads
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(OFlag::O_NONBLOCK.bits())
            .open(path)
            .map_err(|e| Error::from_open(path.to_path_buf(), e))?;

        Ok(InputDevice {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Round up to whole milliseconds, so that we never wake up before the deadline
fn poll_timeout(timeout: Duration) -> PollTimeout {
    let ms = timeout.as_micros().div_ceil(1000).min(u16::MAX as u128) as u16;

    PollTimeout::from(ms)
}

impl EventSource for InputDevice {
    fn wait(&mut self, timeout: Duration) -> io::Result<bool> {
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];

        match poll(&mut fds, poll_timeout(timeout)) {
            Ok(0) => Ok(false),
            // on POLLERR or POLLHUP the read will tell us what happened
            Ok(_) => Ok(true),
            Err(Errno::EINTR) | Err(Errno::EAGAIN) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_record(&mut self, buf: &mut [u8; RECORD_SIZE]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl AsFd for InputDevice {
    fn as_fd(&self) -> BorrowedFd {
        self.file.as_fd()
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.path.display())
    }
}

/// Waits for scancodes on an input device, dropping repeats from held buttons
#[derive(Debug)]
pub struct DeviceEventReader {
    path: PathBuf,
    dedup: SignalDeduplicator,
}

impl DeviceEventReader {
    pub fn new<P: Into<PathBuf>>(path: P, dedup: SignalDeduplicator) -> Self {
        DeviceEventReader {
            path: path.into(),
            dedup,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the device and wait for the next scancode which is not a repeat.
    /// The device is only open for the duration of the call.
    pub fn wait_for_signal(&mut self, timeout: Duration) -> Result<SignalSample, Error> {
        let mut device = InputDevice::open(&self.path)?;

        debug!(
            "{device}: waiting {} for infrared signal",
            humantime::format_duration(timeout)
        );

        self.wait_on(&mut device, timeout)
    }

    /// Wait for the next scancode from the given source, for at most `timeout`
    pub fn wait_on<S: EventSource>(
        &mut self,
        source: &mut S,
        timeout: Duration,
    ) -> Result<SignalSample, Error> {
        match self.next_sample(source, timeout) {
            Ok(Some(sample)) => Ok(sample),
            Ok(None) => Err(Error::Timeout(timeout)),
            Err(e) => Err(Error::Io(self.path.clone(), e)),
        }
    }

    fn next_sample<S: EventSource>(
        &mut self,
        source: &mut S,
        timeout: Duration,
    ) -> io::Result<Option<SignalSample>> {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FOREVER);
        let mut buf = [0u8; RECORD_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());

            if remaining.is_zero() {
                return Ok(None);
            }

            if !source.wait(remaining.min(POLL_INTERVAL))? {
                continue;
            }

            let len = match source.read_record(&mut buf) {
                Ok(len) => len,
                Err(e)
                    if e.kind() == ErrorKind::WouldBlock
                        || e.kind() == ErrorKind::Interrupted =>
                {
                    continue;
                }
                Err(e) => return Err(e),
            };

            if len == 0 {
                // a regular file, or a fifo without writer, stays readable at
                // end of file; do not spin on it
                trace!("{}: end of file", self.path.display());
                thread::sleep(remaining.min(POLL_INTERVAL));
                continue;
            }

            if len != RECORD_SIZE {
                trace!("{}: ignoring read of {len} bytes", self.path.display());
                continue;
            }

            let record = RawRecord::decode(&buf);

            if !record.is_scancode() {
                trace!(
                    "{}: ignoring event type={} code={} value={:#x}",
                    self.path.display(),
                    record.ty,
                    record.code,
                    record.value
                );
                continue;
            }

            let scancode = record.scancode();

            if !self.dedup.filter(scancode, Instant::now()) {
                trace!("{}: repeat of {scancode:#010x}", self.path.display());
                continue;
            }

            debug!("{}: scancode {scancode:#010x}", self.path.display());

            return Ok(Some(SignalSample::new(scancode)));
        }
    }
}
