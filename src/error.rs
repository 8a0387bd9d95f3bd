use crate::buttons::button_names;
use std::{fmt, io, path::PathBuf, time::Duration};

/// Everything that can go wrong in the core. Each variant has a stable
/// identifier (see [`Error::id`]) so a front end can tell them apart.
#[derive(Debug)]
pub enum Error {
    /// The input device does not exist
    DeviceNotFound(PathBuf),
    /// The input device exists but may not be opened for reading
    PermissionDenied(PathBuf),
    /// No signal was accepted before the deadline
    Timeout(Duration),
    /// Waiting for or reading from the input device failed
    Io(PathBuf, io::Error),
    /// Not one of the buttons on the remote
    InvalidButton(String),
    /// Signal is not `0x` followed by 8 hex digits
    InvalidSignalFormat(String),
    /// The binding table could not be written
    PersistenceError(PathBuf, io::Error),
}

impl Error {
    /// Stable identifier for this kind of error
    pub fn id(&self) -> &'static str {
        match self {
            Error::DeviceNotFound(_) => "device_not_found",
            Error::PermissionDenied(_) => "permission_denied",
            Error::Timeout(_) => "timeout",
            Error::Io(..) => "io_error",
            Error::InvalidButton(_) => "invalid_button",
            Error::InvalidSignalFormat(_) => "invalid_signal_format",
            Error::PersistenceError(..) => "persistence_error",
        }
    }

    /// Map a failure to open the device to the matching error
    pub(crate) fn from_open(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::DeviceNotFound(path),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
            _ => Error::Io(path, err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeviceNotFound(path) => {
                write!(f, "{}: infrared device not found", path.display())
            }
            Error::PermissionDenied(path) => write!(
                f,
                "{}: permission denied, make sure the device is readable",
                path.display()
            ),
            Error::Timeout(timeout) => write!(
                f,
                "no infrared signal received within {}",
                humantime::format_duration(*timeout)
            ),
            Error::Io(path, err) => write!(f, "{}: {err}", path.display()),
            Error::InvalidButton(name) => write!(
                f,
                "‘{name}’ is not a valid button, expected one of {}",
                button_names()
            ),
            Error::InvalidSignalFormat(signal) => {
                write!(f, "‘{signal}’ is not a valid signal, expected 0xXXXXXXXX")
            }
            Error::PersistenceError(path, err) => {
                write!(f, "{}: failed to save bindings: {err}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(_, err) | Error::PersistenceError(_, err) => Some(err),
            _ => None,
        }
    }
}
