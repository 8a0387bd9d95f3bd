//! Find infrared receivers in sysfs on linux, and the input device on which
//! they report scancodes.

use itertools::Itertools;
use std::{
    fs,
    io::{self, ErrorKind},
    path::Path,
};

const SYSFS_RC: &str = "/sys/class/rc";

/// Single remote controller device on linux
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rcdev {
    /// Name of rc. This is usually "rc" followed by a number
    pub name: String,
    /// Name of the actual device. Human readable
    pub device_name: String,
    /// Name of the driver
    pub driver: String,
    /// Default keymap name for this device
    pub default_keymap: String,
    /// Path to input device. Transmitters do not have an input device attached
    pub inputdev: Option<String>,
    /// Supported protocols
    pub supported_protocols: Vec<String>,
    /// Which protocols are enabled. This indexes into supported_protocols
    pub enabled_protocols: Vec<usize>,
}

impl Rcdev {
    /// Get a list of rc devices attached to the system
    pub fn enumerate_devices() -> io::Result<Vec<Rcdev>> {
        Rcdev::enumerate_in(Path::new(SYSFS_RC))
    }

    /// Find the rc device by name, e.g. "rc0"
    pub fn find(name: &str) -> io::Result<Rcdev> {
        Rcdev::enumerate_devices()?
            .into_iter()
            .find(|rcdev| rcdev.name == name)
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, format!("{name}: no such rc device")))
    }

    /// Get a list of rc devices below the given sysfs directory
    pub fn enumerate_in(sysfs: &Path) -> io::Result<Vec<Rcdev>> {
        let mut rcdev = Vec::new();

        let entries = match fs::read_dir(sysfs) {
            Ok(res) => res,
            Err(e) => {
                return if e.kind() == ErrorKind::NotFound {
                    // If /sys/class/rc doesn't exist, then the kernel was not compiled with CONFIG_RC_CORE
                    // or the module was not loaded
                    Ok(Vec::new())
                } else {
                    Err(e)
                };
            }
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let uevent = read_uevent(&path)?;
            let mut inputdev = None;
            let mut supported_protocols = Vec::new();
            let mut enabled_protocols = Vec::new();

            for entry in fs::read_dir(&path)? {
                let entry = entry?;
                let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                    continue;
                };

                if file_name.starts_with("input") {
                    for entry in fs::read_dir(entry.path())? {
                        let entry = entry?;
                        if let Some(file_name) = entry.file_name().to_str() {
                            if file_name.starts_with("event") {
                                let uevent = read_uevent(&entry.path())?;

                                inputdev = Some(format!("/dev/{}", uevent.dev_name));
                            }
                        }
                    }
                } else if file_name == "protocols" {
                    for protocol in fs::read_to_string(entry.path())?.split_whitespace() {
                        if let Some(protocol) =
                            protocol.strip_prefix('[').and_then(|p| p.strip_suffix(']'))
                        {
                            if protocol == "lirc" {
                                // The kernel always outputs this entry for compatibility
                                continue;
                            }
                            enabled_protocols.push(supported_protocols.len());
                            supported_protocols.push(protocol.to_owned());
                        } else {
                            supported_protocols.push(protocol.to_owned());
                        }
                    }
                }
            }

            rcdev.push(Rcdev {
                name: entry.file_name().to_string_lossy().into_owned(),
                device_name: uevent.dev_name,
                driver: uevent.drv_name,
                default_keymap: uevent.name,
                inputdev,
                enabled_protocols,
                supported_protocols,
            })
        }

        // Sort the list by name
        rcdev.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(rcdev)
    }

    /// Enabled protocols as a space separated list. Without an enabled
    /// protocol the kernel does not decode anything, so no scancodes arrive.
    pub fn enabled_protocol_names(&self) -> String {
        if self.enabled_protocols.is_empty() {
            "none".into()
        } else {
            self.enabled_protocols
                .iter()
                .map(|i| self.supported_protocols[*i].as_str())
                .join(" ")
        }
    }
}

struct UEvent {
    name: String,
    drv_name: String,
    dev_name: String,
}

fn read_uevent(path: &Path) -> io::Result<UEvent> {
    let mut name = String::new();
    let mut drv_name = String::new();
    let mut dev_name = String::new();

    for line in fs::read_to_string(path.join("uevent"))?.lines() {
        match line.split_once('=') {
            Some(("NAME", value)) => {
                value.clone_into(&mut name);
            }
            Some(("DRV_NAME", value)) => {
                value.clone_into(&mut drv_name);
            }
            Some(("DEVNAME", value)) | Some(("DEV_NAME", value)) => {
                value.clone_into(&mut dev_name);
            }
            _ => (),
        }
    }

    Ok(UEvent {
        name,
        drv_name,
        dev_name,
    })
}

#[cfg(test)]
mod tests {
    use super::Rcdev;
    use std::{fs, path::PathBuf};

    fn fake_sysfs(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("irbind-sysfs-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&root);

        let rc1 = root.join("rc1");
        fs::create_dir_all(rc1.join("input7/event5")).unwrap();
        fs::write(
            rc1.join("uevent"),
            "NAME=rc-apple\nDRV_NAME=gpio_ir_recv\nDEV_NAME=gpio_ir_recv\n",
        )
        .unwrap();
        fs::write(rc1.join("protocols"), "rc-5 [nec] rc-6 [lirc] sony\n").unwrap();
        fs::write(rc1.join("input7/event5/uevent"), "MAJOR=13\nDEVNAME=input/event5\n").unwrap();

        // transmitter only, no input device
        let rc0 = root.join("rc0");
        fs::create_dir_all(&rc0).unwrap();
        fs::write(rc0.join("uevent"), "NAME=rc-empty\nDRV_NAME=pwm-ir-tx\nDEV_NAME=pwm-ir-tx\n")
            .unwrap();

        root
    }

    #[test]
    fn enumerate() {
        let root = fake_sysfs("enumerate");

        let devices = Rcdev::enumerate_in(&root).unwrap();

        fs::remove_dir_all(&root).unwrap();

        assert_eq!(devices.len(), 2);

        assert_eq!(devices[0].name, "rc0");
        assert_eq!(devices[0].inputdev, None);
        assert_eq!(devices[0].enabled_protocol_names(), "none");

        let rc = &devices[1];
        assert_eq!(rc.name, "rc1");
        assert_eq!(rc.driver, "gpio_ir_recv");
        assert_eq!(rc.default_keymap, "rc-apple");
        assert_eq!(rc.inputdev.as_deref(), Some("/dev/input/event5"));
        assert_eq!(rc.supported_protocols, ["rc-5", "nec", "rc-6", "sony"]);
        assert_eq!(rc.enabled_protocols, [1]);
        assert_eq!(rc.enabled_protocol_names(), "nec");
    }

    #[test]
    fn no_rc_core() {
        let root = std::env::temp_dir().join(format!("irbind-sysfs-{}-none", std::process::id()));

        assert!(Rcdev::enumerate_in(&root).unwrap().is_empty());
    }
}
