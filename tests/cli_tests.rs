use assert_cmd::Command;
use irbind::input::RawRecord;
use pretty_assertions::assert_eq;
use std::{fs, io::Write, path::PathBuf};

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("irbind-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn events(name: &str, values: &[i32]) -> PathBuf {
    let path = temp_path(name);
    let mut file = fs::File::create(&path).unwrap();

    for value in values {
        file.write_all(&RawRecord::scan(*value).encode()).unwrap();
    }

    path
}

fn run(args: &[&str]) -> (bool, String, String) {
    let mut cmd = Command::cargo_bin("irbind").unwrap();

    let assert = cmd.args(args).assert();

    let output = assert.get_output();

    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn bind_list_unbind() {
    let bindings = temp_path("bind.json");
    let bindings_arg = bindings.to_str().unwrap();

    let (ok, stdout, stderr) = run(&["bind", "up", "0x20df02fd", "--bindings", bindings_arg]);

    assert!(ok);
    assert_eq!(stdout, "");
    assert_eq!(stderr, "info: bound 0x20DF02FD to up\n");

    let (ok, stdout, _) = run(&["bind", "play_pause", "0x20DF827D", "-q", "-b", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "");

    let (ok, stdout, stderr) = run(&["list", "--bindings", bindings_arg]);

    assert!(ok);
    assert_eq!(stderr, "");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("up          0x20DF02FD  "), "{stdout}");
    assert!(lines[1].starts_with("play_pause  0x20DF827D  "), "{stdout}");
    assert!(lines[0].ends_with('Z'), "{stdout}");

    let (ok, _, stderr) = run(&["unbind", "up", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stderr, "info: unbound up\n");

    let (ok, _, stderr) = run(&["unbind", "up", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stderr, "info: up was not bound\n");

    let (ok, _, _) = run(&["unbind", "play_pause", "-q", "--bindings", bindings_arg]);
    assert!(ok);

    let (ok, stdout, stderr) = run(&["list", "--bindings", bindings_arg]);

    assert!(ok);
    assert_eq!(stdout, "");
    assert_eq!(stderr, "info: no bindings\n");

    fs::remove_file(&bindings).unwrap();
}

#[test]
fn invalid_input() {
    let bindings = temp_path("invalid.json");
    let bindings_arg = bindings.to_str().unwrap();

    let (ok, stdout, stderr) = run(&["bind", "foo", "0x20DF02FD", "--bindings", bindings_arg]);

    assert!(!ok);
    assert_eq!(stdout, "");
    assert_eq!(
        stderr,
        "error: ‘foo’ is not a valid button, expected one of up, down, left, right, enter, menu, play_pause\n"
    );

    let (ok, _, stderr) = run(&["bind", "up", "0xZZZZZZZZ", "--bindings", bindings_arg]);

    assert!(!ok);
    assert_eq!(
        stderr,
        "error: ‘0xZZZZZZZZ’ is not a valid signal, expected 0xXXXXXXXX\n"
    );

    let (ok, _, stderr) = run(&["unbind", "UP", "--bindings", bindings_arg]);

    assert!(!ok);
    assert_eq!(
        stderr,
        "error: ‘UP’ is not a valid button, expected one of up, down, left, right, enter, menu, play_pause\n"
    );

    assert!(!bindings.exists());
}

#[test]
fn locate() {
    let bindings = temp_path("locate.json");
    let bindings_arg = bindings.to_str().unwrap();

    let (ok, stdout, _) = run(&["locate", "132", "120", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "up: not bound\n");

    run(&["bind", "up", "0x20DF02FD", "-q", "--bindings", bindings_arg]);

    let (ok, stdout, _) = run(&["locate", "140", "125", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "up: bound to 0x20DF02FD\n");

    let (ok, stdout, _) = run(&["locate", "194", "449", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "play_pause: not bound\n");

    let (ok, stdout, _) = run(&["locate", "10", "10", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "no button at 10,10\n");

    let (ok, stdout, _) = run(&["locate", "-5", "0.5", "--bindings", bindings_arg]);
    assert!(ok);
    assert_eq!(stdout, "no button at -5,0.5\n");

    fs::remove_file(&bindings).unwrap();
}

#[test]
fn receive() {
    let device = events("receive.events", &[0x20df02fd, 0x20df02fd]);

    let (ok, stdout, stderr) = run(&["receive", "--device", device.to_str().unwrap(), "-t", "1"]);

    assert!(ok, "{stderr}");
    assert_eq!(stderr, "");
    assert_eq!(stdout, "0x20DF02FD IR_20DF02FD\n");

    fs::remove_file(&device).unwrap();

    let device = events("receive-negative.events", &[-1]);

    let (ok, stdout, _) = run(&["receive", "-d", device.to_str().unwrap()]);

    assert!(ok);
    assert_eq!(stdout, "0xFFFFFFFF IR_FFFFFFFF\n");

    // timeout too large for the clock
    let (ok, stdout, stderr) = run(&["receive", "-d", device.to_str().unwrap(), "-t", "1e19"]);

    assert!(ok, "{stderr}");
    assert_eq!(stdout, "0xFFFFFFFF IR_FFFFFFFF\n");

    fs::remove_file(&device).unwrap();
}

#[test]
fn receive_errors() {
    let (ok, stdout, stderr) = run(&["receive", "--device", "/dev/input/no-such-event"]);

    assert!(!ok);
    assert_eq!(stdout, "");
    assert_eq!(
        stderr,
        "error: device_not_found: /dev/input/no-such-event: infrared device not found\n"
    );

    let device = events("silent.events", &[]);

    let (ok, stdout, stderr) = run(&["receive", "-d", device.to_str().unwrap(), "-t", "0.2"]);

    assert!(!ok);
    assert_eq!(stdout, "");
    assert_eq!(
        stderr,
        "error: timeout: no infrared signal received within 200ms\n"
    );

    fs::remove_file(&device).unwrap();
}

#[test]
fn simulate() {
    let (ok, stdout, _) = run(&["receive", "--simulate", "--device", "/dev/input/no-such-event"]);

    assert!(ok);

    let (signal, label) = stdout.trim_end().split_once(' ').unwrap();

    assert!(signal.starts_with("0x87EE"), "{stdout}");
    assert_eq!(label, format!("IR_{}", &signal[2..]));
}

#[test]
fn learn() {
    let device = events("learn.events", &[0x20df22dd]);
    let bindings = temp_path("learn.json");

    let (ok, stdout, stderr) = run(&[
        "learn",
        "enter",
        "--device",
        device.to_str().unwrap(),
        "--bindings",
        bindings.to_str().unwrap(),
    ]);

    assert!(ok, "{stderr}");
    assert_eq!(stdout, "enter 0x20DF22DD\n");
    assert_eq!(
        stderr,
        "Press the enter button on the remote\ninfo: bound 0x20DF22DD to enter\n"
    );

    let (_, stdout, _) = run(&["locate", "131", "218", "-b", bindings.to_str().unwrap()]);
    assert_eq!(stdout, "enter: bound to 0x20DF22DD\n");

    // the button is checked before waiting for a signal
    let (ok, _, stderr) = run(&[
        "learn",
        "select",
        "--device",
        "/dev/input/no-such-event",
        "--bindings",
        bindings.to_str().unwrap(),
    ]);

    assert!(!ok);
    assert_eq!(
        stderr,
        "error: ‘select’ is not a valid button, expected one of up, down, left, right, enter, menu, play_pause\n"
    );

    fs::remove_file(&device).unwrap();
    fs::remove_file(&bindings).unwrap();
}

#[test]
fn config_file() {
    let device = events("config.events", &[0x20df827d]);
    let bindings = temp_path("config.json");
    let config = temp_path("config.toml");

    fs::write(
        &config,
        format!(
            "device = {:?}\nbindings = {:?}\ndebounce = 100\n",
            device.to_str().unwrap(),
            bindings.to_str().unwrap()
        ),
    )
    .unwrap();

    let (ok, stdout, _) = run(&["learn", "down", "-q", "--config", config.to_str().unwrap()]);

    assert!(ok);
    assert_eq!(stdout, "down 0x20DF827D\n");

    let (ok, stdout, _) = run(&["list", "--config", config.to_str().unwrap()]);

    assert!(ok);
    assert!(stdout.starts_with("down        0x20DF827D"), "{stdout}");

    fs::write(&config, "protocol = \"nec\"\n").unwrap();

    let (ok, _, stderr) = run(&["list", "--config", config.to_str().unwrap()]);

    assert!(!ok);
    assert!(
        stderr.starts_with(&format!("error: {}: ", config.display())),
        "{stderr}"
    );

    let (ok, _, stderr) = run(&["list", "--config", "/does/not/exist.toml"]);

    assert!(!ok);
    assert!(
        stderr.starts_with("error: /does/not/exist.toml: "),
        "{stderr}"
    );

    fs::remove_file(&device).unwrap();
    fs::remove_file(&bindings).unwrap();
    fs::remove_file(&config).unwrap();
}

#[test]
fn device_or_rcdev() {
    let (ok, _, stderr) = run(&["receive", "--device", "/dev/input/event1", "--rcdev", "rc0"]);

    assert!(!ok);
    assert!(stderr.contains("cannot be used with"), "{stderr}");
}
