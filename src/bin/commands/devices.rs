use irbind::rcdev::Rcdev;

pub fn devices() {
    let list = match Rcdev::enumerate_devices() {
        Ok(list) if list.is_empty() => {
            eprintln!("error: no devices found");
            std::process::exit(1);
        }
        Ok(list) => list,
        Err(err) => {
            eprintln!("error: no devices found: {err}");
            std::process::exit(1);
        }
    };

    for rcdev in list {
        println!("{}:", rcdev.name);

        println!("\tDevice Name\t\t: {}", rcdev.device_name);
        println!("\tDriver\t\t\t: {}", rcdev.driver);
        if !rcdev.default_keymap.is_empty() {
            println!("\tDefault Keymap\t\t: {}", rcdev.default_keymap);
        }
        if let Some(inputdev) = &rcdev.inputdev {
            println!("\tInput Device\t\t: {inputdev}");
            println!(
                "\tEnabled Protocols\t: {}",
                rcdev.enabled_protocol_names()
            );
        }
    }
}
