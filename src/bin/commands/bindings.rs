use super::{analyzer, fail};
use log::info;
use std::time::{Duration, UNIX_EPOCH};

pub fn locate(args: &crate::App, locate: &crate::Locate) {
    let analyzer = analyzer(args);

    match analyzer.locate_button(locate.x, locate.y) {
        Some(button) => match analyzer.all_bindings().get(&button) {
            Some(binding) => println!("{button}: bound to {}", binding.signal),
            None => println!("{button}: not bound"),
        },
        None => println!("no button at {},{}", locate.x, locate.y),
    }
}

pub fn bind(args: &crate::App, bind: &crate::Bind) {
    if let Err(e) = analyzer(args).bind(&bind.button, &bind.signal) {
        fail(e);
    }
}

pub fn unbind(args: &crate::App, unbind: &crate::Unbind) {
    match analyzer(args).unbind(&unbind.button) {
        Ok(true) => (),
        Ok(false) => info!("{} was not bound", unbind.button),
        Err(e) => fail(e),
    }
}

pub fn list(args: &crate::App) {
    let bindings = analyzer(args).all_bindings();

    if bindings.is_empty() {
        info!("no bindings");
    }

    for (button, binding) in bindings {
        match Duration::try_from_secs_f64(binding.timestamp) {
            Ok(since) => println!(
                "{:<12}{}  {}",
                button.name(),
                binding.signal,
                humantime::format_rfc3339_seconds(UNIX_EPOCH + since)
            ),
            Err(_) => println!("{:<12}{}", button.name(), binding.signal),
        }
    }
}
