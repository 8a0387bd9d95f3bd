use super::{analyzer, fail};
use irbind::{analyzer::spawn_acquire, buttons::ButtonId, signal::SignalSample};
use std::sync::Arc;

pub fn receive(args: &crate::App, receive: &crate::Receive) {
    let sample = if receive.simulate {
        SignalSample::simulated()
    } else {
        analyzer(args)
            .acquire_signal(receive.timeout)
            .unwrap_or_else(|e| fail(e))
    };

    println!("{} {}", sample.signal(), sample.label());
}

pub fn learn(args: &crate::App, learn: &crate::Learn) {
    // no point in waiting for a signal which cannot be bound
    let button: ButtonId = learn.button.parse().unwrap_or_else(|e| fail(e));

    let analyzer = Arc::new(analyzer(args));

    eprintln!("Press the {button} button on the remote");

    let sample = match spawn_acquire(analyzer.clone(), learn.timeout).join() {
        Ok(res) => res.unwrap_or_else(|e| fail(e)),
        Err(_) => {
            eprintln!("error: receiver thread panicked");
            std::process::exit(1);
        }
    };

    if let Err(e) = analyzer.bind(button.name(), &sample.signal().to_string()) {
        fail(e);
    }

    println!("{button} {}", sample.signal());
}
