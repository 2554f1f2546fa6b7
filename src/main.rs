extern crate atelier_lib as lib;

use std::process;

fn main() {
    let config = lib::Config::new().unwrap_or_else(|e| {
        eprintln!("Can't load app config: {}", e);
        process::exit(1);
    });

    if let Err(e) = lib::start_server(config) {
        let chain = e.iter_chain().map(|cause| cause.to_string()).collect::<Vec<_>>();
        eprintln!("Atelier stopped: {}", chain.join(": "));
        process::exit(1);
    }
}
