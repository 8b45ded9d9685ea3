use crate::config::Config;
use clap::{Arg, ArgAction, Command};
use std::{panic, process};

pub mod config;
pub mod gui;
pub mod pipeline;
pub mod runtime;

fn main() {
    tracing_subscriber::fmt::init();

    let matches = Command::new(config::app_name())
        .version(config::version())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("camera")
                .value_name("ADDRESS")
                .help("Host name or IPv4 address of the camera.")
                .required(true),
        )
        .arg(
            Arg::new("fullscreen")
                .short('f')
                .long("fullscreen")
                .help("Display the stream in a fullscreen window.")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let address = matches
        .get_one::<String>("camera")
        .cloned()
        .unwrap_or_default();
    let fullscreen = matches.get_flag("fullscreen");

    // kill the main thread as soon as a secondary thread panics
    let orig_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // invoke the default handler and exit the process
        orig_hook(panic_info);
        process::exit(105);
    }));

    // gracefully close the app when receiving SIGINT, SIGTERM, or SIGHUP
    ctrlc::set_handler(move || {
        process::exit(130);
    })
    .expect("Error setting Ctrl-C handler");

    if let Err(err) = gui::run(Config::new(address, fullscreen)) {
        log::error!("{}: {err:#}", config::app_name());
        process::exit(1);
    }
}
