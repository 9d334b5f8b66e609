//! CLI smoke entry point.
//!
//! Wires config, logging and the note store the same way an application
//! shell would, then prints a deterministic status report.

use jotpad_core::{core_version, init_logging, open_note_store, ping, CoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Some(logging) = config.logging() {
        if let Err(err) = init_logging(&logging) {
            eprintln!("jotpad logging disabled: {err}");
        }
    }

    println!("jotpad_core ping={}", ping());
    println!("jotpad_core version={}", core_version());

    match open_note_store(&config) {
        Ok(store) => {
            println!("jotpad_core notes={}", store.notes().len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("jotpad_core store error: {err}");
            ExitCode::FAILURE
        }
    }
}
