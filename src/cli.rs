use std::io::{self, BufRead, Write};

use log::info;

use crate::project::Project;

/// Run the minimal interactive console (spec §6): reads one command per line from stdin.
///
/// - `s` toggles the clock between running and stopped.
/// - `q` quits, stopping the project and returning.
///
/// Blocking reads happen on this thread; the clock and dispatcher keep running on their own
/// threads regardless of whether a line is waiting (mirrors the separation the engine's
/// `InputManager` loop draws between blocking input acquisition and non-blocking handling).
pub fn run(project: &Project) {
    let stdin = io::stdin();
    print_prompt();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "s" => {
                info!("toggling clock");
                project.clock().toggle();
            }
            "q" => {
                info!("quitting");
                break;
            }
            "" => {}
            other => println!("unrecognized command: {other:?} (s = toggle, q = quit)"),
        }
        print_prompt();
    }
}

fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
