use argh::FromArgs;
use hsh::history::history_path;
use hsh::input::strip_comment;
use hsh::{Environment, InputReader, Interpreter, Interrupt, Session, SessionConfig};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

/// A simple command interpreter.
#[derive(FromArgs)]
struct Args {
    /// run a single command line and exit
    #[argh(option, short = 'c')]
    command: Option<String>,

    /// file to read commands from instead of standard input
    #[argh(positional)]
    script: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("HSH_LOG", "warn")).init();

    let args: Args = argh::from_env();
    let name = std::env::args().next().unwrap_or_else(|| "hsh".to_string());

    let interrupt = Interrupt::new();
    if let Err(e) = interrupt.install() {
        log::warn!("cannot install SIGINT handler: {e}");
    }

    std::process::exit(run(args, name, interrupt));
}

fn run(args: Args, name: String, interrupt: Interrupt) -> i32 {
    let env = Environment::from_process();

    if let Some(line) = args.command {
        let config = SessionConfig {
            name,
            ..SessionConfig::default()
        };
        let mut sh = Interpreter::from_session(Session::new(config, env));
        sh.session_mut().line_count = 1;
        sh.run_line(strip_comment(&line));
        return sh.finish();
    }

    let mut input = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => InputReader::from_reader(Box::new(BufReader::new(file)), interrupt),
            Err(e) => {
                log::debug!("{path}: {e}");
                eprintln!("{name}: 0: Can't open {path}");
                return 127;
            }
        },
        None if io::stdin().is_terminal() => match InputReader::interactive(interrupt.clone()) {
            Ok(reader) => reader,
            Err(e) => {
                log::warn!("line editor unavailable, reading plain lines: {e}");
                InputReader::from_reader(Box::new(io::stdin().lock()), interrupt)
            }
        },
        None => InputReader::from_reader(Box::new(io::stdin().lock()), interrupt),
    };

    let config = SessionConfig {
        name,
        interactive: input.is_interactive(),
        history_path: env.get_var("HOME").map(history_path),
    };
    let mut sh = Interpreter::from_session(Session::new(config, env));
    sh.repl(&mut input);
    sh.finish()
}
