//! keycap - show what a terminal sends for each key
//!
//! Reads keys in raw mode and prints them in shell (fish `bind`), readline
//! (inputrc) and repr notation. Navigation keys are calibrated at startup so
//! the menus work on any terminal.
//!
//! # Quick Start
//!
//! ```text
//! keycap                 # Calibrate Up/Down/Enter/Esc, then open the menu
//! keycap -x              # Assume xterm navigation keys
//! keycap -n readline     # Echo keys in inputrc notation
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Up/Down | Move in menus |
//! | Enter | Select |
//! | Esc | Leave a submenu |
//! | b | Back (while capturing keys) |
//! | q, Ctrl-C | Quit |

use std::env;
use std::io::Write;

use crossterm::style::Print;
use crossterm::queue;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use keycap::config::Config;
use keycap::core::{Console, KeyToken, StdTerminal};
use keycap::error::{InputError, Result};
use keycap::ui::{
    render, xterm_key_name, KeyBindingTable, MenuChoice, MenuOptions, Notation, Session, Theme,
};

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    /// Echo notation, overriding the config file
    notation: Option<Notation>,
    /// Skip calibration and use xterm bindings
    xterm_keys: bool,
    /// Hide the menu index line
    no_index: bool,
    debug: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("keycap {}", VERSION);
}

fn print_help() {
    eprintln!("keycap {} - Show what your terminal sends for each key", VERSION);
    eprintln!();
    eprintln!("Usage: keycap [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --notation <NAME> Echo notation: shell, readline or repr");
    eprintln!("  -x, --xterm-keys      Use xterm navigation keys, skip calibration");
    eprintln!("      --no-index        Do not show the menu index line");
    eprintln!("      --debug           Log at debug level");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("While capturing keys:");
    eprintln!("  Space                 Skip");
    eprintln!("  b                     Back to the menu");
    eprintln!("  q, Ctrl-C             Quit");
    eprintln!();
    eprintln!("Configuration: ~/.keycap/config.toml");
    eprintln!("Log file:      ~/.keycap/keycap.log (filter with KEYCAP_LOG)");
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-n" | "--notation" => {
                i += 1;
                let Some(name) = args.get(i) else {
                    return Err("Missing notation argument".to_string());
                };
                options.notation = Some(name.parse().map_err(|e: InputError| e.to_string())?);
            }
            "-x" | "--xterm-keys" => options.xterm_keys = true,
            "--no-index" => options.no_index = true,
            "--debug" => options.debug = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

/// Log to `~/.keycap/keycap.log`; the terminal itself is busy.
fn init_logging(debug: bool) {
    let log_path = Config::get_config_dir()
        .map(|dir| dir.join("keycap.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("keycap.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let level = if debug { Level::DEBUG } else { Level::INFO };
        let filter = EnvFilter::try_from_env("KEYCAP_LOG")
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(2);
        }
    };

    init_logging(options.debug);
    info!("keycap {} starting", VERSION);

    let config = Config::load();
    let notation = match options.notation {
        Some(notation) => notation,
        None => config.notation().unwrap_or_else(|e| {
            warn!("{}; using {}", e, Notation::default());
            Notation::default()
        }),
    };

    let terminal = StdTerminal::new();
    if !terminal.is_tty() {
        eprintln!("keycap: standard input is not a terminal");
        std::process::exit(1);
    }

    let mut session = Session::new(
        Console::new(terminal, config.timing()),
        Theme::from_config(&config.colors),
        notation,
    );

    let result = run(&mut session, &config, &options);
    // Every raw-mode and menu guard is gone once `run` returns.
    drop(session);

    match result {
        Ok(()) => {
            info!("keycap exiting");
            Ok(())
        }
        Err(e) if e.is_quit() => {
            info!("Quit requested");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ShowKeys,
    Compose,
    ChangeNotation,
    Recalibrate,
    Quit,
}

fn main_menu() -> Vec<MenuChoice<Action>> {
    vec![
        MenuChoice::with_value("Show key codes", Action::ShowKeys),
        MenuChoice::with_value("Compose a key binding", Action::Compose),
        MenuChoice::with_value("Change notation", Action::ChangeNotation),
        MenuChoice::with_value("Recalibrate navigation keys", Action::Recalibrate),
        MenuChoice::with_value("Quit", Action::Quit),
    ]
}

fn run(session: &mut Session, config: &Config, options: &Options) -> Result<()> {
    let mut bindings = if config.calibrate && !options.xterm_keys {
        calibrate(session, config)?
    } else {
        KeyBindingTable::xterm(config.application_cursor)
    };

    let mut menu_options = MenuOptions::empty();
    if config.show_index && !options.no_index {
        menu_options |= MenuOptions::SHOW_INDEX;
    }

    let choices = main_menu();
    let mut last_command = String::new();

    loop {
        let action = match session.choose_one("keycap", &choices, &bindings, menu_options) {
            Ok(choice) => choice.value,
            Err(e) if e.is_back() => continue,
            Err(e) => return Err(e),
        };

        match action {
            Action::ShowKeys => ignore_back(show_keys(session, &bindings, config.copy_to_clipboard))?,
            Action::Compose => ignore_back(compose(session, &mut last_command))?,
            Action::ChangeNotation => ignore_back(change_notation(session, &bindings, menu_options))?,
            Action::Recalibrate => {
                write_line(session, "Recalibrate navigation keys? [y/N] ", false)?;
                if session.yes_no(false)? {
                    bindings = calibrate(session, config)?;
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

/// Back only ends the current step.
fn ignore_back(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_back() => Ok(()),
        other => other,
    }
}

fn write_line(session: &mut Session, text: &str, newline: bool) -> Result<()> {
    let out = session.console.output();
    queue!(out, Print(text))?;
    if newline {
        queue!(out, Print("\r\n"))?;
    }
    out.flush()?;
    Ok(())
}

/// Ask for the navigation keys. Back keeps the xterm defaults.
fn calibrate(session: &mut Session, config: &Config) -> Result<KeyBindingTable> {
    let out = session.console.output();
    session.theme.heading(out, "Calibrate navigation keys")?;
    out.flush()?;

    match session.query_basic_keys() {
        Err(e) if e.is_back() => {
            info!("Calibration skipped, using xterm bindings");
            Ok(KeyBindingTable::xterm(config.application_cursor))
        }
        other => other,
    }
}

fn show_keys(session: &mut Session, bindings: &KeyBindingTable, clipboard: bool) -> Result<()> {
    let out = session.console.output();
    session.theme.heading(out, "Show key codes (space skips, b goes back, q quits)")?;
    out.flush()?;

    loop {
        let Some(token) = session.get_key("Key: ", true)? else {
            continue;
        };
        describe_key(session, bindings, &token)?;
        if clipboard {
            copy_to_clipboard(&render(token.as_bytes(), Notation::Shell));
        }
    }
}

fn describe_key(session: &mut Session, bindings: &KeyBindingTable, token: &KeyToken) -> Result<()> {
    for notation in Notation::ALL {
        write_line(session, &format!("  {:<10}", notation.name()), false)?;
        let out = session.console.output();
        session.theme.user_input(out, &render(token.as_bytes(), notation))?;
        write_line(session, "", true)?;
    }

    let name = xterm_key_name(token.as_bytes());
    let bound = bindings.name_of(token);
    match (name, bound) {
        (Some(name), Some(bound)) => write_line(session, &format!("  {:<10}{} (menu {})", "key", name, bound), true)?,
        (Some(name), None) => write_line(session, &format!("  {:<10}{}", "key", name), true)?,
        (None, Some(bound)) => write_line(session, &format!("  {:<10}menu {}", "key", bound), true)?,
        (None, None) => {}
    }
    Ok(())
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => info!("Copied {} to clipboard", text),
        Err(e) => warn!("Failed to copy to clipboard: {}", e),
    }
}

/// Capture a key and a command, then print both binding forms.
fn compose(session: &mut Session, last_command: &mut String) -> Result<()> {
    let out = session.console.output();
    session.theme.heading(out, "Compose a key binding")?;
    out.flush()?;

    let Some(token) = session.get_key("Key to bind: ", false)? else {
        return Ok(());
    };
    let command = session.read_line("Command: ", Some(last_command.as_str()))?;
    last_command.clone_from(&command);

    let shell = render(token.as_bytes(), Notation::Shell);
    let readline = render(token.as_bytes(), Notation::Readline);
    write_line(session, &format!("  fish:     bind {} '{}'", shell, command.replace('\'', "\\'")), true)?;
    write_line(session, &format!("  inputrc:  {}: {}", readline, command), true)?;
    Ok(())
}

fn change_notation(session: &mut Session, bindings: &KeyBindingTable, options: MenuOptions) -> Result<()> {
    let sample = KeyToken::sequence(keycap::core::ESC, b"[A");
    let choices: Vec<MenuChoice<Notation>> = Notation::ALL
        .into_iter()
        .map(|notation| {
            let label = format!("{:<10}{}", notation.name(), render(sample.as_bytes(), notation));
            MenuChoice::with_value(label, notation)
        })
        .collect();

    let picked = session.choose_one("Notation (Esc to cancel)", &choices, bindings, options | MenuOptions::HANDLE_ESC)?;
    session.notation = picked.value;
    info!(notation = %session.notation, "Notation changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("keycap").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&args(&[])).unwrap(), Options::default());

        let options = parse_args(&args(&["-n", "readline", "-x", "--no-index", "--debug"])).unwrap();
        assert_eq!(options.notation, Some(Notation::Readline));
        assert!(options.xterm_keys);
        assert!(options.no_index);
        assert!(options.debug);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["-n"])).is_err());
        assert!(parse_args(&args(&["-n", "emacs"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_ignore_back() {
        assert!(ignore_back(Err(InputError::back())).is_ok());
        assert!(ignore_back(Err(InputError::quit())).unwrap_err().is_quit());
    }
}
