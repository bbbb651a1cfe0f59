//! Interactive terminal front end for the note store.
//!
//! Reads one command per line from stdin. The store redraws through
//! [`render::TerminalRenderer`] whenever it changes.

mod command;
mod render;
mod session;

use command::Command;
use oraculo_core::db::open_db;
use oraculo_core::{
    init_logging, LocalStorageNotebookRepository, NoteStore, OraculoConfig, SqliteLocalStorage,
};
use render::TerminalRenderer;
use session::Flow;
use std::error::Error;
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn Error>> {
    let config = OraculoConfig::from_env();
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = open_db(&config.db_path)?;
    let storage = SqliteLocalStorage::try_new(&conn)?;
    let mut store = NoteStore::new(LocalStorageNotebookRepository::new(storage))
        .with_highlight_color(&config.highlight_color);
    store.subscribe(Box::new(TerminalRenderer));

    println!("oraculo {} ({})", oraculo_core::core_version(), config.db_path.display());
    store.load_all();
    let mut stdout = io::stdout();
    for warning in store.take_warnings() {
        writeln!(stdout, "warning: {}", warning.message)?;
    }
    writeln!(stdout, "type `help` for commands")?;

    let mut lines = io::stdin().lock().lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        match Command::parse(&line?) {
            Ok(command) => {
                if session::execute(&mut store, command, &mut lines, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            Err(usage) => writeln!(stdout, "{usage}")?,
        }
    }
    log::info!("event=cli_exit module=cli status=ok");
    Ok(())
}
