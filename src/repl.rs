// repl.rs

use crate::completion::CommandCompleter;
use crate::session::{render, CommandOutput, Session};
use crate::util::writeln_ignore_broken_pipe;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use tracing::error;

pub fn start_repl(session: &mut Session) -> anyhow::Result<()> {
    let config = Config::builder().completion_type(CompletionType::List).build();
    let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(CommandCompleter));

    let out = std::io::stdout();
    writeln_ignore_broken_pipe(&out, "Enhanced Calculator")?;
    writeln_ignore_broken_pipe(&out, "Type 'help' for available commands or 'exit' to quit.\n")?;
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                let Some(outcome) = session.handle_line(&line) else {
                    continue;
                };
                writeln_ignore_broken_pipe(&out, render(&outcome))?;
                if matches!(outcome, Ok(CommandOutput::Exit)) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                writeln_ignore_broken_pipe(&out, "\nGoodbye!")?;
                break;
            }
            Err(err) => {
                error!("Unexpected error in REPL: {}", err);
                return Err(err.into());
            }
        }
    }
    Ok(())
}
