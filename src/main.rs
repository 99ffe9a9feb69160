use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use comparison_heap::{persist, ComparisonHeap, HeapError, Oracle, Tree};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "
    add NAME        Add item with NAME
    del INDEX       Delete item at INDEX
    mv INDEX        Move item at INDEX (compare it again)
    rn INDEX NAME   Rename item at INDEX to NAME
    show            Print the heap
    save [PATH]     Save to PATH, or to the opened file
    q               Save and quit
    q!              Quit without saving";

#[derive(Parser, Debug)]
#[command(
    name = "comparison-heap",
    about = "Keep a to-do list ordered by your own pairwise choices"
)]
struct Cli {
    /// Saved heap to open (one pre-order token per line).
    file: Option<PathBuf>,
    /// Save to this path instead of FILE.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log heap operations at debug level (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

/// Writes a prompt and flushes it; failure is logged, not fatal.
fn prompt<W: Write>(out: &mut W, text: &str) {
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        warn!(%err, "failed to show prompt");
    }
}

/// Asks the person at the terminal which of two items matters more.
struct PromptOracle;

impl Oracle for PromptOracle {
    fn is_higher(&mut self, a: &str, b: &str) -> bool {
        println!("1. {a}");
        println!("2. {b}");
        loop {
            prompt(&mut io::stdout(), "Higher priority: ");

            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => {
                    warn!(a, b, "input closed during a comparison, keeping existing order");
                    return false;
                }
                Err(err) => {
                    warn!(%err, "failed to read answer, keeping existing order");
                    return false;
                }
                Ok(_) => match line.trim() {
                    "1" => return true,
                    "2" => return false,
                    _ => continue,
                },
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Add(String),
    Delete(usize),
    Move(usize),
    Rename(usize, String),
    Show,
    Save(Option<PathBuf>),
    Help,
    Quit,
    ForceQuit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum CommandError {
    #[error("Command not recognized: {0:?}\nType \"help\" for a list of commands.")]
    Unrecognized(String),
    #[error("Missing {0}.")]
    MissingArgument(&'static str),
    #[error("Not an index: {0:?}")]
    BadIndex(String),
}

fn parse_index(text: &str) -> Result<usize, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument("INDEX"));
    }
    text.parse()
        .map_err(|_| CommandError::BadIndex(text.to_owned()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb {
            "" | "show" | "ls" => Ok(Command::Show),
            "add" if rest.is_empty() => Err(CommandError::MissingArgument("NAME")),
            "add" => Ok(Command::Add(rest.to_owned())),
            "del" => parse_index(rest).map(Command::Delete),
            "mv" => parse_index(rest).map(Command::Move),
            "rn" => {
                let (index, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let index = parse_index(index)?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(CommandError::MissingArgument("NAME"));
                }
                Ok(Command::Rename(index, name.to_owned()))
            }
            "save" if rest.is_empty() => Ok(Command::Save(None)),
            "save" => Ok(Command::Save(Some(PathBuf::from(rest)))),
            "help" | "?" => Ok(Command::Help),
            "q" | "quit" => Ok(Command::Quit),
            "q!" => Ok(Command::ForceQuit),
            other => Err(CommandError::Unrecognized(other.to_owned())),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session<O> {
    heap: ComparisonHeap<O>,
    target: Option<PathBuf>,
    altered: bool,
}

impl<O: Oracle> Session<O> {
    fn run(&mut self) -> Result<()> {
        self.show();
        println!("Type \"help\" for a list of commands.");

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                return self.finish();
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };

            if let Flow::Quit = self.execute(command)? {
                return Ok(());
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Add(name) => {
                let index = self.heap.insert(&name);
                self.altered = true;
                self.show();
                println!("Inserted at {index}: {name}");
            }
            Command::Delete(index) => {
                let result = self.heap.delete(index);
                if let Some(key) = self.report(result) {
                    self.altered = true;
                    self.show();
                    println!("Deleted: {key}");
                }
            }
            Command::Move(index) => {
                let result = self.heap.move_item(index);
                if let Some((key, to)) = self.report(result) {
                    self.altered = true;
                    self.show();
                    println!("Moved to {to}: {key}");
                }
            }
            Command::Rename(index, name) => {
                let result = self.heap.rename(index, &name);
                if self.report(result).is_some() {
                    self.altered = true;
                    self.show();
                    println!("Renamed: {name}");
                }
            }
            Command::Show => self.show(),
            Command::Help => println!("{HELP}"),
            Command::Save(path) => {
                if let Err(err) = self.save_to(path) {
                    println!("{err:#}");
                }
            }
            Command::Quit => {
                if !self.altered {
                    return Ok(Flow::Quit);
                }
                match self.save_to(None) {
                    Ok(()) => return Ok(Flow::Quit),
                    Err(err) => println!("{err:#}\nUse \"save PATH\", or \"q!\" to discard changes."),
                }
            }
            Command::ForceQuit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Prints a failed heap operation and turns it into `None`.
    fn report<T>(&self, result: Result<T, HeapError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(_) if self.heap.is_empty() => {
                println!("Heap is empty.");
                None
            }
            Err(err) => {
                println!("{err}");
                None
            }
        }
    }

    fn show(&self) {
        if self.heap.is_empty() {
            println!("Heap is empty.");
        } else {
            print!("{}", self.heap.tree());
        }
    }

    /// Saves to `path`, or to the session's file when `path` is `None`.
    ///
    /// An explicit path must not name an existing file other than the
    /// session's own.
    fn save_to(&mut self, path: Option<PathBuf>) -> Result<()> {
        let path = match (path, &self.target) {
            (Some(path), Some(target)) if &path == target => path,
            (Some(path), _) if path.exists() => {
                anyhow::bail!("File already exists: {}", path.display())
            }
            (Some(path), _) => path,
            (None, Some(target)) => target.clone(),
            (None, None) => anyhow::bail!("No file to save to."),
        };

        persist::save(self.heap.tree(), &path)
            .with_context(|| format!("Invalid path: {}", path.display()))?;
        info!(path = %path.display(), len = self.heap.len(), "saved heap");
        println!("Saved: {}", path.display());

        self.target = Some(path);
        self.altered = false;
        Ok(())
    }

    /// End of input: save if there is somewhere to save to.
    fn finish(&mut self) -> Result<()> {
        if !self.altered {
            return Ok(());
        }
        if self.target.is_some() {
            return self.save_to(None);
        }
        warn!(len = self.heap.len(), "input closed with unsaved changes");
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let tree = match &cli.file {
        Some(path) => persist::load(path)
            .with_context(|| format!("failed to open heap file {}", path.display()))?,
        None => Tree::new(),
    };
    info!(len = tree.len(), "opened heap");

    let mut session = Session {
        heap: ComparisonHeap::with_tree(tree, PromptOracle),
        target: cli.output.or(cli.file),
        altered: false,
    };
    session.run()
}
