//! Interactive session. The inventory is loaded once at start and kept in
//! memory; `reload` is the only way to pick up changes made elsewhere.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::dashboard::DashboardClient;
use crate::form::{EditForm, ProductForm};
use crate::render::{render, ReloadHint, RenderOptions};

const HELP: &str = "\
Commands:
  list                                   show the inventory
  low                                    show low-stock products only
  reload                                 fetch the inventory again
  add name=<text> price=<n> stock=<n> [threshold=<n>] [category=<text>]
  edit <id> [name=<text>] [price=<n>] [stock=<n>]
  delete <id>
  help
  quit
Quote values containing spaces: name=\"Desk Lamp\"";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Empty,
    List,
    Low,
    Reload,
    Add(ProductForm),
    Edit { id: String, form: EditForm },
    Delete(String),
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let words = split_words(line)?;
        let Some((head, rest)) = words.split_first() else {
            return Ok(ShellCommand::Empty);
        };

        match head.as_str() {
            "list" | "ls" => Ok(ShellCommand::List),
            "low" => Ok(ShellCommand::Low),
            "reload" => Ok(ShellCommand::Reload),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            "add" => {
                let mut form = ProductForm::default();
                for (key, value) in assignments(rest)? {
                    form.set(&key, value).map_err(|e| e.to_string())?;
                }
                Ok(ShellCommand::Add(form))
            }
            "edit" => {
                let (id, rest) = rest.split_first().ok_or("usage: edit <id> [field=value...]")?;
                let mut form = EditForm::default();
                for (key, value) in assignments(rest)? {
                    form.set(&key, value).map_err(|e| e.to_string())?;
                }
                Ok(ShellCommand::Edit {
                    id: id.clone(),
                    form,
                })
            }
            "delete" | "rm" => match rest {
                [id] => Ok(ShellCommand::Delete(id.clone())),
                _ => Err("usage: delete <id>".to_string()),
            },
            other => Err(format!("Unknown command: {other} (try `help`)")),
        }
    }
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn assignments(words: &[String]) -> Result<Vec<(String, String)>, String> {
    words
        .iter()
        .map(|word| {
            word.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| format!("Expected field=value, got {word:?}"))
        })
        .collect()
}

/// Runs the session until `quit` or end of input. The dashboard must already be mounted.
pub async fn run_shell<R, W>(
    dashboard: &DashboardClient,
    input: R,
    out: &mut W,
    default_threshold: u32,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let shell_view = RenderOptions {
        reload_hint: ReloadHint::Shell,
        low_stock_only: false,
    };
    writeln!(out, "{}", render(&dashboard.snapshot().await?, shell_view))?;
    writeln!(out, "Type `help` for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::List => {}
            ShellCommand::Low => {
                let options = RenderOptions {
                    low_stock_only: true,
                    ..shell_view
                };
                write!(out, "{}", render(&dashboard.snapshot().await?, options))?;
                continue;
            }
            ShellCommand::Reload => {
                // A failed reload is shown by the error panel below.
                let _ = dashboard.load().await;
            }
            ShellCommand::Add(form) => match form.validate(default_threshold) {
                Ok(payload) => {
                    if let Ok(product) = dashboard.add(payload).await {
                        writeln!(out, "Added {} ({})", product.name, product.id)?;
                    }
                }
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            },
            ShellCommand::Edit { id, form } => match form.validate() {
                Ok(patch) => {
                    if let Ok(product) = dashboard.edit(id, patch).await {
                        writeln!(out, "Updated {} ({})", product.name, product.id)?;
                    }
                }
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            },
            ShellCommand::Delete(id) => {
                if dashboard.delete(id.clone()).await.is_ok() {
                    writeln!(out, "Deleted {id}")?;
                }
            }
        }

        write!(out, "{}", render(&dashboard.snapshot().await?, shell_view))?;
    }

    writeln!(out)?;
    Ok(())
}
