//! Line command parsing.

use oraculo_core::EditorField;

pub const HELP: &str = "\
commands:
  themes                     list themes
  add <name>                 add a theme and switch to it
  use <name>                 switch to a theme
  rename <old> => <new>      rename a theme (blank new name cancels)
  drop <name>                delete a theme and its notes (asks first)
  list                       show notes of the active theme
  new                        open the editor for a new note
  edit <n>                   open the editor on note #n
  title <text>               set the title draft
  content <text>             set the content draft
  focus title|content        move editor focus
  highlight <start> <end>    color characters [start, end) of the content
  save | cancel              close the editor
  delete <n>                 delete note #n
  search <term>              filter the active theme
  help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Themes,
    AddTheme(String),
    UseTheme(String),
    RenameTheme { old: String, new: String },
    DropTheme(String),
    List,
    New,
    Edit(usize),
    SetDraft(EditorField, String),
    Focus(EditorField),
    Highlight { start: usize, end: usize },
    Save,
    Cancel,
    Delete(usize),
    Search(String),
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parses one line. Errors are usage messages.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "" => Self::Empty,
            "themes" => Self::Themes,
            "add" => Self::AddTheme(rest.to_string()),
            "use" => Self::UseTheme(required(rest, "use <name>")?),
            "rename" => {
                let (old, new) = rest
                    .split_once("=>")
                    .ok_or_else(|| "usage: rename <old> => <new>".to_string())?;
                Self::RenameTheme {
                    old: required(old.trim(), "rename <old> => <new>")?,
                    new: new.trim().to_string(),
                }
            }
            "drop" => Self::DropTheme(required(rest, "drop <name>")?),
            "list" => Self::List,
            "new" => Self::New,
            "edit" => Self::Edit(index(rest, "edit <n>")?),
            "title" => Self::SetDraft(EditorField::Title, rest.to_string()),
            "content" => Self::SetDraft(EditorField::Content, rest.to_string()),
            "focus" => match rest {
                "title" => Self::Focus(EditorField::Title),
                "content" => Self::Focus(EditorField::Content),
                _ => return Err("usage: focus title|content".to_string()),
            },
            "highlight" => {
                let mut parts = rest.split_whitespace();
                let usage = "highlight <start> <end>";
                let start = index(parts.next().unwrap_or(""), usage)?;
                let end = index(parts.next().unwrap_or(""), usage)?;
                Self::Highlight { start, end }
            }
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "delete" => Self::Delete(index(rest, "delete <n>")?),
            "search" => Self::Search(rest.to_string()),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command `{other}`; type `help`")),
        };
        Ok(command)
    }
}

fn required(value: &str, usage: &str) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value.to_string())
    }
}

fn index(value: &str, usage: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("usage: {usage}"))
}
