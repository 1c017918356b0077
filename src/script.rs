//! Editing scripts.
//!
//! One command per line, a letter followed by an optional argument:
//!
//! ```text
//! i TEXT      type TEXT at dot (\n and \t escapes, \\ for a backslash)
//! a EXPR      jump to an address expression: /re/ ?re? N $
//! f TEXT      find the next literal occurrence
//! k ROW:COL   click (1-based)
//! K ROW:COL   double-click
//! b / D       backspace / forward delete
//! x y v d     cut, copy, paste, delete dot
//! u r         undo, redo
//! p P =       print dot, print everything, print dot address and state
//! s           mark saved
//! w PATH      write to PATH and mark saved
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use dotedit_core::{Address, Command, Session};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Run(Command),
    Type(String),
    DeleteDot,
    Print,
    PrintAll,
    Status,
    MarkSaved,
    Write(PathBuf),
}

/// Parses a whole script.
pub fn parse(script: &str) -> anyhow::Result<Vec<Step>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(i, line)| parse_line(line).with_context(|| format!("script line {}", i + 1)))
        .collect()
}

/// Parses one command.
pub fn parse_line(line: &str) -> anyhow::Result<Step> {
    let line = line.trim_start();
    let mut chars = line.chars();
    let Some(op) = chars.next() else {
        bail!("empty command");
    };
    let arg = chars.as_str().strip_prefix(' ').unwrap_or(chars.as_str());

    let step = match op {
        'i' => Step::Type(unescape(arg)),
        'a' => Step::Run(Command::JumpTo(arg.to_string())),
        'f' => Step::Run(Command::FindNext(unescape(arg))),
        'k' => Step::Run(Command::Click(parse_address(arg)?)),
        'K' => Step::Run(Command::DoubleClick(parse_address(arg)?)),
        'b' => Step::Run(Command::Backspace),
        'D' => Step::Run(Command::Delete),
        'x' => Step::Run(Command::Cut),
        'y' => Step::Run(Command::Copy),
        'v' => Step::Run(Command::Paste),
        'u' => Step::Run(Command::Undo),
        'r' => Step::Run(Command::Redo),
        'p' => Step::Print,
        'P' => Step::PrintAll,
        '=' => Step::Status,
        's' => Step::MarkSaved,
        'd' => Step::DeleteDot,
        'w' if !arg.trim().is_empty() => Step::Write(PathBuf::from(arg.trim())),
        'w' => bail!("w needs a path"),
        other => bail!("unknown command {:?}", other),
    };
    Ok(step)
}

/// Runs `steps` against `session`, writing output to `out`.
pub fn run(session: &mut Session, steps: &[Step], out: &mut impl Write) -> anyhow::Result<()> {
    for step in steps {
        match step {
            Step::Run(command) => {
                if !session.execute(command.clone()) {
                    tracing::info!("{} had no effect", command.display_name());
                }
            }
            Step::DeleteDot => {
                session.delete_selection(session.dot());
            }
            Step::Type(text) => {
                for c in text.chars() {
                    let command = if c == '\n' {
                        Command::Newline
                    } else {
                        Command::Insert(c)
                    };
                    session.execute(command);
                }
            }
            Step::Print => writeln!(out, "{}", session.dot_text())?,
            Step::PrintAll => writeln!(out, "{}", session.contents())?,
            Step::Status => {
                let modified = if session.is_modified_since_save() { "modified" } else { "saved" };
                writeln!(out, "{} {}", session.dot(), modified)?;
            }
            Step::MarkSaved => session.mark_saved(),
            Step::Write(path) => session
                .save_to(path)
                .with_context(|| format!("writing {}", path.display()))?,
        }
    }
    Ok(())
}

fn parse_address(arg: &str) -> anyhow::Result<Address> {
    let (row, col) = arg
        .trim()
        .split_once(':')
        .with_context(|| format!("expected ROW:COL, got {:?}", arg))?;
    let row: usize = row.parse().with_context(|| format!("bad row {:?}", row))?;
    let col: usize = col.parse().with_context(|| format!("bad column {:?}", col))?;
    if row == 0 || col == 0 {
        bail!("rows and columns start at 1");
    }
    Ok(Address::new(row - 1, col - 1))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(initial: &str, script: &str) -> (Session, String) {
        let mut session = Session::new();
        session.load(initial.as_bytes());
        let steps = parse(script).unwrap();
        let mut out = Vec::new();
        run(&mut session, &steps, &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("u").unwrap(), Step::Run(Command::Undo));
        assert_eq!(parse_line("i a\\nb").unwrap(), Step::Type("a\nb".into()));
        assert_eq!(
            parse_line("k 2:3").unwrap(),
            Step::Run(Command::Click(Address::new(1, 2)))
        );
        assert_eq!(
            parse_line("a /fo+/").unwrap(),
            Step::Run(Command::JumpTo("/fo+/".into()))
        );
        assert!(parse_line("k 0:1").is_err());
        assert!(parse_line("w").is_err());
        assert!(parse_line("z").is_err());
    }

    #[test]
    fn test_parse_skips_comments() {
        let steps = parse("# setup\n\nu\n  # indented\nr\n").unwrap();
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = parse("u\nq\n").unwrap_err();
        assert!(format!("{:#}", err).contains("script line 2"));
    }

    #[test]
    fn test_run_edits_and_prints() {
        let (session, out) = run_script("foo bar foo", "f bar\np\nd\ni baz\nP\n");
        assert_eq!(session.contents(), "foo baz foo");
        assert_eq!(out, "bar\nfoo baz foo\n");
    }

    #[test]
    fn test_run_undo_and_status() {
        let (session, out) = run_script("", "i hello\nu\n=\n");
        assert_eq!(session.contents(), "");
        assert_eq!(out, "1:1 saved\n");
    }

    #[test]
    fn test_run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let script = format!("i data\nw {}\n", path.display());
        let (session, _) = run_script("", &script);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
        assert!(!session.is_modified_since_save());
    }
}
