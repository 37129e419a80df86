//! Console abstraction and prompt-until-valid primitives.
//!
//! Every interactive read in the crate goes through the `Console` trait so
//! the settings menu and filter configuration can be driven by scripted
//! input in tests. Invalid input is recovered locally by re-prompting and
//! never propagated as an error.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::filters::Direction;

/// Line-oriented console seam.
pub trait Console {
    /// Print `prompt` (no trailing newline) and read one line of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Print one line of output.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Real console backed by stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }
}

/// Scripted console for tests: pops canned inputs, records everything
/// printed (prompts and output lines) in order.
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    /// True if every scripted input was consumed.
    pub fn exhausted(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted")
        })
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}

/// Re-prompt until `parse` accepts the (trimmed) input.
pub fn prompt_until_valid<T>(
    console: &mut dyn Console,
    prompt: &str,
    error_msg: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> io::Result<T> {
    loop {
        let line = console.read_line(prompt)?;
        match parse(line.trim()) {
            Some(value) => return Ok(value),
            None => console.write_line(error_msg)?,
        }
    }
}

/// Prompt for an integer in `[min, max]`.
pub fn prompt_u32(
    console: &mut dyn Console,
    prompt: &str,
    min: u32,
    max: u32,
) -> io::Result<u32> {
    let error_msg = if max == u32::MAX {
        format!("Invalid input. Enter an integer >= {min}.")
    } else {
        format!("Invalid input. Enter an integer between {min} and {max}.")
    };
    prompt_until_valid(console, prompt, &error_msg, |s| {
        s.parse::<u32>().ok().filter(|v| *v >= min && *v <= max)
    })
}

/// Prompt for a comparison direction (`>=` or `<=`).
pub fn prompt_direction(console: &mut dyn Console, prompt: &str) -> io::Result<Direction> {
    prompt_until_valid(
        console,
        prompt,
        "Invalid input. Enter \">=\" or \"<=\".",
        Direction::parse,
    )
}

/// Prompt for a yes/no answer.
pub fn prompt_yes_no(console: &mut dyn Console, prompt: &str) -> io::Result<bool> {
    prompt_until_valid(
        console,
        prompt,
        "Invalid input. Enter \"y\" or \"n\".",
        |s| match s.to_ascii_lowercase().as_str() {
            "y" => Some(true),
            "n" => Some(false),
            _ => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_u32_accepts_first_valid_input() {
        let mut console = ScriptedConsole::new(&["42"]);
        let value = prompt_u32(&mut console, "n: ", 0, 100).unwrap();
        assert_eq!(value, 42);
        assert!(console.exhausted());
    }

    #[test]
    fn prompt_u32_reprompts_on_garbage_and_out_of_range() {
        let mut console = ScriptedConsole::new(&["abc", "-5", "101", "7"]);
        let value = prompt_u32(&mut console, "n: ", 1, 100).unwrap();
        assert_eq!(value, 7);
        // Three rejections, each followed by an error line.
        let errors = console
            .transcript
            .iter()
            .filter(|l| l.starts_with("Invalid input"))
            .count();
        assert_eq!(errors, 3);
    }

    #[test]
    fn prompt_direction_rejects_other_tokens() {
        let mut console = ScriptedConsole::new(&["==", ">", "<="]);
        let dir = prompt_direction(&mut console, "cmp: ").unwrap();
        assert_eq!(dir, Direction::AtMost);
    }

    #[test]
    fn prompt_yes_no_is_case_insensitive() {
        let mut console = ScriptedConsole::new(&["Y"]);
        assert!(prompt_yes_no(&mut console, "activate? ").unwrap());

        let mut console = ScriptedConsole::new(&["maybe", "N"]);
        assert!(!prompt_yes_no(&mut console, "activate? ").unwrap());
    }

    #[test]
    fn input_is_trimmed_before_parsing() {
        let mut console = ScriptedConsole::new(&["  12  "]);
        assert_eq!(prompt_u32(&mut console, "n: ", 0, 100).unwrap(), 12);
    }

    #[test]
    fn exhausted_script_surfaces_eof() {
        let mut console = ScriptedConsole::new(&[]);
        let err = prompt_u32(&mut console, "n: ", 0, 100).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
