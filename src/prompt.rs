use anyhow::{Context, Result, bail};
use core_types::{OutputFormat, parse_query_number};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Line-based interactive questions on any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns the trimmed answer. End of input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            bail!("Input ended while waiting for an answer to: {question}");
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer is yes/y or no/n (any case).
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{question} (yes/no):"))?;
            match answer.to_ascii_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => writeln!(self.output, "Please answer 'yes' or 'no'.")?,
            }
        }
    }

    /// Offers the default input paths and asks for custom ones if they are declined.
    pub fn input_paths(&mut self, rooms: &Path, students: &Path) -> Result<(PathBuf, PathBuf)> {
        let question = format!(
            "Use default paths ({}, {})?",
            rooms.display(),
            students.display()
        );
        if self.confirm(&question)? {
            return Ok((rooms.to_path_buf(), students.to_path_buf()));
        }

        let rooms = self.ask("Path to the rooms JSON file:")?;
        let students = self.ask("Path to the students JSON file:")?;
        if rooms.is_empty() || students.is_empty() {
            bail!("Input file paths must not be empty");
        }
        Ok((PathBuf::from(rooms), PathBuf::from(students)))
    }

    /// Asks for a report number; anything outside `1..=available` fails.
    pub fn query_number(&mut self, available: usize) -> Result<usize> {
        let answer = self.ask(&format!("Query number (1-{available}):"))?;
        parse_query_number(&answer, available).context("Invalid query selection")
    }

    /// Asks for `json` or `xml`, case-insensitive; anything else fails.
    pub fn output_format(&mut self) -> Result<OutputFormat> {
        let answer = self.ask("Output format (json/xml):")?;
        answer
            .parse::<OutputFormat>()
            .context("Invalid output format")
    }
}
