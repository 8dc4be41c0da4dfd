use anyhow::{bail, Result};
use std::io::{BufRead, Write};
use websearch::SearchItem;

/// `y`/`yes` or `n`/`no`, any case.
pub fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub fn show_item<W: Write>(out: &mut W, rank: usize, item: &SearchItem) -> Result<()> {
    writeln!(out, "Result {rank}")?;
    writeln!(out, "[")?;
    writeln!(out, " URL: {}", item.link)?;
    writeln!(out, " Title: {}", item.title)?;
    writeln!(out, " Summary: {}", item.snippet)?;
    writeln!(out, "]")?;
    Ok(())
}

/// Show one result and ask until the user gives a valid answer.
pub fn ask_relevance<R: BufRead, W: Write>(input: &mut R, out: &mut W, rank: usize, item: &SearchItem) -> Result<bool> {
    show_item(out, rank, item)?;
    loop {
        write!(out, "Relevant (Y/N)? ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before all results were judged");
        }
        if let Some(answer) = parse_answer(&line) {
            return Ok(answer);
        }
    }
}
