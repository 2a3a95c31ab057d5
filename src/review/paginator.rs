//! Generic interactive pager.
//!
//! The pager knows nothing about what it pages over. A [`Displayer`] renders
//! slices and the summary; the pager owns page arithmetic and the prompt.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::ReviewError;

/// Something that can be reviewed page by page.
pub trait Displayer {
    /// Number of items to page over.
    fn total(&self) -> usize;

    /// Renders items `start..end`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn render(&self, start: usize, end: usize, out: &mut dyn Write) -> std::io::Result<()>;

    /// Renders the closing summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn summary(&self, out: &mut dyn Write) -> std::io::Result<()>;
}

/// A command entered at the page prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    /// Advance one page.
    Next,
    /// Go back one page.
    Previous,
    /// Stop reviewing.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl ReviewCommand {
    /// Parses one line of input.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "q" | "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// How a review ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Every page was shown and acknowledged.
    Completed,
    /// The reviewer quit early, or input ended.
    Quit,
}

/// Interactive pager over a [`Displayer`].
#[derive(Debug)]
pub struct ReviewPaginator<R, W> {
    input: R,
    output: W,
    page_size: usize,
}

impl<R: BufRead, W: Write> ReviewPaginator<R, W> {
    /// Creates a pager.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero.
    pub fn new(input: R, output: W, page_size: usize) -> Result<Self, ReviewError> {
        if page_size == 0 {
            return Err(ReviewError::ZeroPageSize);
        }
        Ok(Self {
            input,
            output,
            page_size,
        })
    }

    /// Runs the review loop until the last page is acknowledged or the
    /// reviewer quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    pub fn run(&mut self, displayer: &dyn Displayer) -> Result<ReviewOutcome, ReviewError> {
        let total = displayer.total();
        if total == 0 {
            displayer.summary(&mut self.output)?;
            self.output.flush()?;
            return Ok(ReviewOutcome::Completed);
        }

        let pages = total.div_ceil(self.page_size);
        let mut page = 0;

        loop {
            let start = page * self.page_size;
            let end = (start + self.page_size).min(total);
            debug!("Rendering page {} of {pages} (items {start}..{end})", page + 1);
            displayer.render(start, end, &mut self.output)?;

            if page + 1 == pages {
                displayer.summary(&mut self.output)?;
                write!(self.output, "Press Enter to finish ")?;
                self.output.flush()?;
                self.read_line()?;
                return Ok(ReviewOutcome::Completed);
            }

            loop {
                write!(
                    self.output,
                    "[page {}/{pages}] Enter: next, p: previous, q: quit > ",
                    page + 1
                )?;
                self.output.flush()?;

                let Some(line) = self.read_line()? else {
                    displayer.summary(&mut self.output)?;
                    return Ok(ReviewOutcome::Quit);
                };

                match ReviewCommand::parse(&line) {
                    ReviewCommand::Next => {
                        page += 1;
                        break;
                    }
                    ReviewCommand::Previous if page > 0 => {
                        page -= 1;
                        break;
                    }
                    ReviewCommand::Previous => {}
                    ReviewCommand::Quit => {
                        displayer.summary(&mut self.output)?;
                        return Ok(ReviewOutcome::Quit);
                    }
                    ReviewCommand::Unknown(input) => {
                        writeln!(self.output, "Unknown command: {input}")?;
                    }
                }
            }
        }
    }

    /// Consumes the pager and returns its output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one line, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, ReviewError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Letters(Vec<&'static str>);

    impl Displayer for Letters {
        fn total(&self) -> usize {
            self.0.len()
        }

        fn render(&self, start: usize, end: usize, out: &mut dyn Write) -> std::io::Result<()> {
            writeln!(out, "<{}>", self.0[start..end].join(","))
        }

        fn summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
            writeln!(out, "SUMMARY")
        }
    }

    fn review(items: Vec<&'static str>, page_size: usize, input: &str) -> (ReviewOutcome, String) {
        let mut pager = ReviewPaginator::new(Cursor::new(input.to_string()), Vec::new(), page_size)
            .expect("page size is positive");
        let outcome = pager.run(&Letters(items)).expect("review should succeed");
        let output = String::from_utf8(pager.into_output()).expect("output is utf-8");
        (outcome, output)
    }

    #[test]
    fn test_command_grammar() {
        assert_eq!(ReviewCommand::parse("\n"), ReviewCommand::Next);
        assert_eq!(ReviewCommand::parse("p"), ReviewCommand::Previous);
        assert_eq!(ReviewCommand::parse("prev\n"), ReviewCommand::Previous);
        assert_eq!(ReviewCommand::parse("previous"), ReviewCommand::Previous);
        assert_eq!(ReviewCommand::parse("q"), ReviewCommand::Quit);
        assert_eq!(ReviewCommand::parse("quit"), ReviewCommand::Quit);
        assert_eq!(ReviewCommand::parse(" exit "), ReviewCommand::Quit);
        assert_eq!(ReviewCommand::parse("x"), ReviewCommand::Unknown("x".to_string()));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = ReviewPaginator::new(Cursor::new(String::new()), Vec::new(), 0);
        assert!(matches!(result, Err(ReviewError::ZeroPageSize)));
    }

    #[test]
    fn test_walks_to_last_page() {
        let (outcome, output) = review(vec!["a", "b", "c"], 1, "\n\n\n");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert!(output.contains("<a>"));
        assert!(output.contains("<b>"));
        assert!(output.contains("<c>"));
        assert_eq!(output.matches("SUMMARY").count(), 1);
        assert!(output.ends_with("Press Enter to finish "));
    }

    #[test]
    fn test_last_page_is_partial() {
        let (_, output) = review(vec!["a", "b", "c"], 2, "\n\n");
        assert!(output.contains("<a,b>"));
        assert!(output.contains("<c>"));
    }

    #[test]
    fn test_previous_goes_back() {
        let (outcome, output) = review(vec!["a", "b", "c"], 1, "\np\n\n\n\n");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert_eq!(output.matches("<a>").count(), 2);
        assert_eq!(output.matches("<b>").count(), 2);
    }

    #[test]
    fn test_previous_on_first_page_is_noop() {
        let (outcome, output) = review(vec!["a", "b"], 1, "p\n\n\n");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert_eq!(output.matches("<a>").count(), 1);
        assert_eq!(output.matches("[page 1/2]").count(), 2);
    }

    #[test]
    fn test_quit_prints_summary() {
        let (outcome, output) = review(vec!["a", "b", "c"], 1, "q\n");
        assert_eq!(outcome, ReviewOutcome::Quit);
        assert!(!output.contains("<b>"));
        assert!(output.ends_with("SUMMARY\n"));
    }

    #[test]
    fn test_eof_acts_as_quit() {
        let (outcome, output) = review(vec!["a", "b"], 1, "");
        assert_eq!(outcome, ReviewOutcome::Quit);
        assert!(output.contains("SUMMARY"));
    }

    #[test]
    fn test_unknown_command_reprompts() {
        let (outcome, output) = review(vec!["a", "b"], 1, "zzz\n\n\n");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert!(output.contains("Unknown command: zzz"));
        assert_eq!(output.matches("<a>").count(), 1);
    }

    #[test]
    fn test_single_page_needs_acknowledgment() {
        let (outcome, output) = review(vec!["a"], 5, "");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert!(output.contains("<a>"));
        assert!(output.contains("SUMMARY"));
    }

    #[test]
    fn test_empty_input_prints_summary_only() {
        let (outcome, output) = review(Vec::new(), 1, "");
        assert_eq!(outcome, ReviewOutcome::Completed);
        assert_eq!(output, "SUMMARY\n");
    }
}
