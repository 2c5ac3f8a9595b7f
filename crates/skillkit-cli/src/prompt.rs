use std::io::{BufRead, Write};

/// Line-oriented prompts. Questions go to stderr so stdout stays usable for
/// `--json`; answers are read one line at a time. End of input reads as an
/// empty answer, which every confirmation treats as "no".
pub struct Prompter<R> {
    input: R,
}

impl Prompter<std::io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{question} ")?;
        stderr.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        for a in ["y", "Y", "yes", " YES "] {
            assert!(is_yes(a), "{a}");
        }
        for a in ["", "n", "no", "yep"] {
            assert!(!is_yes(a), "{a}");
        }
    }

    #[test]
    fn reads_answers_in_order_and_eof_is_no() {
        let mut p = Prompter::new("2\ny\n".as_bytes());
        assert_eq!(p.ask("Select:").unwrap(), "2");
        assert!(p.confirm("Continue?").unwrap());
        assert!(!p.confirm("Push?").unwrap());
    }
}
