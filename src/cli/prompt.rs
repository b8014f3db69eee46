use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stderr; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> bool {
    confirm_with(question, &mut io::stdin().lock(), &mut io::stderr())
}

fn confirm_with(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    if write!(output, "{question} [y/N] ").and_then(|()| output.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
