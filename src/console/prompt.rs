//! Prompt helpers shared by every screen. Invalid input re-prompts in place.

use crate::validate::parse_yes_no;
use crate::RentalResult;

use super::Terminal;

pub fn banner<T: Terminal + ?Sized>(term: &mut T, title: &str) -> RentalResult<()> {
    let rule = "*".repeat(55);
    term.write_line("")?;
    term.write_line(&rule)?;
    term.write_line(&format!("{title:^55}"))?;
    term.write_line(&rule)?;
    term.write_line("")
}

pub fn ask<T: Terminal + ?Sized>(term: &mut T, prompt: &str) -> RentalResult<String> {
    term.write_line(prompt)?;
    term.read_line()
}

/// Asks until `parse` accepts the answer.
pub fn ask_valid<T, V, F>(term: &mut T, prompt: &str, invalid: &str, mut parse: F) -> RentalResult<V>
where
    T: Terminal + ?Sized,
    F: FnMut(&str) -> Option<V>,
{
    loop {
        let answer = ask(term, prompt)?;
        match parse(&answer) {
            Some(value) => return Ok(value),
            None => term.write_line(invalid)?,
        }
    }
}

/// Yes/no question; anything else is asked again.
pub fn confirm<T: Terminal + ?Sized>(term: &mut T, prompt: &str) -> RentalResult<bool> {
    ask_valid(term, prompt, "Invalid input", parse_yes_no)
}

/// Asks for a value twice and returns it once both entries match.
///
/// On a mismatch the operator may retry or give up, in which case `None`
/// is returned.
pub fn ask_twice<T, V, F>(
    term: &mut T,
    prompt: &str,
    repeat_prompt: &str,
    invalid: &str,
    mut parse: F,
) -> RentalResult<Option<V>>
where
    T: Terminal + ?Sized,
    V: PartialEq,
    F: FnMut(&str) -> Option<V>,
{
    loop {
        let first = ask_valid(term, prompt, invalid, &mut parse)?;
        let second = ask_valid(term, repeat_prompt, invalid, &mut parse)?;
        if first == second {
            return Ok(Some(first));
        }
        term.write_line("Entries do not match!")?;
        if !confirm(term, "Would you like to try again? (y/n): ")? {
            return Ok(None);
        }
    }
}

/// Numeric menu selection.
pub fn read_choice<T: Terminal + ?Sized>(term: &mut T) -> RentalResult<u32> {
    ask_valid(
        term,
        "Please make your choice: ",
        "Your input is invalid!",
        |answer| answer.parse().ok(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LineTerminal;
    use crate::validate::parse_positive;
    use std::io::Cursor;

    fn terminal(input: &str) -> LineTerminal<Cursor<String>, Vec<u8>> {
        LineTerminal::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn output(term: LineTerminal<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(term.into_output()).unwrap()
    }

    #[test]
    fn ask_valid_reprompts_until_accepted() {
        let mut term = terminal("\n3a\n2\n");
        let qty = ask_valid(&mut term, "Copies?", "Invalid input", parse_positive).unwrap();
        assert_eq!(qty, 2);
        assert_eq!(output(term).matches("Invalid input").count(), 2);
    }

    #[test]
    fn confirm_ignores_other_answers() {
        let mut term = terminal("maybe\nN\n");
        assert!(!confirm(&mut term, "Sure?").unwrap());
    }

    #[test]
    fn ask_twice_gives_up_on_request() {
        let mut term = terminal("one\ntwo\nn\n");
        let value = ask_twice(&mut term, "Name:", "Again:", "Invalid", |s| {
            Some(s.to_string())
        })
        .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn ask_twice_retries_after_mismatch() {
        let mut term = terminal("one\ntwo\ny\nthree\nthree\n");
        let value = ask_twice(&mut term, "Name:", "Again:", "Invalid", |s| {
            Some(s.to_string())
        })
        .unwrap();
        assert_eq!(value.as_deref(), Some("three"));
    }

    #[test]
    fn read_choice_skips_non_numbers() {
        let mut term = terminal("x\n20\n");
        assert_eq!(read_choice(&mut term).unwrap(), 20);
    }
}
