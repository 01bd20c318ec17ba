//! Declarative checks over pairs of flags, evaluated before any I/O.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Either both flags have a value or neither has.
    BothOrNeither,
}

#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub rule: Rule,
    pub flags: [&'static str; 2],
}

pub const CREDENTIAL_PAIR: FlagRule = FlagRule {
    rule: Rule::BothOrNeither,
    flags: ["aws-access-key-id", "aws-secret-access-key"],
};

pub const DATE_RANGE: FlagRule = FlagRule {
    rule: Rule::BothOrNeither,
    flags: ["start", "end"],
};

impl FlagRule {
    /// Check the values bound to `self.flags`, in the same order.
    pub fn check(&self, values: [&str; 2]) -> Result<(), String> {
        match self.rule {
            Rule::BothOrNeither => {
                if values[0].is_empty() != values[1].is_empty() {
                    Err(format!(
                        "The flag {} and {} should be set or not set at the same time",
                        self.flags[0], self.flags[1]
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Evaluate every rule and report the first violation as a usage error.
pub fn evaluate<'a, I>(checks: I, command_path: &str) -> Result<(), Error>
where
    I: IntoIterator<Item = (&'a FlagRule, [&'a str; 2])>,
{
    for (rule, values) in checks {
        rule.check(values)
            .map_err(|message| Error::usage(command_path, message))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_or_neither() {
        assert!(CREDENTIAL_PAIR.check(["", ""]).is_ok());
        assert!(CREDENTIAL_PAIR.check(["AKIA", "secret"]).is_ok());

        let err = CREDENTIAL_PAIR.check(["AKIA", ""]).unwrap_err();
        assert_eq!(
            err,
            "The flag aws-access-key-id and aws-secret-access-key should be set or not set at the same time"
        );
        assert!(CREDENTIAL_PAIR.check(["", "secret"]).is_err());
    }

    #[test]
    fn test_evaluate_reports_first_violation() {
        let err = evaluate(
            [(&CREDENTIAL_PAIR, ["", ""]), (&DATE_RANGE, ["2026-01-01", ""])],
            "osd-utils-cli cost get",
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("The flag start and end"));
        assert!(message.contains("See 'osd-utils-cli cost get -h' for help and examples"));
    }
}
