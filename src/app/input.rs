use crate::transport::ClientCommand;
use std::fmt;
use std::num::IntErrorKind;

/// Longest value the count field accepts, in digits
const MAX_INPUT_LEN: usize = 9;

/// Customer-count text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountInput {
    value: String,
}

impl CountInput {
    pub fn new(initial: u32) -> Self {
        Self {
            value: initial.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Append a digit. Other characters are refused.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.value.len() >= MAX_INPUT_LEN {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.value.pop()
    }
}

/// Rejected start parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartRequestError {
    /// Input is empty or not an integer
    NotANumber(String),
    /// Integer outside `1..=max`
    OutOfRange { value: String, max: u32 },
}

impl fmt::Display for StartRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartRequestError::NotANumber(input) => {
                write!(f, "Please enter a valid customer count (got '{}')", input)
            }
            StartRequestError::OutOfRange { value, max } => {
                write!(f, "Customer count must be between 1 and {} (got {})", max, value)
            }
        }
    }
}

impl std::error::Error for StartRequestError {}

/// Validated start-simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    pub customer_count: u32,
}

impl StartRequest {
    /// Validate the customer-count field
    pub fn parse(input: &str, max_customers: u32) -> Result<Self, StartRequestError> {
        let trimmed = input.trim();

        let value = match trimmed.parse::<i64>() {
            Ok(value) => value,
            Err(e) => {
                return Err(match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        StartRequestError::OutOfRange {
                            value: trimmed.to_string(),
                            max: max_customers,
                        }
                    }
                    _ => StartRequestError::NotANumber(trimmed.to_string()),
                })
            }
        };

        if value < 1 || value > i64::from(max_customers) {
            return Err(StartRequestError::OutOfRange {
                value: trimmed.to_string(),
                max: max_customers,
            });
        }

        Ok(Self {
            customer_count: value as u32,
        })
    }

    pub fn command(&self) -> ClientCommand {
        ClientCommand::start(self.customer_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(
            StartRequest::parse("25", 100),
            Ok(StartRequest { customer_count: 25 })
        );
        assert_eq!(
            StartRequest::parse(" 1 ", 100),
            Ok(StartRequest { customer_count: 1 })
        );
        assert_eq!(
            StartRequest::parse("100", 100),
            Ok(StartRequest { customer_count: 100 })
        );
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            StartRequest::parse("", 100),
            Err(StartRequestError::NotANumber(_))
        ));
        assert!(matches!(
            StartRequest::parse("abc", 100),
            Err(StartRequestError::NotANumber(_))
        ));
        assert!(matches!(
            StartRequest::parse("12abc", 100),
            Err(StartRequestError::NotANumber(_))
        ));
    }

    #[test]
    fn test_parse_out_of_range() {
        for input in ["0", "-3", "101", "99999999999999999999"] {
            assert!(
                matches!(
                    StartRequest::parse(input, 100),
                    Err(StartRequestError::OutOfRange { max: 100, .. })
                ),
                "input {:?} should be out of range",
                input
            );
        }
    }

    #[test]
    fn test_command_carries_count() {
        let request = StartRequest::parse("7", 100).unwrap();
        assert_eq!(request.command(), ClientCommand::start(7));
    }

    #[test]
    fn test_count_input_editing() {
        let mut input = CountInput::new(10);
        assert_eq!(input.value(), "10");

        assert!(input.push('5'));
        assert!(!input.push('x'));
        assert_eq!(input.value(), "105");

        assert_eq!(input.pop(), Some('5'));
        input.pop();
        input.pop();
        assert_eq!(input.value(), "");
        assert_eq!(input.pop(), None);
    }

    #[test]
    fn test_count_input_length_cap() {
        let mut input = CountInput::new(0);
        for _ in 0..20 {
            input.push('9');
        }
        assert_eq!(input.value().len(), MAX_INPUT_LEN);
    }

    #[test]
    fn test_error_display() {
        let err = StartRequestError::OutOfRange {
            value: "0".to_string(),
            max: 10000,
        };
        assert_eq!(err.to_string(), "Customer count must be between 1 and 10000 (got 0)");
    }
}
