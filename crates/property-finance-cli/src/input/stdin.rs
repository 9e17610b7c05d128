use serde_json::Value;
use std::io::{self, Read};

/// Read a loan or investment document piped into `immo`.
///
/// An interactive terminal yields `None` so the caller falls back to its
/// flags, and so does a pipe that carries only whitespace. Otherwise the
/// text is parsed as JSON, and as YAML only when JSON fails. A document that
/// is neither is an error carrying the JSON parser's message.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(parse_piped(&buffer)?)
}

fn parse_piped(raw: &str) -> Result<Option<Value>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => {
            log::debug!("stdin parsed as JSON");
            Ok(Some(value))
        }
        Err(json_err) => {
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?;
            log::debug!("stdin parsed as YAML");
            Ok(Some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pipe_is_no_input() {
        assert_eq!(parse_piped("  \n\t"), Ok(None));
    }

    #[test]
    fn test_loan_terms_as_json_or_yaml() {
        let json = parse_piped(r#"{"principal": 200000, "annual_rate_pct": 3.5}"#).unwrap();
        let yaml = parse_piped("principal: 200000\nannual_rate_pct: 3.5\n").unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_unparseable_pipe_names_both_formats() {
        let err = parse_piped("{principal: [").unwrap_err();
        assert!(err.starts_with("stdin is neither JSON nor YAML"));
    }
}
