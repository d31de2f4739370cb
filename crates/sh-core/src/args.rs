//! ssh argument vector helpers

use crate::error::EditError;

/// Single-letter ssh options that take a separate value argument
const OPTIONS_WITH_VALUE: &str = "bcDEFIiJLlmOopQRSWw";

/// Index of the host argument in an ssh argument vector.
///
/// Options and their values are skipped; a bare `--` ends option parsing.
/// The first remaining positional token is the host.
pub fn host_argument_index<S: AsRef<str>>(arguments: &[S]) -> Option<usize> {
    let mut after_double_dash = false;
    let mut skip_value = false;

    for (index, argument) in arguments.iter().enumerate() {
        let argument = argument.as_ref().trim();

        if skip_value {
            skip_value = false;
            continue;
        }

        if !after_double_dash {
            if argument == "--" {
                after_double_dash = true;
                continue;
            }
            if argument.starts_with("--") {
                skip_value = !argument.contains('=');
                continue;
            }
            if argument.starts_with('-') {
                let mut flag = argument.chars().skip(1);
                if let (Some(letter), None) = (flag.next(), flag.next()) {
                    skip_value = OPTIONS_WITH_VALUE.contains(letter);
                }
                continue;
            }
        }

        if argument.is_empty() {
            continue;
        }
        return Some(index);
    }

    None
}

/// Host portion of the host argument, without any `user@` prefix
pub fn host_from_arguments<S: AsRef<str>>(arguments: &[S]) -> String {
    let Some(index) = host_argument_index(arguments) else {
        return String::new();
    };
    let token = arguments[index].as_ref().trim();
    match token.rfind('@') {
        Some(at) => token[at + 1..].to_string(),
        None => token.to_string(),
    }
}

/// Substitute `user` into the host argument, replacing any existing user
pub fn apply_user_to_arguments<S: AsRef<str>>(arguments: &[S], user: &str) -> Vec<String> {
    let mut result: Vec<String> = arguments.iter().map(|a| a.as_ref().to_string()).collect();

    let user = user.trim();
    if user.is_empty() {
        return result;
    }
    let Some(index) = host_argument_index(&result) else {
        return result;
    };

    let token = result[index].trim();
    let host = match token.rfind('@') {
        Some(at) if at > 0 => &token[at + 1..],
        _ => token,
    };
    if host.is_empty() {
        return result;
    }

    let with_user = format!("{}@{}", user, host);
    result[index] = with_user;
    result
}

/// Trim every argument and drop the empty ones
pub fn normalize_arguments<S: AsRef<str>>(arguments: &[S]) -> Vec<String> {
    arguments
        .iter()
        .map(|a| a.as_ref().trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join arguments into a single editable command string
pub fn arguments_to_string<S: AsRef<str>>(arguments: &[S]) -> String {
    arguments
        .iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a command string shell-style into normalized arguments
pub fn string_to_arguments(command: &str) -> Result<Vec<String>, EditError> {
    let words =
        shell_words::split(command).map_err(|e| EditError::InvalidCommand(e.to_string()))?;
    Ok(normalize_arguments(&words))
}
