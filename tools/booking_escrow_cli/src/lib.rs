//! Option parsing shared by the booking escrow CLI

use std::collections::HashMap;
use std::error::Error;

/// Parse `--key value` pairs into a map
pub fn parse_options(args: &[String]) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let mut options = HashMap::new();
    let mut index = 0;
    while index < args.len() {
        let key = args[index]
            .strip_prefix("--")
            .ok_or_else(|| format!("Expected an option, got '{}'", args[index]))?;
        let value = args
            .get(index + 1)
            .ok_or_else(|| format!("Missing value for --{key}"))?;
        options.insert(key.to_string(), value.clone());
        index += 2;
    }
    Ok(options)
}

/// Fetch a required option or fail with a message naming it
pub fn required_option<'a>(
    options: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, Box<dyn Error>> {
    options
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing required option --{key}").into())
}

pub fn parse_u64(value: &str) -> Result<u64, Box<dyn Error>> {
    Ok(value.parse::<u64>()?)
}
