use regex::Regex;

use crate::error::{Error, Result};

/// Compiles a shell-style glob into a regex matching whole interface names.
///
/// `*` matches any run of characters (including none) and `?` matches exactly one.
/// Every other character matches itself. Globs too long for the regex engine's size
/// limit are a usage error.
///
/// ```rust
/// # use check_linux_netdev::glob_to_regex;
/// let re = glob_to_regex("eth*")?;
/// assert!(re.is_match("eth10"));
/// assert!(!re.is_match("weth0"));
/// # Ok::<(), check_linux_netdev::Error>(())
/// ```
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push_str(r"\A");

    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    pattern.push_str(r"\z");

    Regex::new(&pattern).map_err(|e| {
        Error::usage(format!(
            "cannot compile glob of {} characters: {e}",
            glob.chars().count()
        ))
    })
}
