//! Regenerate `src/scripts.rs` from the `--help` of every built check
//!
//! Run from the repository root after `cargo build`:
//!
//! ```plain
//! cargo run -p make-docs > src/scripts.rs
//! ```

use std::process::Command;

struct Check {
    name: &'static str,
    about: &'static str,
    /// Markdown appended after the help output
    notes: &'static str,
}

fn main() {
    let preamble = "Documentation about the scripts contained herein\n";

    let checks = [Check {
        name: "check-cattools",
        about: "Cross platform, only requires SFTP access to the CatTools server.",
        notes: "
Output is a single line, for example:

```plain
CRITICAL core-sw-01 backup error: Timeout / edge-rtr-02 OK / lab-sw not backuped for more than 1 day(s)
```

Exit codes are 0 for `OK`, 2 for `CRITICAL` and 3 for `UNKNOWN`. A
device whose config changed is listed but leaves the status alone, so a
log that only contains changed devices is `UNKNOWN`.",
    }];

    let mut out: String = cp(preamble.split('\n'));
    out.push('\n');
    out.push_str(&cp(checks
        .iter()
        .map(|c| format!("- [{0}](#{0})", c.name))));
    out.push('\n');
    for check in &checks {
        out.push_str(&format!(
            "\
//!
//! # {0}
//!
//! {1}
//!
//! ```plain
//! $ {0} --help
",
            check.name, check.about
        ));
        let output = Command::new(format!("target/debug/{}", check.name))
            .arg("--help")
            .output()
            .unwrap_or_else(|e| panic!("Couldn't execute command {}: {}", check.name, e));
        let help = String::from_utf8(output.stdout)
            .unwrap_or_else(|_| panic!("Couldn't convert command {} help to utf8", check.name));
        out.push_str(&cp(help.split('\n')));
        out.push_str("\n//! ```\n");
        if !check.notes.is_empty() {
            out.push_str(&cp(check.notes.split('\n')));
            out.push('\n');
        }
    }
    print!("{}", out);
}

/// Comment each line in the iterator
fn cp<S: AsRef<str>, I: Iterator<Item = S>>(s: I) -> String {
    s.map(|s| format!("//! {}", s.as_ref()))
        .map(|s| s.trim().into())
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::cp;

    #[test]
    fn comments_every_line() {
        assert_eq!(cp("a\n\nb".split('\n')), "//! a\n//!\n//! b");
    }
}
