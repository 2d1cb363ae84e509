use super::{json_pretty, EXIT_SUCCESS};
use adapt_aptfile::{parse_file, Directive};
use std::collections::BTreeMap;
use std::path::Path;

fn summarize(directives: &[Directive]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for directive in directives {
        *counts.entry(directive.command()).or_insert(0) += 1;
    }
    counts
}

pub fn run(aptfile: &Path, json: bool) -> Result<u8, String> {
    let directives = parse_file(aptfile).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "status": "ok",
            "aptfile": aptfile,
            "directives": directives,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    println!(
        "{}: {} directive(s), ok",
        aptfile.display(),
        directives.len()
    );
    for (command, count) in summarize(&directives) {
        println!("  {command:<10} {count}");
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_command() {
        let directives =
            adapt_aptfile::parse_str("package a\npackage b\nrepo-src \"https://x\"\nhold a\n").unwrap();
        let counts = summarize(&directives);
        assert_eq!(counts.get("package"), Some(&2));
        assert_eq!(counts.get("repo-src"), Some(&1));
        assert_eq!(counts.get("hold"), Some(&1));
        assert_eq!(counts.get("repo"), None);
    }
}
