use nodex::{Match, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "nodex-tool", about = "Match patterns against input strings.")]
struct Opt {
    /// Pattern to compile.
    #[structopt(required_unless = "suite")]
    pattern: Option<String>,

    /// Input strings to match the pattern against.
    inputs: Vec<String>,

    /// Print the compiled node tree instead of matching.
    #[structopt(long = "dump-tree")]
    dump_tree: bool,

    /// Run a line-oriented suite file instead of matching.
    ///
    /// Each non-comment line holds whitespace-separated fields: the
    /// pattern, its expected capture slot count (0 if the pattern must
    /// fail to compile), and optionally a subject, the expected match
    /// start (negative if the pattern must not match) and one expected
    /// substring per capture slot. A '#' field stands for the empty
    /// string.
    #[structopt(long, parse(from_os_str))]
    suite: Option<PathBuf>,
}

fn main() {
    let opt = Opt::from_args();
    if let Some(path) = &opt.suite {
        match run_suite_file(path) {
            Ok(outcome) => {
                println!("{} cases, {} failed", outcome.cases, outcome.failures);
                if outcome.failures > 0 {
                    exit(1);
                }
            }
            Err(err) => {
                eprintln!("Failed to read suite: {}", err);
                exit(2);
            }
        }
        return;
    }
    // Clap guarantees the pattern is present when --suite is absent.
    let pattern = opt.pattern.as_deref().unwrap_or_default();
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => {
            eprintln!("Pattern failed to compile: {}", err);
            exit(1);
        }
    };
    if opt.dump_tree {
        println!("{:#?}", re);
        return;
    }
    println!("Pattern has {} capture slots", re.capture_count());
    for input in &opt.inputs {
        match re.find(input) {
            Some(mat) => println!("Match: {}", format_match(&mat, input)),
            None => println!("No match"),
        }
    }
}

/// Format a Match by joining the total match and each capture group with
/// commas.
fn format_match(mat: &Match, input: &str) -> String {
    let mut result = input[mat.range()].to_string();
    for group in 1..=mat.captures.len() {
        result.push(',');
        result.push_str(&input[mat.group(group)]);
    }
    result
}

struct SuiteOutcome {
    cases: usize,
    failures: usize,
}

fn run_suite_file(path: &Path) -> std::io::Result<SuiteOutcome> {
    let text = fs::read_to_string(path)?;
    Ok(run_suite(&text))
}

fn run_suite(text: &str) -> SuiteOutcome {
    let mut outcome = SuiteOutcome {
        cases: 0,
        failures: 0,
    };
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        outcome.cases += 1;
        match run_case(line) {
            Ok(()) => println!("line {}: ok", idx + 1),
            Err(msg) => {
                outcome.failures += 1;
                println!("line {}: FAILED: {}", idx + 1, msg);
            }
        }
    }
    outcome
}

/// A '#' field denotes the empty string, which whitespace-separated
/// fields cannot express directly.
fn unhash(field: &str) -> &str {
    if field == "#" {
        ""
    } else {
        field
    }
}

fn run_case(line: &str) -> Result<(), String> {
    let mut fields = line.split_whitespace();
    let pattern = fields.next().ok_or("missing pattern field")?;
    let expected_count: usize = fields
        .next()
        .ok_or("missing capture count field")?
        .parse()
        .map_err(|_| "malformed capture count")?;
    if expected_count == 0 {
        return match Regex::new(pattern) {
            Ok(_) => Err("expected the pattern to fail to compile".to_string()),
            Err(_) => Ok(()),
        };
    }
    let re = Regex::new(pattern).map_err(|err| format!("failed to compile: {}", err))?;
    if re.capture_count() != expected_count {
        return Err(format!(
            "expected {} capture slots, got {}",
            expected_count,
            re.capture_count()
        ));
    }
    // A line without a subject only checks compilation.
    let subject = match fields.next() {
        Some(field) => unhash(field),
        None => return Ok(()),
    };
    let expected_start: i64 = fields
        .next()
        .ok_or("missing expected start field")?
        .parse()
        .map_err(|_| "malformed expected start")?;
    match (expected_start, re.find(subject)) {
        (start, None) if start < 0 => Ok(()),
        (start, Some(_)) if start < 0 => Err("expected no match".to_string()),
        (_, None) => Err("expected a match".to_string()),
        (start, Some(mat)) => {
            if mat.start() != start as usize {
                return Err(format!(
                    "match started at {}, expected {}",
                    mat.start(),
                    start
                ));
            }
            for slot in 0..expected_count {
                let expected = unhash(fields.next().ok_or("missing capture field")?);
                let actual = &subject[mat.group(slot)];
                if actual != expected {
                    return Err(format!(
                        "slot {} matched {:?}, expected {:?}",
                        slot, actual, expected
                    ));
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_fields() {
        assert!(run_case("abc 1 abcd 0 abc").is_ok());
        assert!(run_case("(a)(b) 3 xaby 1 ab a b").is_ok());
        assert!(run_case("abc 1 xyz -1").is_ok());
        assert!(run_case("*a 0").is_ok());
        assert!(run_case("(a)(b) 3").is_ok());

        assert!(run_case("abc 1 abcd 1 abc").is_err());
        assert!(run_case("abc 1 abcd 0 abd").is_err());
        assert!(run_case("abc 2 abcd 0 abc").is_err());
        assert!(run_case("abc 0").is_err());
        assert!(run_case("abc").is_err());
        assert!(run_case("(a)? 2 b 0 # #").is_ok());
    }

    #[test]
    fn comments_and_blanks_skipped() {
        let outcome = run_suite("# heading\n\nabc 1 abc 0 abc\n");
        assert_eq!(outcome.cases, 1);
        assert_eq!(outcome.failures, 0);
    }

    #[test]
    fn failures_counted() {
        let outcome = run_suite("abc 1 xyz 0 abc\nabc 1 abc 0 abc\n");
        assert_eq!(outcome.cases, 2);
        assert_eq!(outcome.failures, 1);
    }

    #[test]
    fn shipped_suite_passes() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testdata/suite.txt");
        let outcome = run_suite_file(Path::new(path)).unwrap();
        assert!(outcome.cases > 0);
        assert_eq!(outcome.failures, 0);
    }
}
