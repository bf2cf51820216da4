use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_FTL: &str = "i18n/en-US/glance-ui.ftl";

/// One `t!` call found in the sources: its key and the argument names passed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Usage {
    key: String,
    args: BTreeSet<String>,
    file: String,
}

fn is_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

fn is_ident(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Placeholders (`{ $name }`) of every message in a Fluent file, keyed by id.
/// Continuation lines belong to the message above them.
fn fallback_messages(content: &str) -> BTreeMap<String, BTreeSet<String>> {
    let mut messages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let body = if line.starts_with(char::is_whitespace) {
            line
        } else if let Some((id, rest)) = line.split_once('=') {
            let id = id.trim();
            if id.starts_with('-') || !id.chars().all(is_key_char) {
                current = None;
                continue;
            }
            messages.entry(id.to_string()).or_default();
            current = Some(id.to_string());
            rest
        } else {
            continue;
        };

        if let Some(id) = &current {
            let vars = messages.entry(id.clone()).or_default();
            for chunk in body.split('$').skip(1) {
                let name: String = chunk
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                    .collect();
                if !name.is_empty() {
                    vars.insert(name);
                }
            }
        }
    }
    messages
}

/// Argument names of a `t!` call, given the text between the key and the
/// closing parenthesis.
fn argument_names(args: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut piece = String::new();
    let mut pieces = Vec::new();
    for c in args.chars() {
        if in_string || c == '"' {
            if c == '"' {
                in_string = !in_string;
            }
            piece.push(c);
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(std::mem::take(&mut piece));
                continue;
            }
            _ => {}
        }
        piece.push(c);
    }
    pieces.push(piece);

    for piece in pieces {
        if let Some((name, _)) = piece.split_once('=') {
            let name = name.trim();
            if is_ident(name) {
                names.insert(name.to_string());
            }
        }
    }
    names
}

/// `t!` calls with a literal first argument in one source file. Calls may span
/// several lines; string literals inside the arguments are skipped.
fn scan_source(file: &str, content: &str) -> Vec<Usage> {
    let bytes = content.as_bytes();
    let needle = b"t!(";
    let mut usages = Vec::new();
    let mut i = 0;

    while let Some(pos) = bytes[i..]
        .windows(needle.len())
        .position(|w| w == needle)
    {
        let at = i + pos;
        i = at + needle.len();
        // `assert!(`, `print!(` and friends end in `t!(` too.
        if at > 0 && (bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == b'_') {
            continue;
        }
        let mut open = i;
        while open < bytes.len() && bytes[open].is_ascii_whitespace() {
            open += 1;
        }
        if bytes.get(open) != Some(&b'"') {
            continue;
        }
        let key_start = open + 1;
        let Some(key_len) = content[key_start..].find('"') else {
            break;
        };
        let key = &content[key_start..key_start + key_len];
        let mut j = key_start + key_len + 1;
        i = j;
        if key.is_empty() || !key.chars().all(is_key_char) {
            continue;
        }

        let args_start = j;
        let mut depth = 1usize;
        let mut in_string = false;
        while j < bytes.len() {
            let b = bytes[j];
            if in_string {
                match b {
                    b'\\' => j += 1,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'(' => depth += 1,
                    b')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            j += 1;
        }

        usages.push(Usage {
            key: key.to_string(),
            args: argument_names(&content[args_start..j.min(bytes.len())]),
            file: file.to_string(),
        });
        i = j.min(bytes.len());
    }
    usages
}

fn scan_tree(src_root: &Path) -> Vec<Usage> {
    let mut usages = Vec::new();
    let mut stack = vec![src_root.to_path_buf()];
    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(entries) = fs::read_dir(&path) {
                stack.extend(entries.flatten().map(|entry| entry.path()));
            }
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            let label = path
                .strip_prefix(src_root)
                .unwrap_or(&path)
                .display()
                .to_string();
            usages.extend(scan_source(&label, &content));
        }
    }
    usages.sort();
    usages
}

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn load_fallback() -> BTreeMap<String, BTreeSet<String>> {
    let path = crate_root().join(FALLBACK_FTL);
    let content = fs::read_to_string(&path).expect("read fallback FTL");
    let messages = fallback_messages(&content);
    assert!(!messages.is_empty(), "no messages parsed from {path:?}");
    messages
}

#[test]
fn every_source_key_exists_in_fallback() {
    let messages = load_fallback();
    let usages = scan_tree(&crate_root().join("src"));
    assert!(!usages.is_empty(), "scanner found no t! calls");

    let missing: BTreeSet<String> = usages
        .iter()
        .filter(|usage| !messages.contains_key(&usage.key))
        .map(|usage| format!("{} ({})", usage.key, usage.file))
        .collect();
    assert!(
        missing.is_empty(),
        "keys used in src/ but missing from {FALLBACK_FTL}:\n{}",
        missing.into_iter().collect::<Vec<_>>().join("\n")
    );
}

#[test]
fn call_arguments_match_message_placeholders() {
    let messages = load_fallback();
    let mut problems = Vec::new();

    for usage in scan_tree(&crate_root().join("src")) {
        let Some(expected) = messages.get(&usage.key) else {
            continue;
        };
        if &usage.args != expected {
            problems.push(format!(
                "{} in {}: passes {:?}, message uses {:?}",
                usage.key, usage.file, usage.args, expected
            ));
        }
    }

    assert!(problems.is_empty(), "{}", problems.join("\n"));
}

#[test]
fn task_page_keys_are_all_defined() {
    let messages = load_fallback();
    let task_keys: BTreeSet<String> = scan_tree(&crate_root().join("src/tasks"))
        .into_iter()
        .map(|usage| usage.key)
        .collect();

    for key in [
        "task-go",
        "task-start-new",
        "task-feedback-correct",
        "task-feedback-incorrect",
        "task-status-line",
        "task-error-title",
    ] {
        assert!(task_keys.contains(key), "{key} is no longer used by the task view");
        assert!(messages.contains_key(key), "{key} missing from fallback");
    }
}

#[test]
fn scanner_reads_multi_line_calls_with_arguments() {
    let source = "let a = t!(\"nav-home\");\n\
                  let b = t!(\n    \"task-status-line\",\n    sequence = last.sequence,\n    \
                  id = ids(1, 2),\n    at = \"x, y\".to_string()\n);\n\
                  let c = t!(\"results-total\", count = 2);";
    let usages = scan_source("view.rs", source);
    let keys: Vec<&str> = usages.iter().map(|usage| usage.key.as_str()).collect();
    assert_eq!(keys, ["nav-home", "task-status-line", "results-total"]);
    assert!(usages[0].args.is_empty());
    assert_eq!(
        usages[1].args,
        BTreeSet::from(["at".to_string(), "id".to_string(), "sequence".to_string()])
    );
    assert_eq!(usages[2].args, BTreeSet::from(["count".to_string()]));
}

#[test]
fn scanner_skips_other_macros() {
    let usages = scan_source(
        "check.rs",
        "assert!(\"nav-home\".len() > 0); crate::t!(\"nav-task\"); print!(\"tagline\");",
    );
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].key, "nav-task");
}

#[test]
fn scanner_walks_a_source_tree() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("status.rs"),
        "p { {t!(\"task-status-failed\", reason = reason.clone())} }",
    )
    .expect("write source");
    let usages = scan_tree(dir.path());
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].key, "task-status-failed");
    assert_eq!(usages[0].args, BTreeSet::from(["reason".to_string()]));
}

#[test]
fn fallback_parser_collects_placeholders() {
    let messages = fallback_messages(
        "# comment\n-brand = Glance\nplain = Hello\nline = #{ $sequence }: { $id } at { $at }\n",
    );
    assert!(messages["plain"].is_empty());
    assert_eq!(messages["line"].len(), 3);
    assert!(messages["line"].contains("sequence"));
    assert!(!messages.contains_key("-brand"));
}
