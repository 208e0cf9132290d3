//! Lint: `[X]` キー表記をクリック登録なしで描画していないか。
//!
//! `src/app/render.rs` で `[S]` のようなボタン表記を出す行は、
//! `push_clickable()` か `TabBar::tab()` でクリック領域も登録する。
//! `cl.push(Line::from(" [S]保存"))` は表示されるがタップできない。

use std::fs;
use std::path::Path;

/// `[S]`, `[1]`, `[-]`, `[<]` のような1文字のキー表記を含むか。
fn contains_bracket_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    (0..bytes.len() - 2).any(|i| {
        bytes[i] == b'['
            && bytes[i + 2] == b']'
            && (bytes[i + 1].is_ascii_alphanumeric() || b"-+<>=!~|\\".contains(&bytes[i + 1]))
    })
}

/// キー表記を含む非クリックの `push(` 行を `(行番号, 行)` で返す。
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && contains_bracket_key(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/app/render.rs");
    let source = fs::read_to_string(&path).expect("render.rs should be readable");
    let violations = find_bracket_key_in_push(&source);

    if !violations.is_empty() {
        let mut msg = String::from(
            "Found bracket-key text [X] in non-clickable push() calls.\n\
             Use push_clickable() or a TabBar tab instead.\n\n",
        );
        for (line_num, line) in &violations {
            msg.push_str(&format!("  {}:{}: {}\n", path.display(), line_num, line));
        }
        panic!("{}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [S]保存  [L]共有"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [S] 保存"), SAVE_HISTORY);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [X]リセット"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[S]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(contains_bracket_key("[<]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[Enter]"));
        assert!(!contains_bracket_key("評定"));
    }
}
