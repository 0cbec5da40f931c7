use super::*;

fn mono(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

#[test]
fn empty_input_yields_no_lines() {
    assert!(wrap_text("", 100.0, &mut mono).is_empty());
    assert!(wrap_text("", f64::INFINITY, &mut mono).is_empty());
}

#[test]
fn unbounded_width_yields_single_line() {
    let text = "the quick brown fox jumps over the lazy dog";
    assert_eq!(wrap_text(text, f64::INFINITY, &mut mono), vec![text.to_string()]);
}

#[test]
fn greedy_fill() {
    // 10px per char, 110px fits 11 chars.
    let lines = wrap_text("aaa bbb ccc ddd eee", 110.0, &mut mono);
    assert_eq!(lines, vec!["aaa bbb ccc", "ddd eee"]);
}

#[test]
fn exact_fit_is_not_wrapped() {
    let lines = wrap_text("aaaa bbbb", 90.0, &mut mono);
    assert_eq!(lines, vec!["aaaa bbbb"]);
}

#[test]
fn overlong_word_stands_alone() {
    let lines = wrap_text("hi supercalifragilistic yo", 50.0, &mut mono);
    assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
}

#[test]
fn lines_never_exceed_width_unless_single_word() {
    let text = "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor";
    for w in [30.0, 60.0, 95.0, 140.0, 250.0] {
        for line in wrap_text(text, w, &mut mono) {
            assert!(
                mono(&line) <= w || !line.contains(' '),
                "line {line:?} exceeds {w}"
            );
        }
    }
}

#[test]
fn words_are_preserved_in_order() {
    let text = "one two three four five six seven";
    let lines = wrap_text(text, 80.0, &mut mono);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn measurer_sees_candidate_lines() {
    let mut seen = Vec::new();
    let mut measure = |s: &str| {
        seen.push(s.to_owned());
        mono(s)
    };
    wrap_text("ab cd", 1000.0, &mut measure);
    assert_eq!(seen, vec!["ab".to_string(), "ab cd".to_string()]);
}
