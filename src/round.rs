// ============================================
// src/round.rs
// 한 라운드의 정답 판정 / 기록 / 공유 텍스트
// ============================================

use thiserror::Error;

use crate::hangul::{extract_initials, is_hangul_consonant, is_hangul_syllable};

/// 판정 대상 문자의 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// 공백
    Blank,
    /// 영문자 / 숫자 / 한글 (음절, 자음)
    Letter,
    /// 그 외 전부 (괄호, 쉼표, 단위 기호 등)
    Symbol,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if c.is_ascii_alphanumeric() || is_hangul_syllable(c) || is_hangul_consonant(c) {
        CharClass::Letter
    } else {
        CharClass::Symbol
    }
}

/// 글자 하나에 대한 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// 정답 글자와 일치 (■)
    Match,
    /// 불일치 (□)
    Miss,
    /// 정답 쪽이 공백이고 입력도 공백
    Blank,
    /// 가리지 않고 입력 글자를 그대로 보여준다
    Literal(char),
}

impl Mark {
    /// 공유 텍스트 / 화면 표시용 글자
    pub fn symbol(self) -> char {
        match self {
            Mark::Match => '■',
            Mark::Miss => '□',
            Mark::Blank => ' ',
            Mark::Literal(c) => c,
        }
    }
}

/// 한 번의 입력과 그 판정 (생성 후 불변)
#[derive(Debug, Clone)]
pub struct Guess {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// submit 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 빈 입력이라 무시함 (기록 없음)
    Ignored,
    /// 기록했지만 오답
    Wrong,
    /// 정답
    Solved,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("정답은 {expected}글자예요 ({got}글자 입력됨)")]
    LengthMismatch { expected: usize, got: usize },
}

/// 입력을 정답과 글자 단위로 비교해 판정 목록을 만든다
/// 호출 전에 두 문자열의 글자 수가 같아야 한다
///
/// 규칙:
/// - 정답이 공백: 입력도 공백이면 Blank, 글자면 Miss, 기호면 그대로 노출
/// - 정답이 기호: 항상 입력 글자를 그대로 노출 (기호는 가리지 않는다)
/// - 정답이 글자: 일치하면 Match, 아니면 Miss
pub fn classify(guess: &str, target: &str) -> Vec<Mark> {
    guess
        .chars()
        .zip(target.chars())
        .map(|(g, t)| match class_of(t) {
            CharClass::Blank => match class_of(g) {
                CharClass::Blank => Mark::Blank,
                CharClass::Letter => Mark::Miss,
                CharClass::Symbol => Mark::Literal(g),
            },
            CharClass::Symbol => Mark::Literal(g),
            CharClass::Letter => {
                if g == t {
                    Mark::Match
                } else {
                    Mark::Miss
                }
            }
        })
        .collect()
}

/// 한 라운드의 상태
/// 다음 문제로 넘어갈 때는 이 값을 통째로 새로 만든다 (기록도 함께 버려진다)
#[derive(Debug, Clone)]
pub struct RoundState {
    /// 정답 (음식 이름)
    pub name: String,
    /// 초성 퍼즐 (name 에서 파생, 이후 불변)
    pub puzzle: String,
    /// 입력 기록 (추가만 한다)
    pub history: Vec<Guess>,
    pub solved: bool,
}

impl RoundState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            puzzle: extract_initials(name),
            history: Vec::new(),
            solved: false,
        }
    }

    /// 입력 하나를 처리한다
    /// - 공백뿐인 입력: 아무 일도 하지 않음
    /// - 글자 수가 다르면 LengthMismatch, 상태는 그대로
    /// - 그 외에는 판정해서 기록에 추가하고, 문자열이 완전히 같을 때만 solved
    pub fn submit(&mut self, guess: &str) -> Result<Verdict, SubmitError> {
        if guess.chars().all(char::is_whitespace) {
            return Ok(Verdict::Ignored);
        }

        let expected = self.name.chars().count();
        let got = guess.chars().count();
        if expected != got {
            return Err(SubmitError::LengthMismatch { expected, got });
        }

        let marks = classify(guess, &self.name);
        // 판정 결과가 아니라 문자열 일치만으로 정답을 가린다
        if guess == self.name {
            self.solved = true;
        }
        self.history.push(Guess {
            text: guess.to_string(),
            marks,
        });

        Ok(if self.solved {
            Verdict::Solved
        } else {
            Verdict::Wrong
        })
    }
}

fn spaced(chars: impl Iterator<Item = char>) -> String {
    let mut line = String::new();
    for (i, c) in chars.enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push(c);
    }
    line
}

/// 클립보드에 붙여넣을 공유 텍스트를 만든다
///
/// 첫 줄은 초성 퍼즐, 그 뒤로 기록마다 판정 줄 + 입력 줄 두 줄씩
/// (기록 사이는 빈 줄), 마지막에 빈 줄을 두고 footer 를 붙인다
pub fn share_text(puzzle: &str, history: &[Guess], footer: &str) -> String {
    let mut out = spaced(puzzle.chars());

    for guess in history {
        out.push_str("\n\n");
        out.push_str(&spaced(guess.marks.iter().map(|m| m.symbol())));
        out.push('\n');
        out.push_str(&spaced(guess.text.chars()));
    }

    out.push_str("\n\n");
    out.push_str(footer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_positional() {
        let marks = classify("김밥", "김치");
        assert_eq!(marks, vec![Mark::Match, Mark::Miss]);
    }

    #[test]
    fn classification_length_matches_guess() {
        for (g, t) in [("김치", "김치"), ("abc", "xyz"), ("우유 200ml", "우유 300ml")] {
            assert_eq!(classify(g, t).len(), g.chars().count());
        }
    }

    #[test]
    fn target_symbols_are_never_masked() {
        // 정답의 괄호 자리는 맞든 틀리든 입력 글자가 그대로 보인다
        let marks = classify("카레[고기]", "카레(고기)");
        assert_eq!(
            marks,
            vec![
                Mark::Match,
                Mark::Match,
                Mark::Literal('['),
                Mark::Match,
                Mark::Match,
                Mark::Literal(']'),
            ]
        );
    }

    #[test]
    fn whitespace_in_target() {
        // 공백 자리: 공백이면 Blank, 글자면 Miss, 기호면 그대로
        assert_eq!(classify("우유 우유", "우유 200")[2], Mark::Blank);
        assert_eq!(classify("우유가우유", "우유 200우")[2], Mark::Miss);
        assert_eq!(classify("우유-우유", "우유 200우")[2], Mark::Literal('-'));
    }

    #[test]
    fn digit_scenario() {
        let marks = classify("우유 300ml", "우유 200ml");
        assert_eq!(
            marks,
            vec![
                Mark::Match,
                Mark::Match,
                Mark::Blank,
                Mark::Miss,
                Mark::Match,
                Mark::Match,
                Mark::Match,
                Mark::Match,
            ]
        );
    }

    #[test]
    fn solve_is_string_equality_only() {
        let mut round = RoundState::new("김치찌개");
        assert_eq!(round.submit("김치찌깨"), Ok(Verdict::Wrong));
        assert!(!round.solved);
        assert_eq!(round.submit("김치찌개"), Ok(Verdict::Solved));
        assert!(round.solved);
        assert_eq!(round.history.len(), 2);
    }

    #[test]
    fn empty_guess_is_a_noop() {
        let mut round = RoundState::new("김치");
        assert_eq!(round.submit(""), Ok(Verdict::Ignored));
        assert_eq!(round.submit("   "), Ok(Verdict::Ignored));
        assert!(round.history.is_empty());
        assert!(!round.solved);
    }

    #[test]
    fn length_mismatch_leaves_state_unchanged() {
        let mut round = RoundState::new("김치찌개");
        let err = round.submit("김치").unwrap_err();
        assert_eq!(
            err,
            SubmitError::LengthMismatch {
                expected: 4,
                got: 2
            }
        );
        assert!(round.history.is_empty());
        assert!(!round.solved);
    }

    #[test]
    fn history_keeps_submission_order() {
        let mut round = RoundState::new("비빔밥");
        round.submit("김치전").unwrap();
        round.submit("비빔면").unwrap();
        round.submit("비빔밥").unwrap();
        let texts: Vec<&str> = round.history.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["김치전", "비빔면", "비빔밥"]);
    }

    #[test]
    fn puzzle_comes_from_the_name() {
        let round = RoundState::new("김치찌개");
        assert_eq!(round.puzzle, "ㄱㅊㅉㄱ");
        assert_eq!(round.puzzle.chars().count(), round.name.chars().count());
    }

    #[test]
    fn new_round_resets_everything() {
        let mut round = RoundState::new("김치");
        round.submit("김치").unwrap();
        assert!(round.solved);

        // 다음 문제: 상태를 통째로 교체한다
        round = RoundState::new("비빔밥");
        assert!(round.history.is_empty());
        assert!(!round.solved);
        assert_eq!(round.name, "비빔밥");
    }

    #[test]
    fn share_text_layout() {
        let mut round = RoundState::new("김치");
        round.submit("김밥").unwrap();
        round.submit("김치").unwrap();

        let text = share_text(&round.puzzle, &round.history, "https://mealsquiz.vercel.app/");
        assert_eq!(
            text,
            "ㄱ ㅊ\n\n■ □\n김 밥\n\n■ ■\n김 치\n\nhttps://mealsquiz.vercel.app/"
        );
    }

    #[test]
    fn share_text_renders_blank_and_literal() {
        let mut round = RoundState::new("우유 200ml");
        round.submit("우유 300ml").unwrap();

        let text = share_text(&round.puzzle, &round.history, "footer");
        assert_eq!(
            text,
            "ㅇ ㅇ   2 0 0 m l\n\n■ ■   □ ■ ■ ■ ■\n우 유   3 0 0 m l\n\nfooter"
        );
    }

    #[test]
    fn share_text_with_no_history() {
        assert_eq!(share_text("ㄱㅊ", &[], "f"), "ㄱ ㅊ\n\nf");
    }
}
