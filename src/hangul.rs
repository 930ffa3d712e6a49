// ============================================
// src/hangul.rs
// 한글 초성 추출 로직
// ============================================

/// 현대 한글 초성 19자 (유니코드 음절 블록과 같은 순서)
const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// 완성형 한글 음절 (가 ~ 힣)
pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// 호환용 자모 중 자음 (ㄱ ~ ㅎ)
pub fn is_hangul_consonant(c: char) -> bool {
    ('\u{3131}'..='\u{314E}').contains(&c)
}

/// 한 글자의 초성을 돌려준다
/// - 완성형 음절이면 초성 자음으로 변환
/// - 이미 자음이면 그대로
/// - 한글이 아니면 (영문, 숫자, 공백, 기호) 그대로
pub fn initial_consonant(c: char) -> char {
    if is_hangul_consonant(c) {
        return c;
    }

    if is_hangul_syllable(c) {
        // 음절 = 0xAC00 + (초성 * 21 * 28) + (중성 * 28) + 종성
        let index = (c as u32 - 0xAC00) / (21 * 28);
        return CHOSEONG[index as usize];
    }

    c
}

/// 문자열 전체를 초성 퀴즈 문자열로 바꾼다 (예: "김치찌개" → "ㄱㅊㅉㄱ")
/// 글자 수는 입력과 항상 같다
pub fn extract_initials(text: &str) -> String {
    text.chars().map(initial_consonant).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syllables_become_initials() {
        assert_eq!(extract_initials("김치찌개"), "ㄱㅊㅉㄱ");
        assert_eq!(extract_initials("비빔밥"), "ㅂㅂㅂ");
    }

    #[test]
    fn syllable_block_edges() {
        // 가(0xAC00) 는 첫 초성, 힣(0xD7A3) 은 마지막 초성
        assert_eq!(initial_consonant('가'), 'ㄱ');
        assert_eq!(initial_consonant('힣'), 'ㅎ');
        assert_eq!(initial_consonant('쌀'), 'ㅆ');
    }

    #[test]
    fn bare_consonants_pass_through() {
        assert_eq!(initial_consonant('ㄱ'), 'ㄱ');
        assert_eq!(initial_consonant('ㅎ'), 'ㅎ');
        assert_eq!(extract_initials("ㄱㄴㄷ"), "ㄱㄴㄷ");
    }

    #[test]
    fn non_hangul_is_identity() {
        assert_eq!(extract_initials("abc 123!"), "abc 123!");
        assert_eq!(extract_initials("우유 200ml"), "ㅇㅇ 200ml");
        // 한글 모음도 변환 대상이 아니다
        assert_eq!(initial_consonant('ㅏ'), 'ㅏ');
    }

    #[test]
    fn length_preserved_and_empty() {
        assert_eq!(extract_initials(""), "");
        for s in ["김치", "mixed 한글 123", "  ", "!@#"] {
            assert_eq!(extract_initials(s).chars().count(), s.chars().count());
        }
    }

    #[test]
    fn deterministic() {
        let s = "카레(고기)";
        assert_eq!(extract_initials(s), extract_initials(s));
    }
}
