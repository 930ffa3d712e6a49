// ============================================
// src/neis.rs
// NEIS 오픈 API (학교 검색 / 급식 식단 조회)
// ============================================

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::school::SavedSchool;

const BASE_URL: &str = "https://open.neis.go.kr/hub";

/// 나이스 교육정보 개방 포털에서 발급받는 공개 데이터 키
pub const DEFAULT_KEY: &str = "6760105bbc6040288708613a8c63125a";

#[derive(Debug, Error)]
pub enum NeisError {
    #[error("NEIS 요청에 실패했습니다: {0}")]
    Http(#[from] reqwest::Error),
    #[error("검색된 학교가 없습니다")]
    NoSchool,
    #[error("해당 날짜의 급식 정보가 없습니다")]
    NoMeal,
    #[error("NEIS 응답 형식이 예상과 다릅니다")]
    UnexpectedShape,
}

/// 학교 검색 결과 한 건
#[derive(Debug, Clone)]
pub struct School {
    pub name: String,
    /// SD_SCHUL_CODE
    pub school_code: String,
    /// ATPT_OFCDC_SC_CODE (교육청 코드)
    pub office_code: String,
    pub address: String,
}

/// 학교 이름으로 검색한다
pub fn search_schools(client: &Client, key: &str, name: &str) -> Result<Vec<School>, NeisError> {
    let body: Value = client
        .get(format!("{BASE_URL}/schoolInfo"))
        .query(&[
            ("KEY", key),
            ("Type", "json"),
            ("pIndex", "1"),
            ("pSize", "100"),
            ("SCHUL_NM", name),
        ])
        .send()?
        .error_for_status()?
        .json()?;

    // 결과가 없으면 schoolInfo 항목 자체가 빠진 채로 온다
    if body.get("schoolInfo").is_none() {
        return Err(NeisError::NoSchool);
    }
    parse_school_rows(&body).ok_or(NeisError::UnexpectedShape)
}

/// 선택한 학교의 하루치 식단을 음식 이름 목록으로 가져온다
pub fn fetch_menu(
    client: &Client,
    key: &str,
    school: &SavedSchool,
    date: &str,
) -> Result<Vec<String>, NeisError> {
    let body: Value = client
        .get(format!("{BASE_URL}/mealServiceDietInfo"))
        .query(&[
            ("KEY", key),
            ("Type", "json"),
            ("pIndex", "1"),
            ("pSize", "100"),
            ("ATPT_OFCDC_SC_CODE", school.office_code.as_str()),
            ("SD_SCHUL_CODE", school.school_code.as_str()),
            ("MLSV_YMD", date),
        ])
        .send()?
        .error_for_status()?
        .json()?;

    if body.get("mealServiceDietInfo").is_none() {
        return Err(NeisError::NoMeal);
    }
    parse_menu(&body).ok_or(NeisError::UnexpectedShape)
}

/// schoolInfo 응답에서 학교 목록을 꺼낸다
/// 배열 [0] 은 head, [1] 에 실제 row 가 들어 있다
fn parse_school_rows(body: &Value) -> Option<Vec<School>> {
    let rows = body.get("schoolInfo")?.get(1)?.get("row")?.as_array()?;

    let mut schools = Vec::new();
    for row in rows {
        schools.push(School {
            name: row.get("SCHUL_NM")?.as_str()?.to_string(),
            school_code: row.get("SD_SCHUL_CODE")?.as_str()?.to_string(),
            office_code: row.get("ATPT_OFCDC_SC_CODE")?.as_str()?.to_string(),
            address: row
                .get("ORG_RDNMA")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }
    Some(schools)
}

/// mealServiceDietInfo 응답의 첫 급식(row[0])에서 음식 이름 목록을 꺼낸다
fn parse_menu(body: &Value) -> Option<Vec<String>> {
    let raw = body
        .get("mealServiceDietInfo")?
        .get(1)?
        .get("row")?
        .get(0)?
        .get("DDISH_NM")?
        .as_str()?;
    Some(dish_names(raw))
}

/// DDISH_NM 원문을 음식 이름 목록으로 정리한다
/// "<br/>" 로 줄을 나누고, 알레르기 표기를 지운 뒤, 빈 항목은 버린다
pub fn dish_names(raw: &str) -> Vec<String> {
    raw.split("<br/>")
        .map(strip_allergen_codes)
        .filter(|dish| !dish.is_empty())
        .collect()
}

/// "맑은국(5.6.13)" 처럼 괄호 안이 숫자와 점뿐인 알레르기 표기를
/// 앞뒤 공백과 함께 지운다
fn strip_allergen_codes(dish: &str) -> String {
    let chars: Vec<char> = dish.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '(' {
            if let Some(len) = chars[i + 1..].iter().position(|&c| c == ')') {
                let inner = &chars[i + 1..i + 1 + len];
                if !inner.is_empty() && inner.iter().all(|c| c.is_ascii_digit() || *c == '.') {
                    // 표기 앞에 붙은 공백도 함께 지운다
                    while out.ends_with(' ') {
                        out.pop();
                    }
                    i += len + 2;
                    // 표기 뒤에 붙은 공백도 건너뛴다
                    while i < chars.len() && chars[i] == ' ' {
                        i += 1;
                    }
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_allergen_codes() {
        assert_eq!(strip_allergen_codes("맑은국(5.6.13)"), "맑은국");
        assert_eq!(strip_allergen_codes("친환경백미밥"), "친환경백미밥");
        assert_eq!(strip_allergen_codes("  돈까스 (1.2.5.6.10)  "), "돈까스");
        assert_eq!(strip_allergen_codes("우유(2)"), "우유");
    }

    #[test]
    fn keeps_real_parentheses() {
        // 괄호 안에 숫자가 아닌 글자가 있으면 이름의 일부다
        assert_eq!(strip_allergen_codes("카레(고기)"), "카레(고기)");
        assert_eq!(strip_allergen_codes("주스(오렌지)(5.13)"), "주스(오렌지)");
    }

    #[test]
    fn splits_dishes_and_drops_empties() {
        let raw = "친환경백미밥<br/>맑은국(5.6.13)<br/><br/>돈까스(1.2.5.6.10.12)";
        assert_eq!(
            dish_names(raw),
            vec!["친환경백미밥", "맑은국", "돈까스"]
        );
    }

    #[test]
    fn parses_school_rows() {
        let body = json!({
            "schoolInfo": [
                { "head": [{ "list_total_count": 1 }] },
                { "row": [{
                    "SCHUL_NM": "서울고등학교",
                    "SD_SCHUL_CODE": "7010083",
                    "ATPT_OFCDC_SC_CODE": "B10",
                    "ORG_RDNMA": "서울특별시 서초구"
                }] }
            ]
        });
        let schools = parse_school_rows(&body).unwrap();
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].name, "서울고등학교");
        assert_eq!(schools[0].school_code, "7010083");
        assert_eq!(schools[0].office_code, "B10");
    }

    #[test]
    fn parses_menu_from_first_row() {
        let body = json!({
            "mealServiceDietInfo": [
                { "head": [] },
                { "row": [
                    { "DDISH_NM": "현미밥<br/>김치찌개(5.9)<br/>우유(2)" },
                    { "DDISH_NM": "저녁은 무시한다" }
                ] }
            ]
        });
        assert_eq!(
            parse_menu(&body).unwrap(),
            vec!["현미밥", "김치찌개", "우유"]
        );
    }

    #[test]
    fn malformed_envelope_is_none() {
        assert!(parse_school_rows(&json!({ "schoolInfo": [] })).is_none());
        assert!(parse_menu(&json!({ "mealServiceDietInfo": [{}, {}] })).is_none());
    }
}
