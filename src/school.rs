// ============================================
// src/school.rs
// 선택한 학교의 저장 / 복원
// ============================================

use bincode::config::standard;
use bincode::{Decode, Encode};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

const SCHOOL_FILE_BIN: &str = "school.bin";
const SCHOOL_FILE_JSON: &str = "school.json"; // 디버그용

/// 한번 고른 학교는 다음 실행 때 다시 검색하지 않도록 저장해 둔다
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SavedSchool {
    pub name: String,
    /// SD_SCHUL_CODE
    pub school_code: String,
    /// ATPT_OFCDC_SC_CODE (교육청 코드)
    pub office_code: String,
}

/// 저장소는 호출하는 쪽에서 주입한다 (코어는 디스크를 모른다)
pub trait SchoolStore {
    fn load(&self) -> Option<SavedSchool>;
    fn save(&self, school: &SavedSchool);
}

/// OS 데이터 디렉터리에 저장하는 기본 구현
pub struct DiskSchoolStore;

impl DiskSchoolStore {
    fn data_dir() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("kr", "mealsquiz", "MealsQuiz")?;
        let data_dir = proj_dirs.data_dir();

        if !data_dir.exists() {
            fs::create_dir_all(data_dir).ok()?;
        }
        Some(data_dir.to_path_buf())
    }
}

impl SchoolStore for DiskSchoolStore {
    /// 바이너리 우선, 실패하면 JSON 으로 읽는다
    fn load(&self) -> Option<SavedSchool> {
        let dir = Self::data_dir()?;

        let bin_path = dir.join(SCHOOL_FILE_BIN);
        if let Ok(mut file) = File::open(&bin_path) {
            let mut buffer = Vec::new();
            if file.read_to_end(&mut buffer).is_ok() {
                if let Ok((school, _)) =
                    bincode::decode_from_slice::<SavedSchool, _>(&buffer, standard())
                {
                    return Some(school);
                }
            }
        }

        let json_path = dir.join(SCHOOL_FILE_JSON);
        if let Ok(file) = File::open(&json_path) {
            let reader = BufReader::new(file);
            if let Ok(school) = serde_json::from_reader(reader) {
                return Some(school);
            }
        }

        None
    }

    /// 저장 실패는 치명적이지 않으므로 조용히 넘어간다
    fn save(&self, school: &SavedSchool) {
        let Some(dir) = Self::data_dir() else {
            return;
        };

        // 1. 바이너리 (본 저장)
        if let Ok(file) = File::create(dir.join(SCHOOL_FILE_BIN)) {
            let mut writer = BufWriter::new(file);
            if let Ok(encoded) = bincode::encode_to_vec(school, standard()) {
                let _ = writer.write_all(&encoded);
            }
        }

        // 2. JSON (디버그용)
        if let Ok(json) = serde_json::to_string_pretty(school) {
            let _ = fs::write(dir.join(SCHOOL_FILE_JSON), json);
        }
    }
}
