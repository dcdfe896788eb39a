//! 목표 수질 프로파일 저장소.
//!
//! JSON 파일(`[{"name": ..., "ca": ..., "mg": ..., "na": ..., "so4": ..., "cl": ...}]`)에서
//! 프로파일 목록을 읽는다. 읽기에 실패하면 원인을 로그로 남기고 기본 프로파일 하나로 대체한다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 다섯 가지 목표 이온 농도 [mg/L].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IonConcentrations {
    #[serde(rename = "ca")]
    pub calcium: f64,
    #[serde(rename = "mg")]
    pub magnesium: f64,
    #[serde(rename = "na")]
    pub sodium: f64,
    #[serde(rename = "so4")]
    pub sulfate: f64,
    #[serde(rename = "cl")]
    pub chloride: f64,
}

impl IonConcentrations {
    /// (이온 기호, 값) 쌍. 검증과 표 출력에 쓴다.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Ca", self.calcium),
            ("Mg", self.magnesium),
            ("Na", self.sodium),
            ("SO4", self.sulfate),
            ("Cl", self.chloride),
        ]
    }
}

/// 이름 붙은 목표 수질 프로파일.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralProfile {
    pub name: String,
    #[serde(flatten)]
    pub ions: IonConcentrations,
}

/// 파일을 읽지 못할 때 쓰는 기본 프로파일.
pub fn default_profile() -> MineralProfile {
    MineralProfile {
        name: "Default".to_string(),
        ions: IonConcentrations {
            calcium: 50.0,
            magnesium: 10.0,
            sodium: 10.0,
            sulfate: 50.0,
            chloride: 50.0,
        },
    }
}

/// 비어 있지 않고 이름이 겹치지 않는 프로파일 목록.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    profiles: Vec<MineralProfile>,
}

impl ProfileSet {
    /// 목록을 검증해 만든다.
    pub fn new(profiles: Vec<MineralProfile>) -> Result<Self, ProfileError> {
        if profiles.is_empty() {
            return Err(ProfileError::Empty);
        }
        let mut seen = HashSet::new();
        for p in &profiles {
            if !seen.insert(p.name.as_str()) {
                return Err(ProfileError::DuplicateName(p.name.clone()));
            }
            if let Some((ion, value)) = p.ions.entries().into_iter().find(|(_, v)| *v < 0.0) {
                return Err(ProfileError::NegativeConcentration {
                    name: p.name.clone(),
                    ion,
                    value,
                });
            }
        }
        Ok(Self { profiles })
    }

    /// 기본 프로파일 하나만 담은 목록.
    pub fn fallback() -> Self {
        Self {
            profiles: vec![default_profile()],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MineralProfile> {
        self.profiles.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<&MineralProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// 첫 번째 프로파일. 목록은 항상 비어 있지 않다.
    pub fn first(&self) -> &MineralProfile {
        &self.profiles[0]
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// 프로파일 파일을 읽는 중 발생 가능한 오류.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("프로파일 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("프로파일 JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("프로파일 목록이 비어 있습니다")]
    Empty,
    #[error("프로파일 이름이 중복됩니다: {0}")]
    DuplicateName(String),
    #[error("프로파일 '{name}'의 {ion} 농도가 음수입니다: {value}")]
    NegativeConcentration {
        name: String,
        ion: &'static str,
        value: f64,
    },
}

/// JSON 문자열에서 프로파일 목록을 파싱한다.
pub fn parse_profiles(json: &str) -> Result<ProfileSet, ProfileError> {
    let profiles: Vec<MineralProfile> = serde_json::from_str(json)?;
    ProfileSet::new(profiles)
}

/// 파일에서 프로파일 목록을 읽는다. 실패 원인을 그대로 돌려준다.
pub fn read_profiles(path: &Path) -> Result<ProfileSet, ProfileError> {
    let content = fs::read_to_string(path)?;
    parse_profiles(&content)
}

/// 프로파일 목록을 읽는다. 어떤 이유로든 실패하면 기본 프로파일로 대체한다.
pub fn load_profiles(path: &Path) -> ProfileSet {
    match read_profiles(path) {
        Ok(set) => {
            tracing::debug!(path = %path.display(), count = set.len(), "loaded water profiles");
            set
        }
        Err(ProfileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "profile file not found, using default profile");
            ProfileSet::fallback()
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "invalid profile file, using default profile"
            );
            ProfileSet::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_ion_keys() {
        let set = parse_profiles(
            r#"[{"name": "Pale Ale", "ca": 110, "mg": 18, "na": 17, "so4": 350, "cl": 50}]"#,
        )
        .unwrap();
        let p = set.find("Pale Ale").unwrap();
        assert_eq!(p.ions.sulfate, 350.0);
        assert_eq!(p.ions.magnesium, 18.0);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(parse_profiles("[]"), Err(ProfileError::Empty)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"[
            {"name": "A", "ca": 1, "mg": 1, "na": 1, "so4": 1, "cl": 1},
            {"name": "A", "ca": 2, "mg": 2, "na": 2, "so4": 2, "cl": 2}
        ]"#;
        assert!(matches!(
            parse_profiles(json),
            Err(ProfileError::DuplicateName(n)) if n == "A"
        ));
    }

    #[test]
    fn negative_concentration_is_rejected() {
        let json = r#"[{"name": "Bad", "ca": 1, "mg": 1, "na": -3, "so4": 1, "cl": 1}]"#;
        assert!(matches!(
            parse_profiles(json),
            Err(ProfileError::NegativeConcentration { ion: "Na", .. })
        ));
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let json = r#"[{"name": "NoCl", "ca": 1, "mg": 1, "na": 1, "so4": 1}]"#;
        assert!(matches!(parse_profiles(json), Err(ProfileError::Json(_))));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let set = load_profiles(&dir.path().join("nope.json"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.first(), &default_profile());
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{ not json").unwrap();
        let set = load_profiles(&path);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Default"]);
    }
}
