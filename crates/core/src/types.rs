//! 도메인 타입 -- 로그에서 추출한 블록 레코드
//!
//! [`Record`]는 필드 이름에서 [`FieldValue`]로의 매핑입니다.
//! 로그 라인을 스캔하면서 필드가 하나씩 채워지고, 완료 필드가 나타나면
//! 하나의 레코드로 확정됩니다. 확정된 레코드는 조인 또는 출력 후 버려집니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 블록 해시 필드 이름 (조인 키)
pub const HASH_FIELD: &str = "hash";

/// 레코드 필드 값
///
/// 정규식 캡처는 `Text`로, 파생된 숫자/시간(밀리초)은 `Number`로 저장합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 파생된 숫자 값 (밀리초 단위 시간 포함)
    Number(f64),
    /// 정규식으로 캡처한 원문
    Text(String),
}

impl FieldValue {
    /// 텍스트 값을 반환합니다. 숫자면 `None`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// 숫자 값을 반환합니다. 텍스트면 `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64의 Display는 정수값에 `.0`을 붙이지 않음 (120.0 -> "120")
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// 블록 레코드
///
/// 필드 이름 순으로 정렬된 맵이며, JSON으로는 평탄한 객체로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// 빈 레코드를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// 텍스트 필드 값을 조회합니다.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// 숫자 필드 값을 조회합니다.
    pub fn get_number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// 필드 존재 여부를 확인합니다.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// 필드를 설정합니다. 기존 값이 있으면 덮어쓰고 이전 값을 반환합니다.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// 필드를 제거합니다.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// 다른 레코드의 필드를 병합합니다. 충돌 시 `other`의 값이 우선합니다.
    pub fn merge_from(&mut self, other: &Record) {
        for (name, value) in &other.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// 블록 해시를 반환합니다.
    pub fn hash(&self) -> Option<&str> {
        self.get_text(HASH_FIELD)
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 필드를 이름 순으로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(120.0).to_string(), "120");
        assert_eq!(FieldValue::Number(120.5).to_string(), "120.5");
        assert_eq!(FieldValue::Text("aa11".to_owned()).to_string(), "aa11");
    }

    #[test]
    fn insert_overwrites_and_returns_previous() {
        let mut record = Record::new();
        assert!(record.insert("hash", "aa11").is_none());
        let prev = record.insert("hash", "bb22");
        assert_eq!(prev, Some(FieldValue::Text("aa11".to_owned())));
        assert_eq!(record.hash(), Some("bb22"));
    }

    #[test]
    fn merge_from_prefers_other() {
        let mut left: Record = [("hash", "aa11"), ("time", "left")].into_iter().collect();
        let right: Record = [("hash", "aa11"), ("time", "right"), ("bc_x", "1")]
            .into_iter()
            .collect();
        left.merge_from(&right);
        assert_eq!(left.get_text("time"), Some("right"));
        assert_eq!(left.get_text("bc_x"), Some("1"));
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn hash_ignores_numeric_value() {
        let mut record = Record::new();
        record.insert(HASH_FIELD, 12.0);
        assert!(record.contains(HASH_FIELD));
        assert!(record.hash().is_none());
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut record = Record::new();
        record.insert("hash", "aa11");
        record.insert("bc_dur", 10.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hash"], "aa11");
        assert_eq!(json["bc_dur"].as_f64(), Some(10.0));
    }

    #[test]
    fn deserializes_numbers_and_text() {
        let record: Record = serde_json::from_str(r#"{"hash":"aa11","blocktime":120.5}"#).unwrap();
        assert_eq!(record.get_text("hash"), Some("aa11"));
        assert_eq!(record.get_number("blocktime"), Some(120.5));
    }

    #[test]
    fn display_lists_fields_in_name_order() {
        let record: Record = [("txcount", "3"), ("hash", "aa11")].into_iter().collect();
        assert_eq!(record.to_string(), "hash=aa11 txcount=3");
    }
}
