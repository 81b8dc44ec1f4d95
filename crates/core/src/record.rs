use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Placeholder for any field whose extraction failed.
pub const NOT_DETECTED: &str = "Not detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Passport,
    #[serde(rename = "Aadhaar Card")]
    AadhaarCard,
    #[serde(rename = "PAN Card")]
    PanCard,
    #[serde(rename = "Driving License")]
    DrivingLicense,
    Invoice,
    #[serde(rename = "Voter ID")]
    VoterId,
    Form,
    #[serde(rename = "Student ID")]
    StudentId,
    #[serde(rename = "Generic Document")]
    GenericDocument,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::Passport,
        DocumentType::AadhaarCard,
        DocumentType::PanCard,
        DocumentType::DrivingLicense,
        DocumentType::Invoice,
        DocumentType::VoterId,
        DocumentType::Form,
        DocumentType::StudentId,
        DocumentType::GenericDocument,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Passport => "Passport",
            DocumentType::AadhaarCard => "Aadhaar Card",
            DocumentType::PanCard => "PAN Card",
            DocumentType::DrivingLicense => "Driving License",
            DocumentType::Invoice => "Invoice",
            DocumentType::VoterId => "Voter ID",
            DocumentType::Form => "Form",
            DocumentType::StudentId => "Student ID",
            DocumentType::GenericDocument => "Generic Document",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        DocumentType::ALL
            .into_iter()
            .find(|t| t.label().to_lowercase().replace(' ', "_") == wanted)
            .or(match wanted.as_str() {
                "aadhaar" => Some(DocumentType::AadhaarCard),
                "pan" => Some(DocumentType::PanCard),
                "generic" => Some(DocumentType::GenericDocument),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown document type: '{s}'"))
    }
}

/// Insertion-ordered field map. Values are never blank: an empty value is
/// stored as [`NOT_DETECTED`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with every key preset to the sentinel.
    pub fn with_keys(keys: &[&str]) -> Self {
        let mut map = Self::new();
        for key in keys {
            map.insert(*key, NOT_DETECTED);
        }
        map
    }

    /// Insert or overwrite, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let value = if value.trim().is_empty() { NOT_DETECTED.to_string() } else { value };
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Overwrite `key` only on a successful, non-blank match.
    pub fn fill(&mut self, key: &str, value: Option<String>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// True when the key holds something other than the sentinel.
    pub fn is_detected(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v != NOT_DETECTED)
    }

    pub fn detected_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v != NOT_DETECTED).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// The pipeline's primary output for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub fields: FieldMap,
}

impl ExtractedRecord {
    pub fn new(doc_type: DocumentType, fields: FieldMap) -> Self {
        Self { doc_type, fields }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn blank_values_become_sentinel() {
        let mut map = FieldMap::new();
        map.insert("full_name", "   ");
        assert_eq!(map.get("full_name"), Some(NOT_DETECTED));
        assert!(!map.is_detected("full_name"));
    }

    #[test]
    fn fill_only_overwrites_on_match() {
        let mut map = FieldMap::with_keys(&["dob", "id_number"]);
        map.fill("dob", None);
        map.fill("id_number", Some(String::new()));
        assert_eq!(map.detected_count(), 0);
        map.fill("dob", Some("12-04-1990".into()));
        assert_eq!(map.get("dob"), Some("12-04-1990"));
    }

    #[test]
    fn insert_keeps_position_of_existing_key() {
        let mut map = FieldMap::with_keys(&["a", "b", "c"]);
        map.insert("a", "1");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn field_map_serializes_in_insertion_order() {
        let mut map = FieldMap::new();
        map.insert("zeta", "1");
        map.insert("alpha", "2");
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"zeta":"1","alpha":"2"}"#);
        let back: FieldMap = serde_json::from_str(r#"{"zeta":"1","alpha":""}"#).unwrap();
        assert_eq!(back.get("alpha"), Some(NOT_DETECTED));
    }

    #[test]
    fn record_serializes_type_label() {
        let record = ExtractedRecord::new(DocumentType::AadhaarCard, FieldMap::with_keys(&["dob"]));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"Aadhaar Card","fields":{"dob":"Not detected"}}"#);
    }

    #[test]
    fn document_type_from_str_accepts_labels_and_names() {
        assert_eq!(DocumentType::from_str("PAN Card").unwrap(), DocumentType::PanCard);
        assert_eq!(DocumentType::from_str("voter_id").unwrap(), DocumentType::VoterId);
        assert_eq!(DocumentType::from_str("generic").unwrap(), DocumentType::GenericDocument);
        assert!(DocumentType::from_str("boarding pass").is_err());
    }

    #[test]
    fn document_type_display_roundtrip() {
        for t in DocumentType::ALL {
            assert_eq!(DocumentType::from_str(&t.to_string()).unwrap(), t);
        }
    }
}
