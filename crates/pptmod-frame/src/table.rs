use std::borrow::Cow;
use std::collections::HashSet;

use crate::codec::FRAME_LEN;
use crate::error::TableError;

/// Scaling rule applied to a raw word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scale {
    /// Word as-is (timer counts, interlock/status bitfields).
    Raw,
    /// One decimal digit: volts, degrees C, kW, kV.
    Div10,
    /// Two decimal digits: amperes, L/min.
    Div100,
}

impl Scale {
    /// Divisor applied to the raw word.
    pub const fn divisor(self) -> f64 {
        match self {
            Scale::Raw => 1.0,
            Scale::Div10 => 10.0,
            Scale::Div100 => 100.0,
        }
    }

    /// Scale a raw word into a physical value.
    #[inline]
    pub fn apply(self, word: u16) -> f64 {
        match self {
            Scale::Raw => f64::from(word),
            Scale::Div10 => f64::from(word) / 10.0,
            Scale::Div100 => f64::from(word) / 100.0,
        }
    }
}

/// One named measurement in the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    /// Measurement name.
    pub name: Cow<'static, str>,
    /// Byte offset of the word's low byte.
    pub offset: usize,
    /// Scaling rule.
    pub scale: Scale,
    /// Display unit, empty for bitfields.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: Cow<'static, str>,
}

impl FieldSpec {
    /// Describe a field with static name and unit.
    pub const fn new(name: &'static str, offset: usize, scale: Scale, unit: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            offset,
            scale,
            unit: Cow::Borrowed(unit),
        }
    }

    /// Index of the word this field occupies.
    pub fn word_index(&self) -> usize {
        self.offset / 2
    }
}

/// Register map of the PPT modulator: 22 measurements, one word each, in
/// host output-slot order. Offsets are twice the word index; none is shared.
pub const MODULATOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("HeaterVoltage1", 0, Scale::Div10, "V"),
    FieldSpec::new("HeaterVoltage2", 28, Scale::Div10, "V"),
    FieldSpec::new("ReservoirVoltage", 4, Scale::Div10, "V"),
    FieldSpec::new("KlystronVoltage", 64, Scale::Div10, "V"),
    FieldSpec::new("MagnetVoltageCoil1", 72, Scale::Div10, "V"),
    FieldSpec::new("MagnetVoltageCoil2", 80, Scale::Div10, "V"),
    FieldSpec::new("TotalCurrent", 8, Scale::Div100, "A"),
    FieldSpec::new("HeaterCurrent", 32, Scale::Div100, "A"),
    FieldSpec::new("KlystronCurrent", 68, Scale::Div100, "A"),
    FieldSpec::new("MagnetCurrentCoil1", 76, Scale::Div100, "A"),
    FieldSpec::new("MagnetCurrentCoil2", 84, Scale::Div100, "A"),
    FieldSpec::new("BodyWaterInTemp", 36, Scale::Div10, "degC"),
    FieldSpec::new("BodyWaterOutTemp", 40, Scale::Div10, "degC"),
    FieldSpec::new("BodyWaterFlow", 44, Scale::Div100, "L/min"),
    FieldSpec::new("TimerPreheatMin", 12, Scale::Raw, "min"),
    FieldSpec::new("TimerPreheatSec", 16, Scale::Raw, "s"),
    FieldSpec::new("TimerPreheat100Min", 48, Scale::Raw, "min"),
    FieldSpec::new("TimerPreheat100Sec", 52, Scale::Raw, "s"),
    FieldSpec::new("InterlockMsg1", 20, Scale::Raw, ""),
    FieldSpec::new("InterlockMsg2", 56, Scale::Raw, ""),
    FieldSpec::new("StatusMsg1", 24, Scale::Raw, ""),
    FieldSpec::new("StatusMsg2", 60, Scale::Raw, ""),
];

pub(crate) static MODULATOR: FieldTable = FieldTable::modulator();

/// Ordered set of field descriptors.
///
/// Every table holds at least one field, and every field's word lies inside
/// [`FRAME_LEN`]. Decoding relies on this and never re-checks offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    fields: Cow<'static, [FieldSpec]>,
}

impl FieldTable {
    /// The built-in modulator register map.
    pub const fn modulator() -> Self {
        Self {
            fields: Cow::Borrowed(MODULATOR_FIELDS),
        }
    }

    /// Build a table from caller-supplied descriptors.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, TableError> {
        validate(&fields)?;
        Ok(Self {
            fields: Cow::Owned(fields),
        })
    }

    /// Descriptors in table order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Position of a field in table order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|spec| spec.name == name)
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::modulator()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TableDocument {
    fields: Vec<FieldSpec>,
}

#[cfg(feature = "serde")]
impl FieldTable {
    /// Parse and validate a JSON table document.
    ///
    /// ```text
    /// { "fields": [ { "name": "HeaterVoltage1", "offset": 0, "scale": "div10", "unit": "V" } ] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let doc: TableDocument = serde_json::from_str(json)?;
        let table = Self::new(doc.fields)?;
        tracing::debug!(fields = table.len(), "loaded field table");
        Ok(table)
    }

    /// Read a JSON table document from disk.
    pub fn from_path(path: &std::path::Path) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Render the table as a JSON document accepted by [`FieldTable::from_json`].
    pub fn to_json(&self) -> Result<String, TableError> {
        let doc = TableDocument {
            fields: self.fields.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

fn validate(fields: &[FieldSpec]) -> Result<(), TableError> {
    if fields.is_empty() {
        return Err(TableError::Empty);
    }

    let mut names = HashSet::with_capacity(fields.len());
    for spec in fields {
        if spec.offset % 2 != 0 {
            return Err(TableError::UnalignedOffset {
                name: spec.name.to_string(),
                offset: spec.offset,
            });
        }
        if spec.offset.saturating_add(1) >= FRAME_LEN {
            return Err(TableError::OffsetOutOfBounds {
                name: spec.name.to_string(),
                offset: spec.offset,
                frame_len: FRAME_LEN,
            });
        }
        if !names.insert(&*spec.name) {
            return Err(TableError::DuplicateName(spec.name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulator_table_is_valid() {
        validate(MODULATOR_FIELDS).expect("built-in table should validate");
        assert_eq!(FieldTable::modulator().len(), 22);
    }

    #[test]
    fn modulator_offsets_are_distinct_and_in_bounds() {
        let mut offsets = HashSet::new();
        for spec in MODULATOR_FIELDS {
            assert!(spec.offset + 1 < FRAME_LEN, "{} out of bounds", spec.name);
            assert!(offsets.insert(spec.offset), "{} shares an offset", spec.name);
        }
    }

    #[test]
    fn modulator_scales_follow_units() {
        for spec in MODULATOR_FIELDS {
            let expected = match &*spec.unit {
                "V" | "degC" => Scale::Div10,
                "A" | "L/min" => Scale::Div100,
                _ => Scale::Raw,
            };
            assert_eq!(spec.scale, expected, "{}", spec.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        let table = FieldTable::modulator();
        let spec = table.field("KlystronCurrent").unwrap();
        assert_eq!(spec.offset, 68);
        assert_eq!(spec.word_index(), 34);
        assert_eq!(table.position("HeaterVoltage2"), Some(1));
        assert!(table.field("OilTemp").is_none());
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(FieldTable::new(Vec::new()), Err(TableError::Empty)));
    }

    #[test]
    fn rejects_odd_offset() {
        let err = FieldTable::new(vec![FieldSpec::new("X", 3, Scale::Raw, "")]).unwrap_err();
        assert!(matches!(err, TableError::UnalignedOffset { offset: 3, .. }));
    }

    #[test]
    fn rejects_offset_past_frame() {
        let err = FieldTable::new(vec![FieldSpec::new("X", 86, Scale::Raw, "")]).unwrap_err();
        assert!(matches!(
            err,
            TableError::OffsetOutOfBounds {
                offset: 86,
                frame_len: 86,
                ..
            }
        ));

        // last word of the frame is fine
        FieldTable::new(vec![FieldSpec::new("X", 84, Scale::Raw, "")]).unwrap();
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = FieldTable::new(vec![
            FieldSpec::new("X", 0, Scale::Raw, ""),
            FieldSpec::new("X", 2, Scale::Raw, ""),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateName(name) if name == "X"));
    }

    #[test]
    fn shared_offsets_are_allowed() {
        let table = FieldTable::new(vec![
            FieldSpec::new("Interlock", 48, Scale::Raw, ""),
            FieldSpec::new("InterlockCopy", 48, Scale::Raw, ""),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn scale_divisors() {
        assert_eq!(Scale::Raw.divisor(), 1.0);
        assert_eq!(Scale::Div10.divisor(), 10.0);
        assert_eq!(Scale::Div100.divisor(), 100.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_document_round_trip() {
        let json = FieldTable::modulator().to_json().unwrap();
        let table = FieldTable::from_json(&json).unwrap();
        assert_eq!(table, FieldTable::modulator());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_unit_defaults_to_empty() {
        let table = FieldTable::from_json(
            r#"{"fields":[{"name":"OilTemp","offset":26,"scale":"div10"}]}"#,
        )
        .unwrap();
        let spec = table.field("OilTemp").unwrap();
        assert_eq!(spec.scale, Scale::Div10);
        assert!(spec.unit.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_document_is_validated() {
        let err = FieldTable::from_json(r#"{"fields":[{"name":"X","offset":5,"scale":"raw"}]}"#)
            .unwrap_err();
        assert!(matches!(err, TableError::UnalignedOffset { .. }));

        let err = FieldTable::from_json(r#"{"fields":[{"name":"X","offset":0,"scale":"div1000"}]}"#)
            .unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }
}
