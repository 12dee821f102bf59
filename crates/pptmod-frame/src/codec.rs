use crate::error::{DecodeError, Result};
use crate::observer::DecodeObserver;
use crate::table::{FieldSpec, FieldTable, MODULATOR};

/// Size of one modulator frame in bytes.
pub const FRAME_LEN: usize = 86;

/// Number of 16-bit words in a frame.
pub const WORD_COUNT: usize = FRAME_LEN / 2;

/// Read the little-endian unsigned word whose low byte sits at `offset`.
///
/// Byte order is fixed (low byte first) regardless of the host.
///
/// # Panics
/// If `offset + 1 >= FRAME_LEN`. Table offsets are validated up front, so
/// the decoder never hits this.
#[inline]
pub fn read_word(frame: &[u8; FRAME_LEN], offset: usize) -> u16 {
    u16::from_le_bytes([frame[offset], frame[offset + 1]])
}

/// One decoded field.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<'t> {
    /// Descriptor the value was decoded with.
    pub spec: &'t FieldSpec,
    /// Unscaled word.
    pub raw: u16,
    /// Scaled value.
    pub value: f64,
}

impl Measurement<'_> {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn unit(&self) -> &str {
        &self.spec.unit
    }
}

/// All fields of one frame, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame<'t> {
    measurements: Vec<Measurement<'t>>,
}

impl<'t> DecodedFrame<'t> {
    /// Scaled value of a field.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.measurement(name).map(|m| m.value)
    }

    /// Full measurement for a field.
    pub fn measurement(&self, name: &str) -> Option<&Measurement<'t>> {
        self.measurements.iter().find(|m| m.spec.name == name)
    }

    /// Measurements in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Measurement<'t>> {
        self.measurements.iter()
    }

    /// Scaled values in table order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.measurements.iter().map(|m| m.value)
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Hand every measurement to an observer.
    pub fn observe<O: DecodeObserver + ?Sized>(&self, observer: &mut O) {
        observer.on_frame(self);
    }
}

impl<'a, 't> IntoIterator for &'a DecodedFrame<'t> {
    type Item = &'a Measurement<'t>;
    type IntoIter = std::slice::Iter<'a, Measurement<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}

/// Decoder bound to a field table.
#[derive(Debug, Clone, Copy)]
pub struct FrameDecoder<'t> {
    table: &'t FieldTable,
}

impl FrameDecoder<'static> {
    /// Decoder for the built-in modulator register map.
    pub fn modulator() -> Self {
        Self { table: &MODULATOR }
    }
}

impl<'t> FrameDecoder<'t> {
    pub fn new(table: &'t FieldTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t FieldTable {
        self.table
    }

    /// Decode every field of the table from `buf`.
    ///
    /// Needs at least [`FRAME_LEN`] bytes; anything past that is ignored.
    /// Fails before extracting any field when the buffer is short.
    pub fn decode(&self, buf: &[u8]) -> Result<DecodedFrame<'t>> {
        let frame = buf
            .first_chunk::<FRAME_LEN>()
            .ok_or(DecodeError::TruncatedFrame {
                actual: buf.len(),
                required: FRAME_LEN,
            })?;

        let measurements = self
            .table
            .fields()
            .iter()
            .map(|spec| {
                let raw = read_word(frame, spec.offset);
                Measurement {
                    spec,
                    raw,
                    value: spec.scale.apply(raw),
                }
            })
            .collect();

        Ok(DecodedFrame { measurements })
    }
}

impl Default for FrameDecoder<'static> {
    fn default() -> Self {
        Self::modulator()
    }
}

/// Decode a frame with the built-in modulator register map.
pub fn decode(buf: &[u8]) -> Result<DecodedFrame<'static>> {
    FrameDecoder::modulator().decode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Scale, MODULATOR_FIELDS};

    fn frame_with_word(offset: usize, word: u16) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[offset..offset + 2].copy_from_slice(&word.to_le_bytes());
        frame
    }

    #[test]
    fn rejects_short_buffers() {
        for len in 0..FRAME_LEN {
            let buf = vec![0xAA; len];
            let err = decode(&buf).unwrap_err();
            assert_eq!(
                err,
                DecodeError::TruncatedFrame {
                    actual: len,
                    required: FRAME_LEN
                }
            );
        }
    }

    #[test]
    fn eighty_five_zero_bytes_is_truncated() {
        let err = decode(&[0u8; 85]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedFrame {
                actual: 85,
                required: 86
            }
        );
        assert_eq!(err.to_string(), "truncated frame (85 bytes, need 86)");
    }

    #[test]
    fn full_frame_yields_every_field() {
        let decoded = decode(&[0u8; FRAME_LEN]).unwrap();
        assert_eq!(decoded.len(), MODULATOR_FIELDS.len());
        for (m, spec) in decoded.iter().zip(MODULATOR_FIELDS) {
            assert_eq!(m.spec, spec);
            assert_eq!(m.value, 0.0);
        }
    }

    #[test]
    fn word_byte_order() {
        for lo in 0..=255u8 {
            for hi in 0..=255u8 {
                let mut frame = [0u8; FRAME_LEN];
                frame[10] = lo;
                frame[11] = hi;
                assert_eq!(read_word(&frame, 10), u16::from(lo) + 256 * u16::from(hi));
            }
        }
    }

    #[test]
    fn last_word_of_frame() {
        let frame = frame_with_word(84, 0xBEEF);
        assert_eq!(read_word(&frame, 84), 0xBEEF);
    }

    #[test]
    fn scaling_is_exact() {
        for word in 0..=u16::MAX {
            let w = f64::from(word);
            assert_eq!(Scale::Raw.apply(word), w);
            assert_eq!(Scale::Div10.apply(word), w / 10.0);
            assert_eq!(Scale::Div100.apply(word), w / 100.0);
            assert_eq!(Scale::Raw.apply(word) as u16, word);
        }
    }

    #[test]
    fn heater_voltage_scenario() {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = 0x64;
        frame[1] = 0x00;

        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.get("HeaterVoltage1"), Some(10.0));
        assert_eq!(decoded.measurement("HeaterVoltage1").unwrap().raw, 100);
        for m in decoded.iter().filter(|m| m.name() != "HeaterVoltage1") {
            assert_eq!(m.value, 0.0, "{}", m.name());
        }
    }

    #[test]
    fn max_word_at_current_field() {
        let frame = frame_with_word(84, 0xFFFF);
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.get("MagnetCurrentCoil2"), Some(655.35));
    }

    #[test]
    fn raw_fields_are_unscaled() {
        let frame = frame_with_word(20, 0b1010_0000_0000_0101);
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.get("InterlockMsg1"), Some(f64::from(0b1010_0000_0000_0101u16)));
    }

    #[test]
    fn every_field_reads_its_own_word() {
        for spec in MODULATOR_FIELDS {
            let frame = frame_with_word(spec.offset, 1234);
            let decoded = decode(&frame).unwrap();
            for m in &decoded {
                let expected = if m.spec == spec { spec.scale.apply(1234) } else { 0.0 };
                assert_eq!(m.value, expected, "{} with {} set", m.name(), spec.name);
            }
        }
    }

    #[test]
    fn decoding_is_deterministic() {
        let frame: Vec<u8> = (0..FRAME_LEN as u8).map(|b| b.wrapping_mul(37)).collect();
        let first = decode(&frame).unwrap();
        let second = decode(&frame).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.value.to_bits(), b.value.to_bits());
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let frame: Vec<u8> = (0..FRAME_LEN as u8).collect();
        let mut longer = frame.clone();
        longer.extend_from_slice(&[0xFF; 40]);

        assert_eq!(decode(&longer).unwrap(), decode(&frame).unwrap());
    }

    #[test]
    fn values_follow_table_order() {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = 10; // HeaterVoltage1 -> 1.0
        frame[28] = 20; // HeaterVoltage2 -> 2.0
        let values: Vec<f64> = decode(&frame).unwrap().values().take(2).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn custom_table() {
        let table = FieldTable::new(vec![
            FieldSpec::new("OilTemp", 26, Scale::Div10, "degC"),
            FieldSpec::new("DissipatedPower", 24, Scale::Div10, "kW"),
        ])
        .unwrap();
        let mut frame = [0u8; FRAME_LEN];
        frame[26..28].copy_from_slice(&455u16.to_le_bytes());

        let decoded = FrameDecoder::new(&table).decode(&frame).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.get("OilTemp"), Some(45.5));
        assert_eq!(decoded.get("DissipatedPower"), Some(0.0));
        assert_eq!(decoded.get("HeaterVoltage1"), None);
    }
}
