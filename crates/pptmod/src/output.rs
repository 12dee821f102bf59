use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pptmod_frame::{DecodedFrame, FieldTable, Measurement, Scale};
use serde::Serialize;

use crate::exit::{table_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame: u64,
    timestamp: String,
    values: BTreeMap<&'a str, f64>,
}

pub fn print_frame(decoded: &DecodedFrame<'_>, index: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                frame: index,
                timestamp: now_unix_seconds(),
                values: decoded.iter().map(|m| (m.name(), m.value)).collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "OFFSET", "RAW", "VALUE", "UNIT"]);
            for m in decoded {
                table.add_row(vec![
                    m.name().to_string(),
                    m.spec.offset.to_string(),
                    format!("0x{:04X}", m.raw),
                    format_value(m),
                    m.unit().to_string(),
                ]);
            }
            println!("frame {index}");
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("frame {index}:");
            for m in decoded {
                println!("  {:<20} {} {}", m.name(), format_value(m), m.unit());
            }
        }
    }
}

pub fn print_fields(table: &FieldTable, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let json = table
                .to_json()
                .map_err(|err| table_error("failed rendering field table", err))?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let mut out = Table::new();
            out.load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "FIELD", "OFFSET", "WORD", "SCALE", "UNIT"]);
            for (i, spec) in table.fields().iter().enumerate() {
                out.add_row(vec![
                    i.to_string(),
                    spec.name.to_string(),
                    spec.offset.to_string(),
                    spec.word_index().to_string(),
                    scale_label(spec.scale).to_string(),
                    spec.unit.to_string(),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for spec in table.fields() {
                println!(
                    "{:<20} offset={:<3} scale={:<6} unit={}",
                    spec.name,
                    spec.offset,
                    scale_label(spec.scale),
                    spec.unit
                );
            }
        }
    }
    Ok(())
}

/// Render a value with the precision its scale encodes.
pub fn format_value(m: &Measurement<'_>) -> String {
    match m.spec.scale {
        Scale::Raw => m.raw.to_string(),
        Scale::Div10 => format!("{:.1}", m.value),
        Scale::Div100 => format!("{:.2}", m.value),
    }
}

fn scale_label(scale: Scale) -> &'static str {
    match scale {
        Scale::Raw => "raw",
        Scale::Div10 => "/10",
        Scale::Div100 => "/100",
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use pptmod_frame::{decode, FRAME_LEN};

    use super::*;

    #[test]
    fn values_keep_scale_precision() {
        let mut buf = [0u8; FRAME_LEN];
        buf[0..2].copy_from_slice(&2200u16.to_le_bytes()); // HeaterVoltage1
        buf[8..10].copy_from_slice(&1234u16.to_le_bytes()); // TotalCurrent
        buf[20..22].copy_from_slice(&0x0101u16.to_le_bytes()); // InterlockMsg1
        let decoded = decode(&buf).unwrap();

        let text = |name: &str| format_value(decoded.measurement(name).unwrap());
        assert_eq!(text("HeaterVoltage1"), "220.0");
        assert_eq!(text("TotalCurrent"), "12.34");
        assert_eq!(text("InterlockMsg1"), "257");
    }
}
