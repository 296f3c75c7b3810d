//! Presentation and export of operating point results.

use std::fs::File;
use std::io::Write;
use anyhow::{Context, Result};
use csv::Writer;
use log::info;

use crate::cli::OutputFormat;
use crate::simulator::OperatingPoint;

/// Write results to `writer` in the requested format
pub fn write_results<W: Write>(op: &OperatingPoint, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(op, writer),
        OutputFormat::Csv => write_csv(op, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(writer, op)?;
            Ok(())
        }
    }
}

/// Export results to a file
pub fn export_results(op: &OperatingPoint, filename: &str, format: OutputFormat) -> Result<()> {
    let file = File::create(filename).with_context(|| format!("Failed to create '{}'", filename))?;
    write_results(op, format, file)?;
    info!("Results exported to {:?}: {}", format, filename);
    Ok(())
}

fn write_table<W: Write>(op: &OperatingPoint, mut writer: W) -> Result<()> {
    writeln!(writer, "Node voltages:")?;
    for (node, voltage) in &op.voltages {
        writeln!(writer, "  V({}): {:.6}V", node, voltage)?;
    }

    if !op.currents.is_empty() {
        writeln!(writer, "\nSource currents:")?;
        for (source, current) in &op.currents {
            writeln!(writer, "  I({}): {:.6}A", source, current)?;
        }
    }
    Ok(())
}

fn write_csv<W: Write>(op: &OperatingPoint, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(["name", "kind", "value"])?;

    for (node, voltage) in &op.voltages {
        writer.write_record([format!("V({})", node), "voltage".to_string(), voltage.to_string()])?;
    }
    for (source, current) in &op.currents {
        writer.write_record([format!("I({})", source), "current".to_string(), current.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> OperatingPoint {
        let mut voltages = BTreeMap::new();
        voltages.insert("1".to_string(), 5.0);
        voltages.insert("GND".to_string(), 0.0);
        let mut currents = BTreeMap::new();
        currents.insert("V1".to_string(), -5.0);
        OperatingPoint { voltages, currents }
    }

    fn render(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_results(&sample(), format, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_table_output() {
        let text = render(OutputFormat::Table);
        assert!(text.contains("V(1): 5.000000V"));
        assert!(text.contains("V(GND): 0.000000V"));
        assert!(text.contains("I(V1): -5.000000A"));
    }

    #[test]
    fn test_csv_output() {
        let text = render(OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["name,kind,value", "V(1),voltage,5", "V(GND),voltage,0", "I(V1),current,-5"]);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("op.csv");
        let filename = path.to_str().unwrap();

        export_results(&sample(), filename, OutputFormat::Csv).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("name,kind,value\n"));
        assert!(text.contains("I(V1),current,-5"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let text = render(OutputFormat::Json);
        let parsed: OperatingPoint = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }
}
