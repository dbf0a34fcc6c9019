//! Result rendering for the command-line front end.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sql::QueryResult;
use serde_json::Value;
use std::io::Write;
use tabled::builder::Builder;
use tabled::settings::Style;

pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    header: bool,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            header: true,
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn write_result(&mut self, result: &QueryResult) -> Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(result),
            OutputFormat::Csv => self.write_delimited(result, b','),
            OutputFormat::Tsv => self.write_delimited(result, b'\t'),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result.to_json_array())?;
                writeln!(self.writer, "{}", json)?;
                Ok(())
            }
            OutputFormat::Jsonl => {
                for row in result.to_json_array() {
                    writeln!(self.writer, "{}", serde_json::to_string(&row)?)?;
                }
                Ok(())
            }
        }
    }

    fn write_table(&mut self, result: &QueryResult) -> Result<()> {
        if result.is_empty() {
            writeln!(self.writer, "No results")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        if self.header {
            builder.push_record(result.columns.iter().cloned());
        }
        for row in &result.rows {
            builder.push_record(row.iter().map(cell_text));
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        writeln!(self.writer, "{}", table)?;
        Ok(())
    }

    fn write_delimited(&mut self, result: &QueryResult, delimiter: u8) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(&mut self.writer);

        if self.header {
            csv.write_record(&result.columns)?;
        }
        for row in &result.rows {
            csv.write_record(row.iter().map(cell_text))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn writeln(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
