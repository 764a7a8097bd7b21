//! Sitemap exporters
//!
//! Pure formatting over a finished result set: sitemaps.org XML, plain text,
//! JSON, and CSV.

use crate::output::traits::{OutputError, OutputResult};
use crate::state::PageResult;
use serde::{Deserialize, Serialize};
use std::fmt;

const CSV_HEADER: [&str; 6] = [
    "URL",
    "Last Modified",
    "Change Frequency",
    "Priority",
    "Depth",
    "Title",
];

/// Supported export formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xml,
    Txt,
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension for the format (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Renders `results` in the requested format
///
/// # Returns
///
/// * `Ok(String)` - The rendered document
/// * `Err(OutputError)` - JSON or CSV serialization failed
pub fn export(results: &[PageResult], format: ExportFormat) -> OutputResult<String> {
    match format {
        ExportFormat::Xml => Ok(generate_xml_sitemap(results)),
        ExportFormat::Txt => Ok(generate_txt_sitemap(results)),
        ExportFormat::Json => generate_json_sitemap(results),
        ExportFormat::Csv => generate_csv_sitemap(results),
    }
}

pub fn generate_xml_sitemap(results: &[PageResult]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in results {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&page.location)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            page.last_modified.format("%Y-%m-%d")
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            page.change_frequency
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", page.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn generate_txt_sitemap(results: &[PageResult]) -> String {
    results
        .iter()
        .map(|page| page.location.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry shape of the JSON export
#[derive(Serialize)]
struct JsonEntry<'a> {
    loc: &'a str,
    lastmod: String,
    changefreq: &'static str,
    priority: f64,
}

pub fn generate_json_sitemap(results: &[PageResult]) -> OutputResult<String> {
    let entries: Vec<JsonEntry<'_>> = results
        .iter()
        .map(|page| JsonEntry {
            loc: &page.location,
            lastmod: page.last_modified.format("%Y-%m-%d").to_string(),
            changefreq: page.change_frequency.as_str(),
            priority: page.priority,
        })
        .collect();

    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Every field is quoted, header included
pub fn generate_csv_sitemap(results: &[PageResult]) -> OutputResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for page in results {
        writer.write_record([
            page.location.clone(),
            page.last_modified.format("%Y-%m-%d").to_string(),
            page.change_frequency.to_string(),
            page.priority.to_string(),
            page.depth.to_string(),
            page.title.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
