// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolarWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};

/// Media type of generated report documents
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Energy balance of one installation over one calendar month.
///
/// There is at most one report per (installation, month, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub installation_id: String,
    /// Zero-padded month number, "01".."12"
    pub month: String,
    pub year: i32,
    /// kWh
    pub total_production: f64,
    /// kWh
    pub total_consumption: f64,
    /// kWh
    pub total_export: f64,
    /// kWh
    pub total_import: f64,
    /// Performance ratio (%)
    pub efficiency: f64,
}

impl MonthlyReport {
    /// Month label as the backend formats it
    pub fn month_label(month: u32) -> String {
        format!("{month:02}")
    }

    /// Produced energy that was not exported (kWh)
    pub fn self_consumed(&self) -> f64 {
        (self.total_production - self.total_export).max(0.0)
    }
}

/// Binary report document together with its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfReport {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PdfReport {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            media_type: PDF_MEDIA_TYPE.to_string(),
            bytes,
        }
    }

    /// Suggested download name, e.g. `report-inst-001-2024-06.pdf`
    pub fn file_name(installation_id: &str, month: u32, year: i32) -> String {
        format!("report-{installation_id}-{year}-{month:02}.pdf")
    }

    pub fn has_pdf_signature(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label_is_zero_padded() {
        assert_eq!(MonthlyReport::month_label(6), "06");
        assert_eq!(MonthlyReport::month_label(12), "12");
    }

    #[test]
    fn test_pdf_report_defaults() {
        let report = PdfReport::new(b"%PDF-1.4\n".to_vec());
        assert_eq!(report.media_type, PDF_MEDIA_TYPE);
        assert!(report.has_pdf_signature());
        assert_eq!(
            PdfReport::file_name("inst-001", 6, 2024),
            "report-inst-001-2024-06.pdf"
        );
    }
}
