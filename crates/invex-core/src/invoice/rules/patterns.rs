//! Fixed structural regexes for invoice field extraction.
//!
//! Label-driven patterns (locale-dependent) are compiled per extractor from
//! configuration; only the structural, locale-independent shapes live here.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Filename hint: FAC_YYYY_NNNN with an optional page suffix
    pub static ref FILENAME_HINT: Regex = Regex::new(
        r"FAC_(\d{4})_(\d{4})(?:-(\d{3}))?"
    ).unwrap();

    // Canonical invoice number as printed on the document
    pub static ref CANONICAL_NUMBER: Regex = Regex::new(
        r"FAC/\d{4}/\d{4}"
    ).unwrap();

    // Permissive last-resort number: "#123", "# INV-221"
    pub static ref HASH_NUMBER: Regex = Regex::new(
        r"#\s*(\w+(?:[-/]\w+)*)"
    ).unwrap();

    // Compact labeled date: "Issue date 2019-3-12", zero-padded downstream
    pub static ref COMPACT_DATE: Regex = Regex::new(
        r"(?i)(?:Issue|Date)[:\s]+(\d{4})[-/](\d{1,2})[-/](\d{1,2})"
    ).unwrap();

    // Standard email shape
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"
    ).unwrap();

    // Euro dialect total: "TOTAL 45,50 Euro"
    pub static ref EURO_TOTAL: Regex = Regex::new(
        r"(?i)TOTAL\s+([\d.,]+)\s*(?:Euro|EUR|€)"
    ).unwrap();

    // Euro dialect item row: "Widget 3 x 10,00 Euro".
    // The name must start with a capital letter; case stays significant.
    // Newlines are excluded from the name so a paragraph break ends it.
    pub static ref EURO_ITEM: Regex = Regex::new(
        r"([A-Z][A-Za-z .\-_&]+?)\.?[ \t]+(\d+)\s*x\s*([\d.,]+)\s*(?:Euro|EUR|€)"
    ).unwrap();

    // Generic currency item row: "Widget 3 x $10.00"
    pub static ref GENERIC_ITEM: Regex = Regex::new(
        r"([A-Za-z0-9][A-Za-z0-9 ]*?)[ \t]+(\d+)\s*x\s*[$€£]?\s*([\d,]+\.\d{2})"
    ).unwrap();

    // Address label; the captured span starts where this match ends
    pub static ref ADDRESS_LABEL: Regex = Regex::new(
        r"(?i)Address[:\s]+"
    ).unwrap();

    // Whitespace run, for span cleanup
    pub static ref SPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
