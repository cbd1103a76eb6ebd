//! Site search over a fixed catalog of pages.
//!
//! The catalog is small and read-only, so search is a linear scan: the query
//! is split into lower-cased terms and an entry matches when every term
//! appears somewhere in its title, description, category or keywords.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, StartupError};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;
pub const MAX_QUERY_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchEntry {
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SearchEntry {
    fn haystack(&self) -> String {
        let mut text = format!("{} {} {}", self.title, self.description, self.category);
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(keyword);
        }
        text.to_lowercase()
    }
}

pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    // lower-cased text per entry, same order as `entries`
    haystacks: Vec<String>,
}

impl SearchIndex {
    pub fn new(entries: Vec<SearchEntry>) -> Self {
        let haystacks = entries.iter().map(SearchEntry::haystack).collect();
        Self { entries, haystacks }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, StartupError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StartupError::ReadContentIndex {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<SearchEntry> =
            serde_json::from_str(&raw).map_err(|source| StartupError::ParseContentIndex {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns matching entries in catalog order, at most `limit` of them
    /// (clamped to [`MAX_LIMIT`]). A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<&SearchEntry>, AppError> {
        let query = query.trim();
        if query.chars().count() > MAX_QUERY_LEN {
            return Err(AppError::Validation(format!(
                "Query must be at most {MAX_QUERY_LEN} characters"
            )));
        }

        let query = query.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .entries
            .iter()
            .zip(&self.haystacks)
            .filter(|(_, text)| terms.iter().all(|term| text.contains(term)))
            .map(|(entry, _)| entry)
            .take(limit.min(MAX_LIMIT))
            .collect();

        Ok(results)
    }

    pub fn builtin() -> Self {
        let page = |title: &str, description: &str, url: &str, category: &str, keywords: &[&str]| {
            SearchEntry {
                title: title.to_string(),
                description: description.to_string(),
                url: url.to_string(),
                category: category.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        };

        Self::new(vec![
            page(
                "SAP S/4HANA Implementation",
                "Greenfield and brownfield S/4HANA rollouts with fixed-scope delivery.",
                "/solutions/sap-s4hana",
                "Solutions",
                &["sap", "erp", "migration", "s4"],
            ),
            page(
                "SAP Business Technology Platform",
                "Extensions, integrations and analytics built on SAP BTP.",
                "/solutions/sap-btp",
                "Solutions",
                &["sap", "btp", "integration", "cloud"],
            ),
            page(
                "SAP SuccessFactors",
                "Cloud HR suite implementation, payroll and talent management.",
                "/solutions/sap-successfactors",
                "Solutions",
                &["sap", "hr", "hcm", "payroll"],
            ),
            page(
                "Intelligent Process Automation",
                "RPA bots and workflow automation for finance and operations teams.",
                "/automation/process-automation",
                "Automation",
                &["rpa", "workflow", "bots"],
            ),
            page(
                "AI Document Processing",
                "Invoice and purchase order extraction with human-in-the-loop review.",
                "/automation/document-processing",
                "Automation",
                &["ai", "ocr", "invoices", "automation"],
            ),
            page(
                "Manufacturing",
                "Shop-floor to top-floor visibility with SAP digital manufacturing.",
                "/industries/manufacturing",
                "Industries",
                &["sap", "production", "supply chain"],
            ),
            page(
                "Retail & Consumer Goods",
                "Omnichannel commerce, demand forecasting and store operations.",
                "/industries/retail",
                "Industries",
                &["retail", "commerce", "forecasting"],
            ),
            page(
                "Utilities",
                "Meter-to-cash and asset management for energy and water utilities.",
                "/industries/utilities",
                "Industries",
                &["energy", "sap", "asset management"],
            ),
            page(
                "Careers",
                "Open roles for SAP consultants, automation engineers and developers.",
                "/careers",
                "Company",
                &["jobs", "hiring", "consultant"],
            ),
            page(
                "Blog",
                "Articles on SAP releases, automation case studies and delivery practice.",
                "/blog",
                "Company",
                &["news", "articles", "insights"],
            ),
            page(
                "Contact Us",
                "Talk to our team about your SAP or automation project.",
                "/contact",
                "Company",
                &["sales", "demo", "support"],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn titles(results: &[&SearchEntry]) -> Vec<String> {
        results.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn matches_case_insensitively() {
        let index = SearchIndex::builtin();
        let results = index.search("CAREERS", DEFAULT_LIMIT).unwrap();
        assert_eq!(titles(&results), vec!["Careers"]);
    }

    #[test]
    fn every_term_must_match() {
        let index = SearchIndex::builtin();
        let results = index.search("sap payroll", DEFAULT_LIMIT).unwrap();
        assert_eq!(titles(&results), vec!["SAP SuccessFactors"]);
    }

    #[test]
    fn keywords_are_searched() {
        let index = SearchIndex::builtin();
        let results = index.search("rpa", DEFAULT_LIMIT).unwrap();
        assert_eq!(titles(&results), vec!["Intelligent Process Automation"]);
    }

    #[test]
    fn keeps_catalog_order_and_limit() {
        let index = SearchIndex::builtin();
        let all = index.search("sap", MAX_LIMIT).unwrap();
        assert!(all.len() > 2);
        assert_eq!(all[0].title, "SAP S/4HANA Implementation");

        let two = index.search("sap", 2).unwrap();
        assert_eq!(titles(&two), titles(&all[..2]));
    }

    #[test]
    fn blank_query_returns_nothing() {
        let index = SearchIndex::builtin();
        assert!(index.search("   ", DEFAULT_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn overlong_query_is_rejected() {
        let index = SearchIndex::builtin();
        let query = "a".repeat(MAX_QUERY_LEN + 1);
        assert!(matches!(
            index.search(&query, DEFAULT_LIMIT),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title":"Pricing","description":"Plans","url":"/pricing","category":"Company"}}]"#
        )
        .unwrap();

        let index = SearchIndex::from_json_file(file.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.search("plans", 5).unwrap()[0].url, "/pricing");
    }

    #[test]
    fn bad_catalog_file_is_a_startup_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            SearchIndex::from_json_file(file.path()),
            Err(StartupError::ParseContentIndex { .. })
        ));
    }
}
