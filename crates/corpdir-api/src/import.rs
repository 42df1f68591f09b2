//! Bulk company import from CSV.
//!
//! Expected headers: `company_ko, company_en, company_ja, tag_ko, tag_en,
//! tag_ja`. Tag cells hold `|`-separated lists; the n-th entry of every
//! language's list forms one tag's translation map. Each row becomes one
//! ordinary create request and is written in its own transaction.

use std::io::Read;

use tracing::{debug, info, warn};

use corpdir_core::{
    CompanyDirectory, CreateCompanyRequest, Error, ImportSummary, LanguageMap, Result,
    TagTranslations,
};

/// Languages carried by the CSV format, in display-language preference order.
pub const IMPORT_LANGUAGES: [&str; 3] = ["ko", "en", "ja"];

/// Separator between tags inside one cell.
pub const TAG_SEPARATOR: char = '|';

/// One parsed CSV row, ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Language the created company is reported in.
    pub display_language: String,
    pub request: CreateCompanyRequest,
}

/// Parse a CSV document into create requests.
///
/// Rows without any company name are skipped. Malformed CSV (unreadable
/// input, bad quoting) fails the whole parse with `Error::Import`.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| Error::Import(format!("Failed to read CSV header: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::Import(format!("Failed to read row: {}", e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        match parse_record(&record, &headers) {
            Some((display_language, request)) => rows.push(ImportRow {
                line,
                display_language,
                request,
            }),
            None => debug!(
                subsystem = "api",
                component = "import",
                line,
                "Skipping row without company name"
            ),
        }
    }
    Ok(rows)
}

fn parse_record(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
) -> Option<(String, CreateCompanyRequest)> {
    let get_field = |col_name: &str| -> Option<String> {
        headers
            .iter()
            .position(|h| h.trim() == col_name)
            .and_then(|idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let names: LanguageMap = IMPORT_LANGUAGES
        .iter()
        .filter_map(|lang| {
            get_field(&format!("company_{}", lang)).map(|name| (lang.to_string(), name))
        })
        .collect();

    let display_language = IMPORT_LANGUAGES
        .iter()
        .find(|lang| names.contains_key(**lang))?
        .to_string();

    let tag_lists: Vec<(&str, Vec<String>)> = IMPORT_LANGUAGES
        .iter()
        .map(|lang| {
            let list = get_field(&format!("tag_{}", lang))
                .map(|cell| split_tags(&cell))
                .unwrap_or_default();
            (*lang, list)
        })
        .collect();

    Some((
        display_language,
        CreateCompanyRequest {
            names,
            tags: zip_tags(&tag_lists),
        },
    ))
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(TAG_SEPARATOR)
        .map(|t| t.trim().to_string())
        .collect()
}

/// Combine per-language tag lists by index into translation maps.
///
/// Shorter lists and blank entries leave that language out of the map; maps
/// that end up empty are dropped.
fn zip_tags(lists: &[(&str, Vec<String>)]) -> Vec<TagTranslations> {
    let longest = lists.iter().map(|(_, l)| l.len()).max().unwrap_or(0);

    (0..longest)
        .map(|i| {
            lists
                .iter()
                .filter_map(|(lang, list)| {
                    list.get(i)
                        .filter(|t| !t.is_empty())
                        .map(|t| (lang.to_string(), t.clone()))
                })
                .collect::<LanguageMap>()
        })
        .filter(|map| !map.is_empty())
        .map(TagTranslations::new)
        .collect()
}

/// Create every row through `directory`, one transaction per row.
///
/// A failed row is logged and counted; it does not stop the import.
pub async fn import_rows(directory: &dyn CompanyDirectory, rows: Vec<ImportRow>) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for row in rows {
        match directory
            .create_company(row.request, &row.display_language)
            .await
        {
            Ok(created) => {
                summary.imported += 1;
                debug!(
                    subsystem = "api",
                    component = "import",
                    line = row.line,
                    company_name = %created.company_name,
                    "Row imported"
                );
            }
            Err(e) => {
                summary.failed += 1;
                warn!(
                    subsystem = "api",
                    component = "import",
                    line = row.line,
                    error = %e,
                    "Row import failed"
                );
            }
        }
    }

    info!(
        subsystem = "api",
        component = "import",
        imported = summary.imported,
        failed = summary.failed,
        "Import finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
company_ko,company_en,company_ja,tag_ko,tag_en,tag_ja
원티드랩,Wantedlab,,태그_4|태그_20|태그_16,tag_4|tag_20|tag_16,タグ_4|タグ_20|タグ_16
,,,태그_1,tag_1,タグ_1
,LINE FRESH,ラインフレッシュ,,tag_1|tag_2,タグ_1
";

    fn texts(tag: &TagTranslations) -> Vec<(&str, &str)> {
        tag.translations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_skips_rows_without_company() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn test_parse_names_and_display_language() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(rows[0].display_language, "ko");
        assert_eq!(rows[0].request.names.get("en").unwrap(), "Wantedlab");
        assert!(!rows[0].request.names.contains_key("ja"));

        // No Korean name: English is the next preference.
        assert_eq!(rows[1].display_language, "en");
    }

    #[test]
    fn test_parse_zips_tags_by_index() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let tags = &rows[0].request.tags;
        assert_eq!(tags.len(), 3);
        assert_eq!(
            texts(&tags[1]),
            vec![("en", "tag_20"), ("ja", "タグ_20"), ("ko", "태그_20")]
        );
    }

    #[test]
    fn test_parse_shorter_list_leaves_language_out() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();
        let tags = &rows[1].request.tags;
        assert_eq!(tags.len(), 2);
        assert_eq!(texts(&tags[0]), vec![("en", "tag_1"), ("ja", "タグ_1")]);
        assert_eq!(texts(&tags[1]), vec![("en", "tag_2")]);
    }

    #[test]
    fn test_zip_skips_blank_entries() {
        let lists = vec![
            ("ko", vec!["".to_string(), "태그".to_string()]),
            ("en", vec!["".to_string()]),
        ];
        let tags = zip_tags(&lists);
        assert_eq!(tags.len(), 1);
        assert_eq!(texts(&tags[0]), vec![("ko", "태그")]);
    }

    #[test]
    fn test_parse_missing_tag_columns() {
        let rows = parse_csv("company_en\nAcme\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].request.tags.is_empty());
    }

    #[test]
    fn test_parse_rejects_broken_utf8() {
        let input: &[u8] = b"company_en\n\xff\xfe\n";
        assert!(matches!(parse_csv(input), Err(Error::Import(_))));
    }
}
