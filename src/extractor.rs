use crate::constants::COUNTRY_BLOCK_SELECTOR;
use crate::models::{CountryRecord, Field, RawFields};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Cached CSS selector for country container blocks.
static BLOCK_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// Cached CSS selectors for the block sub-fields, indexed by [`Field`] discriminant.
static FIELD_SELECTORS: OnceLock<[Selector; 5]> = OnceLock::new();

fn block_selector() -> &'static Selector {
    BLOCK_SELECTOR.get_or_init(|| {
        Selector::parse(COUNTRY_BLOCK_SELECTOR)
            .expect("COUNTRY_BLOCK_SELECTOR is a valid CSS selector")
    })
}

fn field_selector(field: Field) -> &'static Selector {
    let selectors = FIELD_SELECTORS.get_or_init(|| {
        Field::ALL.map(|f| {
            let css = f.css();
            Selector::parse(&css).expect("field selectors are valid CSS selectors")
        })
    });
    &selectors[field as usize]
}

/// Result of scanning one HTML document for country blocks.
///
/// `blocks_found` and `records` are kept apart so callers can tell a page with
/// no country markup from a page whose blocks were all filtered out.
#[derive(Debug, Clone, PartialEq)]
pub struct PageScan {
    pub blocks_found: usize,
    pub records: Vec<CountryRecord>,
}

/// Parses an HTML document and extracts every valid country record from it.
pub fn scan_document(html: &str) -> PageScan {
    let document = Html::parse_document(html);
    let blocks = select_blocks(&document);
    let records: Vec<CountryRecord> = extract_records(blocks.iter().copied()).collect();

    debug!(
        blocks_found = blocks.len(),
        records = records.len(),
        "Document scanned"
    );

    PageScan {
        blocks_found: blocks.len(),
        records,
    }
}

/// Returns every country container block of the document, in document order.
pub fn select_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(block_selector()).collect()
}

/// Returns the trimmed text of the first sub-element of `block` matching `field`.
///
/// Each descendant text node is trimmed and empty pieces are dropped before
/// joining, so `<h3><i class="flag"></i> Andorra </h3>` reads as `"Andorra"`.
/// A missing sub-element yields an empty string.
pub fn field_text(block: ElementRef<'_>, field: Field) -> String {
    block
        .select(field_selector(field))
        .next()
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Reads all five sub-fields of a block without any type coercion.
pub fn read_fields(block: ElementRef<'_>) -> RawFields {
    RawFields {
        name: field_text(block, Field::Name),
        capital: field_text(block, Field::Capital),
        population: field_text(block, Field::Population),
        area: field_text(block, Field::Area),
        region: field_text(block, Field::Region),
    }
}

/// Lenient population parse: only all-digit text becomes a number.
///
/// Empty text, signs, decimal points and thousands separators all yield `None`,
/// as does a value too large for `u64`.
pub fn parse_population(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Lenient area parse: any non-empty decimal text becomes a number.
///
/// Empty, non-numeric, non-finite and negative values yield `None`.
pub fn parse_area(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

impl RawFields {
    /// Coerces the raw text into a typed record.
    ///
    /// Returns `None` when the name is empty; such blocks are skipped silently.
    pub fn into_record(self) -> Option<CountryRecord> {
        let country = self.name.trim().to_string();
        if country.is_empty() {
            return None;
        }

        let area = parse_area(&self.area);
        if area.is_none() && !self.area.trim().is_empty() {
            warn!(
                country = %country,
                raw_area = %self.area,
                "Area is not a valid number, leaving it empty"
            );
        }

        Some(CountryRecord {
            population: parse_population(&self.population),
            area,
            capital: self.capital.trim().to_string(),
            region: self.region.trim().to_string(),
            country,
        })
    }
}

fn record_from_block(block: ElementRef<'_>) -> Option<CountryRecord> {
    read_fields(block).into_record()
}

/// Lazy sequence of records extracted from a sequence of blocks.
///
/// Created by [`extract_records`]. Blocks without a name are skipped; the
/// remaining records keep the order of their blocks.
#[derive(Debug, Clone)]
pub struct Records<I> {
    blocks: I,
}

impl<'a, I> Iterator for Records<I>
where
    I: Iterator<Item = ElementRef<'a>>,
{
    type Item = CountryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.by_ref().find_map(record_from_block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.blocks.size_hint().1)
    }
}

/// Extracts country records from container blocks.
///
/// Nothing is read until the returned iterator is advanced. Calling this again
/// on the same blocks restarts the extraction from the first block.
///
/// # Example
///
/// ```
/// use countries_scraper::extractor::{extract_records, select_blocks};
/// use scraper::Html;
///
/// let document = Html::parse_document(
///     r#"<div class="country"><h3 class="country-name">Andorra</h3></div>"#,
/// );
/// let blocks = select_blocks(&document);
/// let records: Vec<_> = extract_records(blocks.iter().copied()).collect();
/// assert_eq!(records[0].country, "Andorra");
/// assert_eq!(records[0].population, None);
/// ```
pub fn extract_records<'a, I>(blocks: I) -> Records<I::IntoIter>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    Records {
        blocks: blocks.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, population: &str, area: &str) -> RawFields {
        RawFields {
            name: name.to_string(),
            population: population.to_string(),
            area: area.to_string(),
            ..RawFields::default()
        }
    }

    #[test]
    fn test_parse_population_digits_only() {
        assert_eq!(parse_population("64057792"), Some(64_057_792));
        assert_eq!(parse_population("0"), Some(0));
        assert_eq!(parse_population(" 84000 "), Some(84_000));
    }

    #[test]
    fn test_parse_population_rejects_non_digits() {
        assert_eq!(parse_population(""), None);
        assert_eq!(parse_population("12,345"), None);
        assert_eq!(parse_population("-5"), None);
        assert_eq!(parse_population("+5"), None);
        assert_eq!(parse_population("1.5"), None);
        assert_eq!(parse_population("n/a"), None);
    }

    #[test]
    fn test_parse_population_overflow_is_none() {
        assert_eq!(parse_population("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_area_values() {
        assert_eq!(parse_area("550500.0"), Some(550_500.0));
        assert_eq!(parse_area("468"), Some(468.0));
        assert_eq!(parse_area("0.44"), Some(0.44));
    }

    #[test]
    fn test_parse_area_lenient_failures() {
        assert_eq!(parse_area(""), None);
        assert_eq!(parse_area("   "), None);
        assert_eq!(parse_area("unknown"), None);
        assert_eq!(parse_area("NaN"), None);
        assert_eq!(parse_area("inf"), None);
        assert_eq!(parse_area("-3.0"), None);
    }

    #[test]
    fn test_into_record_skips_empty_name() {
        assert_eq!(raw("", "100", "1.0").into_record(), None);
        assert_eq!(raw("   ", "100", "1.0").into_record(), None);
    }

    #[test]
    fn test_into_record_defaults_missing_fields() {
        let record = raw("Foo", "12,345", "").into_record().unwrap();
        assert_eq!(record.country, "Foo");
        assert_eq!(record.capital, "");
        assert_eq!(record.region, "");
        assert_eq!(record.population, None);
        assert_eq!(record.area, None);
    }

    #[test]
    fn test_field_text_missing_element_is_empty() {
        let document = Html::parse_document(
            r#"<div class="country"><h3 class="country-name">Chad</h3></div>"#,
        );
        let blocks = select_blocks(&document);
        assert_eq!(blocks.len(), 1);
        assert_eq!(field_text(blocks[0], Field::Name), "Chad");
        assert_eq!(field_text(blocks[0], Field::Capital), "");
    }

    #[test]
    fn test_field_text_joins_trimmed_text_nodes() {
        let document = Html::parse_document(
            r#"<div class="country">
                 <h3 class="country-name">
                   <i class="flag-icon flag-icon-ad"></i>
                   Andorra
                 </h3>
               </div>"#,
        );
        let blocks = select_blocks(&document);
        assert_eq!(field_text(blocks[0], Field::Name), "Andorra");
    }

    #[test]
    fn test_field_text_requires_matching_tag() {
        // Right class on the wrong tag does not match the (tag, class) pair
        let document = Html::parse_document(
            r#"<div class="country"><div class="country-capital">Paris</div></div>"#,
        );
        let blocks = select_blocks(&document);
        assert_eq!(field_text(blocks[0], Field::Capital), "");
    }

    #[test]
    fn test_extract_records_is_restartable() {
        let document = Html::parse_document(
            r#"<div class="country"><h3 class="country-name">A</h3></div>
               <div class="country"><h3 class="country-name">B</h3></div>"#,
        );
        let blocks = select_blocks(&document);
        let first: Vec<_> = extract_records(blocks.iter().copied()).collect();
        let second: Vec<_> = extract_records(blocks.iter().copied()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_scan_document_without_blocks() {
        let scan = scan_document("<html><body><p>nothing here</p></body></html>");
        assert_eq!(scan.blocks_found, 0);
        assert!(scan.records.is_empty());
    }
}
