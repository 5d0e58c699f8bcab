//! Detail-page extraction.
//!
//! Each product page is read in one script pass that returns a JSON blob
//! of raw strings; record assembly happens in Rust so the composition
//! rules stay testable without a browser. A failing product is logged and
//! skipped, never aborting the run.

use serde_json::Value;

use crate::app::Result;
use crate::browser::Session;
use crate::config::ScrapeSettings;
use crate::scrape::vehicle;
use crate::sites::{ExtractionMode, FitmentOptions, SiteProfile};
use crate::table::Record;

const SPEC_TAB: &str = "#tab-item-specification";
const FITMENT_TAB: &str = r#"a.tab-label[onclick*="ajaxLoadFirstProductFitment"]"#;
const FITMENT_BLOCKS: &str = "div.fitment-data.col-4.desk-6.phone-12";
const NO_FITMENT_TEXT: &str = "No Fitment record found for current selection";

/// Visit every product link and build records per the site's mode.
pub async fn extract_details(
    session: &Session,
    site: &SiteProfile,
    settings: &ScrapeSettings,
    links: &[String],
) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (i, link) in links.iter().enumerate() {
        tracing::info!(product = i + 1, total = links.len(), url = %link, "Extracting");

        let result = match &site.mode {
            ExtractionMode::Specification => extract_specification(session, settings, link)
                .await
                .map(|r| r.into_iter().collect::<Vec<_>>()),
            ExtractionMode::Fitment(opts) => {
                extract_fitment(session, settings, link, opts).await
            }
        };

        match result {
            Ok(mut found) => {
                tracing::debug!(url = %link, records = found.len(), "Product done");
                records.append(&mut found);
            }
            Err(e) => {
                tracing::warn!(url = %link, "Product failed, skipping: {}", e);
            }
        }

        if i + 1 < links.len() {
            tokio::time::sleep(settings.detail_delay()).await;
        }
    }

    Ok(records)
}

/// Read one specification-mode product page.
///
/// Returns `None` when the page yields no content worth exporting.
async fn extract_specification(
    session: &Session,
    settings: &ScrapeSettings,
    url: &str,
) -> Result<Option<Record>> {
    session.goto(url).await?;

    if let Err(e) = session
        .wait_for(SPEC_TAB, settings.element_wait(), settings.poll_interval())
        .await
    {
        tracing::debug!(url, "Specification tab never appeared, skipping: {}", e);
        return Ok(None);
    }

    let raw = session.eval_json(SPEC_SCRIPT).await?;
    Ok(spec_record(&raw))
}

const SPEC_SCRIPT: &str = r#"(() => {
    const text = (sel) => {
        const el = document.querySelector(sel);
        return el ? el.innerText.trim() : '';
    };
    const textWithoutLists = (sel) => {
        const el = document.querySelector(sel);
        if (!el) return '';
        const clone = el.cloneNode(true);
        clone.querySelectorAll('ul').forEach(u => u.remove());
        return clone.innerText.trim();
    };

    const specs = [];
    for (const row of document.querySelectorAll('div#tab-item-specification div.cf')) {
        const name = row.querySelector('.itemAttribName');
        const value = row.querySelector('.itemAttribValue');
        specs.push({
            name: name ? name.innerText.trim() : '',
            value: value ? value.innerText.trim() : '',
        });
    }

    return {
        partNumber: text('#product_id'),
        titleParts: [...document.querySelectorAll('#pdpHeading .productItemName span')]
            .map(s => s.innerText.trim()),
        category: textWithoutLists('#shortDesc'),
        bullets: [...document.querySelectorAll('#shortDesc li')]
            .map(li => li.innerText.trim()),
        auxDescription: text('#tab-auxDescription1'),
        longDescription: textWithoutLists('#tab-longDescription'),
        longBullets: [...document.querySelectorAll('#tab-longDescription ul li')]
            .map(li => li.innerText.trim()),
        specs,
    };
})()"#;

/// Assemble a record from the specification script's output.
fn spec_record(raw: &Value) -> Option<Record> {
    let mut record = Record::new();

    record.insert("Part Number", raw["partNumber"].as_str().unwrap_or(""));

    let title = strings(&raw["titleParts"])
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    record.insert("Title", title);

    record.insert("Product Category", raw["category"].as_str().unwrap_or(""));

    for (i, bullet) in strings(&raw["bullets"]).iter().enumerate() {
        record.insert(format!("Bullet {}", i + 1), bullet.as_str());
    }

    // The legacy template carries a Specs column even though the values
    // land in their own columns.
    record.insert("Specs", "");

    let description = compose_description(
        raw["auxDescription"].as_str().unwrap_or(""),
        raw["longDescription"].as_str().unwrap_or(""),
        &strings(&raw["longBullets"]),
    );
    record.insert("Description", description);

    if let Some(pairs) = raw["specs"].as_array() {
        for pair in pairs {
            let name = pair["name"].as_str().unwrap_or("");
            let value = pair["value"].as_str().unwrap_or("");
            if !name.is_empty() && !value.is_empty() {
                record.insert(name, value);
            }
        }
    }

    record.has_content().then_some(record)
}

/// Join the description sources the way the legacy artifacts read.
///
/// The auxiliary blurb and the long description are kept as separate
/// paragraphs; when the long tab only carries bullets they stand in for
/// it, one `. `-prefixed line each.
fn compose_description(aux: &str, long: &str, long_bullets: &[String]) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if !aux.trim().is_empty() {
        blocks.push(aux.trim().to_string());
    }

    if !long.trim().is_empty() {
        blocks.push(long.trim().to_string());
    } else if !long_bullets.is_empty() {
        let lines: Vec<String> = long_bullets
            .iter()
            .filter(|b| !b.trim().is_empty())
            .map(|b| format!(". {}", b.trim()))
            .collect();
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    blocks.join("\n\n")
}

/// Read one fitment-mode product page, walking the fitment tab's inner
/// pagination. Returns one record per vehicle block.
async fn extract_fitment(
    session: &Session,
    settings: &ScrapeSettings,
    url: &str,
    opts: &FitmentOptions,
) -> Result<Vec<Record>> {
    let part_number = if opts.part_number_from_url {
        match vehicle::part_number_from_url(url) {
            Some(pn) => Some(pn),
            None => {
                tracing::warn!(url, "No part number derivable from URL, skipping product");
                return Ok(Vec::new());
            }
        }
    } else {
        None
    };

    session.goto(url).await?;

    if !session.click(FITMENT_TAB).await? {
        tracing::debug!(url, "No fitment tab on product page");
        return Ok(Vec::new());
    }
    tokio::time::sleep(settings.page_settle()).await;

    if session.page_contains(NO_FITMENT_TEXT).await? {
        tracing::debug!(url, "Product has no fitment records");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        session
            .wait_for(".fitment-data", settings.element_wait(), settings.poll_interval())
            .await?;

        let blocks = session.eval_json(&fitment_script()).await?;
        let mut page_records = fitment_records(&blocks, part_number.as_deref(), opts);
        records.append(&mut page_records);

        let next_selector = format!(r#"a[onclick*="pageNumber={}"]"#, page + 1);
        if !session.click(&next_selector).await? {
            break;
        }
        tokio::time::sleep(settings.page_settle()).await;
        page += 1;
    }

    Ok(records)
}

fn fitment_script() -> String {
    format!(
        r#"(() => {{
            const blocks = [];
            for (const el of document.querySelectorAll('{}')) {{
                const heading = el.querySelector('h3');
                blocks.push({{
                    vehicle: heading ? heading.innerText.trim() : '',
                    details: [...el.querySelectorAll('ul li')]
                        .map(li => li.innerText.trim()),
                }});
            }}
            return blocks;
        }})()"#,
        FITMENT_BLOCKS
    )
}

/// Build records from one fitment page's vehicle blocks.
fn fitment_records(blocks: &Value, part_number: Option<&str>, opts: &FitmentOptions) -> Vec<Record> {
    let Some(blocks) = blocks.as_array() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for block in blocks {
        let heading = block["vehicle"].as_str().unwrap_or("");
        if heading.trim().is_empty() {
            continue;
        }

        let mut record = Record::new();
        if let Some(pn) = part_number {
            record.insert("Part Number", pn);
        }
        record.insert("Vehicle", heading);

        if opts.split_vehicle {
            let parts = vehicle::split(heading);
            record.insert("Year", parts.year);
            record.insert("Make", parts.make);
            record.insert("Model", parts.model);
        }

        for line in strings(&block["details"]) {
            if let Some((name, value)) = line.split_once(':') {
                record.insert(name, value);
            } else if !line.trim().is_empty() {
                tracing::debug!(line = %line, "Fitment detail line without separator");
            }
        }

        if record.has_content() {
            records.push(record);
        }
    }

    records
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_record_assembly() {
        let raw = json!({
            "partNumber": "25001-119",
            "titleParts": ["King Shocks", "", "2.5 Coilover"],
            "category": "Coilover Shocks",
            "bullets": ["Rebuildable", "Race proven"],
            "auxDescription": "Track tested.",
            "longDescription": "Built for abuse.",
            "longBullets": [],
            "specs": [
                {"name": "Finish", "value": "Natural"},
                {"name": "Empty", "value": ""},
            ],
        });

        let record = spec_record(&raw).unwrap();
        assert_eq!(record.get("Part Number"), Some("25001-119"));
        assert_eq!(record.get("Title"), Some("King Shocks 2.5 Coilover"));
        assert_eq!(record.get("Product Category"), Some("Coilover Shocks"));
        assert_eq!(record.get("Bullet 1"), Some("Rebuildable"));
        assert_eq!(record.get("Bullet 2"), Some("Race proven"));
        assert_eq!(record.get("Specs"), Some(""));
        assert_eq!(
            record.get("Description"),
            Some("Track tested.\n\nBuilt for abuse.")
        );
        assert_eq!(record.get("Finish"), Some("Natural"));
        assert_eq!(record.get("Empty"), None);
    }

    #[test]
    fn test_spec_record_empty_page_is_none() {
        let raw = json!({
            "partNumber": "",
            "titleParts": [],
            "category": "",
            "bullets": [],
            "auxDescription": "",
            "longDescription": "",
            "longBullets": [],
            "specs": [],
        });
        assert!(spec_record(&raw).is_none());
    }

    #[test]
    fn test_compose_description_both_paragraphs() {
        let desc = compose_description("First.", "Second.", &[]);
        assert_eq!(desc, "First.\n\nSecond.");
    }

    #[test]
    fn test_compose_description_long_only() {
        assert_eq!(compose_description("", "Only long.", &[]), "Only long.");
    }

    #[test]
    fn test_compose_description_bullets_stand_in() {
        let bullets = vec!["One".to_string(), "Two".to_string()];
        assert_eq!(compose_description("", "", &bullets), ". One\n. Two");
    }

    #[test]
    fn test_compose_description_long_beats_bullets() {
        let bullets = vec!["One".to_string()];
        assert_eq!(
            compose_description("Aux.", "Long.", &bullets),
            "Aux.\n\nLong."
        );
    }

    #[test]
    fn test_fitment_records_plain() {
        let blocks = json!([
            {"vehicle": "2015 Jeep Wrangler", "details": ["Drive Type: 4WD", "Submodel: Sport"]},
        ]);
        let records = fitment_records(&blocks, None, &FitmentOptions::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Vehicle"), Some("2015 Jeep Wrangler"));
        assert_eq!(records[0].get("Drive Type"), Some("4WD"));
        assert_eq!(records[0].get("Submodel"), Some("Sport"));
        assert_eq!(records[0].get("Year"), None);
    }

    #[test]
    fn test_fitment_records_split_and_part_number() {
        let blocks = json!([
            {"vehicle": "2018 Jeep Wrangler JL", "details": ["Drive Type: 4WD"]},
        ]);
        let opts = FitmentOptions {
            part_number_from_url: true,
            split_vehicle: true,
            drop_vehicle_column: true,
        };
        let records = fitment_records(&blocks, Some("17402-09"), &opts);

        assert_eq!(records[0].get("Part Number"), Some("17402-09"));
        assert_eq!(records[0].get("Year"), Some("2018"));
        assert_eq!(records[0].get("Make"), Some("Jeep"));
        assert_eq!(records[0].get("Model"), Some("Wrangler JL"));
    }

    #[test]
    fn test_fitment_records_skip_headingless_blocks() {
        let blocks = json!([
            {"vehicle": "", "details": ["Drive Type: 4WD"]},
            {"vehicle": "Jeep CJ5", "details": []},
        ]);
        let records = fitment_records(&blocks, None, &FitmentOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Vehicle"), Some("Jeep CJ5"));
    }

    #[test]
    fn test_fitment_detail_value_with_colon() {
        let blocks = json!([
            {"vehicle": "Jeep", "details": ["Note: fits: all trims"]},
        ]);
        let records = fitment_records(&blocks, None, &FitmentOptions::default());
        assert_eq!(records[0].get("Note"), Some("fits: all trims"));
    }
}
