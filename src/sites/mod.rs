//! Site profiles.
//!
//! Each supported brand catalog is described by a [`SiteProfile`]: where
//! discovery starts, how listing pages advance, which extraction mode the
//! detail pages use, and how the exported columns are arranged. The
//! scraping engine is generic over the profile; adding a brand means
//! adding data here, not code elsewhere.

use crate::table::ColumnPlan;

/// How the listing advances from one page to the next.
#[derive(Debug, Clone)]
pub enum Pagination {
    /// Click the next-page anchor in the pagination strip and wait for the
    /// ajax swap to settle.
    ClickNext,
    /// Navigate directly to a URL with `{page}` substituted. Used where
    /// the pagination strip collapses on deep pages and clicking is no
    /// longer reliable.
    UrlParam { template: &'static str },
}

/// What the detail pages carry and how records are built from them.
#[derive(Debug, Clone)]
pub enum ExtractionMode {
    /// One record per product: title, category, bullets, description and
    /// the specification tab's name/value pairs.
    Specification,
    /// One record per vehicle block on the fitment tab.
    Fitment(FitmentOptions),
}

/// Per-site switches for fitment extraction.
#[derive(Debug, Clone, Default)]
pub struct FitmentOptions {
    /// Derive the part number from the product URL path instead of the
    /// page body. Products whose URL does not carry one are skipped.
    pub part_number_from_url: bool,
    /// Split the vehicle heading into Year / Make / Model fields.
    pub split_vehicle: bool,
    /// Leave the raw Vehicle column out of the artifact.
    pub drop_vehicle_column: bool,
}

/// Everything the engine needs to scrape one brand catalog.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// CLI key, e.g. `king-shocks`.
    pub key: &'static str,
    /// Brand label used in artifact names.
    pub brand: &'static str,
    /// Artifact kind label, e.g. `Vehicle_Fitment`.
    pub artifact_kind: &'static str,
    /// Where discovery starts.
    pub start_url: &'static str,
    /// Product links are recognized by this path prefix.
    pub link_prefix: &'static str,
    pub pagination: Pagination,
    pub mode: ExtractionMode,
    /// Hop to the SKU tab from the brand group page before discovery.
    pub needs_group_tab: bool,
    /// Column arrangement for the exported table.
    pub columns: ColumnPlan,
}

impl SiteProfile {
    /// All supported sites, in the order `sites` lists them.
    pub fn all() -> Vec<SiteProfile> {
        vec![
            SiteProfile {
                key: "king-shocks",
                brand: "King_Shocks",
                artifact_kind: "Individual_Part",
                start_url: "https://www.jegs.com/v/King-Shocks/745?Tab=GROUP",
                link_prefix: "/i/King-Shocks/745/",
                pagination: Pagination::ClickNext,
                mode: ExtractionMode::Specification,
                needs_group_tab: true,
                columns: ColumnPlan::new()
                    .named("Part Number")
                    .named("Title")
                    .named("Product Category")
                    .numbered("Bullet ")
                    .named("Specs")
                    .named("Description"),
            },
            SiteProfile {
                key: "backrack",
                brand: "Backrack",
                artifact_kind: "Vehicle_Fitment",
                start_url: "https://www.jegs.com/v/Backrack/181?Tab=GROUP",
                link_prefix: "/i/Backrack/181/",
                pagination: Pagination::ClickNext,
                mode: ExtractionMode::Fitment(FitmentOptions::default()),
                needs_group_tab: true,
                columns: ColumnPlan::new(),
            },
            SiteProfile {
                key: "omix-ada",
                brand: "Omix-ADA",
                artifact_kind: "Application",
                start_url: "https://www.jegs.com/v/Omix-ADA/440?pageSize=30&Tab=SKU&storeId=10001&catalogId=10002&langId=-1&csrc=brand&pageNumber=1",
                link_prefix: "/i/Omix-ADA/440/",
                pagination: Pagination::UrlParam {
                    template: "https://www.jegs.com/v/Omix-ADA/440?pageSize=30&Tab=SKU&storeId=10001&catalogId=10002&langId=-1&csrc=brand&pageNumber={page}",
                },
                mode: ExtractionMode::Fitment(FitmentOptions {
                    part_number_from_url: true,
                    split_vehicle: true,
                    drop_vehicle_column: true,
                }),
                needs_group_tab: false,
                columns: ColumnPlan::new()
                    .named("Part Number")
                    .named("Year")
                    .named("Make")
                    .named("Model")
                    .drop_column("Vehicle"),
            },
        ]
    }

    /// Look up a profile by its CLI key.
    pub fn find(key: &str) -> Option<SiteProfile> {
        Self::all().into_iter().find(|s| s.key == key)
    }

    /// The valid CLI keys, for error messages and the `sites` listing.
    pub fn keys() -> Vec<&'static str> {
        Self::all().iter().map(|s| s.key).collect()
    }
}
