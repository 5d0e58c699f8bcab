//! Vehicle heading parsing and URL-derived part numbers.

/// A fitment heading split into its parts. Fields that cannot be derived
/// are empty strings so they land as blank cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleParts {
    pub year: String,
    pub make: String,
    pub model: String,
}

/// Split a vehicle heading like `2015 Jeep Wrangler`.
///
/// The first whitespace token is treated as the year only when it is
/// exactly four ASCII digits; otherwise the year stays empty and the
/// first token becomes the make. Everything after the make is the model.
pub fn split(heading: &str) -> VehicleParts {
    let mut tokens = heading.split_whitespace();

    let Some(first) = tokens.next() else {
        return VehicleParts::default();
    };

    let is_year = first.len() == 4 && first.chars().all(|c| c.is_ascii_digit());

    let (year, make) = if is_year {
        (first.to_string(), tokens.next().unwrap_or("").to_string())
    } else {
        (String::new(), first.to_string())
    };

    let model = tokens.collect::<Vec<_>>().join(" ");

    VehicleParts { year, make, model }
}

/// Derive a part number from a product URL.
///
/// Product paths end in `<base>/<suffix>/<catalog-id>`, and the visible
/// part number is `<base>-<suffix>`. URLs with fewer than six slash-split
/// segments don't carry one.
pub fn part_number_from_url(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() < 6 {
        return None;
    }
    let base = segments[segments.len() - 4];
    let suffix = segments[segments.len() - 3];
    if base.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(format!("{}-{}", base, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_year_make_model() {
        let parts = split("2015 Jeep Wrangler");
        assert_eq!(parts.year, "2015");
        assert_eq!(parts.make, "Jeep");
        assert_eq!(parts.model, "Wrangler");
    }

    #[test]
    fn test_split_multiword_model() {
        let parts = split("2018 Jeep Wrangler Unlimited JL");
        assert_eq!(parts.year, "2018");
        assert_eq!(parts.make, "Jeep");
        assert_eq!(parts.model, "Wrangler Unlimited JL");
    }

    #[test]
    fn test_split_no_year() {
        let parts = split("Jeep Wrangler");
        assert_eq!(parts.year, "");
        assert_eq!(parts.make, "Jeep");
        assert_eq!(parts.model, "Wrangler");
    }

    #[test]
    fn test_split_non_numeric_first_token() {
        let parts = split("CJ5 Jeep");
        assert_eq!(parts.year, "");
        assert_eq!(parts.make, "CJ5");
        assert_eq!(parts.model, "Jeep");
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split("   "), VehicleParts::default());
    }

    #[test]
    fn test_part_number_from_url() {
        let url = "https://www.jegs.com/i/Omix-ADA/440/17402/09/10002";
        assert_eq!(part_number_from_url(url), Some("17402-09".to_string()));
    }

    #[test]
    fn test_part_number_too_short() {
        assert_eq!(part_number_from_url("https://www.jegs.com/i/440"), None);
    }

    #[test]
    fn test_part_number_empty_segment() {
        assert_eq!(part_number_from_url("https://www.jegs.com/i/a//b/c"), None);
    }
}
