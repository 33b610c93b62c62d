//! City-name normalization for test-center records.
//!
//! Upstream records spell the same city a dozen ways ("HCM", "TPHCM",
//! "Saigon", ...). Grouping happens on the canonical name; anything not in
//! the lookup passes through trimmed so new cities still show up.

/// Canonical name for Ho Chi Minh City.
pub(super) const HO_CHI_MINH_CITY: &str = "Ho Chi Minh City";

/// Canonical name for Hanoi.
pub(super) const HANOI: &str = "Hanoi";

/// Canonical name for Da Nang.
pub(super) const DA_NANG: &str = "Da Nang";

/// Map a raw city string to its canonical name.
pub(super) fn canonical_city(raw: &str) -> String {
    let trimmed = raw.trim();

    // Compare on lowercase with separators stripped, so "TP. HCM" and
    // "tphcm" normalize the same way.
    let key: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match key.as_str() {
        "hcm" | "tphcm" | "hcmc" | "saigon" | "hochiminh" | "hochiminhcity" => {
            HO_CHI_MINH_CITY.to_owned()
        }
        "hn" | "hanoi" => HANOI.to_owned(),
        "danang" => DA_NANG.to_owned(),
        _ => trimmed.to_owned(),
    }
}
