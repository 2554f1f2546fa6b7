//! Stock keeping unit codes: `{FAM}-{SEA}{YY}-{NNNN}`, e.g. `PAP-FW26-0003` for the third
//! pret-a-porter product of fall-winter 2026.

/// Family slug -> 3 letter code
pub const FAMILY_CODES: &[(&str, &str)] = &[
    ("accessories", "ACC"),
    ("pret-a-porter", "PAP"),
    ("shoes", "SHO"),
    ("leather-goods", "LTH"),
    ("small-leather-goods", "SLG"),
    ("jewelry", "JWL"),
    ("fragrance", "FRG"),
    ("other", "OTH"),
];

/// Season slug -> 2 letter code
pub const SEASON_CODES: &[(&str, &str)] = &[
    ("FALL-WINTER", "FW"),
    ("PRE-FALL", "PF"),
    ("SPRING-SUMMER", "SS"),
    ("CRUISE", "CR"),
    ("RESORT", "RS"),
];

pub const UNKNOWN_FAMILY_CODE: &str = "OTH";
pub const UNKNOWN_SEASON_CODE: &str = "XX";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkuParams<'a> {
    pub family: &'a str,
    pub season: &'a str,
    pub year: i32,
    /// 1-based position of the product within its family, season and year
    pub index: u32,
}

pub fn family_code(family: &str) -> &'static str {
    lookup(FAMILY_CODES, family).unwrap_or(UNKNOWN_FAMILY_CODE)
}

pub fn season_code(season: &str) -> &'static str {
    lookup(SEASON_CODES, season).unwrap_or(UNKNOWN_SEASON_CODE)
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|&&(slug, _)| slug == key).map(|&(_, code)| code)
}

pub fn generate_sku(params: &SkuParams) -> String {
    format!(
        "{}-{}{:02}-{:04}",
        family_code(params.family),
        season_code(params.season),
        params.year.rem_euclid(100),
        params.index
    )
}
