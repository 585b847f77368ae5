//! Language and country name lookup.
//!
//! Callers may pass either a code ("en", "US") or a display name ("english",
//! "United States"). Known names map to their code; anything not in the tables
//! passes through unchanged so the feed endpoint can decide what it accepts.

const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("indonesian", "id"),
    ("czech", "cs"),
    ("german", "de"),
    ("spanish", "es-419"),
    ("french", "fr"),
    ("italian", "it"),
    ("latvian", "lv"),
    ("lithuanian", "lt"),
    ("hungarian", "hu"),
    ("dutch", "nl"),
    ("norwegian", "no"),
    ("polish", "pl"),
    ("portuguese brasil", "pt-419"),
    ("portuguese portugal", "pt-150"),
    ("romanian", "ro"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("swedish", "sv"),
    ("vietnamese", "vi"),
    ("turkish", "tr"),
    ("greek", "el"),
    ("bulgarian", "bg"),
    ("russian", "ru"),
    ("serbian", "sr"),
    ("ukrainian", "uk"),
    ("hebrew", "he"),
    ("arabic", "ar"),
    ("marathi", "mr"),
    ("hindi", "hi"),
    ("bengali", "bn"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("malyalam", "ml"),
    ("thai", "th"),
    ("chinese simplified", "zh-Hans"),
    ("chinese traditional", "zh-Hant"),
    ("japanese", "ja"),
    ("korean", "ko"),
];

const COUNTRIES: &[(&str, &str)] = &[
    ("australia", "AU"),
    ("botswana", "BW"),
    ("canada", "CA"),
    ("ethiopia", "ET"),
    ("ghana", "GH"),
    ("india", "IN"),
    ("indonesia", "ID"),
    ("ireland", "IE"),
    ("israel", "IL"),
    ("kenya", "KE"),
    ("latvia", "LV"),
    ("malaysia", "MY"),
    ("namibia", "NA"),
    ("new zealand", "NZ"),
    ("nigeria", "NG"),
    ("pakistan", "PK"),
    ("philippines", "PH"),
    ("singapore", "SG"),
    ("south africa", "ZA"),
    ("tanzania", "TZ"),
    ("uganda", "UG"),
    ("united kingdom", "GB"),
    ("united states", "US"),
    ("zimbabwe", "ZW"),
    ("czech republic", "CZ"),
    ("germany", "DE"),
    ("austria", "AT"),
    ("switzerland", "CH"),
    ("argentina", "AR"),
    ("chile", "CL"),
    ("colombia", "CO"),
    ("cuba", "CU"),
    ("mexico", "MX"),
    ("peru", "PE"),
    ("venezuela", "VE"),
    ("belgium", "BE"),
    ("france", "FR"),
    ("morocco", "MA"),
    ("senegal", "SN"),
    ("italy", "IT"),
    ("lithuania", "LT"),
    ("hungary", "HU"),
    ("netherlands", "NL"),
    ("norway", "NO"),
    ("poland", "PL"),
    ("brazil", "BR"),
    ("portugal", "PT"),
    ("romania", "RO"),
    ("slovakia", "SK"),
    ("slovenia", "SI"),
    ("sweden", "SE"),
    ("vietnam", "VN"),
    ("turkey", "TR"),
    ("greece", "GR"),
    ("bulgaria", "BG"),
    ("russia", "RU"),
    ("ukraine", "UA"),
    ("serbia", "RS"),
    ("united arab emirates", "AE"),
    ("saudi arabia", "SA"),
    ("lebanon", "LB"),
    ("egypt", "EG"),
    ("bangladesh", "BD"),
    ("thailand", "TH"),
    ("china", "CN"),
    ("taiwan", "TW"),
    ("hong kong", "HK"),
    ("japan", "JP"),
    ("republic of korea", "KR"),
];

fn lookup(table: &[(&str, &str)], input: &str) -> String {
    let trimmed = input.trim();
    let key = trimmed.to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Map a language name to its code, or return the input unchanged
pub fn language_code(input: &str) -> String {
    lookup(LANGUAGES, input)
}

/// Map a country name to its code, or return the input unchanged
pub fn country_code(input: &str) -> String {
    lookup(COUNTRIES, input)
}

/// Language names known to the lookup
pub fn available_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
    LANGUAGES.iter().copied()
}

/// Country names known to the lookup
pub fn available_countries() -> impl Iterator<Item = (&'static str, &'static str)> {
    COUNTRIES.iter().copied()
}
