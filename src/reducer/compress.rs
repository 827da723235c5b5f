//! Reducer 6: Semantic compress (spec §4.2).
//!
//! Rewrites element *names* only (roles, refs, suffixes untouched):
//! currency phrases to `$N`, a handful of travel stop-words, and full
//! flight-itinerary sentences to a dense single-line template using a small
//! airport-name → IATA table.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::line;

/// Exposed as data, not baked into the rewrite logic, so new airports can be
/// added without touching the reducer itself.
#[derive(Debug, Clone)]
pub struct AirportTable(HashMap<String, String>);

impl AirportTable {
    pub fn default_table() -> Self {
        let pairs: &[(&str, &str)] = &[
            ("San Francisco International", "SFO"),
            ("John F. Kennedy International", "JFK"),
            ("Los Angeles International", "LAX"),
            ("O'Hare International", "ORD"),
            ("Heathrow", "LHR"),
            ("Charles de Gaulle", "CDG"),
            ("Narita International", "NRT"),
            ("Dubai International", "DXB"),
            ("Hartsfield-Jackson Atlanta International", "ATL"),
            ("Dallas/Fort Worth International", "DFW"),
            ("Denver International", "DEN"),
            ("Seattle-Tacoma International", "SEA"),
            ("Miami International", "MIA"),
            ("Logan International", "BOS"),
        ];
        Self(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    /// The table's code for `name`, else the first three letters of the
    /// name, uppercased (spec §4.2 reducer 6's documented fallback).
    pub fn code_for(&self, name: &str) -> String {
        if let Some(code) = self.0.get(name) {
            return code.clone();
        }
        name.chars().filter(|c| c.is_alphabetic()).take(3).collect::<String>().to_uppercase()
    }
}

impl Default for AirportTable {
    fn default() -> Self {
        Self::default_table()
    }
}

pub fn semantic_compress(outline: &str, airports: &AirportTable) -> String {
    outline.lines().map(|l| compress_line(l, airports)).collect::<Vec<_>>().join("\n")
}

fn compress_line(raw: &str, airports: &AirportTable) -> String {
    let Some(parsed) = line::parse(raw) else { return raw.to_string() };
    let Some(name) = &parsed.name else { return raw.to_string() };
    let compressed = compress_name(name, airports);
    if &compressed == name {
        return raw.to_string();
    }
    let mut p = parsed;
    p.name = Some(compressed);
    line::render(&p)
}

fn compress_name(name: &str, airports: &AirportTable) -> String {
    if let Some(itinerary) = try_itinerary(name, airports) {
        return itinerary;
    }
    normalize_stopwords(&currency_re().replace_all(name, "$$$price").into_owned())
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:From\s+)?(?P<price>[\d,]+(?:\.\d+)?)\s+US\s+dollars").unwrap())
}

fn normalize_stopwords(name: &str) -> String {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        vec![
            (Regex::new(r"\bNonstop\b").unwrap(), "nonstop"),
            (Regex::new(r"\bRound trip\b").unwrap(), "RT"),
            (Regex::new(r"\bone stop\b").unwrap(), "1-stop"),
            (Regex::new(r"\btwo stops\b").unwrap(), "2-stop"),
        ]
    });
    let mut out = name.to_string();
    for (re, replacement) in patterns {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}

fn itinerary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?x)
            ^(?:From\s+)?
            (?P<price>[\d,]+(?:\.\d+)?)\s+US\s+dollars
            [^.]*\.\s*
            (?:(?P<airline>[^.]+)\.\s*)?
            Leaves\s+(?P<dep_name>.+?)\s+at\s+(?P<dep_time>\d{1,2}:\d{2}\s?[AP]M)\.\s*
            Arrives\s+(?P<arr_name>.+?)\s+at\s+(?P<arr_time>\d{1,2}:\d{2}\s?[AP]M)\.\s*
            .*?
            Total\s+duration\s+(?P<dur_h>\d+)\s*hr\s*(?P<dur_m>\d+)\s*min\.?\s*
            (?P<stops>.*)$
            "#,
        )
        .unwrap()
    })
}

fn try_itinerary(name: &str, airports: &AirportTable) -> Option<String> {
    let caps = itinerary_re().captures(name)?;

    let price = &caps["price"];
    let airline = caps.name("airline").map(|m| m.as_str().trim()).unwrap_or("").to_string();
    let dep_code = airports.code_for(caps["dep_name"].trim());
    let arr_code = airports.code_for(caps["arr_name"].trim());
    let dep_time = compact_time(&caps["dep_time"]);
    let arr_time = compact_time(&caps["arr_time"]);
    let duration = format!("{}h{}", &caps["dur_h"], &caps["dur_m"]);
    let stops = normalize_stopwords(caps["stops"].trim());

    let mut parts = Vec::new();
    if !airline.is_empty() {
        parts.push(airline);
    }
    parts.push(format!("{dep_code} {dep_time}\u{2192}{arr_code} {arr_time}"));
    parts.push(duration);
    if !stops.is_empty() {
        parts.push(stops);
    }
    parts.push(format!("${price}"));

    Some(parts.join(" "))
}

fn compact_time(raw: &str) -> String {
    raw.replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compresses_a_flight_itinerary_sentence() {
        let airports = AirportTable::default();
        let name = "From 320 US dollars round trip. United. Leaves San Francisco International at 7:15 AM. Arrives John F. Kennedy International at 3:40 PM. Total duration 5 hr 25 min. Nonstop";
        let compressed = try_itinerary(name, &airports).unwrap();
        assert_eq!(compressed, "United SFO 7:15AM\u{2192}JFK 3:40PM 5h25 nonstop $320");
    }

    #[test]
    fn unknown_airport_falls_back_to_three_letter_prefix() {
        let airports = AirportTable::default();
        let name = "150 US dollars. JetCo. Leaves Smalltown Regional at 8:00 AM. Arrives Bigcity Hub at 9:00 AM. Total duration 1 hr 0 min. Nonstop";
        let compressed = try_itinerary(name, &airports).unwrap();
        assert!(compressed.contains("SMA 8:00AM\u{2192}BIG 9:00AM"));
    }

    #[test]
    fn currency_phrase_outside_an_itinerary_becomes_dollar_amount() {
        let out = compress_name("From 1,250 US dollars", &AirportTable::default());
        assert_eq!(out, "$1,250");
    }

    #[test]
    fn stopword_normalizations_apply_to_plain_names() {
        let out = compress_name("Round trip, one stop, Nonstop option", &AirportTable::default());
        assert_eq!(out, "RT, 1-stop, nonstop option");
    }

    #[test]
    fn leaves_unrelated_names_untouched() {
        let out = compress_name("Example Domain", &AirportTable::default());
        assert_eq!(out, "Example Domain");
    }
}
