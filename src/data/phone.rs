use std::fmt;

use super::model::CellValue;

/// Mobile network operators owning the allow-listed prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Carrier {
    Viettel,
    VinaPhone,
    MobiFone,
    Vietnamobile,
    Gmobile,
}

impl Carrier {
    pub const ALL: [Carrier; 5] = [
        Carrier::Viettel,
        Carrier::VinaPhone,
        Carrier::MobiFone,
        Carrier::Vietnamobile,
        Carrier::Gmobile,
    ];
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Carrier::Viettel => "Viettel",
            Carrier::VinaPhone => "VinaPhone",
            Carrier::MobiFone => "MobiFone",
            Carrier::Vietnamobile => "Vietnamobile",
            Carrier::Gmobile => "Gmobile",
        };
        f.write_str(name)
    }
}

/// Three-digit network prefixes of valid local numbers.
pub const NETWORK_PREFIXES: &[(&str, Carrier)] = &[
    ("032", Carrier::Viettel),
    ("033", Carrier::Viettel),
    ("034", Carrier::Viettel),
    ("035", Carrier::Viettel),
    ("036", Carrier::Viettel),
    ("037", Carrier::Viettel),
    ("038", Carrier::Viettel),
    ("039", Carrier::Viettel),
    ("086", Carrier::Viettel),
    ("096", Carrier::Viettel),
    ("097", Carrier::Viettel),
    ("098", Carrier::Viettel),
    ("081", Carrier::VinaPhone),
    ("082", Carrier::VinaPhone),
    ("083", Carrier::VinaPhone),
    ("084", Carrier::VinaPhone),
    ("085", Carrier::VinaPhone),
    ("088", Carrier::VinaPhone),
    ("091", Carrier::VinaPhone),
    ("094", Carrier::VinaPhone),
    ("070", Carrier::MobiFone),
    ("076", Carrier::MobiFone),
    ("077", Carrier::MobiFone),
    ("078", Carrier::MobiFone),
    ("079", Carrier::MobiFone),
    ("089", Carrier::MobiFone),
    ("090", Carrier::MobiFone),
    ("093", Carrier::MobiFone),
    ("056", Carrier::Vietnamobile),
    ("058", Carrier::Vietnamobile),
    ("092", Carrier::Vietnamobile),
    ("059", Carrier::Gmobile),
    ("099", Carrier::Gmobile),
];

const COUNTRY_CODE: &str = "84";
const LOCAL_LEN: usize = 10;

/// Keep only ASCII digits of the cell's string form; absent cells give "".
pub fn extract_digits(value: Option<&CellValue>) -> String {
    value
        .map(|v| extract_digits_str(&v.to_string()))
        .unwrap_or_default()
}

/// [`extract_digits`] for raw text such as a search query.
pub fn extract_digits_str(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Rewrite `84xxxxxxxxx` (11 digits) to `0xxxxxxxxx`; anything else is
/// returned unchanged.
pub fn to_local_ten_digits(digits: &str) -> String {
    match digits.strip_prefix(COUNTRY_CODE) {
        Some(rest) if digits.len() == LOCAL_LEN + 1 => format!("0{rest}"),
        _ => digits.to_string(),
    }
}

/// Local ten-digit form of a cell, straight from its raw value.
pub fn local_digits(value: Option<&CellValue>) -> String {
    to_local_ten_digits(&extract_digits(value))
}

fn carrier_for_local(local: &str) -> Option<Carrier> {
    if local.len() != LOCAL_LEN {
        return None;
    }
    let prefix = &local[..3];
    NETWORK_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, carrier)| *carrier)
}

/// Carrier owning a valid number, `None` for anything invalid.
pub fn carrier_of(value: Option<&CellValue>) -> Option<Carrier> {
    carrier_for_local(&local_digits(value))
}

/// Whether the value is a ten-digit local number with a known network prefix.
pub fn is_valid(value: Option<&CellValue>) -> bool {
    carrier_of(value).is_some()
}

/// Everything the table needs to render a phone cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneCheck {
    pub local: String,
    pub valid: bool,
    pub carrier: Option<Carrier>,
}

impl PhoneCheck {
    pub fn of(value: Option<&CellValue>) -> Self {
        let local = local_digits(value);
        let carrier = carrier_for_local(&local);
        Self {
            local,
            valid: carrier.is_some(),
            carrier,
        }
    }
}
