//! Speaker role inference.
//!
//! All of these are heuristics over transcript wording. A miss leaves the
//! role unset; nothing downstream depends on them being correct.

use std::sync::LazyLock;

use regex::Regex;

/// Words that mark an office as ministerial or whip.
const MINISTERIAL_MARKERS: &[&str] = &[
    "minister",
    "secretary of state",
    "under-secretary",
    "parliamentary secretary",
    "chancellor",
    "attorney general",
    "solicitor general",
    "advocate-general",
    "leader of the house",
    "lord privy seal",
    "lord president",
    "chief whip",
    "lord in waiting",
    "lord-in-waiting",
    "baroness in waiting",
    "baroness-in-waiting",
    "captain of the",
    "treasurer of",
    "comptroller of",
];

/// "Role (Name)" display names.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROLE_WITH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+?)\s*\(([^()]+)\)\s*$").expect("valid regex"));

/// "The Secretary of State for Education was asked—".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WAS_ASKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"The (.+?) was asked").expect("valid regex"));

/// "I call the Minister." / "I call the shadow Secretary of State."
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static I_CALL_THE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bI call the ([A-Za-z][A-Za-z'\- ]*?)\s*(?:[.,;:!]|$)").expect("valid regex")
});

/// Whether an office title is ministerial.
///
/// # Examples
/// ```
/// use hansard_harvester::roles::is_ministerial;
///
/// assert!(is_ministerial("The Parliamentary Under-Secretary of State for Health"));
/// assert!(!is_ministerial("Lab"));
/// ```
#[must_use]
pub fn is_ministerial(role: &str) -> bool {
    let role = role.to_lowercase();
    MINISTERIAL_MARKERS.iter().any(|m| role.contains(m))
}

/// Split a "Role (Name)" display name into `(name, role)`.
///
/// Only splits when the outer part is a ministerial office, so party
/// suffixes like "Baroness Jones (GP)" are left alone.
///
/// # Examples
/// ```
/// use hansard_harvester::roles::split_role_name;
///
/// assert_eq!(
///     split_role_name("The Minister of State, Home Office (Lord Hanson of Flint)"),
///     Some(("Lord Hanson of Flint".to_string(), "The Minister of State, Home Office".to_string()))
/// );
/// assert_eq!(split_role_name("Baroness Jones of Moulsecoomb (GP)"), None);
/// ```
#[must_use]
pub fn split_role_name(display: &str) -> Option<(String, String)> {
    let caps = ROLE_WITH_NAME.captures(display)?;
    let role = caps[1].trim();
    let name = caps[2].trim();
    is_ministerial(role).then(|| (name.to_string(), role.to_string()))
}

/// Departmental role named by an oral-questions "was asked" line.
///
/// # Examples
/// ```
/// use hansard_harvester::roles::was_asked_role;
///
/// assert_eq!(
///     was_asked_role("The Chancellor of the Exchequer was asked—"),
///     Some("Chancellor of the Exchequer".to_string())
/// );
/// ```
#[must_use]
pub fn was_asked_role(text: &str) -> Option<String> {
    WAS_ASKED
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|role| !role.is_empty())
}

/// Role named by the chair when calling the next speaker.
///
/// # Examples
/// ```
/// use hansard_harvester::roles::called_role;
///
/// assert_eq!(called_role("Order. I call the Minister."), Some("Minister".to_string()));
/// assert_eq!(called_role("I call Jane Doe."), None);
/// ```
#[must_use]
pub fn called_role(text: &str) -> Option<String> {
    I_CALL_THE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|role| !role.is_empty())
}
