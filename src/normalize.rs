//! Normalization of heterogeneous abstract inputs into a clean,
//! ordered list of validated abstract strings

use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Minimum cleaned length for an abstract to survive
pub const MIN_ABSTRACT_CHARS: usize = 30;
/// Cleaned abstracts longer than this are truncated
pub const MAX_ABSTRACT_CHARS: usize = 3000;
/// Appended to truncated abstracts
pub const TRUNCATION_MARKER: &str = "...";

/// Labels stripped from the front of an abstract, lowercase
const ABSTRACT_LABELS: [&str; 3]
  = ["abstract", "özet", "summary"];

/// How far a JSON-encoded-inside-JSON payload may nest
const MAX_DECODE_DEPTH: usize = 4;

// ===== AbstractText =====

/// A cleaned, length-validated abstract string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbstractText(String);

impl AbstractText
{   /// Clean `raw` and validate the length invariant
    /// Returns None when the cleaned text is under the minimum
    pub fn parse(raw: &str) -> Option<Self>
    {   let cleaned = clean_text(raw);
        let count = cleaned.chars().count();

        if count < MIN_ABSTRACT_CHARS
        {   trace!(
              "Discarding candidate: {} chars after cleaning",
              count
            );
            return None;
        }

        if count > MAX_ABSTRACT_CHARS
        {   trace!(
              "Truncating candidate from {} chars",
              count
            );
            let mut truncated: String = cleaned
              .chars()
              .take(MAX_ABSTRACT_CHARS)
              .collect();
            truncated.push_str(TRUNCATION_MARKER);
            return Some(AbstractText(truncated));
        }

        Some(AbstractText(cleaned))
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }

    pub fn char_count(&self) -> usize
    {   self.0.chars().count()
    }
}

impl fmt::Display for AbstractText
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   f.write_str(&self.0)
    }
}

// ===== Input shape sniffing =====

/// Tagged decode of the compareAbstracts payload shape
/// Uncontrolled clients send arrays, JSON-encoded strings,
/// bare strings, or single objects interchangeably
#[derive(Debug, Clone)]
pub enum CandidateInput
{   /// Already a list of candidates
    List(Vec<Value>)
  , /// A string, possibly JSON-encoded
    Text(String)
  , /// A single structured record
    Record(serde_json::Map<String, Value>)
  , /// A bare scalar (number, bool)
    Scalar(Value)
  , /// Null / absent
    Empty
}

impl CandidateInput
{   /// Classify the raw payload, exhaustively
    pub fn sniff(raw: &Value) -> Self
    {   match raw
        {   Value::Array(items) => {
              CandidateInput::List(items.clone())
            }
          , Value::String(s) => {
              CandidateInput::Text(s.clone())
            }
          , Value::Object(map) => {
              CandidateInput::Record(map.clone())
            }
          , Value::Number(_) | Value::Bool(_) => {
              CandidateInput::Scalar(raw.clone())
            }
          , Value::Null => CandidateInput::Empty
        }
    }
}

/// Coerce arbitrary input into a clean ordered candidate list
/// Never errors; an empty vec means nothing usable was found
/// and the caller decides whether that is fatal
pub fn normalize(raw: &Value) -> Vec<AbstractText>
{   let result = normalize_value(raw, 0);
    debug!(
      "Normalization kept {} candidate(s)",
      result.len()
    );
    result
}

fn normalize_value(raw: &Value, depth: usize)
  -> Vec<AbstractText>
{   match CandidateInput::sniff(raw)
    {   CandidateInput::List(items) => {
          items
            .iter()
            .filter_map(|item| {
              coerce_candidate(item)
                .as_deref()
                .and_then(AbstractText::parse)
            })
            .collect()
        }
      , CandidateInput::Text(s) => {
          // A string payload may itself be JSON
          if depth < MAX_DECODE_DEPTH
          {   if let Ok(decoded)
                = serde_json::from_str::<Value>(&s)
              {   trace!("String payload decoded as JSON");
                  return normalize_value(&decoded, depth + 1);
              }
          }
          // Plain prose: the whole string is one candidate
          AbstractText::parse(&s).into_iter().collect()
        }
      , CandidateInput::Record(map) => {
          record_text(&map)
            .as_deref()
            .and_then(AbstractText::parse)
            .into_iter()
            .collect()
        }
      , CandidateInput::Scalar(v) => {
          warn!("Scalar payload where abstracts expected");
          AbstractText::parse(&v.to_string())
            .into_iter()
            .collect()
        }
      , CandidateInput::Empty => vec![]
    }
}

/// Coerce one list element to candidate text
fn coerce_candidate(item: &Value) -> Option<String>
{   match item
    {   Value::String(s) => Some(s.clone())
      , Value::Object(map) => record_text(map)
      , Value::Null => None
      , other => {
          // Nested arrays and scalars serialize as a last resort
          serde_json::to_string(other).ok()
        }
    }
}

/// Pull candidate text out of a structured record
/// First present field wins; serializing the whole record
/// is the last resort
fn record_text(map: &serde_json::Map<String, Value>)
  -> Option<String>
{   for field in ["text", "abstract", "content"]
    {   match map.get(field)
        {   Some(Value::String(s)) => return Some(s.clone())
          , Some(Value::Null) | None => {}
          , Some(other) => {
              return serde_json::to_string(other).ok();
            }
        }
    }
    serde_json::to_string(map).ok()
}

// ===== Text cleaning =====

/// Collapse whitespace, drop non-printable characters, and
/// strip one leading abstract label
fn clean_text(raw: &str) -> String
{   let printable: String = raw
      .chars()
      .map(|c| if c.is_control() { ' ' } else { c })
      .collect();

    let collapsed = printable
      .split_whitespace()
      .collect::<Vec<_>>()
      .join(" ");

    strip_leading_label(&collapsed).to_string()
}

/// Remove a leading "Abstract:" / "Özet:" / "Summary:" label
fn strip_leading_label(s: &str) -> &str
{   for label in ABSTRACT_LABELS
    {   if let Some(rest) = strip_prefix_ci(s, label)
        {   let rest = rest.trim_start();
            if let Some(body) = rest.strip_prefix(':')
            {   return body.trim_start();
            }
        }
    }
    s
}

/// Case-insensitive prefix strip, char by char
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str)
  -> Option<&'a str>
{   let mut indices = s.char_indices();
    for pc in prefix.chars()
    {   match indices.next()
        {   Some((_, c)) => {
              if !c.to_lowercase().eq(pc.to_lowercase())
              {   return None;
              }
            }
          , None => return None
        }
    }
    match indices.next()
    {   Some((i, _)) => Some(&s[i..])
      , None => Some("")
    }
}

/// Case-insensitive substring search on char boundaries
fn find_ci(haystack: &str, needle: &str) -> Option<usize>
{   if needle.is_empty()
    {   return Some(0);
    }
    for (i, _) in haystack.char_indices()
    {   if strip_prefix_ci(&haystack[i..], needle).is_some()
        {   return Some(i);
        }
    }
    None
}

// ===== Abstract section extraction =====

/// Markers that end an abstract section in full-document text
const SECTION_END_MARKERS: [&str; 4]
  = ["introduction", "keywords", "özet", "1."];

/// How many characters of document text to consider after the
/// abstract heading
const SECTION_WINDOW_CHARS: usize = 2000;

/// Locate the abstract section inside raw scraped or PDF text
/// Returns the slice from the "abstract" heading up to the first
/// section-end marker, capped at the window size
pub fn extract_abstract_section(document: &str)
  -> Option<String>
{   let start = find_ci(document, "abstract")?;

    let window: String = document[start..]
      .chars()
      .take(SECTION_WINDOW_CHARS)
      .collect();

    // Skip past the heading itself before probing end markers,
    // "abstract" would otherwise never match one anyway but
    // "1." inside a heading like "1. Abstract" would
    let body_offset = "abstract".len();

    let cut = SECTION_END_MARKERS
      .iter()
      .filter_map(|marker| {
        find_ci(&window[body_offset..], marker)
          .map(|i| i + body_offset)
      })
      .min();

    let section = match cut
    {   Some(end) => window[..end].to_string()
      , None => window
    };

    let section = section.trim().to_string();
    if section.is_empty()
    {   None
    } else
    {   debug!(
          "Extracted abstract section of {} chars",
          section.chars().count()
        );
        Some(section)
    }
}
