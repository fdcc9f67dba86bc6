//! Deterministic literature-review prompt construction

use crate::config::GenerationOptions;
use crate::normalize::AbstractText;
use log::trace;

/// Instruction preamble sent before the abstracts
const PREAMBLE: &str = "\
You are an academic reviewer writing a literature review comparison. \
Compare the main abstract with the related studies below. Group \
similar studies together and cite them with bracketed numbers [n] \
matching their position in the list. Cover the methodology, \
objectives, unique contributions, and application domain of each \
group, and close with a statement on the significance of the main \
study relative to the related work.";

/// Closing instruction after the abstracts
const CLOSING: &str = "\
Write a detailed, well-structured literature review comparison.";

/// Render the full generation prompt
/// Pure and deterministic: identical (subject, candidates) pairs
/// always produce byte-identical output
pub fn build(
  subject: &AbstractText
, candidates: &[AbstractText]
, options: &GenerationOptions
) -> String
{   trace!(
      "Building prompt: {} candidate(s), temperature {}",
      candidates.len(),
      options.temperature()
    );

    let mut prompt = String::with_capacity(
      PREAMBLE.len()
        + subject.as_str().len()
        + candidates
            .iter()
            .map(|c| c.as_str().len() + 8)
            .sum::<usize>()
        + CLOSING.len()
        + 64
    );

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nMain Abstract:\n\"\"\"\n");
    prompt.push_str(subject.as_str());
    prompt.push_str("\n\"\"\"\n\nRelated Studies:\n");

    for (i, candidate) in candidates.iter().enumerate()
    {   prompt.push_str(&format!(
          "\n[{}] {}\n",
          i + 1,
          candidate.as_str()
        ));
    }

    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt
}
