//! Backend-free comparison used when the generation service is
//! unreachable
//!
//! Deterministic by construction: no randomness and no clock
//! reads, identical input always renders identical prose.

use log::{debug, trace};
use std::collections::BTreeSet;

use crate::config::{FallbackConfig, FallbackMode, TopicRule};
use crate::error::Error;
use crate::normalize::AbstractText;

/// Words at or under this length are ignored by the lexical mode
const MIN_WORD_LEN: usize = 4;

/// Transient bucket of candidates sharing a topic
#[derive(Debug, Clone)]
pub struct CandidateGroup<'a>
{   pub topic: String
  , pub members: Vec<(usize, &'a AbstractText)>
}

/// Local comparison strategies over validated abstracts
pub struct FallbackComparator
{   config: FallbackConfig
}

impl FallbackComparator
{   pub fn new(config: FallbackConfig) -> Self
    {   debug!(
          "Creating FallbackComparator: {:?}, {} topic rule(s)",
          config.mode,
          config.vocabulary.len()
        );
        FallbackComparator { config }
    }

    /// Produce a comparison report without the backend
    /// Total for non-empty input; the only failure is an empty
    /// candidate list, which validation should have excluded
    pub fn compare(
      &self
    , subject: &AbstractText
    , candidates: &[AbstractText]
    ) -> Result<String, Error>
    {   if candidates.is_empty()
        {   return Err(Error::EmptyCandidates);
        }

        match self.config.mode
        {   FallbackMode::TopicGroups => {
              Ok(self.topic_groups_report(subject, candidates))
            }
          , FallbackMode::LexicalSimilarity => {
              Ok(lexical_similarity_report(subject, candidates))
            }
        }
    }

    /// Group candidates into topic buckets and render one
    /// paragraph per non-empty bucket
    fn topic_groups_report(
      &self
    , subject: &AbstractText
    , candidates: &[AbstractText]
    ) -> String
    {   let vocabulary = &self.config.vocabulary;

        let subject_topic = assign_topic(subject, vocabulary)
          .map(|rule| rule.topic.clone())
          .unwrap_or_else(|| "the proposed topic".to_string());
        let subject_terms
          = matched_keywords(subject, vocabulary);

        let mut report = format!(
          "This study focuses on {}, employing {}.\n",
          subject_topic,
          join_or(&subject_terms, "computational methods")
        );

        for group in bucket_candidates(candidates, vocabulary)
        {   trace!(
              "Bucket '{}': {} member(s)",
              group.topic,
              group.members.len()
            );

            let refs = group.members
              .iter()
              .map(|(i, _)| format!("[{}]", i + 1))
              .collect::<Vec<_>>()
              .join(", ");

            let mut shared = BTreeSet::new();
            for (_, member) in &group.members
            {   for term in matched_keywords(member, vocabulary)
                {   shared.insert(term);
                }
            }
            let shared: Vec<String>
              = shared.into_iter().collect();

            report.push_str(&format!(
              "\nStudies {} address {}. Shared methodology \
               terms: {}.\n",
              refs,
              group.topic,
              join_or(&shared, "none identified")
            ));
        }

        report.push_str(&format!(
          "\nCompared to the related work, the present study \
           uniquely addresses {} with a novel approach.",
          subject_topic
        ));

        report
    }
}

/// Assign each candidate to exactly one bucket, first matching
/// rule wins; unmatched candidates land in "Other"
/// Empty buckets are omitted
fn bucket_candidates<'a>(
  candidates: &'a [AbstractText]
, vocabulary: &[TopicRule]
) -> Vec<CandidateGroup<'a>>
{   let mut groups: Vec<CandidateGroup<'a>> = vocabulary
      .iter()
      .map(|rule| CandidateGroup
        {   topic: rule.topic.clone()
          , members: vec![]
        })
      .collect();
    let mut other = CandidateGroup
    {   topic: "other areas".to_string()
      , members: vec![]
    };

    for (i, candidate) in candidates.iter().enumerate()
    {   match vocabulary
          .iter()
          .position(|rule| rule_matches(candidate, rule))
        {   Some(slot) => {
              groups[slot].members.push((i, candidate));
            }
          , None => other.members.push((i, candidate))
        }
    }

    groups.push(other);
    groups.retain(|g| !g.members.is_empty());
    groups
}

/// First vocabulary rule matching the text, if any
fn assign_topic<'v>(
  text: &AbstractText
, vocabulary: &'v [TopicRule]
) -> Option<&'v TopicRule>
{   vocabulary
      .iter()
      .find(|rule| rule_matches(text, rule))
}

fn rule_matches(text: &AbstractText, rule: &TopicRule) -> bool
{   let words = word_set(text.as_str(), 1);
    rule.keywords
      .iter()
      .any(|k| words.contains(&k.to_lowercase()))
}

/// Vocabulary keywords present in the text, vocabulary order
fn matched_keywords(
  text: &AbstractText
, vocabulary: &[TopicRule]
) -> Vec<String>
{   let words = word_set(text.as_str(), 1);
    let mut seen = BTreeSet::new();
    let mut found = vec![];

    for rule in vocabulary
    {   for keyword in &rule.keywords
        {   let folded = keyword.to_lowercase();
            if words.contains(&folded)
              && seen.insert(folded.clone())
            {   found.push(folded);
            }
        }
    }
    found
}

/// Case-folded distinct words of at least `min_len` chars
fn word_set(text: &str, min_len: usize) -> BTreeSet<String>
{   text.to_lowercase()
      .split(|c: char| !c.is_alphanumeric())
      .filter(|w| w.chars().count() >= min_len)
      .map(|w| w.to_string())
      .collect()
}

fn join_or(terms: &[String], fallback: &str) -> String
{   if terms.is_empty()
    {   fallback.to_string()
    } else
    {   terms.join(", ")
    }
}

// ===== Lexical similarity mode =====

/// Last-resort comparison: per-candidate fraction of shared
/// words (length > 3, case-folded) over the union size, rounded
/// to two decimals
fn lexical_similarity_report(
  subject: &AbstractText
, candidates: &[AbstractText]
) -> String
{   let subject_words
      = word_set(subject.as_str(), MIN_WORD_LEN);

    let mut report = String::from(
      "Lexical similarity between the subject abstract and \
       each related study:\n"
    );

    let mut total = 0.0_f64;
    for (i, candidate) in candidates.iter().enumerate()
    {   let candidate_words
          = word_set(candidate.as_str(), MIN_WORD_LEN);

        let shared = subject_words
          .intersection(&candidate_words)
          .count();
        let union = subject_words
          .union(&candidate_words)
          .count();

        let similarity = if union == 0
        {   0.0
        } else
        {   round2(shared as f64 / union as f64)
        };
        total += similarity;

        report.push_str(&format!(
          "\n[{}] {}% similarity ({} shared term(s) over a \
           union of {})",
          i + 1,
          percent(similarity),
          shared,
          union
        ));
    }

    let average = round2(total / candidates.len() as f64);
    report.push_str(&format!(
      "\n\nAverage similarity: {}%",
      percent(average)
    ));
    report
}

fn round2(x: f64) -> f64
{   (x * 100.0).round() / 100.0
}

fn percent(fraction: f64) -> i64
{   (fraction * 100.0).round() as i64
}
