//! Screening of user text against fixed Section Two question fragments.

use std::sync::Arc;

/// Sent back instead of an upstream answer when the text matches the denylist.
pub const REFUSAL: &str = "Please complete the questions in Section Two independently.";

pub const SECTION_TWO_PHRASES: &[&str] = &[
    "Multi-Factor Authentication requires users to provide",
    "While on a business trip, you use the company VPN",
    "You are an assistant in the sales department",
    "Zero Trust Architecture is a network security model",
    "You need to approve a file request involving HR data",
    "You are an assistant in the legal department",
];

/// Case-sensitive substring matcher. No normalization or tokenizing happens,
/// so a phrase only matches when it appears verbatim.
#[derive(Debug, Clone)]
pub struct Denylist {
    phrases: Arc<[Box<str>]>,
}

impl Denylist {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    /// First phrase contained in `text`, if any.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.phrases
            .iter()
            .map(AsRef::as_ref)
            .find(|phrase| text.contains(phrase))
    }

    pub fn is_blocked(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(SECTION_TWO_PHRASES.iter().copied())
    }
}
