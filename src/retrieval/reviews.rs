//! Review dataset loading
//!
//! Reviews are stored as a YAML list of records with a title, a date, a
//! star rating and the review text.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A customer review of the restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Short headline written by the reviewer
    pub title: String,
    /// Date the review was posted, as written in the dataset
    #[serde(default)]
    pub date: String,
    /// Star rating from 1 to 5
    #[serde(default)]
    pub rating: Option<u8>,
    /// Review body
    pub review: String,
}

impl Review {
    /// Text that gets embedded and handed to the model
    ///
    /// # Examples
    ///
    /// ```
    /// use pizza_assistant::retrieval::Review;
    ///
    /// let review = Review {
    ///     title: "Best crust in town".to_string(),
    ///     date: "2024-05-01".to_string(),
    ///     rating: Some(5),
    ///     review: "Crispy and airy.".to_string(),
    /// };
    /// assert_eq!(review.document(), "Best crust in town Crispy and airy.");
    /// ```
    pub fn document(&self) -> String {
        format!("{} {}", self.title.trim(), self.review.trim())
            .trim()
            .to_string()
    }
}

/// Parse reviews from YAML text
///
/// Records whose review body is blank are skipped.
///
/// # Errors
///
/// Returns `AssistantError::Dataset` if the YAML is malformed or a rating
/// falls outside 1..=5
pub fn parse_reviews(yaml: &str) -> Result<Vec<Review>> {
    let reviews: Vec<Review> = serde_yaml::from_str(yaml)
        .map_err(|e| AssistantError::Dataset(format!("Failed to parse reviews: {}", e)))?;

    let total = reviews.len();
    let mut kept = Vec::with_capacity(total);
    for review in reviews {
        if let Some(rating) = review.rating {
            if !(1..=5).contains(&rating) {
                return Err(AssistantError::Dataset(format!(
                    "Review '{}' has rating {} outside 1-5",
                    review.title, rating
                ))
                .into());
            }
        }
        if review.review.trim().is_empty() {
            tracing::debug!("Skipping review '{}' with empty body", review.title);
            continue;
        }
        kept.push(review);
    }

    if kept.len() < total {
        tracing::warn!("Skipped {} reviews with empty bodies", total - kept.len());
    }

    Ok(kept)
}

/// Load reviews from a YAML file
///
/// # Errors
///
/// Returns `AssistantError::Dataset` if the file cannot be read or parsed
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AssistantError::Dataset(format!(
            "Failed to read reviews from {}: {}",
            path.display(),
            e
        ))
    })?;

    let reviews = parse_reviews(&contents)?;
    tracing::debug!("Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}
