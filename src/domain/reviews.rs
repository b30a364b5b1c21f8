//! Review aggregation shared by books and authors.
//!
//! Appending a review and recomputing the mean rating happen in one logical
//! step so the caller persists a single consistent record afterwards.

use crate::domain::entities::Review;
use crate::domain::error::DomainError;

/// Recomputed aggregate after a review append.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewTotals {
    pub rating: f64,
    pub num_reviews: u32,
}

/// Append `review` to `reviews`, rejecting a second review from the same
/// reviewer, and return the recomputed aggregates.
///
/// `entity` names the reviewed record kind for error messages
/// ("Book already reviewed" / "Author already reviewed").
pub fn append_review(
    reviews: &mut Vec<Review>,
    review: Review,
    entity: &'static str,
) -> Result<ReviewTotals, DomainError> {
    if !(1..=5).contains(&review.rating) {
        return Err(DomainError::validation("rating must be between 1 and 5"));
    }
    if reviews.iter().any(|r| r.user_id == review.user_id) {
        return Err(DomainError::conflict(format!("{entity} already reviewed")));
    }

    reviews.push(review);
    Ok(totals(reviews))
}

fn totals(reviews: &[Review]) -> ReviewTotals {
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    ReviewTotals {
        rating: f64::from(sum) / reviews.len() as f64,
        num_reviews: reviews.len() as u32,
    }
}
