//! Rating/tag conflict detection

use impression_core::{ImpressionTag, Sentiment};

/// Whether the rating and the tag sentiments disagree enough to need a human look
pub fn is_complex(rating: u8, tags: &[ImpressionTag]) -> bool {
    let positive = count(tags, Sentiment::Positive);
    let negative = count(tags, Sentiment::Negative);

    (rating <= 3 && negative == 0 && positive > 0)
        || (rating == 1 && negative > 0 && positive > negative)
        || (rating == 5 && positive == 0 && negative > 0)
        || (rating >= 4 && negative > 0 && negative > 2 * positive)
}

fn count(tags: &[ImpressionTag], sentiment: Sentiment) -> usize {
    tags.iter().filter(|t| t.sentiment == sentiment).count()
}
