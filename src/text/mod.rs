pub mod marker;
pub mod normalize;

pub use marker::split_at_marker;
pub use normalize::{capitalize_words, format_msrp_price, normalize_msrp_token, remove_substring};
