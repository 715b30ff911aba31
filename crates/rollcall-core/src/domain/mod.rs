pub mod phone;
pub mod selectors;

pub use phone::{
    find_phone_matches, first_loose_match, is_plausible_phone, normalize_phone, PhoneSet,
    MIN_PHONE_LENGTH,
};
pub use selectors::{LookupStrategy, SelectorSet};
