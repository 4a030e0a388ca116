//! Tool input models and wire parameter construction.
//!
//! Inputs deserialize from the tool call arguments; each knows how to
//! validate itself into [`WireParams`] through the [`ParamBuilder`].

mod inputs;
mod params;

pub use inputs::{
    AuthorDetailsInput, AuthorPapersInput, PaperDetailsInput, PaperListInput, SearchAuthorsInput,
    SearchPapersInput,
};
pub use params::{
    LimitPolicy, MAX_LIMIT, ParamBuilder, WireParams, check_fields, check_limit,
    normalize_date_range, require_id, require_text, wire,
};
