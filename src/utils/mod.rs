pub mod display_url;
pub mod public_id;
pub mod validation;
