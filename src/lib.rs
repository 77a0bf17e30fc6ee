//! Foreign-function facade over the transliteration core and the
//! dictionary client.

uniffi::setup_scaffolding!();

mod api;
mod trace_init;

pub use api::{
    SaltArticle, SaltClient, SaltError, SaltHeadword, SaltNegotiated, SaltRendered,
    SaltSchemeInfo, SaltSearchMode, SaltSearchOutcome, SaltServiceInfo, SaltServiceStatus,
};
